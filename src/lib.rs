//! An ordered map backed by an arena-allocated red-black tree.
//!
//! `RedBlackMap` keeps its keys sorted and guarantees O(log n) insert, lookup and delete. The same
//! arena representation also backs `PlainTreeMap`, an unbalanced BST with the same interface,
//! and both can be used through the `OrderedMap` trait (see `Backing`).

#[macro_use] extern crate derive_new;

mod base;
mod applied;
mod error;
mod external_api;

pub use crate::base::{util, Key};
pub use crate::error::{ParseBackingError, Result, TreeError};
pub use crate::external_api::{Backing, OrderedMap, PlainTreeMap, RedBlackMap, RedBlackSet, TreeWrapperAccess};
pub use crate::applied::{PlTree, RbTree};
