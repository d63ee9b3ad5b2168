use std::result;

/// Caller-visible failures of the map operations. Both kinds leave the tree untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("no such key in the tree")]
    NoSuchKey,

    #[error("the tree is empty")]
    EmptyTree,
}

pub type Result<T> = result::Result<T, TreeError>;

/// A backing name that `Backing::from_str()` does not recognise.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backing '{0}', expected 'redblack' or 'plain'")]
pub struct ParseBackingError(pub String);
