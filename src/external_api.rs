use std::fmt;
use std::str::FromStr;

use crate::base::Key;
use crate::error::{ParseBackingError, Result};

pub use self::plain::PlainTreeMap;
pub use self::redblack::{RedBlackMap, RedBlackSet};


/// The ordered-map contract shared by every backing. Object safe, so a backing can be chosen at
/// runtime through `Backing::build()`.
pub trait OrderedMap<K: Key, V> {
    /// Inserts the entry and returns the previous value if the key was already present.
    fn insert(&mut self, key: K, val: V) -> Option<V>;

    fn lookup(&self, key: &K) -> Option<&V>;

    /// Deletes the entry and returns its value, or `TreeError::NoSuchKey`.
    fn delete(&mut self, key: &K) -> Result<V>;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn minimum(&self) -> Result<(&K, &V)>;
    fn maximum(&self) -> Result<(&K, &V)>;
}


/// Gives tests and tools access to the tree behind a public wrapper.
pub trait TreeWrapperAccess {
    type Wrapper;

    fn internal(&self) -> &Self::Wrapper;
    fn into_internal(self) -> Self::Wrapper;
    fn from_internal(wrapper: Self::Wrapper) -> Self;
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    RedBlack,
    Plain,
}

impl Backing {
    pub fn build<K: Key + 'static, V: 'static>(self) -> Box<dyn OrderedMap<K, V>> {
        match self {
            Backing::RedBlack => Box::new(RedBlackMap::new()),
            Backing::Plain => Box::new(PlainTreeMap::new()),
        }
    }
}

impl FromStr for Backing {
    type Err = ParseBackingError;

    fn from_str(s: &str) -> ::std::result::Result<Backing, ParseBackingError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redblack" | "rb" => Ok(Backing::RedBlack),
            "plain" => Ok(Backing::Plain),
            _ => Err(ParseBackingError(s.to_string())),
        }
    }
}

impl fmt::Display for Backing {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Backing::RedBlack => "redblack",
            Backing::Plain => "plain",
        };
        fmt.write_str(name)
    }
}



mod redblack {
    use crate::applied::{RbNode, RbTree};
    use crate::base::{IntoIter, Iter, Key};
    use crate::error::{Result, TreeError};

    use std::borrow::Borrow;
    use std::fmt::{self, Debug, Display, Formatter};
    use std::iter::FromIterator;

    use super::{OrderedMap, TreeWrapperAccess};


    /// An ordered map backed by a red-black tree. Insert, lookup and delete are O(log n).
    #[derive(Clone)]
    pub struct RedBlackMap<K: Key, V> {
        internal: RbTree<K, V>,
    }

    impl<K: Key, V> RedBlackMap<K, V> {
        pub fn new() -> RedBlackMap<K, V> {
            RedBlackMap { internal: RbTree::new() }
        }

        /// Inserts the entry. If the key was already present, its value is replaced and the old
        /// one returned; the tree shape does not change in that case.
        pub fn insert(&mut self, key: K, val: V) -> Option<V> {
            self.internal.insert(key, val)
        }

        pub fn lookup<Q>(&self, key: &Q) -> Option<&V>
            where K: Borrow<Q>, Q: Ord + ?Sized
        {
            self.internal.find(key)
        }

        pub fn lookup_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
            where K: Borrow<Q>, Q: Ord + ?Sized
        {
            self.internal.find_mut(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
            where K: Borrow<Q>, Q: Ord + ?Sized
        {
            self.internal.contains(key)
        }

        /// Deletes the item with the given key from the tree and returns its value. Fails with
        /// `NoSuchKey`, leaving the tree untouched, if the key is absent.
        pub fn delete<Q>(&mut self, key: &Q) -> Result<V>
            where K: Borrow<Q>, Q: Ord + ?Sized
        {
            self.internal.delete(key).ok_or(TreeError::NoSuchKey)
        }

        /// Returns the number of items in this tree.
        pub fn size(&self) -> usize { self.internal.size() }

        pub fn is_empty(&self) -> bool { self.internal.is_empty() }

        pub fn minimum(&self) -> Result<(&K, &V)> {
            self.internal.minimum().ok_or(TreeError::EmptyTree)
        }

        pub fn maximum(&self) -> Result<(&K, &V)> {
            self.internal.maximum().ok_or(TreeError::EmptyTree)
        }

        /// Removes all items from the tree and releases the node storage.
        pub fn clear(&mut self) { self.internal.clear(); }

        /// Number of nodes on the longest root-to-leaf path; at most `2*log2(size+1)`.
        pub fn height(&self) -> usize { self.internal.height() }

        /// Iterates over the entries in ascending key order.
        pub fn iter(&self) -> Iter<'_, RbNode<K, V>> {
            self.internal.iter()
        }
    }

    impl<K: Key, V> Default for RedBlackMap<K, V> {
        fn default() -> Self {
            RedBlackMap::new()
        }
    }

    impl<K: Key, V> OrderedMap<K, V> for RedBlackMap<K, V> {
        fn insert(&mut self, key: K, val: V) -> Option<V> { RedBlackMap::insert(self, key, val) }
        fn lookup(&self, key: &K) -> Option<&V> { RedBlackMap::lookup(self, key) }
        fn delete(&mut self, key: &K) -> Result<V> { RedBlackMap::delete(self, key) }
        fn size(&self) -> usize { RedBlackMap::size(self) }
        fn minimum(&self) -> Result<(&K, &V)> { RedBlackMap::minimum(self) }
        fn maximum(&self) -> Result<(&K, &V)> { RedBlackMap::maximum(self) }
    }

    impl<K: Key, V> TreeWrapperAccess for RedBlackMap<K, V> {
        type Wrapper = RbTree<K, V>;

        fn internal(&self) -> &RbTree<K, V> {
            &self.internal
        }

        fn into_internal(self) -> RbTree<K, V> {
            self.internal
        }

        fn from_internal(wrapper: RbTree<K, V>) -> Self {
            RedBlackMap { internal: wrapper }
        }
    }

    impl<K: Key, V> IntoIterator for RedBlackMap<K, V> {
        type Item = (K, V);
        type IntoIter = IntoIter<RbNode<K, V>>;

        fn into_iter(self) -> Self::IntoIter {
            self.internal.into_repr().into_iter()
        }
    }

    impl<'a, K: Key, V> IntoIterator for &'a RedBlackMap<K, V> {
        type Item = (&'a K, &'a V);
        type IntoIter = Iter<'a, RbNode<K, V>>;

        fn into_iter(self) -> Self::IntoIter {
            self.iter()
        }
    }

    impl<K: Key, V> FromIterator<(K, V)> for RedBlackMap<K, V> {
        fn from_iter<I: IntoIterator<Item=(K, V)>>(iter: I) -> Self {
            let mut map = RedBlackMap::new();
            map.extend(iter);
            map
        }
    }

    impl<K: Key, V> Extend<(K, V)> for RedBlackMap<K, V> {
        fn extend<I: IntoIterator<Item=(K, V)>>(&mut self, iter: I) {
            for (key, val) in iter {
                self.insert(key, val);
            }
        }
    }

    impl<K: Key + Debug, V> Debug for RedBlackMap<K, V> {
        fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
            Debug::fmt(&self.internal, fmt)
        }
    }

    impl<K: Key + Debug, V> Display for RedBlackMap<K, V> {
        fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
            Display::fmt(&self.internal, fmt)
        }
    }


    #[derive(Clone)]
    pub struct RedBlackSet<T: Key> {
        map: RedBlackMap<T, ()>,
    }

    impl<T: Key> RedBlackSet<T> {
        pub fn new() -> RedBlackSet<T> {
            RedBlackSet { map: RedBlackMap::new() }
        }

        /// Adds the item and returns true, or returns false if it was already present.
        pub fn insert(&mut self, item: T) -> bool {
            self.map.insert(item, ()).is_none()
        }

        pub fn contains<Q>(&self, item: &Q) -> bool
            where T: Borrow<Q>, Q: Ord + ?Sized
        {
            self.map.contains_key(item)
        }

        pub fn delete<Q>(&mut self, item: &Q) -> Result<()>
            where T: Borrow<Q>, Q: Ord + ?Sized
        {
            self.map.delete(item)
        }

        pub fn minimum(&self) -> Result<&T> {
            self.map.minimum().map(|(item, _)| item)
        }

        pub fn maximum(&self) -> Result<&T> {
            self.map.maximum().map(|(item, _)| item)
        }

        /// Returns the number of items in this set.
        pub fn size(&self) -> usize { self.map.size() }

        pub fn is_empty(&self) -> bool { self.map.is_empty() }

        pub fn iter(&self) -> impl Iterator<Item=&T> + '_ {
            self.map.iter().map(|(item, _)| item)
        }
    }

    impl<T: Key> Default for RedBlackSet<T> {
        fn default() -> Self {
            RedBlackSet::new()
        }
    }

    impl<T: Key> FromIterator<T> for RedBlackSet<T> {
        fn from_iter<I: IntoIterator<Item=T>>(iter: I) -> Self {
            RedBlackSet { map: iter.into_iter().map(|item| (item, ())).collect() }
        }
    }

    impl<T: Key + Debug> Debug for RedBlackSet<T> {
        fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
            Debug::fmt(&self.map, fmt)
        }
    }

    impl<T: Key + Debug> Display for RedBlackSet<T> {
        fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
            Display::fmt(&self.map, fmt)
        }
    }
}



mod plain {
    use crate::applied::{PlNode, PlTree};
    use crate::base::{IntoIter, Iter, Key};
    use crate::error::{Result, TreeError};

    use std::borrow::Borrow;
    use std::fmt::{self, Debug, Display, Formatter};
    use std::iter::FromIterator;

    use super::{OrderedMap, TreeWrapperAccess};


    /// An ordered map backed by an unbalanced BST. Same contract as `RedBlackMap`, but sorted
    /// input degrades it to a linked list.
    #[derive(Clone)]
    pub struct PlainTreeMap<K: Key, V> {
        internal: PlTree<K, V>,
    }

    impl<K: Key, V> PlainTreeMap<K, V> {
        pub fn new() -> PlainTreeMap<K, V> {
            PlainTreeMap { internal: PlTree::new() }
        }

        pub fn insert(&mut self, key: K, val: V) -> Option<V> {
            self.internal.insert(key, val)
        }

        pub fn lookup<Q>(&self, key: &Q) -> Option<&V>
            where K: Borrow<Q>, Q: Ord + ?Sized
        {
            self.internal.find(key)
        }

        pub fn lookup_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
            where K: Borrow<Q>, Q: Ord + ?Sized
        {
            self.internal.find_mut(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
            where K: Borrow<Q>, Q: Ord + ?Sized
        {
            self.internal.contains(key)
        }

        /// Deletes the item with the given key from the tree and returns its value.
        pub fn delete<Q>(&mut self, key: &Q) -> Result<V>
            where K: Borrow<Q>, Q: Ord + ?Sized
        {
            self.internal.delete(key).ok_or(TreeError::NoSuchKey)
        }

        pub fn size(&self) -> usize { self.internal.size() }

        pub fn is_empty(&self) -> bool { self.internal.is_empty() }

        pub fn minimum(&self) -> Result<(&K, &V)> {
            self.internal.minimum().ok_or(TreeError::EmptyTree)
        }

        pub fn maximum(&self) -> Result<(&K, &V)> {
            self.internal.maximum().ok_or(TreeError::EmptyTree)
        }

        pub fn clear(&mut self) { self.internal.clear(); }

        pub fn height(&self) -> usize { self.internal.height() }

        pub fn iter(&self) -> Iter<'_, PlNode<K, V>> {
            self.internal.iter()
        }
    }

    impl<K: Key, V> Default for PlainTreeMap<K, V> {
        fn default() -> Self {
            PlainTreeMap::new()
        }
    }

    impl<K: Key, V> OrderedMap<K, V> for PlainTreeMap<K, V> {
        fn insert(&mut self, key: K, val: V) -> Option<V> { PlainTreeMap::insert(self, key, val) }
        fn lookup(&self, key: &K) -> Option<&V> { PlainTreeMap::lookup(self, key) }
        fn delete(&mut self, key: &K) -> Result<V> { PlainTreeMap::delete(self, key) }
        fn size(&self) -> usize { PlainTreeMap::size(self) }
        fn minimum(&self) -> Result<(&K, &V)> { PlainTreeMap::minimum(self) }
        fn maximum(&self) -> Result<(&K, &V)> { PlainTreeMap::maximum(self) }
    }

    impl<K: Key, V> TreeWrapperAccess for PlainTreeMap<K, V> {
        type Wrapper = PlTree<K, V>;

        fn internal(&self) -> &PlTree<K, V> {
            &self.internal
        }

        fn into_internal(self) -> PlTree<K, V> {
            self.internal
        }

        fn from_internal(wrapper: PlTree<K, V>) -> Self {
            PlainTreeMap { internal: wrapper }
        }
    }

    impl<K: Key, V> IntoIterator for PlainTreeMap<K, V> {
        type Item = (K, V);
        type IntoIter = IntoIter<PlNode<K, V>>;

        fn into_iter(self) -> Self::IntoIter {
            self.internal.into_repr().into_iter()
        }
    }

    impl<'a, K: Key, V> IntoIterator for &'a PlainTreeMap<K, V> {
        type Item = (&'a K, &'a V);
        type IntoIter = Iter<'a, PlNode<K, V>>;

        fn into_iter(self) -> Self::IntoIter {
            self.iter()
        }
    }

    impl<K: Key, V> FromIterator<(K, V)> for PlainTreeMap<K, V> {
        fn from_iter<I: IntoIterator<Item=(K, V)>>(iter: I) -> Self {
            let mut map = PlainTreeMap::new();
            map.extend(iter);
            map
        }
    }

    impl<K: Key, V> Extend<(K, V)> for PlainTreeMap<K, V> {
        fn extend<I: IntoIterator<Item=(K, V)>>(&mut self, iter: I) {
            for (key, val) in iter {
                self.insert(key, val);
            }
        }
    }

    impl<K: Key + Debug, V> Debug for PlainTreeMap<K, V> {
        fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
            Debug::fmt(&self.internal, fmt)
        }
    }

    impl<K: Key + Debug, V> Display for PlainTreeMap<K, V> {
        fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
            Display::fmt(&self.internal, fmt)
        }
    }
}
