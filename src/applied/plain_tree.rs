use crate::base::{Key, KeyVal, Links, Node, Search, TreeRepr};

use std::borrow::Borrow;
use std::fmt::{self, Debug, Display, Formatter};
use std::mem;
use std::ops::Deref;

use log::debug;


/// An unbalanced BST. Shares the arena and splice machinery with `RbTree`, so the two can be
/// compared directly.
#[derive(Clone)]
pub struct PlTree<K: Key, V> {
    repr: TreeRepr<PlNode<K, V>>,
}

#[derive(Clone)]
pub struct PlNode<K, V> {
    pub kv: KeyVal<K, V>,
    links: Links,
}


impl<K: Key, V> Node for PlNode<K, V> {
    type K = K;
    type V = V;

    #[inline] fn new(key: K, val: V) -> Self {
        PlNode { kv: KeyVal::new(key, val), links: Links::default() }
    }

    #[inline] fn into_kv(self) -> KeyVal<K, V> { self.kv }
    #[inline] fn kv(&self) -> &KeyVal<K, V> { &self.kv }
    #[inline] fn kv_mut(&mut self) -> &mut KeyVal<K, V> { &mut self.kv }
    #[inline] fn links(&self) -> &Links { &self.links }
    #[inline] fn links_mut(&mut self) -> &mut Links { &mut self.links }
}

impl<K: Debug, V> Debug for PlNode<K, V> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.kv.key, fmt)
    }
}


impl<K: Key, V> PlTree<K, V> {
    /// Constructs a new, empty PlTree
    pub fn new() -> PlTree<K, V> {
        PlTree { repr: TreeRepr::new() }
    }

    pub fn insert(&mut self, key: K, val: V) -> Option<V> {
        match self.repr.search(&key) {
            Search::Found(idx) => Some(mem::replace(self.repr.val_mut(idx), val)),
            Search::Vacant(position) => {
                self.repr.attach(PlNode::new(key, val), position);
                None
            }
        }
    }

    /// Deletes the item with the given key from the tree and returns it (or None).
    pub fn delete<Q>(&mut self, query: &Q) -> Option<V>
        where K: Borrow<Q>, Q: Ord + ?Sized
    {
        let idx = self.repr.index_of(query)?;
        let target = self.repr.removal_target(idx);
        if target != idx {
            debug!("delete: node {} has two children, removing its successor {} instead", idx, target);
        }
        Some(self.repr.splice(target).node.into_kv().val)
    }

    pub fn find_mut<Q>(&mut self, query: &Q) -> Option<&mut V>
        where K: Borrow<Q>, Q: Ord + ?Sized
    {
        self.repr.find_mut(query)
    }

    pub fn minimum(&self) -> Option<(&K, &V)> {
        self.repr.first().map(|idx| (self.repr.key(idx), self.repr.val(idx)))
    }

    pub fn maximum(&self) -> Option<(&K, &V)> {
        self.repr.last().map(|idx| (self.repr.key(idx), self.repr.val(idx)))
    }

    pub fn clear(&mut self) {
        debug!("clearing tree with {} entries", self.repr.size());
        self.repr.clear();
    }

    pub fn into_repr(self) -> TreeRepr<PlNode<K, V>> {
        self.repr
    }
}


impl<K: Key, V> Deref for PlTree<K, V> {
    type Target = TreeRepr<PlNode<K, V>>;

    fn deref(&self) -> &Self::Target {
        &self.repr
    }
}

impl<K: Key, V> Default for PlTree<K, V> {
    fn default() -> Self {
        PlTree::new()
    }
}

impl<K: Key + Debug, V> Debug for PlTree<K, V> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.repr, fmt)
    }
}

impl<K: Key + Debug, V> Display for PlTree<K, V> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.repr, fmt)
    }
}



#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::Rng;

    use crate::base::util::seeded_rng;
    use crate::base::validation::{check_bst, check_integrity};
    use super::PlTree;

    type Tree = PlTree<usize, usize>;

    fn validate(tree: &Tree) {
        check_bst(&**tree);
        check_integrity(&**tree);
    }

    #[test]
    fn keeps_insertion_shape() {
        let mut tree = Tree::new();
        for key in 1..6 {
            assert_eq!(tree.insert(key, key), None);
        }
        validate(&tree);
        // no rebalancing: ascending keys form a chain
        assert_eq!(tree.height(), 5);
        assert_eq!(tree.minimum(), Some((&1, &1)));
        assert_eq!(tree.maximum(), Some((&5, &5)));
    }

    #[test]
    fn delete_inner_node() {
        let mut tree = Tree::new();
        for &key in [8, 4, 12, 2, 6, 10, 14].iter() {
            tree.insert(key, key * 2);
        }

        assert_eq!(tree.delete(&4), Some(8));
        assert_eq!(tree.delete(&8), Some(16));
        assert_eq!(tree.delete(&8), None);
        validate(&tree);
        let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![2, 6, 10, 12, 14]);
    }

    #[test]
    fn random_ops_match_btreemap() {
        let mut rng = seeded_rng(11);
        let mut tree = Tree::new();
        let mut model = BTreeMap::new();

        for _ in 0..3000 {
            let key = rng.gen_range(0..200);
            if rng.gen_bool(0.5) {
                assert_eq!(tree.insert(key, key + 1), model.insert(key, key + 1));
            } else {
                assert_eq!(tree.delete(&key), model.remove(&key));
            }
        }

        validate(&tree);
        assert!(tree.iter().map(|(k, v)| (*k, *v)).eq(model.into_iter()));

        if let Some((&key, _)) = tree.minimum() {
            if let Some(val) = tree.find_mut(&key) {
                *val = 0;
            }
            assert_eq!(tree.find(&key), Some(&0));
        }

        tree.clear();
        assert!(tree.is_empty());
        validate(&tree);
    }
}
