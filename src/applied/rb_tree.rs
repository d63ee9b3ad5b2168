use crate::base::{Color, Key, KeyVal, Links, Node, Search, Side, TreeRepr};

use std::borrow::Borrow;
use std::fmt::{self, Debug, Display, Formatter};
use std::mem;
use std::ops::Deref;

use log::{debug, trace};


#[derive(Clone)]
pub struct RbNode<K, V> {
    pub kv: KeyVal<K, V>,
    pub color: Color,
    links: Links,
}

impl<K: Key, V> Node for RbNode<K, V> {
    type K = K;
    type V = V;

    /// New nodes are red, so that linking them in never changes a black-height.
    #[inline]
    fn new(key: K, val: V) -> Self {
        RbNode { kv: KeyVal::new(key, val), color: Color::Red, links: Links::default() }
    }

    #[inline] fn into_kv(self) -> KeyVal<K, V> { self.kv }
    #[inline] fn kv(&self) -> &KeyVal<K, V> { &self.kv }
    #[inline] fn kv_mut(&mut self) -> &mut KeyVal<K, V> { &mut self.kv }
    #[inline] fn links(&self) -> &Links { &self.links }
    #[inline] fn links_mut(&mut self) -> &mut Links { &mut self.links }
}

impl<K: Debug, V> Debug for RbNode<K, V> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        let color = match self.color {
            Color::Red => 'R',
            Color::Black => 'B',
        };
        write!(fmt, "{:?}:{}", self.kv.key, color)
    }
}


/// One step of the insert fixup loop, classified from the current node and its relatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertCase {
    /// The node is black or has a black parent: nothing to repair.
    Balanced,
    /// The node is red and is the root.
    RedRoot,
    /// The node and its parent are red, and the parent is the root.
    RedParentAtRoot { parent: usize },
    /// The node, its parent and its uncle are red.
    RedUncle { parent: usize, uncle: usize, grandparent: usize },
    /// Black uncle, and the node is the outer grandchild: it hangs on the same `side` of its
    /// parent as the parent hangs of the grandparent.
    Straight { parent: usize, grandparent: usize, side: Side },
    /// Black uncle, and the node is the inner grandchild. The parent is the grandparent's `side`
    /// child.
    ZigZag { parent: usize, side: Side },
}

/// One step of the delete fixup loop. The position carrying the missing black unit is the
/// `side` child of `parent`; `sibling` is the other child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteCase {
    RedSibling { sibling: usize },
    /// Black sibling whose children are both black (or absent).
    BlackNephews { sibling: usize },
    /// Black sibling; its child on the far side is black but the near one is red.
    NearNephewRed { sibling: usize, near: usize },
    /// Black sibling; its child on the far side is red.
    FarNephewRed { sibling: usize, far: usize },
}


#[derive(Clone)]
pub struct RbTree<K: Key, V> {
    repr: TreeRepr<RbNode<K, V>>,
}

impl<K: Key, V> RbTree<K, V> {
    pub fn new() -> RbTree<K, V> {
        RbTree { repr: TreeRepr::new() }
    }

    /// Inserts the entry, or replaces the value if the key is present (returning the old value;
    /// color and shape stay as they are).
    pub fn insert(&mut self, key: K, val: V) -> Option<V> {
        match self.repr.search(&key) {
            Search::Found(idx) => Some(mem::replace(self.repr.val_mut(idx), val)),
            Search::Vacant(position) => {
                let idx = self.repr.attach(RbNode::new(key, val), position);
                self.rebalance_after_insert(idx);
                None
            }
        }
    }

    /// Deletes the item with the given key from the tree and returns its value (or None).
    pub fn delete<Q>(&mut self, query: &Q) -> Option<V>
        where K: Borrow<Q>, Q: Ord + ?Sized
    {
        let idx = self.repr.index_of(query)?;
        let target = self.repr.removal_target(idx);
        if target != idx {
            debug!("delete: node {} has two children, removing its successor {} instead", idx, target);
        }

        let removed_color = self.repr.node(target).color;
        let spliced = self.repr.splice(target);

        if removed_color == Color::Black {
            match spliced.child {
                Some(child) if self.is_red(Some(child)) => self.set_color(child, Color::Black),
                _ => self.rebalance_after_delete(spliced.position),
            }
        }

        Some(spliced.node.into_kv().val)
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

    pub fn into_repr(self) -> TreeRepr<RbNode<K, V>> {
        self.repr
    }

    /// Color of a node; absent children count as black.
    #[inline]
    pub(crate) fn color(&self, idx: Option<usize>) -> Color {
        idx.map_or(Color::Black, |idx| self.repr.node(idx).color)
    }

    #[inline]
    fn is_red(&self, idx: Option<usize>) -> bool {
        self.color(idx) == Color::Red
    }

    #[inline]
    fn set_color(&mut self, idx: usize, color: Color) {
        self.repr.node_mut(idx).color = color;
    }
}


//---- Insert fixup --------------------------------------------------------------------------------
impl<K: Key, V> RbTree<K, V> {
    pub(crate) fn insert_case(&self, idx: usize) -> InsertCase {
        if !self.is_red(Some(idx)) {
            return InsertCase::Balanced;
        }

        let parent = match self.repr.parent(idx) {
            Some(parent) => parent,
            None => return InsertCase::RedRoot,
        };
        if !self.is_red(Some(parent)) {
            return InsertCase::Balanced;
        }

        let grandparent = match self.repr.parent(parent) {
            Some(grandparent) => grandparent,
            None => return InsertCase::RedParentAtRoot { parent },
        };

        let side = self.repr.side_in(grandparent, parent);
        match self.repr.child(grandparent, side.opposite()) {
            Some(uncle) if self.is_red(Some(uncle)) =>
                InsertCase::RedUncle { parent, uncle, grandparent },
            _ if self.repr.side_in(parent, idx) == side =>
                InsertCase::Straight { parent, grandparent, side },
            _ =>
                InsertCase::ZigZag { parent, side },
        }
    }

    fn rebalance_after_insert(&mut self, mut idx: usize) {
        loop {
            let case = self.insert_case(idx);
            trace!("insert fixup at {}: {:?}", idx, case);

            match case {
                InsertCase::Balanced => return,
                InsertCase::RedRoot => {
                    self.set_color(idx, Color::Black);
                    return;
                }
                InsertCase::RedParentAtRoot { parent } => {
                    self.set_color(parent, Color::Black);
                    return;
                }
                InsertCase::RedUncle { parent, uncle, grandparent } => {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    idx = grandparent;
                }
                InsertCase::ZigZag { parent, side } => {
                    // straighten the line; the old parent is now the outer grandchild
                    self.repr.rotate(parent, side);
                    idx = parent;
                }
                InsertCase::Straight { parent, grandparent, side } => {
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.repr.rotate(grandparent, side.opposite());
                    return;
                }
            }
        }
    }
}


//---- Delete fixup --------------------------------------------------------------------------------
impl<K: Key, V> RbTree<K, V> {
    /// Classifies the deficient position: the `side` child of `parent`, which may be absent.
    pub(crate) fn delete_case(&self, parent: usize, side: Side) -> DeleteCase {
        let sibling = match self.repr.child(parent, side.opposite()) {
            Some(sibling) => sibling,
            None => unreachable!("missing black unit at {:?} of {} without a sibling", side, parent),
        };

        if self.is_red(Some(sibling)) {
            return DeleteCase::RedSibling { sibling };
        }

        match (self.repr.child(sibling, side.opposite()), self.repr.child(sibling, side)) {
            (Some(far), _) if self.is_red(Some(far)) => DeleteCase::FarNephewRed { sibling, far },
            (_, Some(near)) if self.is_red(Some(near)) => DeleteCase::NearNephewRed { sibling, near },
            _ => DeleteCase::BlackNephews { sibling },
        }
    }

    /// Restores the black-height after a black node was removed from `position`. `None` stands
    /// for the root, where the missing unit is simply absorbed.
    fn rebalance_after_delete(&mut self, mut position: Option<(usize, Side)>) {
        while let Some((parent, side)) = position {
            let case = self.delete_case(parent, side);
            trace!("delete fixup at {:?} of {}: {:?}", side, parent, case);

            position = match case {
                DeleteCase::RedSibling { sibling } => {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.repr.rotate(parent, side);
                    Some((parent, side))
                }
                DeleteCase::BlackNephews { sibling } => {
                    self.set_color(sibling, Color::Red);
                    if self.is_red(Some(parent)) {
                        self.set_color(parent, Color::Black);
                        None
                    } else {
                        self.repr.parent(parent)
                            .map(|grandparent| (grandparent, self.repr.side_in(grandparent, parent)))
                    }
                }
                DeleteCase::NearNephewRed { sibling, near } => {
                    self.set_color(near, Color::Black);
                    self.set_color(sibling, Color::Red);
                    self.repr.rotate(sibling, side.opposite());
                    Some((parent, side))
                }
                DeleteCase::FarNephewRed { sibling, far } => {
                    let parent_color = self.repr.node(parent).color;
                    self.set_color(sibling, parent_color);
                    self.set_color(parent, Color::Black);
                    self.set_color(far, Color::Black);
                    self.repr.rotate(parent, side);
                    None
                }
            };
        }
    }
}


impl<K: Key, V> Deref for RbTree<K, V> {
    type Target = TreeRepr<RbNode<K, V>>;

    fn deref(&self) -> &Self::Target {
        &self.repr
    }
}

impl<K: Key, V> Default for RbTree<K, V> {
    fn default() -> Self {
        RbTree::new()
    }
}

impl<K: Key + Debug, V> Debug for RbTree<K, V> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.repr, fmt)
    }
}

impl<K: Key + Debug, V> Display for RbTree<K, V> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.repr, fmt)
    }
}
