use std::borrow::Borrow;
use std::cmp::{max, Ordering};
use std::fmt::{self, Debug, Formatter};
use std::mem;

use super::{FreeList, Links, Node, Side};


/// Outcome of a BST descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    Found(usize),
    /// The key is absent. A new node belongs under `(parent, side)`, or at the root if `None`.
    Vacant(Option<(usize, Side)>),
}

/// A node unlinked from the tree by `TreeRepr::splice()`.
pub struct Spliced<N> {
    pub node: N,
    /// The former only child, now occupying the vacated position.
    pub child: Option<usize>,
    /// The vacated position as `(parent, side)`; `None` if the node was the root.
    pub position: Option<(usize, Side)>,
}


/// Arena representation of a binary search tree. Nodes live in `slots` and refer to each other by
/// slot index; the slots of deleted nodes are recycled through `free`.
#[derive(Clone)]
pub struct TreeRepr<N: Node> {
    slots: Vec<Option<N>>,
    free: FreeList,
    root: Option<usize>,
    size: usize,
}


//---- Entry points --------------------------------------------------------------------------------
impl<N: Node> TreeRepr<N> {
    pub fn new() -> TreeRepr<N> {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> TreeRepr<N> {
        TreeRepr { slots: Vec::with_capacity(capacity), free: FreeList::new(), root: None, size: 0 }
    }

    /// Descends from the root looking for `query`.
    pub fn search<Q>(&self, query: &Q) -> Search
        where N::K: Borrow<Q>, Q: Ord + ?Sized
    {
        let mut idx = match self.root {
            Some(root) => root,
            None => return Search::Vacant(None),
        };

        loop {
            let side = match query.cmp(self.key(idx).borrow()) {
                Ordering::Equal   => return Search::Found(idx),
                Ordering::Less    => Side::Left,
                Ordering::Greater => Side::Right,
            };

            match self.child(idx, side) {
                Some(child) => idx = child,
                None => return Search::Vacant(Some((idx, side))),
            }
        }
    }

    pub fn index_of<Q>(&self, query: &Q) -> Option<usize>
        where N::K: Borrow<Q>, Q: Ord + ?Sized
    {
        match self.search(query) {
            Search::Found(idx) => Some(idx),
            Search::Vacant(_) => None,
        }
    }

    /// Finds the item with the given key and returns it (or None).
    pub fn find<Q>(&self, query: &Q) -> Option<&N::V>
        where N::K: Borrow<Q>, Q: Ord + ?Sized
    {
        self.index_of(query).map(|idx| self.val(idx))
    }

    pub fn find_mut<Q>(&mut self, query: &Q) -> Option<&mut N::V>
        where N::K: Borrow<Q>, Q: Ord + ?Sized
    {
        match self.index_of(query) {
            Some(idx) => Some(self.val_mut(idx)),
            None => None,
        }
    }

    pub fn contains<Q>(&self, query: &Q) -> bool
        where N::K: Borrow<Q>, Q: Ord + ?Sized
    {
        self.index_of(query).is_some()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Number of arena slots, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn free_slots(&self) -> usize {
        self.free.nslots()
    }

    /// Drops all nodes together with the arena storage.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.root = None;
        self.size = 0;
    }

    /// Number of nodes on the longest root-to-leaf path. Walks with an explicit stack, since an
    /// unbalanced flavour may degenerate into a chain as long as the tree.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();

        while let Some((idx, depth)) = stack.pop() {
            height = max(height, depth);
            for &side in [Side::Left, Side::Right].iter() {
                if let Some(child) = self.child(idx, side) {
                    stack.push((child, depth + 1));
                }
            }
        }

        height
    }

    pub fn first(&self) -> Option<usize> {
        self.root.map(|root| self.find_min(root))
    }

    pub fn last(&self) -> Option<usize> {
        self.root.map(|root| self.find_max(root))
    }

    pub fn iter(&self) -> Iter<'_, N> {
        Iter { tree: self, next: self.first(), remaining: self.size }
    }
}


//---- Accessors -----------------------------------------------------------------------------------
impl<N: Node> TreeRepr<N> {
    // Indices handed out by the tree always point at live slots; anything else is a bug.
    #[inline(always)]
    pub fn node(&self, idx: usize) -> &N {
        match self.slots[idx] {
            Some(ref node) => node,
            None => panic!("vacant slot {}", idx),
        }
    }

    #[inline(always)]
    pub fn node_mut(&mut self, idx: usize) -> &mut N {
        match self.slots[idx] {
            Some(ref mut node) => node,
            None => panic!("vacant slot {}", idx),
        }
    }

    #[inline(always)]
    pub fn key(&self, idx: usize) -> &N::K {
        &self.node(idx).kv().key
    }

    #[inline(always)]
    pub fn val(&self, idx: usize) -> &N::V {
        &self.node(idx).kv().val
    }

    #[inline(always)]
    pub fn val_mut(&mut self, idx: usize) -> &mut N::V {
        &mut self.node_mut(idx).kv_mut().val
    }

    #[inline(always)]
    pub fn links(&self, idx: usize) -> &Links {
        self.node(idx).links()
    }

    #[inline(always)]
    fn links_mut(&mut self, idx: usize) -> &mut Links {
        self.node_mut(idx).links_mut()
    }

    #[inline(always)]
    pub fn parent(&self, idx: usize) -> Option<usize> {
        self.links(idx).parent
    }

    #[inline(always)]
    pub fn child(&self, idx: usize, side: Side) -> Option<usize> {
        self.links(idx)[side]
    }

    #[inline(always)]
    pub fn left(&self, idx: usize) -> Option<usize> {
        self.child(idx, Side::Left)
    }

    #[inline(always)]
    pub fn right(&self, idx: usize) -> Option<usize> {
        self.child(idx, Side::Right)
    }

    #[inline(always)]
    pub fn has_child(&self, idx: usize, side: Side) -> bool {
        self.child(idx, side).is_some()
    }

    /// Which child of its parent `idx` is; `None` for the root.
    #[inline]
    pub fn side_of(&self, idx: usize) -> Option<Side> {
        self.parent(idx).map(|parent| self.side_in(parent, idx))
    }

    #[inline(always)]
    pub fn side_in(&self, parent: usize, idx: usize) -> Side {
        if self.left(parent) == Some(idx) {
            Side::Left
        } else {
            debug_assert_eq!(self.right(parent), Some(idx), "{} is not a child of {}", idx, parent);
            Side::Right
        }
    }
}


//---- Structural operations -----------------------------------------------------------------------
impl<N: Node> TreeRepr<N> {
    #[inline]
    pub fn find_max(&self, mut idx: usize) -> usize {
        while let Some(right) = self.right(idx) {
            idx = right;
        }
        idx
    }

    #[inline]
    pub fn find_min(&self, mut idx: usize) -> usize {
        while let Some(left) = self.left(idx) {
            idx = left;
        }
        idx
    }

    /// The next node in key order, found through the parent back-references.
    pub fn successor(&self, idx: usize) -> Option<usize> {
        if let Some(right) = self.right(idx) {
            return Some(self.find_min(right));
        }

        let mut curr = idx;
        while let Some(parent) = self.parent(curr) {
            if self.left(parent) == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }

        None
    }

    /// Stores `node` in a free slot and links it as a leaf at `position`, or as the root of an
    /// empty tree.
    pub fn attach(&mut self, mut node: N, position: Option<(usize, Side)>) -> usize {
        debug_assert!(position.map_or(self.root.is_none(), |(parent, side)| !self.has_child(parent, side)));

        *node.links_mut() = Links::default();
        let idx = self.alloc(node);
        match position {
            Some((parent, side)) => self.set_child(parent, side, Some(idx)),
            None => self.root = Some(idx),
        }
        self.size += 1;
        idx
    }

    #[inline]
    pub fn set_child(&mut self, parent: usize, side: Side, child: Option<usize>) {
        self.links_mut(parent)[side] = child;
        if let Some(child) = child {
            self.links_mut(child).parent = Some(parent);
        }
    }

    /// Puts the subtree `new` in the place of the subtree rooted at `old`. The links of `old`
    /// itself are left untouched.
    pub fn replace_subtree(&mut self, old: usize, new: Option<usize>) {
        match self.parent(old) {
            Some(parent) => {
                let side = self.side_in(parent, old);
                self.set_child(parent, side, new);
            }
            None => {
                self.root = new;
                if let Some(new) = new {
                    self.links_mut(new).parent = None;
                }
            }
        }
    }

    /// Rotates the subtree at `idx` toward `side`: `idx` moves one level down on that side, and its
    /// child on the opposite side (the pivot) takes its place. Returns the pivot.
    pub fn rotate(&mut self, idx: usize, side: Side) -> usize {
        let pivot = match self.child(idx, side.opposite()) {
            Some(pivot) => pivot,
            None => unreachable!("rotating {} toward {:?} without a pivot", idx, side),
        };

        let inner = self.child(pivot, side);
        self.set_child(idx, side.opposite(), inner);
        self.replace_subtree(idx, Some(pivot));
        self.set_child(pivot, side, Some(idx));
        pivot
    }

    /// Exchanges the key/value entries of two nodes, leaving colors and links in place.
    pub fn swap_entries(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }

        let mut node_a = match self.slots[a].take() {
            Some(node) => node,
            None => panic!("vacant slot {}", a),
        };
        mem::swap(node_a.kv_mut(), self.node_mut(b).kv_mut());
        self.slots[a] = Some(node_a);
    }

    /// Picks the node that is physically removed when deleting the entry at `idx`: `idx` itself if
    /// it has at most one child, otherwise its in-order successor, whose entry is first swapped
    /// into `idx`. Either way the returned node holds the entry being deleted.
    pub fn removal_target(&mut self, idx: usize) -> usize {
        match (self.left(idx), self.right(idx)) {
            (Some(_), Some(right)) => {
                let succ = self.find_min(right);
                self.swap_entries(idx, succ);
                succ
            }
            _ => idx,
        }
    }

    /// Unlinks a node with at most one child, moves that child into its position and frees its
    /// slot.
    pub fn splice(&mut self, idx: usize) -> Spliced<N> {
        debug_assert!(!(self.has_child(idx, Side::Left) && self.has_child(idx, Side::Right)),
                      "splicing {} with two children", idx);

        let child = self.left(idx).or(self.right(idx));
        let position = self.parent(idx).map(|parent| (parent, self.side_in(parent, idx)));
        self.replace_subtree(idx, child);
        let node = self.release(idx);
        Spliced { node, child, position }
    }

    fn alloc(&mut self, node: N) -> usize {
        match self.free.pop() {
            Some(idx) => {
                debug_assert!(self.slots[idx].is_none());
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> N {
        let node = match self.slots[idx].take() {
            Some(node) => node,
            None => panic!("vacant slot {}", idx),
        };
        self.free.push(idx);
        self.size -= 1;
        node
    }
}


impl<N: Node> Default for TreeRepr<N> {
    fn default() -> Self {
        TreeRepr::new()
    }
}

impl<N: Node> IntoIterator for TreeRepr<N> {
    type Item = (N::K, N::V);
    type IntoIter = IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}



pub struct Iter<'a, N: Node + 'a> {
    tree: &'a TreeRepr<N>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, N: Node> Iterator for Iter<'a, N> where N::K: 'a, N::V: 'a {
    type Item = (&'a N::K, &'a N::V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let curr = self.next?;
        self.next = tree.successor(curr);
        self.remaining -= 1;

        let kv = tree.node(curr).kv();
        Some((&kv.key, &kv.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, N: Node> ExactSizeIterator for Iter<'a, N> {}

impl<'a, N: Node> Clone for Iter<'a, N> {
    fn clone(&self) -> Self {
        Iter { tree: self.tree, next: self.next, remaining: self.remaining }
    }
}


/// Consumes the tree in key order by repeatedly splicing out the minimum, which never has a left
/// child, so no rebalancing is needed.
pub struct IntoIter<N: Node> {
    tree: TreeRepr<N>,
    next: Option<usize>,
}

impl<N: Node> IntoIter<N> {
    pub fn new(tree: TreeRepr<N>) -> Self {
        let next = tree.first();
        IntoIter { tree, next }
    }
}

impl<N: Node> Iterator for IntoIter<N> {
    type Item = (N::K, N::V);

    fn next(&mut self) -> Option<Self::Item> {
        let curr = self.next?;
        let spliced = self.tree.splice(curr);

        self.next = match spliced.child {
            Some(child) => Some(self.tree.find_min(child)),
            None => spliced.position.map(|(parent, _)| parent),
        };

        Some(spliced.node.into_tuple())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.size, Some(self.tree.size))
    }
}

impl<N: Node> ExactSizeIterator for IntoIter<N> {}



impl<N: Node> Debug for TreeRepr<N> where N: Debug {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        write!(fmt, "[size={}: ", self.size)?;
        let mut sep = "";
        let mut next = self.first();
        while let Some(idx) = next {
            write!(fmt, "{}{:?}", sep, self.node(idx))?;
            sep = ", ";
            next = self.successor(idx);
        }
        write!(fmt, "]")
    }
}

impl<N: Node> fmt::Display for TreeRepr<N> where N: Debug {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        writeln!(fmt)?;
        let mut ancestors = vec![];
        self.fmt_subtree(fmt, self.root, &mut ancestors)
    }
}


impl<N: Node> TreeRepr<N> where N: Debug {
    fn fmt_branch(&self, fmt: &mut Formatter, ancestors: &[bool]) -> fmt::Result {
        for (i, c) in ancestors.iter().enumerate() {
            if i == ancestors.len() - 1 {
                write!(fmt, "|--")?;
            } else {
                if *c {
                    write!(fmt, "|")?;
                } else {
                    write!(fmt, " ")?;
                }
                write!(fmt, "  ")?;
            }
        }

        Ok(())
    }

    fn fmt_subtree(&self, fmt: &mut Formatter, root: Option<usize>, ancestors: &mut Vec<bool>) -> fmt::Result {
        let mut stack = vec![DrawStep::Node(root)];

        while let Some(step) = stack.pop() {
            let idx = match step {
                DrawStep::Node(idx) => idx,
                DrawStep::Ascend => {
                    ancestors.pop();
                    continue;
                }
            };

            self.fmt_branch(fmt, ancestors)?;
            let idx = match idx {
                Some(idx) => idx,
                None => {
                    writeln!(fmt, "X")?;
                    continue;
                }
            };
            writeln!(fmt, "{:?}", self.node(idx))?;

            // below a right child the parent's branch line is finished
            if self.side_of(idx) == Some(Side::Right) {
                if let Some(last) = ancestors.last_mut() {
                    *last = false;
                }
            }

            if self.left(idx).is_some() || self.right(idx).is_some() {
                ancestors.push(true);
                stack.push(DrawStep::Ascend);
                stack.push(DrawStep::Node(self.right(idx)));
                stack.push(DrawStep::Node(self.left(idx)));
            }
        }

        Ok(())
    }
}

enum DrawStep {
    Node(Option<usize>),
    Ascend,
}


#[cfg(test)]
mod tests {
    use crate::base::{KeyVal, Links, Node, Search, Side, TreeRepr};
    use crate::base::validation::{check_bst, check_integrity};

    #[derive(Clone)]
    struct TestNode {
        kv: KeyVal<usize, &'static str>,
        links: Links,
    }

    impl Node for TestNode {
        type K = usize;
        type V = &'static str;

        fn new(key: usize, val: &'static str) -> Self {
            TestNode { kv: KeyVal::new(key, val), links: Links::default() }
        }

        fn into_kv(self) -> KeyVal<usize, &'static str> { self.kv }
        fn kv(&self) -> &KeyVal<usize, &'static str> { &self.kv }
        fn kv_mut(&mut self) -> &mut KeyVal<usize, &'static str> { &mut self.kv }
        fn links(&self) -> &Links { &self.links }
        fn links_mut(&mut self) -> &mut Links { &mut self.links }
    }

    impl ::std::fmt::Debug for TestNode {
        fn fmt(&self, fmt: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
            ::std::fmt::Debug::fmt(&self.kv.key, fmt)
        }
    }

    type Tree = TreeRepr<TestNode>;

    fn insert(tree: &mut Tree, key: usize) -> usize {
        match tree.search(&key) {
            Search::Vacant(position) => tree.attach(TestNode::new(key, "v"), position),
            Search::Found(idx) => idx,
        }
    }

    fn build(keys: &[usize]) -> Tree {
        let mut tree = Tree::new();
        for &key in keys {
            insert(&mut tree, key);
        }
        tree
    }

    fn keys(tree: &Tree) -> Vec<usize> {
        tree.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn search_reports_position() {
        let tree = build(&[5, 3, 8]);
        assert_eq!(tree.search(&5), Search::Found(0));
        assert_eq!(tree.search(&4), Search::Vacant(Some((1, Side::Right))));
        assert_eq!(tree.search(&9), Search::Vacant(Some((2, Side::Right))));
        assert_eq!(Tree::new().search(&1), Search::Vacant(None));
    }

    #[test]
    fn rotate_preserves_order_and_links() {
        let mut tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        let root = tree.root().unwrap();

        let pivot = tree.rotate(root, Side::Right);
        assert_eq!(*tree.key(pivot), 2);
        assert_eq!(tree.root(), Some(pivot));
        assert_eq!(*tree.key(tree.right(pivot).unwrap()), 4);
        assert_eq!(*tree.key(tree.left(root).unwrap()), 3);
        check_bst(&tree);
        check_integrity(&tree);

        let back = tree.rotate(pivot, Side::Left);
        assert_eq!(back, root);
        assert_eq!(tree.root(), Some(root));
        assert_eq!(keys(&tree), vec![1, 2, 3, 4, 5, 6, 7]);
        check_integrity(&tree);
    }

    #[test]
    fn rotate_below_root() {
        let mut tree = build(&[4, 2, 6, 5, 7]);
        let six = tree.index_of(&6).unwrap();
        let pivot = tree.rotate(six, Side::Left);
        assert_eq!(*tree.key(pivot), 7);
        assert_eq!(tree.parent(pivot), tree.root());
        assert_eq!(tree.side_of(pivot), Some(Side::Right));
        assert_eq!(keys(&tree), vec![2, 4, 5, 6, 7]);
        check_integrity(&tree);
    }

    #[test]
    fn successor_walk() {
        let tree = build(&[50, 30, 70, 20, 40, 60, 80, 35]);
        let mut order = vec![];
        let mut next = tree.first();
        while let Some(idx) = next {
            order.push(*tree.key(idx));
            next = tree.successor(idx);
        }
        assert_eq!(order, vec![20, 30, 35, 40, 50, 60, 70, 80]);
        assert_eq!(*tree.key(tree.last().unwrap()), 80);
    }

    #[test]
    fn splice_and_slot_reuse() {
        let mut tree = build(&[5, 3, 8, 9]);
        let eight = tree.index_of(&8).unwrap();

        let spliced = tree.splice(eight);
        assert_eq!(spliced.node.kv.key, 8);
        assert_eq!(spliced.position, Some((tree.root().unwrap(), Side::Right)));
        assert_eq!(spliced.child, tree.index_of(&9));
        assert_eq!(tree.size(), 3);
        assert_eq!(tree.free_slots(), 1);
        check_integrity(&tree);

        let idx = insert(&mut tree, 7);
        assert_eq!(idx, eight);
        assert_eq!(tree.free_slots(), 0);
        assert_eq!(keys(&tree), vec![3, 5, 7, 9]);
        check_integrity(&tree);
    }

    #[test]
    fn splice_root() {
        let mut tree = build(&[5, 3]);
        let spliced = tree.splice(tree.root().unwrap());
        assert_eq!(spliced.position, None);
        assert_eq!(tree.root(), tree.index_of(&3));
        assert_eq!(tree.parent(tree.root().unwrap()), None);
        check_integrity(&tree);
    }

    #[test]
    fn removal_target_swaps_successor() {
        let mut tree = build(&[50, 40, 60, 30, 45]);
        let forty = tree.index_of(&40).unwrap();

        let target = tree.removal_target(forty);
        assert_eq!(*tree.key(forty), 45);
        assert_eq!(*tree.key(target), 40);

        let spliced = tree.splice(target);
        assert_eq!(spliced.node.kv.key, 40);
        assert_eq!(keys(&tree), vec![30, 45, 50, 60]);
        check_integrity(&tree);
    }

    #[test]
    fn into_iter_in_order() {
        let tree = build(&[8, 4, 12, 2, 6, 10, 14, 1, 3, 5, 7]);
        let items: Vec<_> = tree.into_iter().map(|(k, _)| k).collect();
        assert_eq!(items, vec![1, 2, 3, 4, 5, 6, 7, 8, 10, 12, 14]);
    }

    #[test]
    fn height_and_clear() {
        let mut tree = build(&[1, 2, 3, 4]);
        assert_eq!(tree.height(), 4);
        tree.clear();
        assert_eq!(tree.height(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.capacity(), 0);
    }

    #[test]
    fn degenerate_chain() {
        // attach each key as the right child of the previous maximum: a 100k-deep chain in O(n)
        let mut tree = Tree::new();
        let mut last = None;
        for key in 0..100_000 {
            let position = last.map(|idx| (idx, Side::Right));
            last = Some(tree.attach(TestNode::new(key, "v"), position));
        }

        assert_eq!(tree.height(), 100_000);
        assert_eq!(tree.iter().count(), 100_000);
        check_integrity(&tree);
        assert_eq!(tree.into_iter().last().map(|(k, _)| k), Some(99_999));

        let short = build(&(0..1000).collect::<Vec<_>>());
        let drawing = format!("{}", short);
        assert_eq!(drawing.lines().count(), 2000);
        assert!(drawing.ends_with("|--999\n"));
    }

    #[test]
    fn fmt_shapes() {
        let tree = build(&[2, 1, 3, 4]);
        assert_eq!(format!("{:?}", tree), "[size=4: 1, 2, 3, 4]");
        assert_eq!(format!("{}", tree), "\n2\n|--1\n|--3\n   |--X\n   |--4\n");
        assert_eq!(format!("{}", Tree::new()), "\nX\n");
    }
}
