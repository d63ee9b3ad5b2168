mod base_repr;
mod free_list;
mod node;
pub mod util;

pub use self::base_repr::*;
pub use self::free_list::FreeList;
pub use self::node::*;


pub trait Key: Ord {}

impl<T: Ord> Key for T {}


/// Which child of a node. Mirrored cases of the balancing algorithms are written once and
/// instantiated with either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    #[inline(always)]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}



#[cfg(test)]
pub mod validation {
    use std::fmt::Debug;
    use super::{Node, Side, TreeRepr};

    /// Validates the BST property and returns the keys in order.
    pub fn check_bst<N: Node>(tree: &TreeRepr<N>) -> Vec<&N::K>
        where N: Debug, N::K: Debug
    {
        let keys: Vec<_> = tree.iter().map(|(k, _)| k).collect();
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1], "keys out of order: {:?} >= {:?}, tree: {:?}", pair[0], pair[1], tree);
        }
        assert_eq!(keys.len(), tree.size(), "iteration disagrees with size, tree: {:?}", tree);
        keys
    }

    /// Checks that the parent back-references mirror the child links, that every live node is
    /// reachable from the root, and that every arena slot is either live or on the free list.
    pub fn check_integrity<N: Node>(tree: &TreeRepr<N>) where N: Debug {
        let reachable = match tree.root() {
            None => 0,
            Some(root) => {
                assert_eq!(tree.parent(root), None, "root has a parent, tree: {:?}", tree);
                count_linked(tree, root)
            }
        };

        assert_eq!(reachable, tree.size(), "tree: {:?}", tree);
        assert_eq!(tree.capacity(), tree.size() + tree.free_slots(), "tree: {:?}", tree);
    }

    fn count_linked<N: Node>(tree: &TreeRepr<N>, root: usize) -> usize where N: Debug {
        let mut count = 0;
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            count += 1;
            for &side in [Side::Left, Side::Right].iter() {
                if let Some(child) = tree.child(idx, side) {
                    assert_eq!(tree.parent(child), Some(idx), "broken back-reference at {}, tree: {:?}", child, tree);
                    assert_eq!(tree.side_of(child), Some(side));
                    stack.push(child);
                }
            }
        }
        count
    }
}
