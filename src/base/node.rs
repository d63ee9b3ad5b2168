use std::ops::{Index, IndexMut};

use super::{Key, Side};

#[derive(Debug, Clone, new)]
pub struct KeyVal<K, V> {
    pub key: K,
    pub val: V
}

impl<K, V> From<KeyVal<K, V>> for (K, V) {
    fn from(kv: KeyVal<K, V>) -> (K, V) {
        (kv.key, kv.val)
    }
}


/// Arena links of a node. Children own their subtrees; `parent` is a plain back-reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Links {
    pub parent: Option<usize>,
    pub child: [Option<usize>; 2],
}

impl Index<Side> for Links {
    type Output = Option<usize>;

    #[inline(always)]
    fn index(&self, side: Side) -> &Option<usize> {
        &self.child[side as usize]
    }
}

impl IndexMut<Side> for Links {
    #[inline(always)]
    fn index_mut(&mut self, side: Side) -> &mut Option<usize> {
        &mut self.child[side as usize]
    }
}


pub trait Node {
    type K: Key;
    type V;

    fn new(key: Self::K, val: Self::V) -> Self;
    fn into_kv(self) -> KeyVal<Self::K, Self::V>;

    fn kv(&self) -> &KeyVal<Self::K, Self::V>;
    fn kv_mut(&mut self) -> &mut KeyVal<Self::K, Self::V>;

    fn links(&self) -> &Links;
    fn links_mut(&mut self) -> &mut Links;

    #[inline]
    fn into_tuple(self) -> (Self::K, Self::V) where Self: Sized {
        self.into_kv().into()
    }
}
