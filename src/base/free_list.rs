use std::fmt::{Debug, Formatter};


/// Stack of vacated arena slots. The most recently freed slot is reused first.
#[derive(Clone, Default)]
pub struct FreeList {
    slots: Vec<usize>,
}

impl FreeList {
    pub fn new() -> FreeList {
        FreeList { slots: Vec::new() }
    }

    /// The caller guarantees `idx` is not already on the list; `TreeRepr::release` only frees
    /// slots it has just emptied.
    #[inline(always)]
    pub fn push(&mut self, idx: usize) {
        self.slots.push(idx);
    }

    #[inline(always)]
    pub fn pop(&mut self) -> Option<usize> {
        self.slots.pop()
    }

    #[inline(always)]
    pub fn nslots(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl Debug for FreeList {
    fn fmt(&self, fmt: &mut Formatter) -> ::std::fmt::Result {
        write!(fmt, "FreeList: {{nslots={}, slots={:?}}}", self.slots.len(), &self.slots)
    }
}
