//! Backing storage for `BitVec`.
//!
//! Values that fit in 64 bits with no unknown bits live inline; everything
//! else is a heap buffer of little-endian words. When unknown bits are
//! present the buffer doubles: the value plane is followed by the shadow
//! plane of equal length.

#[derive(Clone)]
pub(crate) enum Words {
    Inline(u64),
    Heap(Box<[u64]>),
}

impl Words {
    pub(crate) fn heap_zeroed(len: usize) -> Self {
        Words::Heap(vec![0u64; len].into_boxed_slice())
    }

    pub(crate) fn as_slice(&self) -> &[u64] {
        match self {
            Words::Inline(word) => std::slice::from_ref(word),
            Words::Heap(buf) => buf,
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u64] {
        match self {
            Words::Inline(word) => std::slice::from_mut(word),
            Words::Heap(buf) => buf,
        }
    }

    pub(crate) fn is_inline(&self) -> bool {
        matches!(self, Words::Inline(_))
    }
}
