use std::fmt;
use std::sync::atomic::{
    AtomicU64,
    Ordering
};

/// Identity of a keyframe.
///
/// Ids are handed out by a [`KeyframeIdAllocator`] and never change for the
/// lifetime of the keyframe. They are the only stable handle an editor has on a
/// keyframe: the position in the curve and the time value both move around
/// while the user drags things.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyframeId(u64);

impl KeyframeId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for KeyframeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source for keyframes.
///
/// An allocator is shared (through `Arc`) by every curve of one editing
/// context, so copies of a curve never collide with their source. Separate
/// allocators give separate, deterministic id sequences, which is what tests
/// rely on.
#[derive(Debug, Default)]
pub struct KeyframeIdAllocator {
    next: AtomicU64
}

impl KeyframeIdAllocator {
    pub fn new() -> KeyframeIdAllocator {
        KeyframeIdAllocator::starting_at(0)
    }

    pub fn starting_at(first: u64) -> KeyframeIdAllocator {
        KeyframeIdAllocator { next: AtomicU64::new(first) }
    }

    pub fn allocate(&self) -> KeyframeId {
        KeyframeId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The id the next call to `allocate` will return.
    pub fn peek(&self) -> KeyframeId {
        KeyframeId(self.next.load(Ordering::Relaxed))
    }
}
