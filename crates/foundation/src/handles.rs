/// Generational handle: `(index, generation)`.
///
/// A released index is reused with a bumped generation, so a stale handle
/// never aliases a newer object living in the same slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(u32, u32);

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle(index, generation)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn generation(&self) -> u32 {
        self.1
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.0, self.1)
    }
}

/// Allocates generational handles with deterministic slot reuse.
///
/// Freed slots are reused lowest-index first.
#[derive(Debug, Default, Clone)]
pub struct HandleAllocator {
    generations: Vec<u32>,
    live: Vec<bool>,
    free: Vec<u32>,
    live_count: usize,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> Handle {
        self.live_count += 1;
        if let Some(pos) = self
            .free
            .iter()
            .enumerate()
            .min_by_key(|(_, idx)| **idx)
            .map(|(pos, _)| pos)
        {
            let index = self.free.swap_remove(pos);
            let slot = index as usize;
            self.live[slot] = true;
            return Handle(index, self.generations[slot]);
        }

        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.live.push(true);
        Handle(index, 0)
    }

    /// Releases `handle`. Returns `false` for stale or unknown handles.
    pub fn release(&mut self, handle: Handle) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        let slot = handle.index() as usize;
        self.live[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push(handle.index());
        self.live_count -= 1;
        true
    }

    pub fn is_live(&self, handle: Handle) -> bool {
        let slot = handle.index() as usize;
        self.live.get(slot).copied().unwrap_or(false)
            && self.generations[slot] == handle.generation()
    }

    pub fn live_count(&self) -> usize {
        self.live_count
    }
}

#[cfg(test)]
mod tests {
    use super::{Handle, HandleAllocator};

    #[test]
    fn allocates_sequential_indices() {
        let mut a = HandleAllocator::new();
        assert_eq!(a.allocate(), Handle::new(0, 0));
        assert_eq!(a.allocate(), Handle::new(1, 0));
        assert_eq!(a.live_count(), 2);
    }

    #[test]
    fn reused_slot_bumps_generation() {
        let mut a = HandleAllocator::new();
        let h0 = a.allocate();
        let _h1 = a.allocate();
        assert!(a.release(h0));
        assert!(!a.is_live(h0));

        let h2 = a.allocate();
        assert_eq!(h2, Handle::new(0, 1));
        assert!(a.is_live(h2));
        assert!(!a.is_live(h0));
    }

    #[test]
    fn stale_release_is_rejected() {
        let mut a = HandleAllocator::new();
        let h = a.allocate();
        assert!(a.release(h));
        assert!(!a.release(h));
        assert!(!a.release(Handle::new(42, 0)));
        assert_eq!(a.live_count(), 0);
    }

    #[test]
    fn reuses_lowest_free_index_first() {
        let mut a = HandleAllocator::new();
        let hs: Vec<Handle> = (0..4).map(|_| a.allocate()).collect();
        a.release(hs[3]);
        a.release(hs[1]);
        assert_eq!(a.allocate().index(), 1);
        assert_eq!(a.allocate().index(), 3);
    }
}
