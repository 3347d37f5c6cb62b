//! Generation tokens for detecting superseded work.
//!
//! A [`GenerationTracker`] holds the currently active generation. Starting new
//! work advances it and hands out a [`GenerationToken`]; any older token then
//! reports itself as stale the next time it is checked. Checks are cooperative:
//! long-running traversals look at their token between time slices only.

use std::cell::Cell;
use std::rc::Rc;

/// Shared, single-threaded counter of the active generation.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct GenerationTracker {
    active: Rc<Cell<u64>>,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the active generation, superseding every token issued so far.
    pub fn advance(&self) -> GenerationToken {
        let generation = self.active.get() + 1;
        self.active.set(generation);
        GenerationToken {
            active: self.active.clone(),
            generation,
        }
    }

    pub fn current(&self) -> u64 {
        self.active.get()
    }
}

/// Handle to one generation of a [`GenerationTracker`].
#[derive(Debug, Clone)]
pub struct GenerationToken {
    active: Rc<Cell<u64>>,
    generation: u64,
}

impl GenerationToken {
    /// A token backed by its own private tracker, so it is never superseded.
    pub fn detached() -> Self {
        GenerationTracker::new().advance()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `false` once a newer generation has been started.
    pub fn is_current(&self) -> bool {
        self.active.get() == self.generation
    }
}
