//! # Fetch Generations
//!
//! Orders list fetches so that only the most recently issued one may write
//! its result into view state.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Last Issued Request Wins                                │
//! │                                                                         │
//! │  t0  begin() → gen 1  ── GET /sweets/search?name=ja ────────┐          │
//! │  t1  begin() → gen 2  ── GET /sweets/search?name=jal ──┐    │          │
//! │  t2                                     gen 2 returns ◄┘    │          │
//! │      is_current(2) = true  → applied                        │          │
//! │  t3                                     gen 1 returns ◄─────┘          │
//! │      is_current(1) = false → discarded                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Ticket handed out by [`FetchSequence::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// Monotonic generation counter shared by clones of a view.
#[derive(Debug, Clone, Default)]
pub struct FetchSequence {
    latest: Arc<AtomicU64>,
}

impl FetchSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new fetch, superseding every earlier one.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while no later fetch has begun.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }
}
