//! Sequence-numbered apply for concurrent fetches.
//!
//! Every fetch takes an id from [`SequenceGuard::dispatch`]. A completed
//! fetch, successful or not, may touch shared state only if its id is
//! higher than every id settled so far. A slow old response can then never
//! overwrite a newer result, and never hide a newer failure.

/// Monotonic dispatch counter plus the highest id settled.
#[derive(Debug, Default, Clone)]
pub struct SequenceGuard {
    last_dispatched: u64,
    last_settled: u64,
}

impl SequenceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new fetch. Ids start at 1.
    pub fn dispatch(&mut self) -> u64 {
        self.last_dispatched += 1;
        self.last_dispatched
    }

    /// Whether a completion with `seq` would still be accepted.
    pub fn is_current(&self, seq: u64) -> bool {
        seq > self.last_settled
    }

    /// Record `seq` as settled if it is newer than anything settled so far.
    ///
    /// Called for failures as well as successes. Returns `false` for stale
    /// completions, which must be discarded.
    pub fn try_settle(&mut self, seq: u64) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.last_settled = seq;
        true
    }

    pub fn last_dispatched(&self) -> u64 {
        self.last_dispatched
    }

    pub fn last_settled(&self) -> u64 {
        self.last_settled
    }
}
