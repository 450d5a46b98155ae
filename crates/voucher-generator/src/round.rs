//! Per-round bookkeeping for the generation pipeline.
//!
//! A run is a sequence of rounds. Each round is planned from the current
//! shortfall, spawns `workers` producers of `chunk_size` candidates, and
//! records how many candidates were accepted or found to be duplicates.
//! [`RoundState::conclude`] then decides whether the run is complete, needs
//! another (smaller) round, or has stalled.

use voucher_core::Admission;

/// Divisor used to size chunks: each worker handles roughly 1% of the
/// shortfall.
pub const CHUNK_DIVISOR: u64 = 100;

/// Counters for a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundState {
    /// 1-based round number.
    pub index: u32,
    /// Codes still needed when the round started.
    pub shortfall: u64,
    pub chunk_size: u64,
    pub workers: u64,
    pub accepted: u64,
    pub duplicates: u64,
}

/// What happens after a round has drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The requested quantity has been reached.
    Terminal,
    /// Progress was made but codes are still missing; run this round next.
    Shrink(RoundState),
    /// The round accepted nothing; retrying would loop forever.
    Stalled { round: u32, shortfall: u64 },
}

impl RoundState {
    /// Plans round `index` for the given shortfall.
    ///
    /// `chunk_size = max(1, ceil(shortfall / 100))` and
    /// `workers = ceil(shortfall / chunk_size)`.
    pub fn plan(index: u32, shortfall: u64) -> Self {
        let chunk_size = shortfall.div_ceil(CHUNK_DIVISOR).max(1);
        let workers = shortfall.div_ceil(chunk_size);
        Self {
            index,
            shortfall,
            chunk_size,
            workers,
            accepted: 0,
            duplicates: 0,
        }
    }

    /// Candidates assigned to the 0-based `worker`.
    ///
    /// Every worker gets `chunk_size` except the last, which takes the
    /// remainder, so the chunks add up to exactly `shortfall`.
    pub fn chunk_for(&self, worker: u64) -> u64 {
        if worker + 1 == self.workers {
            self.shortfall - (self.workers - 1) * self.chunk_size
        } else {
            self.chunk_size
        }
    }

    /// Total candidates the round's workers produce.
    pub fn candidates(&self) -> u64 {
        (0..self.workers).map(|worker| self.chunk_for(worker)).sum()
    }

    pub fn record(&mut self, admission: Admission) {
        match admission {
            Admission::Accepted => self.accepted += 1,
            Admission::Duplicate => self.duplicates += 1,
        }
    }

    /// Codes this round still has to accept to cover its shortfall.
    pub fn remaining(&self) -> u64 {
        self.shortfall.saturating_sub(self.accepted)
    }

    /// The round has accepted its whole shortfall.
    pub fn is_drained(&self) -> bool {
        self.accepted >= self.shortfall
    }

    /// Decides the next step given the run-wide accepted total.
    pub fn conclude(&self, total_accepted: u64, quantity: u64) -> Transition {
        if total_accepted >= quantity {
            return Transition::Terminal;
        }
        if self.accepted == 0 {
            return Transition::Stalled {
                round: self.index,
                shortfall: self.shortfall,
            };
        }
        Transition::Shrink(RoundState::plan(self.index + 1, quantity - total_accepted))
    }
}
