//! Reusable barrier for N-way rendezvous.
//!
//! The barrier trips when `capacity` callers have arrived. Exactly one
//! caller observes `is_leader = true` per round, all callers are released
//! together, and the barrier resets atomically for the next round.
//!
//! # Composing with a categorical lock
//!
//! A barrier is the natural tool for atomic multi-party handoff on top of a
//! categorical lock: participants that must cross a boundary as a unit (say
//! two shared entrants and one exclusive entrant) each establish their own
//! eligibility, then `wait()` on a capacity-3 barrier before proceeding.
//! None of them moves until the full party has assembled, and the barrier is
//! immediately ready for the next party. The lock and the barrier stay
//! independent; only the caller composes them.
//!
//! # Caller responsibility
//!
//! A round completes only when all `capacity` participants arrive. A
//! participant that never calls [`Barrier::wait`] for a started round leaves
//! the others blocked indefinitely; that is a liveness hazard of the calling
//! code, not a fault the barrier can detect. Calling `wait()` from more than
//! `capacity` participants within one round is a contract violation with
//! unspecified ordering.

use std::sync::{Condvar, Mutex};

use tracing::trace;

#[derive(Debug)]
struct BarrierState {
    arrived: usize,
    round: u64,
}

/// Reusable barrier: blocks `capacity` participants, releases all together.
#[derive(Debug)]
pub struct Barrier {
    capacity: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
}

impl Barrier {
    /// Creates a barrier that trips once `capacity` participants arrive.
    ///
    /// # Panics
    /// Panics if `capacity == 0`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "barrier requires a positive capacity");
        Self {
            capacity,
            state: Mutex::new(BarrierState {
                arrived: 0,
                round: 0,
            }),
            released: Condvar::new(),
        }
    }

    /// Returns the number of participants required per round.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Waits until `capacity` total arrivals (including this one) have been
    /// made since the last release point, then returns together with every
    /// other waiter of the round.
    ///
    /// The `capacity`-th arriver resets the barrier before waking the
    /// others, so the next round may begin immediately.
    pub fn wait(&self) -> BarrierWaitResult {
        let mut state = self.state.lock().expect("barrier state poisoned");
        let round = state.round;
        state.arrived += 1;
        trace!(arrived = state.arrived, capacity = self.capacity, "barrier arrival");

        if state.arrived == self.capacity {
            // Trip: reset and advance the round before anyone wakes.
            state.arrived = 0;
            state.round = state.round.wrapping_add(1);
            self.released.notify_all();
            trace!(round, "barrier tripped");
            return BarrierWaitResult { is_leader: true };
        }

        while state.round == round {
            state = self.released.wait(state).expect("barrier state poisoned");
        }
        trace!(round, "barrier released");
        BarrierWaitResult { is_leader: false }
    }
}

/// Result of a barrier wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierWaitResult {
    is_leader: bool,
}

impl BarrierWaitResult {
    /// Returns true for exactly one participant (the leader) each round.
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.is_leader
    }
}
