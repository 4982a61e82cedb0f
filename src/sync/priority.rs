//! Writer-preference categorical lock, starvation-free for exclusive
//! entrants.
//!
//! Two admission gates compose the policy. Each gate is a boolean paired
//! with its own condition variable:
//!
//! - the **shared gate** (`shared_admitted`) decides whether new shared
//!   entrants may pass their entry check at all;
//! - the **exclusive gate** (`exclusive_admitted`) decides whether the next
//!   queued exclusive entrant may take the region.
//!
//! The first exclusive entrant to register closes the shared gate *before*
//! it is itself admitted, so shared entrants arriving after the
//! registration queue outside. Shared entrants already inside finish
//! normally; the last one out opens the exclusive gate. When the exclusive
//! queue drains to zero, the leaving entrant reopens the shared gate and
//! wakes every queued shared entrant at once (they may all proceed
//! together).
//!
//! # Fairness
//!
//! | Scenario                         | Behavior                             |
//! |----------------------------------|--------------------------------------|
//! | No exclusive queued              | Shared entrants admitted immediately |
//! | Exclusive registers              | New shared entrants blocked at gate  |
//! | Shared inside at registration    | They finish; no eviction             |
//! | Several exclusive queued         | Served one per vacancy, shared gate stays shut until the queue drains |
//!
//! Exclusive starvation is impossible: shared entrants arriving after a
//! registration cannot extend the wait. Shared starvation is possible
//! under a continuous exclusive stream, symmetric to the baseline's flaw.
//!
//! No ordering is promised within a category.

use std::sync::{Condvar, Mutex};

use tracing::trace;

use super::CategoricalLock;

/// Writer-preference categorical lock over an opaque critical region.
///
/// Internal lock order, held pairs only ever nested left to right:
/// `exclusive_queue` < `shared_gate` < `shared_queue` < `exclusive_gate`.
#[derive(Debug)]
pub struct PriorityLock {
    /// May new shared entrants pass their entry check right now?
    shared_gate: Mutex<bool>,
    shared_open: Condvar,
    /// May the next queued exclusive entrant take the region right now?
    exclusive_gate: Mutex<bool>,
    exclusive_open: Condvar,
    /// Shared entrants admitted and not yet left.
    shared_queue: Mutex<usize>,
    /// Exclusive entrants registered and not yet left.
    exclusive_queue: Mutex<usize>,
}

impl Default for PriorityLock {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityLock {
    /// Creates an empty lock with both gates open.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared_gate: Mutex::new(true),
            shared_open: Condvar::new(),
            exclusive_gate: Mutex::new(true),
            exclusive_open: Condvar::new(),
            shared_queue: Mutex::new(0),
            exclusive_queue: Mutex::new(0),
        }
    }
}

impl CategoricalLock for PriorityLock {
    fn enter_shared(&self) {
        let mut admitted = self.shared_gate.lock().expect("shared gate poisoned");
        while !*admitted {
            trace!("shared entrant blocked at gate");
            admitted = self.shared_open.wait(admitted).expect("shared gate poisoned");
        }
        // Still holding the gate: a registering exclusive entrant cannot
        // close it between our check and the occupancy announcement below.
        let mut count = self.shared_queue.lock().expect("shared queue poisoned");
        *count += 1;
        if *count == 1 {
            let mut gate = self.exclusive_gate.lock().expect("exclusive gate poisoned");
            *gate = false;
        }
        trace!(shared = *count, "shared entrant admitted");
    }

    fn leave_shared(&self) {
        let mut count = self.shared_queue.lock().expect("shared queue poisoned");
        assert!(*count > 0, "leave_shared without matching enter_shared");
        *count -= 1;
        trace!(shared = *count, "shared entrant left");
        if *count == 0 {
            let mut gate = self.exclusive_gate.lock().expect("exclusive gate poisoned");
            *gate = true;
            self.exclusive_open.notify_one();
        }
    }

    fn enter_exclusive(&self) {
        {
            let mut queued = self.exclusive_queue.lock().expect("exclusive queue poisoned");
            *queued += 1;
            if *queued == 1 {
                // Registration closes the shared gate before this entrant
                // is itself admitted; shared arrivals from here on queue.
                let mut admitted = self.shared_gate.lock().expect("shared gate poisoned");
                *admitted = false;
            }
            trace!(exclusive = *queued, "exclusive entrant registered");
        }

        let mut gate = self.exclusive_gate.lock().expect("exclusive gate poisoned");
        while !*gate {
            gate = self.exclusive_open.wait(gate).expect("exclusive gate poisoned");
        }
        // Consume: one admission per signal, the next waiter re-checks.
        *gate = false;
        trace!("exclusive entrant admitted");
    }

    fn leave_exclusive(&self) {
        {
            let mut gate = self.exclusive_gate.lock().expect("exclusive gate poisoned");
            *gate = true;
            self.exclusive_open.notify_one();
        }
        let mut queued = self.exclusive_queue.lock().expect("exclusive queue poisoned");
        assert!(*queued > 0, "leave_exclusive without matching enter_exclusive");
        *queued -= 1;
        trace!(exclusive = *queued, "exclusive entrant left");
        if *queued == 0 {
            let mut admitted = self.shared_gate.lock().expect("shared gate poisoned");
            *admitted = true;
            // Every queued shared entrant may proceed together.
            self.shared_open.notify_all();
        }
    }

    fn try_enter_shared(&self) -> bool {
        let admitted = self.shared_gate.lock().expect("shared gate poisoned");
        if !*admitted {
            return false;
        }
        let mut count = self.shared_queue.lock().expect("shared queue poisoned");
        *count += 1;
        if *count == 1 {
            let mut gate = self.exclusive_gate.lock().expect("exclusive gate poisoned");
            *gate = false;
        }
        true
    }

    fn try_enter_exclusive(&self) -> bool {
        let mut queued = self.exclusive_queue.lock().expect("exclusive queue poisoned");
        let mut admitted = self.shared_gate.lock().expect("shared gate poisoned");
        let mut gate = self.exclusive_gate.lock().expect("exclusive gate poisoned");
        if !*gate {
            return false;
        }
        *gate = false;
        *queued += 1;
        if *queued == 1 {
            *admitted = false;
        }
        true
    }
}
