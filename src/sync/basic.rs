//! Reader-preference categorical lock.
//!
//! This is the baseline variant: correct mutual exclusion, no fairness.
//! Shared entrants that arrive while other shared entrants already occupy
//! the region never consult occupancy at all, so an exclusive entrant
//! waiting for the region empties only when shared arrivals pause.
//!
//! # Starvation
//!
//! | Scenario                     | Behavior                                |
//! |------------------------------|-----------------------------------------|
//! | Region free                  | Either category admitted immediately    |
//! | Shared entrants inside       | New shared entrants admitted instantly  |
//! | Exclusive waiting, shared in | Exclusive waits for *all* shared, old and new |
//!
//! Under a steady shared stream the exclusive entrant never runs: unbounded
//! writer starvation. That property is intentional and documented; it is
//! the defect [`PriorityLock`](super::PriorityLock) exists to remove. Do
//! not "fix" it here.

use std::sync::{Condvar, Mutex};

use tracing::trace;

use super::CategoricalLock;

/// Reader-preference categorical lock over an opaque critical region.
///
/// The first shared entrant claims the region on behalf of its whole
/// category (the lightswitch handshake): it holds the shared-count mutex
/// while waiting for occupancy, so shared entrants serialize through entry
/// until the claim lands, then pour in unchecked. The last one out turns
/// the light off and wakes a waiting exclusive entrant, if any.
#[derive(Debug, Default)]
pub struct BasicLock {
    /// True iff the region has any occupant, of either category.
    occupancy: Mutex<bool>,
    /// Signaled once per vacancy; only exclusive entrants and the
    /// first-shared claim ever wait on it.
    vacated: Condvar,
    /// Shared entrants inside or mid-entry. Held across the first
    /// entrant's occupancy wait.
    shared: Mutex<usize>,
}

impl BasicLock {
    /// Creates an empty lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_occupancy(&self) {
        let mut occupied = self.occupancy.lock().expect("occupancy state poisoned");
        while *occupied {
            trace!("waiting for region to vacate");
            occupied = self.vacated.wait(occupied).expect("occupancy state poisoned");
        }
        *occupied = true;
    }

    fn release_occupancy(&self) {
        let mut occupied = self.occupancy.lock().expect("occupancy state poisoned");
        *occupied = false;
        // One vacancy, one admission: a single waiter may take the region.
        self.vacated.notify_one();
    }
}

impl CategoricalLock for BasicLock {
    fn enter_shared(&self) {
        let mut count = self.shared.lock().expect("shared count poisoned");
        *count += 1;
        if *count == 1 {
            // Lightswitch: the first entrant claims the region for the
            // category, holding the count mutex so later shared entrants
            // queue behind the claim rather than slipping past it.
            self.claim_occupancy();
        }
        trace!(shared = *count, "shared entrant admitted");
    }

    fn leave_shared(&self) {
        let mut count = self.shared.lock().expect("shared count poisoned");
        assert!(*count > 0, "leave_shared without matching enter_shared");
        *count -= 1;
        trace!(shared = *count, "shared entrant left");
        if *count == 0 {
            self.release_occupancy();
        }
    }

    fn enter_exclusive(&self) {
        self.claim_occupancy();
        trace!("exclusive entrant admitted");
    }

    fn leave_exclusive(&self) {
        let mut occupied = self.occupancy.lock().expect("occupancy state poisoned");
        assert!(*occupied, "leave_exclusive without matching enter_exclusive");
        *occupied = false;
        self.vacated.notify_one();
        trace!("exclusive entrant left");
    }

    fn try_enter_shared(&self) -> bool {
        // try_lock: the count mutex is held across the first entrant's
        // occupancy wait, and a try must not queue behind that.
        let Ok(mut count) = self.shared.try_lock() else {
            return false;
        };
        if *count == 0 {
            let Ok(mut occupied) = self.occupancy.try_lock() else {
                return false;
            };
            if *occupied {
                return false;
            }
            *occupied = true;
        }
        *count += 1;
        true
    }

    fn try_enter_exclusive(&self) -> bool {
        let Ok(mut occupied) = self.occupancy.try_lock() else {
            return false;
        };
        if *occupied {
            return false;
        }
        *occupied = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::Barrier;
    use crate::test_utils::init_test_logging;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn init_test(name: &str) {
        init_test_logging();
        crate::test_phase!(name);
    }

    #[test]
    fn shared_entrants_coexist() {
        init_test("shared_entrants_coexist");
        let lock = Arc::new(BasicLock::new());
        // Both entrants rendezvous *inside* the region; this deadlocks
        // unless shared occupancy is truly concurrent.
        let inside = Arc::new(Barrier::new(2));

        let handle = {
            let lock = Arc::clone(&lock);
            let inside = Arc::clone(&inside);
            std::thread::spawn(move || {
                lock.with_shared(|| {
                    inside.wait();
                });
            })
        };
        lock.with_shared(|| {
            inside.wait();
        });
        handle.join().expect("thread failed");
        crate::test_complete!("shared_entrants_coexist");
    }

    #[test]
    fn exclusive_blocks_shared() {
        init_test("exclusive_blocks_shared");
        let lock = Arc::new(BasicLock::new());
        let admitted = Arc::new(AtomicBool::new(false));

        lock.enter_exclusive();
        let handle = {
            let lock = Arc::clone(&lock);
            let admitted = Arc::clone(&admitted);
            std::thread::spawn(move || {
                lock.with_shared(|| admitted.store(true, Ordering::SeqCst));
            })
        };

        std::thread::sleep(Duration::from_millis(100));
        crate::assert_with_log!(
            !admitted.load(Ordering::SeqCst),
            "shared admitted while exclusive holds",
            false,
            admitted.load(Ordering::SeqCst)
        );

        lock.leave_exclusive();
        handle.join().expect("thread failed");
        assert!(admitted.load(Ordering::SeqCst));
        crate::test_complete!("exclusive_blocks_shared");
    }

    #[test]
    fn exclusive_entrants_never_overlap() {
        init_test("exclusive_entrants_never_overlap");
        let lock = Arc::new(BasicLock::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let overlap = Arc::new(AtomicBool::new(false));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let lock = Arc::clone(&lock);
            let inside = Arc::clone(&inside);
            let overlap = Arc::clone(&overlap);
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    lock.with_exclusive(|| {
                        if inside.fetch_add(1, Ordering::SeqCst) != 0 {
                            overlap.store(true, Ordering::SeqCst);
                        }
                        inside.fetch_sub(1, Ordering::SeqCst);
                    });
                }
            }));
        }
        for handle in handles {
            handle.join().expect("thread failed");
        }
        crate::assert_with_log!(
            !overlap.load(Ordering::SeqCst),
            "exclusive overlap observed",
            false,
            overlap.load(Ordering::SeqCst)
        );
        crate::test_complete!("exclusive_entrants_never_overlap");
    }

    #[test]
    fn late_shared_entrant_overtakes_waiting_exclusive() {
        init_test("late_shared_entrant_overtakes_waiting_exclusive");
        let lock = Arc::new(BasicLock::new());
        let exclusive_admitted = Arc::new(AtomicBool::new(false));

        lock.enter_shared();
        let writer = {
            let lock = Arc::clone(&lock);
            let exclusive_admitted = Arc::clone(&exclusive_admitted);
            std::thread::spawn(move || {
                lock.with_exclusive(|| exclusive_admitted.store(true, Ordering::SeqCst));
            })
        };
        std::thread::sleep(Duration::from_millis(100));
        assert!(!exclusive_admitted.load(Ordering::SeqCst));

        // The reader-preference property under test: a shared entrant
        // arriving *behind* the queued exclusive entrant gets in first.
        assert!(lock.try_enter_shared());
        lock.leave_shared();

        lock.leave_shared();
        writer.join().expect("thread failed");
        assert!(exclusive_admitted.load(Ordering::SeqCst));
        crate::test_complete!("late_shared_entrant_overtakes_waiting_exclusive");
    }

    #[test]
    fn try_enter_respects_occupancy() {
        init_test("try_enter_respects_occupancy");
        let lock = BasicLock::new();

        assert!(lock.try_enter_exclusive());
        assert!(!lock.try_enter_shared());
        assert!(!lock.try_enter_exclusive());
        lock.leave_exclusive();

        assert!(lock.try_enter_shared());
        assert!(lock.try_enter_shared());
        assert!(!lock.try_enter_exclusive());
        lock.leave_shared();
        lock.leave_shared();
        assert!(lock.try_enter_exclusive());
        lock.leave_exclusive();
        crate::test_complete!("try_enter_respects_occupancy");
    }

    #[test]
    #[should_panic(expected = "leave_shared without matching enter_shared")]
    fn unbalanced_leave_shared_panics() {
        BasicLock::new().leave_shared();
    }

    #[test]
    #[should_panic(expected = "leave_exclusive without matching enter_exclusive")]
    fn unbalanced_leave_exclusive_panics() {
        BasicLock::new().leave_exclusive();
    }

    #[test]
    fn with_shared_passes_value_through() {
        init_test("with_shared_passes_value_through");
        let lock = BasicLock::new();
        let value: Result<u32, String> = lock.with_shared(|| Ok(7));
        assert_eq!(value, Ok(7));
        let err: Result<u32, String> = lock.with_shared(|| Err("refused".into()));
        assert_eq!(err, Err("refused".to_string()));
        // Both leaves ran: the region must be free again.
        assert!(lock.try_enter_exclusive());
        lock.leave_exclusive();
        crate::test_complete!("with_shared_passes_value_through");
    }
}
