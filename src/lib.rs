//! Catmux: categorical mutual exclusion and rendezvous primitives.
//!
//! # Overview
//!
//! Catmux provides blocking, thread-oriented synchronization for a single
//! logical critical region shared by two categories of participants:
//!
//! - **Shared entrants** may coexist with each other inside the region.
//! - **Exclusive entrants** require sole occupancy.
//!
//! Two lock variants implement that contract with opposite fairness
//! policies, and a reusable barrier provides N-way rendezvous:
//!
//! - [`sync::BasicLock`]: reader-preference. Shared entrants that find the
//!   region shared-occupied enter without ever consulting occupancy, so a
//!   steady stream of shared arrivals can starve a waiting exclusive
//!   entrant indefinitely. This is a documented property of the variant,
//!   kept as the baseline the priority variant improves on.
//! - [`sync::PriorityLock`]: writer-preference. The moment an exclusive
//!   entrant registers, the shared admission gate closes; shared entrants
//!   already inside finish undisturbed, but no new shared entrant passes
//!   its gate check until every queued exclusive entrant has entered and
//!   left. Exclusive entrants cannot starve.
//! - [`sync::Barrier`]: blocks exactly `capacity` participants per round,
//!   releases all of them together, and resets for reuse.
//!
//! # Guarantees
//!
//! - **Mutual exclusion**: an exclusive entrant never shares the region
//!   with anyone, of either category.
//! - **Shared concurrency**: any number of shared entrants may hold the
//!   region together.
//! - **No eviction**: admission decisions only ever delay entry; a
//!   participant already inside always runs to completion.
//! - **Predicate-loop waits**: every internal condition variable is
//!   re-checked under its paired mutex after each wake, so spurious and
//!   broadcast wakeups are harmless.
//!
//! Blocking is unbounded by design: there is no cancellation or timeout
//! surface. Callers that need either must layer it externally.
//!
//! # Example
//!
//! ```
//! use catmux::sync::{CategoricalLock, PriorityLock};
//! use std::sync::Arc;
//!
//! let lock = Arc::new(PriorityLock::new());
//!
//! let reader = {
//!     let lock = Arc::clone(&lock);
//!     std::thread::spawn(move || lock.with_shared(|| 41))
//! };
//! let value = lock.with_exclusive(|| 1) + reader.join().unwrap();
//! assert_eq!(value, 42);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod sync;
pub mod test_utils;
