//! Blocking synchronization primitives for categorical access to a region.
//!
//! # Primitives
//!
//! - [`BasicLock`]: reader-preference categorical lock (starvation-prone
//!   baseline, kept deliberately)
//! - [`PriorityLock`]: writer-preference categorical lock, starvation-free
//!   for exclusive entrants
//! - [`Barrier`]: reusable N-way rendezvous with leader election
//! - [`CategoricalLock`]: the contract both lock variants implement, with
//!   scoped-acquisition helpers
//!
//! # Entry protocol
//!
//! Both locks expose raw `enter_*`/`leave_*` pairs and scoped
//! [`with_shared`](CategoricalLock::with_shared) /
//! [`with_exclusive`](CategoricalLock::with_exclusive) helpers. The scoped
//! helpers release on every exit path, including unwinding, and are the
//! recommended surface; the raw pairs exist for callers whose enter and
//! leave sites live in different scopes.
//!
//! The locks serialize *entry* only. The content of the protected region is
//! opaque to them; they never inspect or carry caller data.

mod barrier;
mod basic;
mod categorical;
mod priority;

pub use barrier::{Barrier, BarrierWaitResult};
pub use basic::BasicLock;
pub use categorical::CategoricalLock;
pub use priority::PriorityLock;
