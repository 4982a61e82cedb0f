//! The common contract of the two categorical lock variants.

/// Mutual exclusion between a shared category and an exclusive category.
///
/// Shared entrants may coexist inside the protected region; an exclusive
/// entrant requires sole occupancy. At any instant the region holds either
/// one exclusive entrant or any number of shared entrants, never both.
///
/// The trait says nothing about fairness: [`BasicLock`](super::BasicLock)
/// lets shared entrants starve a waiting exclusive entrant, while
/// [`PriorityLock`](super::PriorityLock) guarantees queued exclusive
/// entrants go first. Callers that only need the contract can stay generic
/// over the variant.
pub trait CategoricalLock {
    /// Blocks until admitted to the region as a shared entrant.
    fn enter_shared(&self);

    /// Releases one shared occupancy.
    ///
    /// # Panics
    /// Panics if no matching [`enter_shared`](Self::enter_shared) preceded
    /// this call.
    fn leave_shared(&self);

    /// Blocks until admitted to the region as the sole exclusive entrant.
    fn enter_exclusive(&self);

    /// Releases the exclusive occupancy.
    ///
    /// # Panics
    /// Panics if no matching [`enter_exclusive`](Self::enter_exclusive)
    /// preceded this call.
    fn leave_exclusive(&self);

    /// Attempts shared admission without blocking.
    ///
    /// Returns `true` and holds the region iff admission succeeded; the
    /// caller then owes a [`leave_shared`](Self::leave_shared).
    fn try_enter_shared(&self) -> bool;

    /// Attempts exclusive admission without blocking.
    ///
    /// Returns `true` and holds the region iff admission succeeded; the
    /// caller then owes a [`leave_exclusive`](Self::leave_exclusive).
    fn try_enter_exclusive(&self) -> bool;

    /// Runs `action` with shared occupancy held.
    ///
    /// The matching leave runs on every exit path: the action's return
    /// value passes through untouched, and a panic in the action unwinds
    /// through this call after the region has been released.
    fn with_shared<R>(&self, action: impl FnOnce() -> R) -> R
    where
        Self: Sized,
    {
        self.enter_shared();
        let _release = Release {
            lock: self,
            exclusive: false,
        };
        action()
    }

    /// Runs `action` with exclusive occupancy held.
    ///
    /// Release semantics match [`with_shared`](Self::with_shared).
    fn with_exclusive<R>(&self, action: impl FnOnce() -> R) -> R
    where
        Self: Sized,
    {
        self.enter_exclusive();
        let _release = Release {
            lock: self,
            exclusive: true,
        };
        action()
    }
}

/// Leaves the region on drop, unwinding included.
struct Release<'a, L: CategoricalLock> {
    lock: &'a L,
    exclusive: bool,
}

impl<L: CategoricalLock> Drop for Release<'_, L> {
    fn drop(&mut self) {
        if self.exclusive {
            self.lock.leave_exclusive();
        } else {
            self.lock.leave_shared();
        }
    }
}
