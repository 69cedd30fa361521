//! Cross-context synchronization: lock plus readiness semaphore.
//!
//! [`SyncGate`] pairs a `parking_lot::Mutex` guarding the frame store with a
//! [`Signal`] counting semaphore posted by the producer after every stored
//! frame. The mutex's adaptive spin-then-park behaviour stands in for the
//! firmware spinlock/interrupt-disable region; every critical section taken
//! through the gate is bounded by one frame copy.
//!
//! The semaphore is a hint, not a byte count. A woken consumer must re-check
//! the store for data: a wake can arrive after an earlier call already
//! drained the ring, and condvar wakeups can be spurious. Both cases are
//! handled by re-polling, never by trusting the permit count.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

/// How long a blocking call may wait for data.
///
/// Mirrors the `timeout_ms: i32` convention of the firmware interface:
/// negative means wait forever, zero means a non-blocking check, positive is
/// a bounded wait in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Non-blocking check; never parks the caller.
    Poll,
    /// Wait indefinitely.
    Forever,
    /// Wait at most this many milliseconds.
    Millis(u64),
}

impl Wait {
    /// Maps the external `timeout_ms` convention onto a [`Wait`].
    pub fn from_millis(timeout_ms: i32) -> Self {
        match timeout_ms {
            t if t < 0 => Wait::Forever,
            0 => Wait::Poll,
            t => Wait::Millis(t as u64),
        }
    }

    /// Absolute deadline for this wait, computed once so retries after
    /// spurious wakeups never restart the budget. `None` means unbounded.
    pub fn deadline(self) -> Option<Instant> {
        match self {
            Wait::Poll => Some(Instant::now()),
            Wait::Forever => None,
            Wait::Millis(ms) => Some(Instant::now() + Duration::from_millis(ms)),
        }
    }
}

/// Counting semaphore safe to post from callback context.
///
/// `post` never blocks beyond the bounded permit-counter lock; `wait` is the
/// consumer-side primitive with poll, bounded, and unbounded modes.
pub struct Signal {
    permits: Mutex<u32>,
    cond: Condvar,
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

impl Signal {
    /// Creates a signal with no permits.
    pub fn new() -> Self {
        Self {
            permits: Mutex::new(0),
            cond: Condvar::new(),
        }
    }

    /// Adds one permit and wakes at most one waiter. Non-blocking.
    pub fn post(&self) {
        let mut permits = self.permits.lock();
        *permits = permits.saturating_add(1);
        drop(permits);
        self.cond.notify_one();
    }

    /// Takes a permit if one is available, without blocking.
    pub fn try_take(&self) -> bool {
        let mut permits = self.permits.lock();
        if *permits > 0 {
            *permits -= 1;
            true
        } else {
            false
        }
    }

    /// Blocks until a permit is taken or `wait` expires.
    ///
    /// Returns `true` when a permit was taken. Timeout expiry is a normal
    /// outcome, not an error.
    pub fn wait(&self, wait: Wait) -> bool {
        match wait {
            Wait::Poll => self.try_take(),
            _ => self.wait_deadline(wait.deadline()),
        }
    }

    /// Deadline-based variant for callers that retry across spurious
    /// wakeups without restarting their budget. `None` blocks forever.
    pub fn wait_deadline(&self, deadline: Option<Instant>) -> bool {
        let mut permits = self.permits.lock();
        loop {
            if *permits > 0 {
                *permits -= 1;
                return true;
            }
            match deadline {
                None => self.cond.wait(&mut permits),
                Some(deadline) => {
                    if self.cond.wait_until(&mut permits, deadline).timed_out() {
                        // One last check: a post may have landed exactly at
                        // the deadline.
                        if *permits > 0 {
                            *permits -= 1;
                            return true;
                        }
                        return false;
                    }
                }
            }
        }
    }
}

/// Critical section plus readiness signal guarding a shared store.
pub struct SyncGate<T> {
    inner: Mutex<T>,
    ready: Signal,
}

impl<T> SyncGate<T> {
    /// Wraps `value` behind the gate with an unsignaled semaphore.
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
            ready: Signal::new(),
        }
    }

    /// Enters the critical section. Hold the guard only for one bounded
    /// store or read sequence.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }

    /// Posts the readiness signal after a successful store.
    pub fn notify(&self) {
        self.ready.post();
    }

    /// Waits on the readiness signal. See [`Signal::wait`].
    pub fn wait(&self, wait: Wait) -> bool {
        self.ready.wait(wait)
    }

    /// Deadline-based wait. See [`Signal::wait_deadline`].
    pub fn wait_deadline(&self, deadline: Option<Instant>) -> bool {
        self.ready.wait_deadline(deadline)
    }
}
