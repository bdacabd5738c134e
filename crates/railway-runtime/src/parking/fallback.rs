//! Fallback parking using std::sync::Condvar
//!
//! Used on platforms without futex support.

use super::ThreadParking;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub struct FallbackParking {
    /// Wake token
    notified: Mutex<bool>,
    condvar: Condvar,
    parked: AtomicUsize,
}

impl FallbackParking {
    pub fn new() -> Self {
        Self {
            notified: Mutex::new(false),
            condvar: Condvar::new(),
            parked: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.notified.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FallbackParking {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadParking for FallbackParking {
    fn park(&self, timeout: Option<Duration>) -> bool {
        let mut guard = self.lock();
        if *guard {
            *guard = false;
            return true;
        }

        self.parked.fetch_add(1, Ordering::SeqCst);
        guard = match timeout {
            Some(t) => {
                self.condvar
                    .wait_timeout(guard, t)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
            None => self.condvar.wait(guard).unwrap_or_else(PoisonError::into_inner),
        };
        self.parked.fetch_sub(1, Ordering::SeqCst);

        let woken = *guard;
        *guard = false;
        woken
    }

    fn unpark(&self) {
        {
            let mut guard = self.lock();
            if *guard {
                return;
            }
            *guard = true;
        }
        self.condvar.notify_one();
    }

    fn parked_count(&self) -> usize {
        self.parked.load(Ordering::Relaxed)
    }
}
