//! Sleep futures backed by a process-wide timer thread
//!
//! ```text
//!   Sleep::poll ──register/update──► TimerService (Mutex<TimerHeap>)
//!                                          │
//!                                          ▼
//!                                    timer thread ──wake()──► executor / block_on
//! ```
//!
//! A `Sleep` is a foreign suspension primitive from the point of view of an
//! Either production: compose it with `foreign(sleep(d))`.

mod heap;
mod worker;

pub use heap::{TimerHeap, TimerId};
pub use worker::TimerThreadConfig;

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::time::{Duration, Instant};

use railway_core::kwarn;

use crate::error::RuntimeResult;

/// Start the timer thread now instead of on the first sleep.
///
/// Fails with `RuntimeError::TimerUnavailable` if the thread cannot be
/// spawned.
pub fn start() -> RuntimeResult<()> {
    worker::service().map(|_| ())
}

/// Start the timer thread with `config`.
///
/// Only the first start configures the thread. Returns the settings the
/// running thread actually uses.
pub fn start_with(config: TimerThreadConfig) -> RuntimeResult<TimerThreadConfig> {
    worker::start_with(config).map(|timer| timer.config().clone())
}

/// Sleeps registered and not yet fired, process-wide
pub fn pending_timers() -> usize {
    worker::service().map(|timer| timer.pending()).unwrap_or(0)
}

/// Future completing once `duration` has elapsed
pub fn sleep(duration: Duration) -> Sleep {
    sleep_until(Instant::now() + duration)
}

pub fn sleep_ms(ms: u64) -> Sleep {
    sleep(Duration::from_millis(ms))
}

pub fn sleep_until(deadline: Instant) -> Sleep {
    Sleep { deadline, entry: None }
}

/// Future returned by [`sleep`]
///
/// Dropping it cancels the registration. Without a timer thread it falls
/// back to re-waking itself on every poll.
#[must_use = "futures do nothing unless awaited"]
#[derive(Debug)]
pub struct Sleep {
    deadline: Instant,
    entry: Option<TimerId>,
}

impl Sleep {
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.deadline
    }

    fn cancel(&mut self) {
        if let Some(id) = self.entry.take() {
            if let Ok(timer) = worker::service() {
                timer.cancel(id);
            }
        }
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        if this.is_elapsed() {
            this.cancel();
            return Poll::Ready(());
        }

        match worker::service() {
            Ok(timer) => {
                let registered = match this.entry {
                    Some(id) => timer.update(id, cx.waker()),
                    None => false,
                };
                if !registered {
                    this.entry = Some(timer.register(this.deadline, cx.waker().clone()));
                }
            }
            Err(e) => {
                kwarn!("sleep: {}, yielding instead", e);
                cx.waker().wake_by_ref();
            }
        }
        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        self.cancel();
    }
}
