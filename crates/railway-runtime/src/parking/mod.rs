//! Thread parking
//!
//! Puts the thread driving a chain (or the timer thread) to sleep until a
//! waker fires. Platform-specific implementations use the most efficient
//! primitive available.
//!
//! Unlike a plain condition variable, an unpark that arrives while nobody
//! is parked is remembered: the next `park()` consumes it and returns
//! immediately. A waker firing between "poll returned Pending" and "park"
//! is therefore never lost.

use std::time::Duration;

/// Platform-specific parking primitive with a single wake token
pub trait ThreadParking: Send + Sync {
    /// Park the current thread until unparked or timeout
    ///
    /// Returns:
    /// - `true` if a wake token was consumed
    /// - `false` on timeout or spurious wakeup
    ///
    /// Callers re-check their condition after returning regardless.
    fn park(&self, timeout: Option<Duration>) -> bool;

    /// Deposit the wake token and wake a parked thread, if any
    fn unpark(&self);

    /// Number of currently parked threads (hint, may be stale)
    fn parked_count(&self) -> usize;
}

// Platform-specific implementations
cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod futex_linux;
        pub use futex_linux::FutexParking as PlatformParking;
    } else {
        mod fallback;
        pub use fallback::FallbackParking as PlatformParking;
    }
}

/// Create a new platform-appropriate parking instance
pub fn new_parking() -> Box<dyn ThreadParking> {
    Box::new(PlatformParking::new())
}
