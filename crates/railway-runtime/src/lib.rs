//! # railway-runtime
//!
//! Resumes Either productions suspended on foreign primitives.
//!
//! An Either that awaits nothing but other Eithers completes synchronously
//! and needs none of this. Once a step awaits something foreign (a
//! [`Sleep`], a channel, I/O) the Either stays pending until someone polls
//! it again with a real waker. This crate provides that someone:
//!
//! - [`block_on`] - drive one future (or Either) on the current thread
//! - [`Executor`] - local task pool with a lock-free ready queue
//! - [`sleep`] - timer futures backed by a process-wide timer thread
//! - [`RuntimeConfig`] - defaults with `RAILWAY_*` environment overrides
//! - `parking` - futex (Linux) or Condvar thread parking

pub mod config;
pub mod error;
pub mod executor;
pub mod parking;
pub mod timer;
mod ready_queue;

// Re-exports
pub use config::RuntimeConfig;
pub use error::{RuntimeError, RuntimeResult};
pub use executor::{block_on, Executor, JoinHandle};
pub use parking::{new_parking, PlatformParking, ThreadParking};
pub use timer::{pending_timers, sleep, sleep_ms, sleep_until, Sleep, TimerThreadConfig};
