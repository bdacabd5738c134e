//! # railway - railway-oriented error handling
//!
//! An [`Either<V, E>`](Either) holds a success value or an error. Steps that
//! produce Eithers compose through their [`Scope`]: the value of a
//! successful step flows on, the first failure ends the whole chain with
//! that failure. No panics, no `match` at every call site.
//!
//! ## Quick Start
//!
//! ```ignore
//! use railway::{Either, Error, Outcome};
//!
//! fn parse(s: &str) -> Outcome<f64> {
//!     match s.parse() {
//!         Ok(v) => Either::success(v),
//!         Err(_) => Either::failure(Error::validation(format!("Cannot parse '{}'", s))),
//!     }
//! }
//!
//! fn divide(a: f64, b: f64) -> Outcome<f64> {
//!     if b == 0.0 {
//!         return Either::failure(Error::validation("Cannot divide by 0"));
//!     }
//!     Either::success(a / b)
//! }
//!
//! fn ratio(a: &'static str, b: &'static str) -> Outcome<f64> {
//!     Either::produce(move |scope| async move {
//!         let x = scope.compose(parse(a)).await;
//!         let y = scope.compose(parse(b)).await; // "abc" stops here
//!         divide(x, y)
//!     })
//! }
//!
//! let r = ratio("10", "0");
//! assert_eq!(r.error().message(), "Cannot divide by 0");
//! ```
//!
//! Steps that await foreign futures (timers, I/O) stay pending until driven:
//!
//! ```ignore
//! let runtime = railway::Runtime::new(Default::default())?;
//! let done = runtime.block_on(slow_lookup(42));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      User Code                              │
//! │         Either::produce, scope.compose(..).await            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    railway-core                             │
//! │   Either, production driver, Propagate / Interop awaiters   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ pending on foreign futures
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   railway-runtime                           │
//! │        block_on, Executor, timer thread, parking            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// Re-export core types
pub use railway_core::{
    foreign,
    Borrowed,
    BorrowedMut,
    Compose,
    Either,
    EitherState,
    Error,
    ErrorTag,
    Foreign,
    Outcome,
    Scope,
};

// Re-export kprint macros for debug logging
pub use railway_core::{kprint, kprintln, kerror, kwarn, kinfo, kdebug, ktrace};
pub use railway_core::kprint::{LogLevel, init as init_logging, log_level, set_log_level, set_flush_enabled};

// Re-export env utilities
pub use railway_core::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};

// Re-export runtime types
pub use railway_runtime::{
    block_on,
    sleep,
    sleep_ms,
    sleep_until,
    Executor,
    JoinHandle,
    RuntimeConfig,
    RuntimeError,
    RuntimeResult,
    Sleep,
    TimerThreadConfig,
};

use core::future::IntoFuture;

/// Runtime handle: a validated configuration plus an executor
///
/// ```ignore
/// let runtime = Runtime::new(RuntimeConfig::from_env().max_tasks(128))?;
/// let a = runtime.spawn(fetch(1))?;
/// let b = runtime.spawn(fetch(2))?;
/// runtime.run();
/// ```
pub struct Runtime {
    executor: Executor,
}

impl Runtime {
    /// Create a runtime with the given configuration
    ///
    /// Validates `config`, applies its logging switch and starts the timer
    /// thread with its timer settings. The timer is process-wide: only the
    /// first runtime (or sleep) to start it decides those settings.
    pub fn new(config: RuntimeConfig) -> RuntimeResult<Self> {
        if config.debug_logging && log_level() < LogLevel::Debug {
            set_log_level(LogLevel::Debug);
        }
        let executor = Executor::new(config)?;
        let timer = TimerThreadConfig::from_runtime(executor.config());
        railway_runtime::timer::start_with(timer)?;
        kdebug!("runtime started (max_tasks={})", executor.config().max_tasks);
        Ok(Self { executor })
    }

    pub fn config(&self) -> &RuntimeConfig {
        self.executor.config()
    }

    /// Drive `future` (or a pending Either) to completion, running spawned
    /// tasks alongside it
    pub fn block_on<F: IntoFuture>(&self, future: F) -> F::Output {
        self.executor.block_on(future)
    }

    /// Spawn a local task
    pub fn spawn<F>(&self, future: F) -> RuntimeResult<JoinHandle<F::Output>>
    where
        F: IntoFuture + 'static,
        F::IntoFuture: 'static,
        F::Output: 'static,
    {
        self.executor.spawn(future)
    }

    /// Run until every spawned task has finished
    pub fn run(&self) {
        self.executor.run();
    }

    pub fn live_tasks(&self) -> usize {
        self.executor.live_tasks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(s: &str) -> Outcome<f64> {
        match s.parse() {
            Ok(v) => Either::success(v),
            Err(_) => Either::failure(Error::validation(format!("Cannot parse '{}'", s))),
        }
    }

    fn divide(a: f64, b: f64) -> Outcome<f64> {
        if b == 0.0 {
            return Either::failure(Error::validation("Cannot divide by 0"));
        }
        Either::success(a / b)
    }

    fn ratio(a: &'static str, b: &'static str) -> Outcome<f64> {
        Either::produce(move |scope| async move {
            let x = scope.compose(parse(a)).await;
            let y = scope.compose(parse(b)).await;
            divide(x, y)
        })
    }

    // Every runtime in this binary starts the shared timer with these settings.
    fn timer_tuned() -> RuntimeConfig {
        RuntimeConfig::new()
            .timer_min_sleep(Duration::from_millis(3))
            .timer_max_poll(Duration::from_millis(250))
    }

    fn slow_double(x: i32) -> Outcome<i32> {
        Either::produce(move |scope| async move {
            scope.compose(foreign(sleep(Duration::from_millis(2)))).await;
            Either::success(x * 2)
        })
    }

    #[test]
    fn test_divide_scenarios() {
        assert_eq!(*divide(10.0, 2.0).value(), 5.0);
        assert_eq!(divide(10.0, 0.0).error().message(), "Cannot divide by 0");
        assert_eq!(format!("{}", *divide(1.0, 0.0).error()), "[VALIDATION] Cannot divide by 0");
    }

    #[test]
    fn test_parse_then_divide() {
        assert_eq!(*ratio("10", "4").value(), 2.5);
        assert_eq!(ratio("10", "0").error().message(), "Cannot divide by 0");
        assert_eq!(ratio("abc", "2").error().message(), "Cannot parse 'abc'");
    }

    #[test]
    fn test_runtime_drives_pending_outcomes() {
        let runtime = Runtime::new(timer_tuned()).unwrap();
        let handles: Vec<_> = (1..=3).map(|i| runtime.spawn(slow_double(i)).unwrap()).collect();
        runtime.run();
        let sum: i32 = handles.iter().map(|h| *h.try_take().unwrap().value()).sum();
        assert_eq!(sum, 12);
        assert_eq!(runtime.live_tasks(), 0);
    }

    #[test]
    fn test_runtime_block_on_either() {
        let runtime = Runtime::new(timer_tuned()).unwrap();
        let done = runtime.block_on(slow_double(21));
        assert_eq!(*done.value(), 42);
    }

    #[test]
    fn test_runtime_configures_timer_thread() {
        let runtime = Runtime::new(timer_tuned()).unwrap();
        assert_eq!(runtime.config().timer_max_poll, Duration::from_millis(250));

        let running = railway_runtime::timer::start_with(TimerThreadConfig::default()).unwrap();
        assert_eq!(running.max_poll_interval, Duration::from_millis(250));
        assert_eq!(running.min_sleep, Duration::from_millis(3));
    }

    #[test]
    fn test_runtime_rejects_invalid_config() {
        let result = Runtime::new(RuntimeConfig::new().max_tasks(0));
        assert!(matches!(result, Err(RuntimeError::InvalidConfig(_))));
    }
}
