//! Runtime configuration
//!
//! Library defaults with environment overrides.
//!
//! # Example
//!
//! ```rust,ignore
//! use railway_runtime::config::RuntimeConfig;
//!
//! // Defaults with env overrides
//! let config = RuntimeConfig::from_env();
//!
//! // Or customize programmatically
//! let config = RuntimeConfig::from_env()
//!     .max_tasks(1024)
//!     .park_timeout(Duration::from_millis(20));
//! ```

pub mod defaults;

use std::time::Duration;

use railway_core::env::{env_get, env_get_bool};

use crate::error::{RuntimeError, RuntimeResult};

/// Runtime configuration with builder pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Live task limit of an executor
    pub max_tasks: usize,
    /// Longest park between executor polls
    pub park_timeout: Duration,
    /// Timer thread minimum sleep
    pub timer_min_sleep: Duration,
    /// Timer thread maximum sleep
    pub timer_max_poll: Duration,
    /// Raise the log level to debug when the runtime starts
    pub debug_logging: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl RuntimeConfig {
    /// Library defaults overridden by environment variables.
    ///
    /// Environment variables (all optional):
    /// - `RAILWAY_MAX_TASKS` - Live task limit
    /// - `RAILWAY_PARK_TIMEOUT_MS` - Executor park timeout in milliseconds
    /// - `RAILWAY_TIMER_MIN_SLEEP_US` - Timer thread minimum sleep in microseconds
    /// - `RAILWAY_TIMER_MAX_POLL_MS` - Timer thread maximum sleep in milliseconds
    /// - `RAILWAY_DEBUG` - Enable debug logging (0/1)
    pub fn from_env() -> Self {
        Self {
            max_tasks: env_get("RAILWAY_MAX_TASKS", defaults::MAX_TASKS),
            park_timeout: Duration::from_millis(env_get(
                "RAILWAY_PARK_TIMEOUT_MS",
                defaults::PARK_TIMEOUT_MS,
            )),
            timer_min_sleep: Duration::from_micros(env_get(
                "RAILWAY_TIMER_MIN_SLEEP_US",
                defaults::TIMER_MIN_SLEEP_US,
            )),
            timer_max_poll: Duration::from_millis(env_get(
                "RAILWAY_TIMER_MAX_POLL_MS",
                defaults::TIMER_MAX_POLL_MS,
            )),
            debug_logging: env_get_bool("RAILWAY_DEBUG", defaults::DEBUG_LOGGING),
        }
    }

    /// Library defaults, ignoring the environment.
    pub fn new() -> Self {
        Self {
            max_tasks: defaults::MAX_TASKS,
            park_timeout: Duration::from_millis(defaults::PARK_TIMEOUT_MS),
            timer_min_sleep: Duration::from_micros(defaults::TIMER_MIN_SLEEP_US),
            timer_max_poll: Duration::from_millis(defaults::TIMER_MAX_POLL_MS),
            debug_logging: defaults::DEBUG_LOGGING,
        }
    }

    // Builder methods

    pub fn max_tasks(mut self, n: usize) -> Self {
        self.max_tasks = n;
        self
    }

    pub fn park_timeout(mut self, d: Duration) -> Self {
        self.park_timeout = d;
        self
    }

    pub fn timer_min_sleep(mut self, d: Duration) -> Self {
        self.timer_min_sleep = d;
        self
    }

    pub fn timer_max_poll(mut self, d: Duration) -> Self {
        self.timer_max_poll = d;
        self
    }

    pub fn debug_logging(mut self, enable: bool) -> Self {
        self.debug_logging = enable;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> RuntimeResult<()> {
        if self.max_tasks == 0 {
            return Err(RuntimeError::InvalidConfig("max_tasks must be > 0"));
        }
        if self.park_timeout.is_zero() {
            return Err(RuntimeError::InvalidConfig("park_timeout must be > 0"));
        }
        if self.timer_max_poll.is_zero() {
            return Err(RuntimeError::InvalidConfig("timer_max_poll must be > 0"));
        }
        if self.timer_min_sleep > self.timer_max_poll {
            return Err(RuntimeError::InvalidConfig(
                "timer_min_sleep must be <= timer_max_poll",
            ));
        }
        Ok(())
    }

    /// Print configuration (for debugging)
    pub fn print(&self) {
        railway_core::kprintln!("Railway Runtime Configuration:");
        railway_core::kprintln!("  max_tasks:        {}", self.max_tasks);
        railway_core::kprintln!("  park_timeout:     {:?}", self.park_timeout);
        railway_core::kprintln!("  timer_min_sleep:  {:?}", self.timer_min_sleep);
        railway_core::kprintln!("  timer_max_poll:   {:?}", self.timer_max_poll);
        railway_core::kprintln!("  debug_logging:    {}", self.debug_logging);
    }
}
