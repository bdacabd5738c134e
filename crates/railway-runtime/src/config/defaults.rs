//! Library defaults for `RuntimeConfig`

/// Live task limit of an executor
pub const MAX_TASKS: usize = 65_536;

/// Longest park between executor polls
pub const PARK_TIMEOUT_MS: u64 = 100;

/// Timer thread never sleeps less than this
pub const TIMER_MIN_SLEEP_US: u64 = 50;

/// Timer thread never sleeps longer than this
pub const TIMER_MAX_POLL_MS: u64 = 10;

pub const DEBUG_LOGGING: bool = false;
