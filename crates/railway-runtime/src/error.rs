//! Error types for the railway runtime

use core::fmt;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur while setting up or feeding the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Executor already holds `max_tasks` live tasks
    TooManyTasks,

    /// Configuration rejected by `validate()`
    InvalidConfig(&'static str),

    /// The timer thread could not be started
    TimerUnavailable,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::TooManyTasks => write!(f, "too many live tasks"),
            RuntimeError::InvalidConfig(reason) => write!(f, "invalid config: {}", reason),
            RuntimeError::TimerUnavailable => write!(f, "timer thread unavailable"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<&'static str> for RuntimeError {
    fn from(reason: &'static str) -> Self {
        RuntimeError::InvalidConfig(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", RuntimeError::TooManyTasks), "too many live tasks");
        let e = RuntimeError::InvalidConfig("max_tasks must be at least 1");
        assert_eq!(format!("{}", e), "invalid config: max_tasks must be at least 1");
    }

    #[test]
    fn test_error_conversion() {
        let e: RuntimeError = "park_timeout must be non-zero".into();
        assert!(matches!(e, RuntimeError::InvalidConfig(_)));
    }
}
