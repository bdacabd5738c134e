//! Environment variable utilities
//!
//! Typed lookups with defaults, used by the logging setup and by the
//! runtime configuration.
//!
//! ```ignore
//! use railway_core::env::{env_get, env_get_bool};
//!
//! let max_tasks: usize = env_get("RAILWAY_MAX_TASKS", 65536);
//! let debug = env_get_bool("RAILWAY_DEBUG", false);
//! ```

use std::str::FromStr;

/// Parse `key` as `T`, falling back to `default` when unset or malformed
#[inline]
pub fn env_get<T: FromStr>(key: &str, default: T) -> T {
    env_get_opt(key).unwrap_or(default)
}

/// Parse `key` as `T`, or `None` when unset or malformed
#[inline]
pub fn env_get_opt<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Boolean lookup.
///
/// "1", "true", "yes", "on" (any case) are true, "0", "false", "no", "off"
/// are false. Anything else, including unset, yields `default`.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[inline]
pub fn env_is_set(key: &str) -> bool {
    std::env::var_os(key).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_returns_default() {
        let val: usize = env_get("__RAILWAY_TEST_UNSET__", 42);
        assert_eq!(val, 42);
        assert!(env_get_opt::<u64>("__RAILWAY_TEST_UNSET__").is_none());
        assert_eq!(env_get_str("__RAILWAY_TEST_UNSET__", "x"), "x");
        assert!(env_get_bool("__RAILWAY_TEST_UNSET__", true));
        assert!(!env_is_set("__RAILWAY_TEST_UNSET__"));
    }

    #[test]
    fn test_parse_and_fallback() {
        std::env::set_var("__RAILWAY_TEST_NUM__", " 123 ");
        assert_eq!(env_get::<usize>("__RAILWAY_TEST_NUM__", 0), 123);
        std::env::set_var("__RAILWAY_TEST_NUM__", "many");
        assert_eq!(env_get::<usize>("__RAILWAY_TEST_NUM__", 7), 7);
        std::env::remove_var("__RAILWAY_TEST_NUM__");
    }

    #[test]
    fn test_bool_variants() {
        let key = "__RAILWAY_TEST_BOOL__";
        for yes in ["1", "true", "TRUE", "yes", "on"] {
            std::env::set_var(key, yes);
            assert!(env_get_bool(key, false), "{}", yes);
        }
        for no in ["0", "false", "No", "off"] {
            std::env::set_var(key, no);
            assert!(!env_get_bool(key, true), "{}", no);
        }
        std::env::set_var(key, "garbage");
        assert!(env_get_bool(key, true));
        assert!(!env_get_bool(key, false));
        std::env::remove_var(key);
    }
}
