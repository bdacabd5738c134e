//! Tagged error payload for application code
//!
//! `Either` works with any `E`; this is the ready-made one the demo and
//! benchmark use. The tag classifies where a failure comes from, the
//! optional code tells a caller which handling strategy applies.

use core::fmt;
use core::str::FromStr;

use crate::either::Either;

/// `Either` carrying the tagged [`Error`]
pub type Outcome<T> = Either<T, Error>;

/// Broad classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorTag {
    /// Storage or query failures
    Database = 0,
    /// Rejected input
    Validation = 1,
}

impl ErrorTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorTag::Database => "DATABASE",
            ErrorTag::Validation => "VALIDATION",
        }
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s.to_ascii_lowercase().as_str() {
            "database" => Ok(ErrorTag::Database),
            "validation" => Ok(ErrorTag::Validation),
            _ => Err(()),
        }
    }
}

/// Failure with a tag, a human-readable message and an optional code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    message: String,
    tag: ErrorTag,
    code: u32,
}

impl Error {
    /// Code of an error that carries no handling strategy
    pub const NO_CODE: u32 = u32::MAX;

    pub fn new(tag: ErrorTag, message: impl Into<String>) -> Self {
        Self { message: message.into(), tag, code: Self::NO_CODE }
    }

    /// Error whose `code` selects a caller-side handling strategy
    pub fn with_code(tag: ErrorTag, message: impl Into<String>, code: u32) -> Self {
        Self { message: message.into(), tag, code }
    }

    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorTag::Validation, message)
    }

    #[inline]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorTag::Database, message)
    }

    #[inline]
    pub fn tag(&self) -> ErrorTag {
        self.tag
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn code(&self) -> u32 {
        self.code
    }

    #[inline]
    pub fn has_code(&self) -> bool {
        self.code != Self::NO_CODE
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.tag, self.message)?;
        if self.has_code() {
            write!(f, " (code {})", self.code)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::validation("Cannot divide by 0");
        assert_eq!(format!("{}", e), "[VALIDATION] Cannot divide by 0");

        let e = Error::with_code(ErrorTag::Database, "connection lost", 3);
        assert_eq!(format!("{}", e), "[DATABASE] connection lost (code 3)");
    }

    #[test]
    fn test_default_code() {
        let e = Error::database("timeout");
        assert_eq!(e.code(), Error::NO_CODE);
        assert!(!e.has_code());
        assert_eq!(e.tag(), ErrorTag::Database);
        assert_eq!(e.message(), "timeout");
    }

    #[test]
    fn test_tag_parse() {
        assert_eq!("VALIDATION".parse::<ErrorTag>(), Ok(ErrorTag::Validation));
        assert_eq!("database".parse::<ErrorTag>(), Ok(ErrorTag::Database));
        assert!("network".parse::<ErrorTag>().is_err());
    }

    #[test]
    fn test_outcome_alias() {
        let r: Outcome<i32> = Either::failure(Error::validation("negative"));
        assert_eq!(r.error().tag(), ErrorTag::Validation);
    }
}
