//! Either state and the tagged payload slot

use core::fmt;
use core::mem;

/// Observable state of an Either
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EitherState {
    /// Production still pending, or the contents were moved out
    Empty = 0,

    /// Holds a success value
    Value = 1,

    /// Holds an error
    Error = 2,
}

impl EitherState {
    /// Value or Error has been deposited
    #[inline]
    pub const fn is_completed(&self) -> bool {
        !matches!(self, EitherState::Empty)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        matches!(self, EitherState::Empty)
    }

    #[inline]
    pub const fn is_value(&self) -> bool {
        matches!(self, EitherState::Value)
    }

    #[inline]
    pub const fn is_error(&self) -> bool {
        matches!(self, EitherState::Error)
    }
}

impl From<EitherState> for u8 {
    fn from(state: EitherState) -> u8 {
        state as u8
    }
}

impl fmt::Display for EitherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EitherState::Empty => write!(f, "EMPTY"),
            EitherState::Value => write!(f, "VALUE"),
            EitherState::Error => write!(f, "ERROR"),
        }
    }
}

/// Three-state union backing an Either.
///
/// `Empty` is private to the crate, so neither payload type can ever be
/// confused with the marker.
pub(crate) enum Slot<V, E> {
    Empty,
    Value(V),
    Error(E),
}

impl<V, E> Slot<V, E> {
    #[inline]
    pub(crate) fn state(&self) -> EitherState {
        match self {
            Slot::Empty => EitherState::Empty,
            Slot::Value(_) => EitherState::Value,
            Slot::Error(_) => EitherState::Error,
        }
    }

    /// Move the payload out, leaving `Empty` behind
    #[inline]
    pub(crate) fn take(&mut self) -> Self {
        mem::replace(self, Slot::Empty)
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<&V> {
        match self {
            Slot::Value(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn error(&self) -> Option<&E> {
        match self {
            Slot::Error(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Value(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn error_mut(&mut self) -> Option<&mut E> {
        match self {
            Slot::Error(e) => Some(e),
            _ => None,
        }
    }
}
