//! Borrowed views over an Either's payload
//!
//! A view is a null-checkable, non-owning reference handed out by
//! `Either::value()` / `Either::error()`. Views are neither `Clone` nor
//! `Copy`, and their lifetime is tied to the borrow of the Either that
//! produced them: moving or dropping the Either while a view is alive is a
//! compile error rather than a dangling read.
//!
//! Dereferencing an absent view is a contract violation and panics.

use core::fmt;
use core::ops::{Deref, DerefMut};

const ABSENT: &str = "dereferenced an absent borrowed view";

/// Shared view over a value that may be absent
pub struct Borrowed<'a, T: ?Sized> {
    target: Option<&'a T>,
}

impl<'a, T: ?Sized> Borrowed<'a, T> {
    #[inline]
    pub const fn new(target: Option<&'a T>) -> Self {
        Self { target }
    }

    #[inline]
    pub const fn absent() -> Self {
        Self { target: None }
    }

    /// Truthiness test: is there a value behind this view?
    #[inline]
    pub const fn is_present(&self) -> bool {
        self.target.is_some()
    }

    #[inline]
    pub const fn is_absent(&self) -> bool {
        self.target.is_none()
    }

    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        self.target
    }

    /// Give up the view, keeping the underlying borrow
    #[inline]
    pub fn into_inner(self) -> Option<&'a T> {
        self.target
    }
}

impl<T: ?Sized> Deref for Borrowed<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        match self.target {
            Some(target) => target,
            None => panic!("{}", ABSENT),
        }
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Borrowed<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Some(target) => f.debug_tuple("Borrowed").field(&target).finish(),
            None => f.write_str("Borrowed(<absent>)"),
        }
    }
}

/// Exclusive view over a value that may be absent
///
/// Lets a caller move the payload out (`std::mem::take`, `Option::take`)
/// or edit it in place while the Either keeps ownership.
pub struct BorrowedMut<'a, T: ?Sized> {
    target: Option<&'a mut T>,
}

impl<'a, T: ?Sized> BorrowedMut<'a, T> {
    #[inline]
    pub fn new(target: Option<&'a mut T>) -> Self {
        Self { target }
    }

    #[inline]
    pub fn absent() -> Self {
        Self { target: None }
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.target.is_some()
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        self.target.is_none()
    }

    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.target.as_deref()
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.target.as_deref_mut()
    }

    #[inline]
    pub fn into_inner(self) -> Option<&'a mut T> {
        self.target
    }
}

impl<T: ?Sized> Deref for BorrowedMut<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        match self.target.as_deref() {
            Some(target) => target,
            None => panic!("{}", ABSENT),
        }
    }
}

impl<T: ?Sized> DerefMut for BorrowedMut<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        match self.target.as_deref_mut() {
            Some(target) => target,
            None => panic!("{}", ABSENT),
        }
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for BorrowedMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target.as_deref() {
            Some(target) => f.debug_tuple("BorrowedMut").field(&target).finish(),
            None => f.write_str("BorrowedMut(<absent>)"),
        }
    }
}
