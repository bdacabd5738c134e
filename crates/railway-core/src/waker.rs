//! No-op waker used to start productions eagerly
//!
//! A freshly bound production is polled once on construction. Nothing is
//! waiting on it yet, so the waker handed to foreign primitives at that
//! point does nothing; a real waker replaces it as soon as the Either is
//! polled from an executor.

use core::ptr;
use core::task::{RawWaker, RawWakerVTable, Waker};

const VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);

unsafe fn clone(_: *const ()) -> RawWaker {
    RawWaker::new(ptr::null(), &VTABLE)
}

unsafe fn noop(_: *const ()) {}

/// A waker whose wake is a no-op
#[inline]
pub fn noop_waker() -> Waker {
    // Safety: the vtable functions never touch the data pointer.
    unsafe { Waker::from_raw(RawWaker::new(ptr::null(), &VTABLE)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_waker_clone_and_wake() {
        let waker = noop_waker();
        let other = waker.clone();
        other.wake();
        waker.wake_by_ref();
    }
}
