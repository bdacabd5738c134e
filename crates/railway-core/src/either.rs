//! The Either container
//!
//! Holds exactly one of a success value `V` or an error `E` once production
//! has completed. An Either is created either complete (`success`,
//! `failure`, `ok`) or bound to a pending production (`produce`), which is
//! started immediately and finishes synchronously unless it awaits a
//! foreign primitive that is not ready yet.
//!
//! # Example
//!
//! ```ignore
//! use railway_core::{Either, Error, ErrorTag};
//!
//! fn divide(a: f64, b: f64) -> Either<f64, Error> {
//!     if b == 0.0 {
//!         return Either::failure(Error::new(ErrorTag::Validation, "Cannot divide by 0"));
//!     }
//!     Either::success(a / b)
//! }
//!
//! fn halve_then_divide(a: f64, b: f64) -> Either<f64, Error> {
//!     Either::produce(move |scope| async move {
//!         let half = scope.compose(divide(a, 2.0)).await;
//!         divide(half, b)
//!     })
//! }
//!
//! let r = halve_then_divide(10.0, 0.0);
//! if let Some(err) = r.error().get() {
//!     eprintln!("{}", err);
//! }
//! ```

use core::fmt;
use core::future::Future;
use core::mem;
use core::task::{Context, Poll};

use crate::borrow::{Borrowed, BorrowedMut};
use crate::production::{Production, Scope, Step};
use crate::state::{EitherState, Slot};
use crate::waker::noop_waker;

const EMPTY_INTO_RESULT: &str = "into_result on an Either holding neither value nor error";

/// Disjoint success/failure container
///
/// Not `Clone`: ownership of the payload (and of any pending production) is
/// exclusive. Use [`take`](Either::take) to move the contents out and leave
/// an empty shell behind.
#[must_use = "an Either may hold an error that should be inspected"]
pub struct Either<V, E> {
    slot: Slot<V, E>,
    // Some only while the slot is Empty and production has not finished.
    pending: Option<Production<V, E>>,
}

// ── Constructors ──────────────────────────────────────────────────

impl<V, E> Either<V, E> {
    /// A complete Either holding `value`
    #[inline]
    pub fn success(value: V) -> Self {
        Self { slot: Slot::Value(value), pending: None }
    }

    /// A complete Either holding `error`
    #[inline]
    pub fn failure(error: E) -> Self {
        Self { slot: Slot::Error(error), pending: None }
    }
}

impl<E> Either<(), E> {
    /// Success without a meaningful value
    #[inline]
    pub fn ok() -> Self {
        Self::success(())
    }
}

impl<V: 'static, E: 'static> Either<V, E> {
    /// Bind a production step and start it.
    ///
    /// `step` receives the [`Scope`] used to compose nested producers and
    /// returns the future computing the final Either. The future is polled
    /// once before this returns; if it completes (the usual, synchronous
    /// case) the Either is complete. Otherwise the production stays attached
    /// until the Either is resumed, awaited, or dropped.
    ///
    /// Reading the views before completion yields absent views; check
    /// [`completed`](Either::completed) first.
    pub fn produce<F, Fut>(step: F) -> Self
    where
        F: FnOnce(Scope<E>) -> Fut,
        Fut: Future<Output = Either<V, E>> + 'static,
    {
        let scope = Scope::new();
        let future = step(scope.share());
        let mut either = Self {
            slot: Slot::Empty,
            pending: Some(Production::new(Box::pin(future), &scope)),
        };
        either.resume();
        either
    }
}

// ── Accessors ─────────────────────────────────────────────────────

impl<V, E> Either<V, E> {
    /// Holds a value or an error (false while pending or after a move-out)
    #[inline]
    pub fn completed(&self) -> bool {
        self.slot.state().is_completed()
    }

    /// A production is still attached
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    pub fn state(&self) -> EitherState {
        self.slot.state()
    }

    /// View of the error; absent if a value (or nothing) is held
    #[inline]
    pub fn error(&self) -> Borrowed<'_, E> {
        Borrowed::new(self.slot.error())
    }

    /// View of the value; absent if an error (or nothing) is held
    #[inline]
    pub fn value(&self) -> Borrowed<'_, V> {
        Borrowed::new(self.slot.value())
    }

    #[inline]
    pub fn error_mut(&mut self) -> BorrowedMut<'_, E> {
        BorrowedMut::new(self.slot.error_mut())
    }

    #[inline]
    pub fn value_mut(&mut self) -> BorrowedMut<'_, V> {
        BorrowedMut::new(self.slot.value_mut())
    }

    pub(crate) fn take_slot(&mut self) -> Slot<V, E> {
        self.slot.take()
    }
}

// ── Ownership transfer ────────────────────────────────────────────

impl<V, E> Either<V, E> {
    /// Move the contents (payload or pending production) into a new Either.
    ///
    /// `self` is left empty: not completed, both views absent.
    #[inline]
    pub fn take(&mut self) -> Self {
        Self { slot: self.slot.take(), pending: self.pending.take() }
    }

    /// Move-assign `src` into `self`, returning the previous contents.
    ///
    /// Dropping the returned Either abandons its pending production, if any.
    #[inline]
    pub fn replace(&mut self, src: Self) -> Self {
        mem::replace(self, src)
    }

    /// Convert into a `Result`.
    ///
    /// # Panics
    ///
    /// If the Either holds neither a value nor an error (pending or moved
    /// out).
    pub fn into_result(self) -> Result<V, E> {
        match self.slot {
            Slot::Value(value) => Ok(value),
            Slot::Error(error) => Err(error),
            Slot::Empty => panic!("{}", EMPTY_INTO_RESULT),
        }
    }

    #[inline]
    pub fn into_value(self) -> Option<V> {
        match self.slot {
            Slot::Value(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn into_error(self) -> Option<E> {
        match self.slot {
            Slot::Error(error) => Some(error),
            _ => None,
        }
    }
}

// ── Production driving ────────────────────────────────────────────

impl<V, E> Either<V, E> {
    /// Poll a pending production once with a no-op waker.
    ///
    /// Returns `completed()` afterwards. Use this from a hand-written poll
    /// loop; executors should await the Either instead so the production
    /// gets a real waker.
    pub fn resume(&mut self) -> bool {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let _ = self.poll_complete(&mut cx);
        self.completed()
    }

    /// Re-entry point of the production state machine.
    ///
    /// Ready once no production is attached. A step that finishes by
    /// returning another pending Either hands its production over and the
    /// loop continues with it, so a chain of such hand-offs never nests.
    pub fn poll_complete(&mut self, cx: &mut Context<'_>) -> Poll<()> {
        loop {
            let production = match self.pending.as_mut() {
                Some(production) => production,
                None => return Poll::Ready(()),
            };
            match production.poll_step(cx) {
                Step::Pending => return Poll::Pending,
                Step::Failed(error) => {
                    self.pending = None;
                    self.slot = Slot::Error(error);
                    return Poll::Ready(());
                }
                Step::Done(out) => {
                    let Either { slot, pending } = out;
                    debug_assert!(
                        pending.is_some() || !matches!(slot, Slot::Empty),
                        "production step returned an empty Either"
                    );
                    self.slot = slot;
                    self.pending = pending;
                }
            }
        }
    }
}

impl<V, E> From<Result<V, E>> for Either<V, E> {
    #[inline]
    fn from(result: Result<V, E>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(error) => Self::failure(error),
        }
    }
}

impl<V: fmt::Debug, E: fmt::Debug> fmt::Debug for Either<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Slot::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Slot::Error(error) => f.debug_tuple("Error").field(error).finish(),
            Slot::Empty => f.debug_struct("Empty").field("pending", &self.is_pending()).finish(),
        }
    }
}
