//! Pending production: the continuation behind an unfinished Either
//!
//! A production step is an `async` block returning `Either<V, E>`. The
//! Either that owns it keeps it as `Pin<Box<dyn Future>>`, so moving the
//! Either never moves the step's frame. Results come back through two
//! channels that do not depend on where the Either lives:
//!
//! - the step's own return value (normal completion), and
//! - the scope's error sink, written by a propagating awaiter when a
//!   nested Either fails (short-circuit).
//!
//! Whoever polls the owning Either drains both, so the result always lands
//! in the current owner no matter how often it was moved.

use core::cell::Cell;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::rc::Rc;

use crate::compose::Compose;
use crate::either::Either;

/// First-failure slot shared by a production and its awaiters
pub(crate) struct Sink<E> {
    error: Cell<Option<E>>,
}

impl<E> Sink<E> {
    fn new() -> Self {
        Self { error: Cell::new(None) }
    }

    /// Record `error` unless a failure is already recorded
    pub(crate) fn deposit(&self, error: E) {
        match self.error.take() {
            Some(first) => self.error.set(Some(first)),
            None => self.error.set(Some(error)),
        }
    }

    fn take(&self) -> Option<E> {
        self.error.take()
    }

    #[cfg(test)]
    fn is_set(&self) -> bool {
        let error = self.error.take();
        let set = error.is_some();
        self.error.set(error);
        set
    }
}

/// Handle a production step receives to compose other producers.
///
/// ```ignore
/// let avg: Either<f64, Error> = Either::produce(|scope| async move {
///     let x = scope.compose(parse("10")).await;      // unwraps or short-circuits
///     let y = scope.compose(parse("0")).await;
///     Either::success(scope.compose(divide(x, y)).await * 2.0)
/// });
/// ```
///
/// A scope belongs to the step it was handed to. It cannot be cloned, and
/// moving it into another Either's step would route that step's failures
/// here instead.
pub struct Scope<E> {
    sink: Rc<Sink<E>>,
}

impl<E> Scope<E> {
    pub(crate) fn new() -> Self {
        Self { sink: Rc::new(Sink::new()) }
    }

    pub(crate) fn sink(&self) -> Rc<Sink<E>> {
        Rc::clone(&self.sink)
    }

    /// Second handle on the same sink, for the step itself
    pub(crate) fn share(&self) -> Self {
        Self { sink: self.sink() }
    }

    /// Await `producer` under the rules of its kind.
    ///
    /// An `Either<U, E>` (owned) or `&mut Either<U, E>` (borrowed) yields its
    /// value or terminates this step with its error. A [`Foreign`] producer
    /// is passed through untouched.
    ///
    /// [`Foreign`]: crate::compose::Foreign
    #[inline]
    pub fn compose<C: Compose<E>>(&self, producer: C) -> C::Awaiter {
        producer.compose(self)
    }
}

/// Outcome of polling a production once
pub(crate) enum Step<V, E> {
    Pending,
    Failed(E),
    Done(Either<V, E>),
}

pub(crate) struct Production<V, E> {
    step: Pin<Box<dyn Future<Output = Either<V, E>>>>,
    sink: Rc<Sink<E>>,
    finished: bool,
}

impl<V, E> Production<V, E> {
    pub(crate) fn new(step: Pin<Box<dyn Future<Output = Either<V, E>>>>, scope: &Scope<E>) -> Self {
        Self { step, sink: scope.sink(), finished: false }
    }

    pub(crate) fn poll_step(&mut self, cx: &mut Context<'_>) -> Step<V, E> {
        let polled = self.step.as_mut().poll(cx);
        // A recorded failure wins even if the step managed to finish.
        if let Some(error) = self.sink.take() {
            self.finished = true;
            crate::ktrace!("short-circuit: terminating production step");
            return Step::Failed(error);
        }
        match polled {
            Poll::Ready(out) => {
                self.finished = true;
                Step::Done(out)
            }
            Poll::Pending => Step::Pending,
        }
    }
}

impl<V, E> Drop for Production<V, E> {
    fn drop(&mut self) {
        if !self.finished {
            crate::ktrace!("abandoning pending production");
        }
    }
}
