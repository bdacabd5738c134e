//! Composition strategies
//!
//! Two tiers, picked by the type handed to [`Scope::compose`]:
//!
//! - **Propagating** (`Either<U, E>` or `&mut Either<U, E>`): drive the
//!   nested Either to completion, check the error first, then either yield
//!   the value or park the error in the enclosing step's sink and never
//!   resume. The enclosing Either sees the sink, drops the step and takes
//!   the error as its own result.
//! - **Pass-through** ([`Foreign`]): any other `IntoFuture` is awaited as
//!   is. The step interprets the foreign result itself.
//!
//! The error type is part of the trait parameter, so composing an Either
//! whose error type differs from the scope's does not compile.
//!
//! [`Scope::compose`]: crate::production::Scope::compose

use core::future::{Future, IntoFuture};
use core::pin::Pin;
use core::task::{Context, Poll};
use std::rc::Rc;

use crate::either::Either;
use crate::production::{Scope, Sink};
use crate::state::Slot;

const MOVED_OUT: &str = "composed an Either whose contents were moved out";
const POLLED_AFTER_READY: &str = "composition awaiter polled after completion";

/// Something a production step can await through its [`Scope`]
pub trait Compose<E> {
    /// What the step gets back on success
    type Output;

    /// Future doing the waiting
    type Awaiter: Future<Output = Self::Output>;

    fn compose(self, scope: &Scope<E>) -> Self::Awaiter;
}

impl<U, E> Compose<E> for Either<U, E> {
    type Output = U;
    type Awaiter = Propagate<U, E>;

    #[inline]
    fn compose(self, scope: &Scope<E>) -> Propagate<U, E> {
        Propagate { nested: self, sink: scope.sink() }
    }
}

impl<'a, U, E> Compose<E> for &'a mut Either<U, E> {
    type Output = &'a mut U;
    type Awaiter = PropagateRef<'a, U, E>;

    #[inline]
    fn compose(self, scope: &Scope<E>) -> PropagateRef<'a, U, E> {
        PropagateRef { nested: Some(self), sink: scope.sink() }
    }
}

impl<F: IntoFuture, E> Compose<E> for Foreign<F> {
    type Output = F::Output;
    type Awaiter = F::IntoFuture;

    #[inline]
    fn compose(self, _scope: &Scope<E>) -> F::IntoFuture {
        self.0.into_future()
    }
}

/// Marks a producer for pass-through composition
///
/// Wrapping an `Either` here hands back the whole container instead of
/// unwrapping it.
#[derive(Debug)]
pub struct Foreign<F>(pub F);

/// Wrap `producer` for pass-through composition
#[inline]
pub fn foreign<F: IntoFuture>(producer: F) -> Foreign<F> {
    Foreign(producer)
}

/// Propagating awaiter owning the nested Either
#[must_use = "futures do nothing unless awaited"]
pub struct Propagate<U, E> {
    nested: Either<U, E>,
    sink: Rc<Sink<E>>,
}

// No field is structurally pinned.
impl<U, E> Unpin for Propagate<U, E> {}

impl<U, E> Future for Propagate<U, E> {
    type Output = U;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<U> {
        let this = self.get_mut();
        if this.nested.poll_complete(cx).is_pending() {
            return Poll::Pending;
        }
        match this.nested.take_slot() {
            Slot::Value(value) => Poll::Ready(value),
            Slot::Error(error) => {
                this.sink.deposit(error);
                Poll::Pending
            }
            Slot::Empty => panic!("{}", MOVED_OUT),
        }
    }
}

/// Propagating awaiter borrowing the nested Either
///
/// On success the step gets `&mut U` and the nested Either keeps its value.
/// On failure the error is moved into the enclosing step, leaving the
/// nested Either empty.
#[must_use = "futures do nothing unless awaited"]
pub struct PropagateRef<'a, U, E> {
    nested: Option<&'a mut Either<U, E>>,
    sink: Rc<Sink<E>>,
}

impl<U, E> Unpin for PropagateRef<'_, U, E> {}

impl<'a, U, E> Future for PropagateRef<'a, U, E> {
    type Output = &'a mut U;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<&'a mut U> {
        let this = self.get_mut();
        let nested = match this.nested.take() {
            Some(nested) => nested,
            None => panic!("{}", POLLED_AFTER_READY),
        };
        if nested.poll_complete(cx).is_pending() {
            this.nested = Some(nested);
            return Poll::Pending;
        }
        if nested.state().is_error() {
            if let Slot::Error(error) = nested.take_slot() {
                this.sink.deposit(error);
            }
            return Poll::Pending;
        }
        match nested.value_mut().into_inner() {
            Some(value) => Poll::Ready(value),
            None => panic!("{}", MOVED_OUT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interop::Interop;
    use std::cell::Cell;

    thread_local! {
        static STEPS: Cell<usize> = const { Cell::new(0) };
        static CLONES: Cell<usize> = const { Cell::new(0) };
    }

    fn tick() {
        STEPS.with(|s| s.set(s.get() + 1));
    }

    fn steps() -> usize {
        STEPS.with(Cell::get)
    }

    fn reset() {
        STEPS.with(|s| s.set(0));
        CLONES.with(|c| c.set(0));
    }

    fn ok(x: i32) -> Either<i32, String> {
        Either::produce(move |_| async move {
            tick();
            Either::success(x)
        })
    }

    fn fail(msg: &str) -> Either<i32, String> {
        let msg = msg.to_string();
        Either::produce(move |_| async move {
            tick();
            Either::failure(msg)
        })
    }

    #[derive(Debug, PartialEq)]
    struct Tracked(i32);

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            CLONES.with(|c| c.set(c.get() + 1));
            Tracked(self.0)
        }
    }

    fn tracked(depth: u32, x: i32) -> Either<Tracked, String> {
        Either::produce(move |scope| async move {
            if depth == 0 {
                return Either::success(Tracked(x));
            }
            let inner = scope.compose(tracked(depth - 1, x)).await;
            Either::success(Tracked(inner.0 + 1))
        })
    }

    fn chain(fail_at: usize, len: usize) -> Either<i32, String> {
        Either::produce(move |scope| async move {
            let mut total = 0;
            for k in 1..=len {
                let step = if k == fail_at { fail(&format!("step {} failed", k)) } else { ok(k as i32) };
                total += scope.compose(step).await;
            }
            Either::success(total)
        })
    }

    #[test]
    fn test_compose_unwraps_value() {
        let result: Either<i32, String> = Either::produce(|scope| async move {
            let a = scope.compose(ok(1)).await;
            let b = scope.compose(ok(a + 10)).await;
            let c = scope.compose(ok(b + 100)).await;
            Either::success(c)
        });
        assert!(result.completed());
        assert_eq!(*result.value(), 111);
    }

    #[test]
    fn test_short_circuit_skips_later_steps() {
        for fail_at in 1..=5 {
            reset();
            let result = chain(fail_at, 5);
            assert!(result.completed());
            assert_eq!(*result.error(), format!("step {} failed", fail_at));
            assert!(result.value().is_absent());
            // Steps after the failing one never ran.
            assert_eq!(steps(), fail_at);
        }
    }

    #[test]
    fn test_no_failure_runs_every_step() {
        reset();
        let result = chain(0, 5);
        assert_eq!(*result.value(), 15);
        assert_eq!(steps(), 5);
    }

    #[test]
    fn test_statements_after_failure_never_run() {
        reset();
        let result: Either<i32, String> = Either::produce(|scope| async move {
            let v = scope.compose(fail("inner error")).await;
            tick();
            Either::success(v + 5)
        });
        assert_eq!(*result.error(), "inner error");
        assert_eq!(steps(), 1);
    }

    #[test]
    fn test_mixed_value_types() {
        let result: Either<f64, String> = Either::produce(|scope| async move {
            let v = scope.compose(ok(10)).await;
            Either::success(f64::from(v) * 1.5)
        });
        assert_eq!(*result.value(), 15.0);
    }

    #[test]
    fn test_unit_validation_step() {
        fn validate_positive(x: i32) -> Either<(), String> {
            if x <= 0 {
                return Either::failure("must be positive".to_string());
            }
            Either::ok()
        }
        fn doubled(x: i32) -> Either<i32, String> {
            Either::produce(move |scope| async move {
                scope.compose(validate_positive(x)).await;
                Either::success(x * 2)
            })
        }
        assert_eq!(*doubled(5).value(), 10);
        assert_eq!(*doubled(-1).error(), "must be positive");
    }

    #[test]
    fn test_borrowed_composition_keeps_nested() {
        let result: Either<i32, String> = Either::produce(|scope| async move {
            let mut nested = ok(20);
            let v = scope.compose(&mut nested).await;
            *v += 1;
            let seen = *v;
            // The nested Either still owns its (edited) value.
            assert_eq!(*nested.value(), 21);
            Either::success(seen + 4)
        });
        assert_eq!(*result.value(), 25);
    }

    #[test]
    fn test_borrowed_composition_propagates_error() {
        let result: Either<i32, String> = Either::produce(|scope| async move {
            let mut nested = fail("borrowed failure");
            let v = *scope.compose(&mut nested).await;
            Either::success(v)
        });
        assert_eq!(*result.error(), "borrowed failure");
    }

    #[test]
    fn test_deep_nesting_success_and_error() {
        fn level(depth: u32) -> Either<i32, String> {
            Either::produce(move |scope| async move {
                if depth == 0 {
                    return Either::success(1);
                }
                let v = scope.compose(level(depth - 1)).await;
                Either::success(v + 1)
            })
        }
        fn level_error(depth: u32) -> Either<i32, String> {
            Either::produce(move |scope| async move {
                if depth == 0 {
                    return Either::failure("deep error".to_string());
                }
                let v = scope.compose(level_error(depth - 1)).await;
                Either::success(v + 1)
            })
        }
        assert_eq!(*level(4).value(), 5);
        assert_eq!(*level(200).value(), 201);
        assert_eq!(*level_error(4).error(), "deep error");
        assert_eq!(*level_error(200).error(), "deep error");
    }

    #[test]
    fn test_zero_clones_through_nesting() {
        reset();
        let result = tracked(16, 32);
        assert_eq!(result.value().0, 48);
        assert_eq!(CLONES.with(Cell::get), 0);
    }

    #[test]
    fn test_zero_clones_on_error_payload() {
        reset();
        let result: Either<i32, Tracked> = Either::produce(|scope| async move {
            let inner: Either<i32, Tracked> = Either::failure(Tracked(-1));
            let v = scope.compose(inner).await;
            Either::success(v)
        });
        assert_eq!(*result.error(), Tracked(-1));
        assert_eq!(CLONES.with(Cell::get), 0);
    }

    #[test]
    fn test_foreign_passthrough_does_not_unwrap() {
        let result: Either<String, String> = Either::produce(|scope| async move {
            let nested = scope.compose(foreign(fail("kept whole"))).await;
            // The step decides how to read the foreign result.
            match nested.into_result() {
                Ok(v) => Either::success(format!("value {}", v)),
                Err(e) => Either::success(format!("handled: {}", e)),
            }
        });
        assert_eq!(*result.value(), "handled: kept whole");
    }

    #[test]
    fn test_foreign_plain_future() {
        let result: Either<i32, String> = Either::produce(|scope| async move {
            let v = scope.compose(foreign(async { 40 })).await;
            Either::success(v + 2)
        });
        assert_eq!(*result.value(), 42);
    }

    #[test]
    fn test_interop_type_is_returned_for_foreign_either() {
        fn assert_awaiter<F: Future<Output = Either<i32, String>>>(_: &F) {}
        let awaiter: Interop<i32, String> = foreign(ok(1)).compose(&Scope::<String>::new());
        assert_awaiter(&awaiter);
    }
}
