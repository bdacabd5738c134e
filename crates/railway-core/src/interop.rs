//! Awaiting an Either from foreign async code
//!
//! Outside a production scope nobody knows the short-circuit convention,
//! so awaiting an Either never unwraps it. The awaiter only drives a
//! pending production to completion and then hands the whole container
//! back: by move for `either.await`, by reference for `(&mut either).await`.
//! The caller reads `completed()` / `error()` / `value()` itself.

use core::future::{Future, IntoFuture};
use core::pin::Pin;
use core::task::{Context, Poll};

use crate::either::Either;

const POLLED_AFTER_READY: &str = "interop awaiter polled after completion";

/// Awaiter returned by `Either::into_future`
#[must_use = "futures do nothing unless awaited"]
pub struct Interop<V, E> {
    either: Option<Either<V, E>>,
}

impl<V, E> Unpin for Interop<V, E> {}

impl<V, E> Future for Interop<V, E> {
    type Output = Either<V, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Either<V, E>> {
        let this = self.get_mut();
        match this.either.take() {
            Some(mut either) => match either.poll_complete(cx) {
                Poll::Ready(()) => Poll::Ready(either),
                Poll::Pending => {
                    this.either = Some(either);
                    Poll::Pending
                }
            },
            None => panic!("{}", POLLED_AFTER_READY),
        }
    }
}

impl<V, E> IntoFuture for Either<V, E> {
    type Output = Either<V, E>;
    type IntoFuture = Interop<V, E>;

    #[inline]
    fn into_future(self) -> Interop<V, E> {
        Interop { either: Some(self) }
    }
}

/// Awaiter returned by `(&mut Either)::into_future`
#[must_use = "futures do nothing unless awaited"]
pub struct InteropRef<'a, V, E> {
    either: Option<&'a mut Either<V, E>>,
}

impl<V, E> Unpin for InteropRef<'_, V, E> {}

impl<'a, V, E> Future for InteropRef<'a, V, E> {
    type Output = &'a mut Either<V, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<&'a mut Either<V, E>> {
        let this = self.get_mut();
        match this.either.take() {
            Some(either) => match either.poll_complete(cx) {
                Poll::Ready(()) => Poll::Ready(either),
                Poll::Pending => {
                    this.either = Some(either);
                    Poll::Pending
                }
            },
            None => panic!("{}", POLLED_AFTER_READY),
        }
    }
}

impl<'a, V, E> IntoFuture for &'a mut Either<V, E> {
    type Output = &'a mut Either<V, E>;
    type IntoFuture = InteropRef<'a, V, E>;

    #[inline]
    fn into_future(self) -> InteropRef<'a, V, E> {
        InteropRef { either: Some(self) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waker::noop_waker;

    /// Minimal foreign consumer: polls with a no-op waker until ready
    fn drive<F: IntoFuture>(f: F) -> F::Output {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut fut = Box::pin(f.into_future());
        loop {
            if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
                return out;
            }
        }
    }

    /// Foreign producer that needs `n` polls before it is ready
    struct Countdown(u32);

    impl Future for Countdown {
        type Output = u32;

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<u32> {
            if self.0 == 0 {
                return Poll::Ready(7);
            }
            self.0 -= 1;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }

    #[test]
    fn test_owned_await_hands_back_container() {
        let out = drive(async {
            let e: Either<i32, String> = Either::failure("not unwrapped".to_string());
            e.await
        });
        assert!(out.completed());
        assert_eq!(*out.error(), "not unwrapped");
    }

    #[test]
    fn test_borrowed_await_hands_back_reference() {
        let mut source: Either<i32, String> = Either::success(5);
        let seen = drive(async {
            let e = (&mut source).await;
            *e.value()
        });
        assert_eq!(seen, 5);
        assert_eq!(*source.value(), 5);
    }

    #[test]
    fn test_await_drives_pending_production() {
        let pending: Either<u32, String> = Either::produce(|_| async {
            let v = Countdown(3).await;
            Either::success(v * 6)
        });
        assert!(!pending.completed());
        assert!(pending.value().is_absent());
        assert!(pending.error().is_absent());

        let done = drive(pending);
        assert!(done.completed());
        assert_eq!(*done.value(), 42);
    }

    #[test]
    fn test_borrowed_await_finishes_in_place() {
        let mut pending: Either<u32, String> = Either::produce(|_| async {
            let v = Countdown(2).await;
            Either::success(v)
        });
        assert!(!pending.completed());
        drive(&mut pending);
        assert!(pending.completed());
        assert_eq!(*pending.value(), 7);
    }
}
