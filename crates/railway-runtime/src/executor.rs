//! Single-threaded executor
//!
//! Drives Eithers (and any other futures) whose productions are suspended
//! on foreign primitives. Tasks are local: they never leave the thread that
//! created the executor, so neither the task nor its output needs `Send`.
//! Only the wakers cross threads.
//!
//! # Example
//!
//! ```ignore
//! use railway_runtime::{block_on, sleep, Executor, RuntimeConfig};
//!
//! let slow: Either<u32, String> = Either::produce(|scope| async move {
//!     scope.compose(foreign(sleep(Duration::from_millis(5)))).await;
//!     Either::success(1)
//! });
//! let done = block_on(slow);
//! assert_eq!(*done.value(), 1);
//! ```

use core::cell::{Cell, RefCell};
use core::future::{Future, IntoFuture};
use core::pin::{pin, Pin};
use core::task::{Context, Poll, Waker};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use railway_core::{kdebug, ktrace, kwarn};

use crate::config::{defaults, RuntimeConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::ready_queue::{ReadyQueue, TaskWaker, ThreadWaker};

/// Id the `block_on` future is scheduled under
const MAIN_TASK: usize = usize::MAX;

/// Drive `future` to completion on the current thread.
///
/// The thread parks between wakes. Awaiting an `Either` hands the whole
/// container back, completed.
pub fn block_on<F: IntoFuture>(future: F) -> F::Output {
    let mut future = pin!(future.into_future());
    let thread = ThreadWaker::new();
    let waker = Waker::from(Arc::clone(&thread));
    let mut cx = Context::from_waker(&waker);
    let park_timeout = Duration::from_millis(defaults::PARK_TIMEOUT_MS);

    loop {
        if let Poll::Ready(out) = future.as_mut().poll(&mut cx) {
            return out;
        }
        thread.park(park_timeout);
    }
}

struct JoinState<T> {
    output: Option<T>,
    finished: bool,
    waiter: Option<Waker>,
}

impl<T> JoinState<T> {
    fn complete(&mut self, value: T) {
        self.output = Some(value);
        self.finished = true;
        if let Some(waiter) = self.waiter.take() {
            waiter.wake();
        }
    }
}

/// Handle to a spawned task's output
///
/// Await it from another task, or poll with `try_take` after `run()`.
/// Dropping the handle does not cancel the task.
pub struct JoinHandle<T> {
    state: Rc<RefCell<JoinState<T>>>,
}

impl<T> JoinHandle<T> {
    /// The task ran to completion
    pub fn is_finished(&self) -> bool {
        self.state.borrow().finished
    }

    /// Take the output if the task finished and it was not taken yet
    pub fn try_take(&self) -> Option<T> {
        self.state.borrow_mut().output.take()
    }
}

impl<T> Future for JoinHandle<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut state = self.state.borrow_mut();
        if let Some(value) = state.output.take() {
            return Poll::Ready(value);
        }
        if state.finished {
            panic!("JoinHandle polled after its output was taken");
        }
        state.waiter = Some(cx.waker().clone());
        Poll::Pending
    }
}

struct Task {
    future: Pin<Box<dyn Future<Output = ()>>>,
    waker: Waker,
}

/// Local task pool with a cross-thread ready queue
pub struct Executor {
    config: RuntimeConfig,
    queue: Arc<ReadyQueue>,
    tasks: RefCell<HashMap<usize, Task>>,
    live: Cell<usize>,
    next_id: Cell<usize>,
}

impl Executor {
    /// Create an executor after validating `config`
    pub fn new(config: RuntimeConfig) -> RuntimeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            queue: Arc::new(ReadyQueue::new()),
            tasks: RefCell::new(HashMap::new()),
            live: Cell::new(0),
            next_id: Cell::new(0),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Tasks spawned and not yet finished
    pub fn live_tasks(&self) -> usize {
        self.live.get()
    }

    /// Queue `future` as a task; it first runs on the next `run` or
    /// `block_on`.
    ///
    /// Fails with [`RuntimeError::TooManyTasks`] once `max_tasks` tasks are
    /// live.
    pub fn spawn<F>(&self, future: F) -> RuntimeResult<JoinHandle<F::Output>>
    where
        F: IntoFuture + 'static,
        F::IntoFuture: 'static,
        F::Output: 'static,
    {
        if self.live.get() >= self.config.max_tasks {
            kwarn!("spawn rejected: {} live tasks (max {})", self.live.get(), self.config.max_tasks);
            return Err(RuntimeError::TooManyTasks);
        }

        let id = self.next_id.get();
        // Skip the id reserved for the block_on future.
        self.next_id.set(id.wrapping_add(1) % MAIN_TASK);

        let state = Rc::new(RefCell::new(JoinState { output: None, finished: false, waiter: None }));
        let output = Rc::clone(&state);
        let future = future.into_future();
        let task = Task {
            future: Box::pin(async move {
                let value = future.await;
                output.borrow_mut().complete(value);
            }),
            waker: TaskWaker::waker(id, &self.queue),
        };

        self.tasks.borrow_mut().insert(id, task);
        self.live.set(self.live.get() + 1);
        self.queue.schedule(id);
        kdebug!("spawned task {} ({} live)", id, self.live.get());

        Ok(JoinHandle { state })
    }

    /// Run until every spawned task has finished
    pub fn run(&self) {
        loop {
            while let Some(id) = self.queue.pop() {
                self.poll_task(id);
            }
            if self.live.get() == 0 {
                return;
            }
            self.queue.park(self.config.park_timeout);
        }
    }

    /// Drive `future` to completion, running spawned tasks alongside it.
    ///
    /// Returns as soon as `future` is done; unfinished tasks stay in the
    /// executor for a later `run` or `block_on`.
    pub fn block_on<F: IntoFuture>(&self, future: F) -> F::Output {
        let mut future = pin!(future.into_future());
        let waker = TaskWaker::waker(MAIN_TASK, &self.queue);
        let mut cx = Context::from_waker(&waker);
        self.queue.schedule(MAIN_TASK);

        loop {
            while let Some(id) = self.queue.pop() {
                if id != MAIN_TASK {
                    self.poll_task(id);
                    continue;
                }
                if let Poll::Ready(out) = future.as_mut().poll(&mut cx) {
                    return out;
                }
            }
            self.queue.park(self.config.park_timeout);
        }
    }

    fn poll_task(&self, id: usize) {
        // Out of the map while polled; a wake during the poll just re-queues the id.
        let task = self.tasks.borrow_mut().remove(&id);
        let Some(mut task) = task else {
            return; // finished, or a stale wake
        };

        let mut cx = Context::from_waker(&task.waker);
        match task.future.as_mut().poll(&mut cx) {
            Poll::Ready(()) => {
                self.live.set(self.live.get() - 1);
                ktrace!("task {} finished ({} live)", id, self.live.get());
            }
            Poll::Pending => {
                self.tasks.borrow_mut().insert(id, task);
            }
        }
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        let pending = self.tasks.get_mut().len();
        if pending > 0 {
            kdebug!("dropping executor with {} unfinished tasks ({} queued)", pending, self.queue.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::sleep;
    use railway_core::{foreign, Either};
    use std::time::Instant;

    /// Pending for the first `n` polls, waking itself each time
    struct YieldNow(u32);

    impl Future for YieldNow {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 == 0 {
                return Poll::Ready(());
            }
            self.0 -= 1;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }

    fn delayed(ms: u64, v: i32) -> Either<i32, String> {
        Either::produce(move |scope| async move {
            scope.compose(foreign(sleep(Duration::from_millis(ms)))).await;
            Either::success(v)
        })
    }

    fn delayed_failure(ms: u64, msg: &'static str) -> Either<i32, String> {
        Either::produce(move |scope| async move {
            scope.compose(foreign(sleep(Duration::from_millis(ms)))).await;
            Either::failure(msg.to_string())
        })
    }

    #[test]
    fn test_block_on_plain_future() {
        assert_eq!(block_on(async { 6 * 7 }), 42);
    }

    #[test]
    fn test_block_on_pending_either() {
        let e = delayed(10, 5);
        assert!(!e.completed());

        let start = Instant::now();
        let done = block_on(e);
        assert!(start.elapsed() >= Duration::from_millis(10));
        assert!(done.completed());
        assert_eq!(*done.value(), 5);
    }

    #[test]
    fn test_block_on_propagates_delayed_error() {
        let chain: Either<i32, String> = Either::produce(|scope| async move {
            let a = scope.compose(delayed(1, 1)).await;
            let b = scope.compose(delayed_failure(1, "late failure")).await;
            let c = scope.compose(delayed(1, 100)).await;
            Either::success(a + b + c)
        });
        let done = block_on(chain);
        assert_eq!(*done.error(), "late failure");
    }

    #[test]
    fn test_spawn_and_run() {
        let executor = Executor::new(RuntimeConfig::new()).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|i| executor.spawn(delayed(2, i)).unwrap())
            .collect();
        assert_eq!(executor.live_tasks(), 4);

        executor.run();
        assert_eq!(executor.live_tasks(), 0);
        let values: Vec<i32> = handles
            .iter()
            .map(|h| {
                assert!(h.is_finished());
                h.try_take().unwrap().into_result().unwrap()
            })
            .collect();
        assert_eq!(values, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_spawn_limit() {
        let executor = Executor::new(RuntimeConfig::new().max_tasks(2)).unwrap();
        let _a = executor.spawn(async {}).unwrap();
        let _b = executor.spawn(async {}).unwrap();
        assert!(matches!(executor.spawn(async {}), Err(RuntimeError::TooManyTasks)));

        executor.run();
        assert!(executor.spawn(async {}).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Executor::new(RuntimeConfig::new().max_tasks(0));
        assert!(matches!(result, Err(RuntimeError::InvalidConfig(_))));
    }

    #[test]
    fn test_block_on_awaits_join_handle() {
        let executor = Executor::new(RuntimeConfig::new()).unwrap();
        let handle = executor
            .spawn(async {
                YieldNow(3).await;
                "from task"
            })
            .unwrap();
        let out = executor.block_on(handle);
        assert_eq!(out, "from task");
    }

    #[test]
    fn test_tasks_interleave() {
        let executor = Executor::new(RuntimeConfig::new()).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["a", "b"] {
            let log = Rc::clone(&log);
            executor
                .spawn(async move {
                    for step in 0..2 {
                        log.borrow_mut().push(format!("{}{}", name, step));
                        YieldNow(1).await;
                    }
                })
                .unwrap();
        }
        executor.run();
        assert_eq!(*log.borrow(), vec!["a0", "b0", "a1", "b1"]);
    }

    #[test]
    fn test_dropping_pending_either_abandons_step() {
        struct Guard(Rc<Cell<bool>>);
        impl Drop for Guard {
            fn drop(&mut self) {
                self.0.set(true);
            }
        }

        let dropped = Rc::new(Cell::new(false));
        let guard = Guard(Rc::clone(&dropped));
        let e: Either<i32, String> = Either::produce(move |scope| async move {
            let _guard = guard;
            scope.compose(foreign(sleep(Duration::from_secs(60)))).await;
            Either::success(1)
        });
        assert!(!e.completed());
        assert!(!dropped.get());
        drop(e);
        assert!(dropped.get());
    }
}
