//! Ready queue and task wakers
//!
//! Wakers may fire on any thread (a timer thread, a foreign I/O thread).
//! They only push the task id onto a lock-free queue and unpark the thread
//! running the executor; the task itself is polled back on that thread.

use std::sync::Arc;
use std::task::{Wake, Waker};
use std::time::Duration;

use crossbeam_queue::SegQueue;

use crate::parking::{PlatformParking, ThreadParking};

/// Ids of tasks that need a poll
pub(crate) struct ReadyQueue {
    ready: SegQueue<usize>,
    parking: PlatformParking,
}

impl ReadyQueue {
    pub(crate) fn new() -> Self {
        Self {
            ready: SegQueue::new(),
            parking: PlatformParking::new(),
        }
    }

    pub(crate) fn schedule(&self, id: usize) {
        self.ready.push(id);
        self.parking.unpark();
    }

    #[inline]
    pub(crate) fn pop(&self) -> Option<usize> {
        self.ready.pop()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.ready.len()
    }

    /// Sleep until something is scheduled or `timeout` elapses
    pub(crate) fn park(&self, timeout: Duration) {
        if self.ready.is_empty() {
            self.parking.park(Some(timeout));
        }
    }
}

/// Waker scheduling one task id on a ready queue
pub(crate) struct TaskWaker {
    id: usize,
    queue: Arc<ReadyQueue>,
}

impl TaskWaker {
    pub(crate) fn waker(id: usize, queue: &Arc<ReadyQueue>) -> Waker {
        Waker::from(Arc::new(Self { id, queue: Arc::clone(queue) }))
    }
}

impl Wake for TaskWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.queue.schedule(self.id);
    }
}

/// Waker unparking a thread blocked in `block_on`
pub(crate) struct ThreadWaker {
    parking: PlatformParking,
}

impl ThreadWaker {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self { parking: PlatformParking::new() })
    }

    pub(crate) fn park(&self, timeout: Duration) {
        self.parking.park(Some(timeout));
    }
}

impl Wake for ThreadWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.parking.unpark();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_waker_schedules_id() {
        let queue = Arc::new(ReadyQueue::new());
        let waker = TaskWaker::waker(7, &queue);
        waker.wake_by_ref();
        waker.wake();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(7));
        assert_eq!(queue.pop(), Some(7));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_wake_from_other_thread() {
        let queue = Arc::new(ReadyQueue::new());
        let waker = TaskWaker::waker(3, &queue);
        thread::spawn(move || waker.wake()).join().unwrap();
        queue.park(Duration::from_secs(5));
        assert_eq!(queue.pop(), Some(3));
    }
}
