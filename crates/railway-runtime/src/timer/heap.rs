//! BinaryHeap-based timer store
//!
//! # Complexity
//!
//! - Insert: O(log n)
//! - Cancel: O(1) (lazy: the heap entry is skipped when it surfaces)
//! - Poll expired: O(k log n) where k = number of expired timers
//!
//! Not thread-safe by itself; the timer service keeps it behind a mutex.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::task::Waker;
use std::time::Instant;

/// Identifies one registered sleep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Heap ordering wrapper (min-heap by deadline)
struct HeapEntry {
    deadline: Instant,
    id: TimerId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.id == other.id
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: earliest deadline first, ties by registration order.
        match other.deadline.cmp(&self.deadline) {
            Ordering::Equal => other.id.0.cmp(&self.id.0),
            ord => ord,
        }
    }
}

/// Deadlines plus the waker to fire for each live one
pub struct TimerHeap {
    heap: BinaryHeap<HeapEntry>,
    wakers: HashMap<TimerId, Waker>,
    next_id: u64,
    total_fired: u64,
}

impl TimerHeap {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            wakers: HashMap::with_capacity(capacity),
            next_id: 0,
            total_fired: 0,
        }
    }

    pub fn insert(&mut self, deadline: Instant, waker: Waker) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.heap.push(HeapEntry { deadline, id });
        self.wakers.insert(id, waker);
        id
    }

    /// Swap in a newer waker; false if the timer already fired or was
    /// cancelled
    pub fn update(&mut self, id: TimerId, waker: &Waker) -> bool {
        match self.wakers.get_mut(&id) {
            Some(current) => {
                if !current.will_wake(waker) {
                    *current = waker.clone();
                }
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let found = self.wakers.remove(&id).is_some();
        if self.wakers.is_empty() {
            self.heap.clear();
        }
        found
    }

    /// Remove and return the wakers of every timer due at `now`
    pub fn poll_expired(&mut self, now: Instant) -> Vec<Waker> {
        let mut expired = Vec::new();
        while let Some(top) = self.heap.peek() {
            if top.deadline > now {
                break;
            }
            let id = top.id;
            self.heap.pop();
            if let Some(waker) = self.wakers.remove(&id) {
                expired.push(waker);
            }
        }
        self.total_fired += expired.len() as u64;
        expired
    }

    /// Earliest live deadline, dropping cancelled entries on the way
    pub fn next_deadline(&mut self) -> Option<Instant> {
        while let Some(top) = self.heap.peek() {
            if self.wakers.contains_key(&top.id) {
                return Some(top.deadline);
            }
            self.heap.pop();
        }
        None
    }

    /// Live (not fired, not cancelled) timers
    pub fn len(&self) -> usize {
        self.wakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wakers.is_empty()
    }

    pub fn total_fired(&self) -> u64 {
        self.total_fired
    }
}

impl Default for TimerHeap {
    fn default() -> Self {
        Self::new()
    }
}
