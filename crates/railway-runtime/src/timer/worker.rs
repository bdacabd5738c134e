//! Timer thread
//!
//! One process-wide thread owns the deadline heap. It wakes every expired
//! sleep, then parks until the next deadline (bounded by the configured
//! minimum and maximum sleep). Registering a sleep unparks it so a new,
//! earlier deadline is picked up immediately.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::task::Waker;
use std::thread;
use std::time::{Duration, Instant};

use railway_core::{kdebug, kerror, kwarn};

use super::heap::{TimerHeap, TimerId};
use crate::config::RuntimeConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::parking::{PlatformParking, ThreadParking};

/// Timer thread settings
#[derive(Debug, Clone)]
pub struct TimerThreadConfig {
    /// Never sleep less than this (prevents busy-spinning)
    pub min_sleep: Duration,
    /// Never sleep longer than this
    pub max_poll_interval: Duration,
    pub thread_name: String,
}

impl TimerThreadConfig {
    pub fn from_runtime(config: &RuntimeConfig) -> Self {
        Self {
            min_sleep: config.timer_min_sleep,
            max_poll_interval: config.timer_max_poll,
            thread_name: "railway-timer".into(),
        }
    }
}

impl Default for TimerThreadConfig {
    fn default() -> Self {
        let mut config = RuntimeConfig::from_env();
        if let Err(e) = config.validate() {
            kwarn!("timer: {}, falling back to defaults", e);
            config = RuntimeConfig::new();
        }
        Self::from_runtime(&config)
    }
}

/// State shared by the timer thread and every `Sleep`
pub(crate) struct TimerService {
    heap: Mutex<TimerHeap>,
    parking: PlatformParking,
    config: TimerThreadConfig,
}

impl TimerService {
    fn new(config: TimerThreadConfig) -> Self {
        Self {
            heap: Mutex::new(TimerHeap::new()),
            parking: PlatformParking::new(),
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TimerHeap> {
        self.heap.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn register(&self, deadline: Instant, waker: Waker) -> TimerId {
        let id = self.lock().insert(deadline, waker);
        self.parking.unpark();
        id
    }

    pub(crate) fn update(&self, id: TimerId, waker: &Waker) -> bool {
        self.lock().update(id, waker)
    }

    pub(crate) fn cancel(&self, id: TimerId) -> bool {
        self.lock().cancel(id)
    }

    pub(crate) fn config(&self) -> &TimerThreadConfig {
        &self.config
    }

    pub(crate) fn pending(&self) -> usize {
        self.lock().len()
    }

    fn run(&self) {
        kdebug!(
            "timer thread started (min sleep {:?}, max poll {:?})",
            self.config.min_sleep,
            self.config.max_poll_interval
        );
        loop {
            let (expired, next) = {
                let mut heap = self.lock();
                let expired = heap.poll_expired(Instant::now());
                (expired, heap.next_deadline())
            };
            // Wake outside the lock: a waker may register a new sleep.
            for waker in expired {
                waker.wake();
            }

            let timeout = match next {
                Some(deadline) => deadline
                    .saturating_duration_since(Instant::now())
                    .clamp(self.config.min_sleep, self.config.max_poll_interval),
                None => self.config.max_poll_interval,
            };
            self.parking.park(Some(timeout));
        }
    }
}

static TIMER: TimerCell = OnceLock::new();

fn spawn_timer_thread(config: TimerThreadConfig) -> Option<Arc<TimerService>> {
    let service = Arc::new(TimerService::new(config));
    let worker = Arc::clone(&service);
    let spawned = thread::Builder::new()
        .name(service.config.thread_name.clone())
        .spawn(move || worker.run());
    match spawned {
        Ok(_) => Some(service),
        Err(e) => {
            kerror!("failed to spawn timer thread: {}", e);
            None
        }
    }
}

type TimerCell = OnceLock<Option<Arc<TimerService>>>;

/// Start the timer in `cell` with `config` unless it already runs.
///
/// The first initialisation wins; a later, different config is reported
/// and ignored.
fn service_in(cell: &'static TimerCell, config: TimerThreadConfig) -> RuntimeResult<&'static TimerService> {
    let mut requested = Some(config);
    let service = cell
        .get_or_init(|| requested.take().and_then(spawn_timer_thread))
        .as_deref()
        .ok_or(RuntimeError::TimerUnavailable)?;
    if let Some(config) = requested {
        let running = service.config();
        if config.min_sleep != running.min_sleep || config.max_poll_interval != running.max_poll_interval {
            kwarn!(
                "timer already running (min sleep {:?}, max poll {:?}), ignoring {:?} / {:?}",
                running.min_sleep,
                running.max_poll_interval,
                config.min_sleep,
                config.max_poll_interval
            );
        }
    }
    Ok(service)
}

/// Start the process-wide timer with `config` if it is not running yet
pub(crate) fn start_with(config: TimerThreadConfig) -> RuntimeResult<&'static TimerService> {
    service_in(&TIMER, config)
}

/// The process-wide timer, started from the environment on first use
pub(crate) fn service() -> RuntimeResult<&'static TimerService> {
    match TIMER.get() {
        Some(started) => started.as_deref().ok_or(RuntimeError::TimerUnavailable),
        None => start_with(TimerThreadConfig::default()),
    }
}
