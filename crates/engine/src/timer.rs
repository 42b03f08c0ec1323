// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The cancellable, pausable, resettable countdown of spec §4.1, directly
//! grounded on `original_source/homewatcher/timer.py`'s 200ms tick loop (no
//! teacher scheduler survived retrieval to copy from).
//!
//! Each live timer is its own lightweight tokio task (spec §5 "Each active
//! Timer is an independent lightweight task running a 200ms tick loop").
//! Tick scheduling uses tokio's own clock (pausable under `tokio::test_util`
//! time in tests via `tokio::time::pause`/`advance`) rather than
//! [`sv_core::Clock`]; that trait is reserved for wall-clock stamping
//! (`epoch_ms`) in logs and email trailers, not for driving timer ticks.
//!
//! Callbacks are data, bound after construction, matching spec §9's design
//! note that callbacks are function handles rather than inherited methods.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

const TICK_INTERVAL: Duration = Duration::from_millis(200);

type Callback = Box<dyn Fn() + Send + Sync>;

struct Shared {
    label: String,
    duration: Duration,
    end_time: Mutex<Option<Instant>>,
    paused: AtomicBool,
    cancelled: AtomicBool,
    force_timeout: AtomicBool,
    started: AtomicBool,
    terminated: AtomicBool,
    on_iterate: Mutex<Option<Callback>>,
    on_timeout_reached: Mutex<Option<Callback>>,
    on_terminated: Mutex<Option<Callback>>,
}

/// A single logical countdown with an owner label (spec §4.1).
#[derive(Clone)]
pub struct Timer {
    shared: Arc<Shared>,
}

impl Timer {
    pub fn new(label: impl Into<String>, duration: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                label: label.into(),
                duration,
                end_time: Mutex::new(None),
                paused: AtomicBool::new(false),
                cancelled: AtomicBool::new(false),
                force_timeout: AtomicBool::new(false),
                started: AtomicBool::new(false),
                terminated: AtomicBool::new(false),
                on_iterate: Mutex::new(None),
                on_timeout_reached: Mutex::new(None),
                on_terminated: Mutex::new(None),
            }),
        }
    }

    pub fn on_iterate(&self, f: impl Fn() + Send + Sync + 'static) {
        *self.shared.on_iterate.lock() = Some(Box::new(f));
    }

    pub fn on_timeout_reached(&self, f: impl Fn() + Send + Sync + 'static) {
        *self.shared.on_timeout_reached.lock() = Some(Box::new(f));
    }

    pub fn on_terminated(&self, f: impl Fn() + Send + Sync + 'static) {
        *self.shared.on_terminated.lock() = Some(Box::new(f));
    }

    /// Begin counting. Idempotent if already running.
    pub fn start(&self) {
        if self.shared.started.swap(true, Ordering::SeqCst) {
            return;
        }
        *self.shared.end_time.lock() = Some(Instant::now() + self.shared.duration);
        let shared = self.shared.clone();
        tokio::spawn(async move { Self::run(shared).await });
    }

    /// Checks timeout before sleeping, not after (`homewatcher/timer.py`'s
    /// `run()`: iterate, check termination, check timeout, *then* sleep).
    /// This is what lets a zero-duration timer fire on its very first poll
    /// rather than waiting out one dead tick.
    async fn run(shared: Arc<Shared>) {
        loop {
            if let Some(cb) = shared.on_iterate.lock().as_ref() {
                cb();
            }

            if shared.cancelled.load(Ordering::SeqCst) {
                break;
            }

            let timed_out = shared.force_timeout.load(Ordering::SeqCst)
                || (!shared.paused.load(Ordering::SeqCst)
                    && shared
                        .end_time
                        .lock()
                        .is_some_and(|end| Instant::now() >= end));

            if timed_out {
                trace!(timer = %shared.label, "timer reached timeout");
                if let Some(cb) = shared.on_timeout_reached.lock().as_ref() {
                    cb();
                }
                break;
            }

            tokio::time::sleep(TICK_INTERVAL).await;
        }

        Self::terminate(&shared);
    }

    fn terminate(shared: &Shared) {
        if !shared.terminated.swap(true, Ordering::SeqCst) {
            if let Some(cb) = shared.on_terminated.lock().as_ref() {
                cb();
            }
        }
    }

    /// Cancel. Invokes the terminal callback exactly once; further
    /// operations are no-ops. Idempotent.
    pub fn stop(&self) {
        self.shared.cancelled.store(true, Ordering::SeqCst);
        if !self.shared.started.load(Ordering::SeqCst) {
            // Never started: no tick loop exists to observe cancellation.
            Self::terminate(&self.shared);
        }
    }

    /// Suspend the countdown; it stays frozen until `reset()` or `extend()`.
    pub fn pause(&self) {
        self.shared.paused.store(true, Ordering::SeqCst);
    }

    /// Clear the end-time and paused flag; the next tick recomputes
    /// `endTime = now + duration` from scratch (not a resume from the
    /// remaining time).
    pub fn reset(&self) {
        self.shared.paused.store(false, Ordering::SeqCst);
        *self.shared.end_time.lock() = Some(Instant::now() + self.shared.duration);
    }

    /// `endTime = now + duration`, without touching the paused flag.
    pub fn extend(&self) {
        *self.shared.end_time.lock() = Some(Instant::now() + self.shared.duration);
    }

    /// Force expiry on the next tick.
    pub fn force_timeout(&self) {
        self.shared.force_timeout.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    pub fn is_terminated(&self) -> bool {
        self.shared.terminated.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
