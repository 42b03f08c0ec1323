use super::*;
use std::sync::atomic::{AtomicUsize, Ordering as O};

#[tokio::test(start_paused = true)]
async fn fires_timeout_after_duration() {
    let timer = Timer::new("t", Duration::from_secs(1));
    let fired = Arc::new(AtomicBool::new(false));
    let f = fired.clone();
    timer.on_timeout_reached(move || f.store(true, O::SeqCst));
    timer.start();

    tokio::time::advance(Duration::from_millis(1200)).await;
    assert!(fired.load(O::SeqCst));
    assert!(timer.is_terminated());
}

#[tokio::test(start_paused = true)]
async fn start_is_idempotent() {
    let timer = Timer::new("t", Duration::from_secs(1));
    let iterations = Arc::new(AtomicUsize::new(0));
    let c = iterations.clone();
    timer.on_iterate(move || {
        c.fetch_add(1, O::SeqCst);
    });
    timer.start();
    timer.start();
    timer.start();

    tokio::time::advance(Duration::from_millis(2200)).await;
    // Only one tick loop should be running; duplicate start() calls must
    // not spawn extra tasks double-counting iterations.
    assert!(iterations.load(O::SeqCst) <= 6);
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_then_reset_restarts_full_duration() {
    let timer = Timer::new("t", Duration::from_secs(2));
    let fired = Arc::new(AtomicBool::new(false));
    let f = fired.clone();
    timer.on_timeout_reached(move || f.store(true, O::SeqCst));
    timer.start();

    tokio::time::advance(Duration::from_millis(1800)).await;
    timer.pause();
    assert!(timer.is_paused());

    // Paused: no amount of elapsed time should trigger timeout.
    tokio::time::advance(Duration::from_secs(5)).await;
    assert!(!fired.load(O::SeqCst));

    timer.reset();
    assert!(!timer.is_paused());

    // Reset restarts from the full duration, not from the 1.8s mark.
    tokio::time::advance(Duration::from_millis(1800)).await;
    assert!(!fired.load(O::SeqCst));
    tokio::time::advance(Duration::from_millis(400)).await;
    assert!(fired.load(O::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn extend_pushes_end_time_without_touching_paused() {
    let timer = Timer::new("t", Duration::from_secs(1));
    let fired = Arc::new(AtomicBool::new(false));
    let f = fired.clone();
    timer.on_timeout_reached(move || f.store(true, O::SeqCst));
    timer.start();

    tokio::time::advance(Duration::from_millis(800)).await;
    timer.extend();
    tokio::time::advance(Duration::from_millis(800)).await;
    assert!(!fired.load(O::SeqCst), "extend() should have pushed the deadline out");

    tokio::time::advance(Duration::from_millis(400)).await;
    assert!(fired.load(O::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn force_timeout_fires_on_next_tick() {
    let timer = Timer::new("t", Duration::from_secs(60));
    let fired = Arc::new(AtomicBool::new(false));
    let f = fired.clone();
    timer.on_timeout_reached(move || f.store(true, O::SeqCst));
    timer.start();
    timer.force_timeout();

    tokio::time::advance(Duration::from_millis(250)).await;
    assert!(fired.load(O::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn stop_before_start_terminates_synchronously() {
    let timer = Timer::new("t", Duration::from_secs(1));
    let terminated = Arc::new(AtomicBool::new(false));
    let t = terminated.clone();
    timer.on_terminated(move || t.store(true, O::SeqCst));

    timer.stop();
    assert!(terminated.load(O::SeqCst));
    assert!(timer.is_terminated());
}

#[tokio::test(start_paused = true)]
async fn stop_after_timeout_invokes_terminated_exactly_once() {
    let timer = Timer::new("t", Duration::from_millis(500));
    let terminations = Arc::new(AtomicUsize::new(0));
    let t = terminations.clone();
    timer.on_terminated(move || {
        t.fetch_add(1, O::SeqCst);
    });
    timer.start();

    tokio::time::advance(Duration::from_millis(700)).await;
    assert!(timer.is_terminated());
    timer.stop();
    timer.stop();
    assert_eq!(terminations.load(O::SeqCst), 1);
}
