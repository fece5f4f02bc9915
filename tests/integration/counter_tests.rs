//! Event counter under concurrent triggers.

use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

use envnode::channel::Latest;
use envnode::events::{DEBOUNCE_WINDOW_MS, DebounceMode, EventCounter, Trigger};

#[test]
fn button_and_ir_share_one_window() {
    let ch = Latest::new();
    let c = EventCounter::new(DEBOUNCE_WINDOW_MS, DebounceMode::SinceAccepted, &ch);

    assert_eq!(c.on_trigger(1_000), Trigger::Accepted(1)); // button
    assert_eq!(c.on_trigger(1_300), Trigger::Bounced); // IR, same window
    assert_eq!(c.on_trigger(1_701), Trigger::Accepted(2)); // IR
    assert_eq!(ch.read(), Some(2));
    assert_eq!(c.last_accepted_ms(), Some(1_701));
}

#[test]
fn concurrent_triggers_publish_a_monotonic_count() {
    let ch = Latest::new();
    let counter = EventCounter::new(10, DebounceMode::SinceAccepted, &ch);
    let clock = AtomicU32::new(0);

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..500 {
                    counter.on_trigger_with(|| clock.fetch_add(7, Ordering::SeqCst));
                }
            });
        }
        s.spawn(|| {
            let mut last = 0;
            for _ in 0..2_000 {
                if let Some(n) = ch.read() {
                    assert!(n >= last, "count went backwards: {} -> {}", last, n);
                    last = n;
                }
            }
        });
    });

    // 2000 edges 7 ms apart on one timeline with a 10 ms window: every
    // second edge is accepted, no matter how the threads interleave.
    let published = ch.read().unwrap();
    assert_eq!(published, counter.count());
    assert_eq!(published, 1_000);
}

#[test]
fn racing_stamps_never_count_twice_inside_the_window() {
    let ch = Latest::new();
    let counter = EventCounter::new(DEBOUNCE_WINDOW_MS, DebounceMode::SinceAccepted, &ch);

    // Two cores read the clock at 5_001 and 5_000; the later stamp wins
    // the lock.
    assert_eq!(counter.on_trigger(5_001), Trigger::Accepted(1));
    assert_eq!(counter.on_trigger(5_000), Trigger::Bounced);
    assert_eq!(ch.read(), Some(1));
}

#[test]
fn closed_channel_drops_the_publish() {
    let events = Latest::new();
    let counter = EventCounter::new(700, DebounceMode::SinceAccepted, &events);
    events.close();
    assert_eq!(counter.on_trigger(1_000), Trigger::Accepted(1));
    assert_eq!(events.read(), None);
}
