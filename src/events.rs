//! Interrupt-driven, debounced event counter.
//!
//! Two falling-edge sources share one counter and one debounce window:
//! the manual push-button and the IR break-beam.  Each edge calls
//! [`EventCounter::on_trigger`] from the GPIO ISR with the current uptime.
//!
//! ```text
//! ┌─────────────┐
//! │ Button ISR  │──┐    ┌────────────────┐   write()   ┌───────────────┐
//! └─────────────┘  ├──▶│  EventCounter  │───────────▶│ Latest<u32>   │──▶ tasks
//! ┌─────────────┐  │    │  (debounce)    │ on accept   │ (event count) │
//! │ IR beam ISR │──┘    └────────────────┘             └───────────────┘
//! └─────────────┘
//! ```
//!
//! The count and the last-accepted timestamp are only ever mutated here,
//! on the interrupt path.  Tasks never touch them: they read the copy
//! published into the channel on every accepted edge.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use serde::{Deserialize, Serialize};

use crate::channel::Latest;

/// Minimum spacing between two accepted edges.
pub const DEBOUNCE_WINDOW_MS: u32 = 700;

/// Which timestamp a new edge is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DebounceMode {
    /// Compare against the last *accepted* edge.  A rejected edge leaves
    /// the window where it was.
    #[default]
    SinceAccepted,
    /// Compare against the last *raw* edge, accepted or not.  Continuous
    /// chatter keeps re-arming the window and can suppress a real press.
    SinceLastEdge,
}

/// Outcome of a single trigger edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Edge counted; carries the new total.
    Accepted(u32),
    /// Edge fell inside the debounce window and was ignored.
    Bounced,
}

#[derive(Debug, Clone, Copy)]
struct CounterState {
    count: u32,
    last_accepted_ms: Option<u32>,
    last_edge_ms: Option<u32>,
}

/// Debounced monotonic counter shared by the trigger ISRs.
///
/// Created once at boot, leaked to `&'static`, and handed to the ISR
/// registration as the handler argument.
pub struct EventCounter<'a> {
    window_ms: u32,
    mode: DebounceMode,
    state: Mutex<CriticalSectionRawMutex, Cell<CounterState>>,
    out: &'a Latest<u32>,
}

impl<'a> EventCounter<'a> {
    pub const fn new(window_ms: u32, mode: DebounceMode, out: &'a Latest<u32>) -> Self {
        Self {
            window_ms,
            mode,
            state: Mutex::new(Cell::new(CounterState {
                count: 0,
                last_accepted_ms: None,
                last_edge_ms: None,
            })),
            out,
        }
    }

    /// Handle one raw edge observed at `now_ms` (uptime, wrapping `u32`).
    ///
    /// Safe to call from interrupt context: one critical section, no heap,
    /// no logging, no blocking.  The first edge after boot is always
    /// accepted.  An edge exactly `window_ms` after the reference is still
    /// bounce, and so is a stale stamp up to `window_ms` *before* it.
    pub fn on_trigger(&self, now_ms: u32) -> Trigger {
        self.on_trigger_with(|| now_ms)
    }

    /// Like [`on_trigger`](Self::on_trigger), but samples the clock inside
    /// the critical section, so edges racing each other from two cores are
    /// stamped in the order they are counted.
    pub fn on_trigger_with(&self, clock: impl FnOnce() -> u32) -> Trigger {
        self.state.lock(|cell| {
            let mut s = cell.get();
            let now_ms = clock();
            let reference = match self.mode {
                DebounceMode::SinceAccepted => s.last_accepted_ms,
                DebounceMode::SinceLastEdge => s.last_edge_ms,
            };
            if !s.last_edge_ms.is_some_and(|t| self.is_behind(now_ms, t)) {
                s.last_edge_ms = Some(now_ms);
            }

            let bounced = reference.is_some_and(|t| {
                now_ms.wrapping_sub(t) <= self.window_ms || self.is_behind(now_ms, t)
            });
            let outcome = if bounced {
                Trigger::Bounced
            } else {
                s.count = s.count.saturating_add(1);
                s.last_accepted_ms = Some(now_ms);
                self.out.write(s.count);
                Trigger::Accepted(s.count)
            };

            cell.set(s);
            outcome
        })
    }

    /// `now_ms` lies within one window before `reference`.
    fn is_behind(&self, now_ms: u32, reference: u32) -> bool {
        (1..=self.window_ms).contains(&reference.wrapping_sub(now_ms))
    }

    /// Accepted edges so far.  Diagnostics only; consumers read the channel.
    pub fn count(&self) -> u32 {
        self.state.lock(|cell| cell.get().count)
    }

    /// Uptime of the last accepted edge, `None` before the first one.
    pub fn last_accepted_ms(&self) -> Option<u32> {
        self.state.lock(|cell| cell.get().last_accepted_ms)
    }

    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }

    pub fn mode(&self) -> DebounceMode {
        self.mode
    }
}
