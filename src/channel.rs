//! Single-slot "latest value" channel.
//!
//! One producer (a sampling task or an ISR) overwrites the slot; any number
//! of consumers peek or take the most recent value.  A write never blocks
//! and never fails: an unread value is simply replaced.
//!
//! ```text
//! ┌──────────────┐  write()   ┌──────────┐  read() / take()  ┌──────────┐
//! │ Task / ISR   │──────────▶│  [slot]  │──────────────────▶│ Consumer │
//! └──────────────┘  overwrite └──────────┘   latest wins     └──────────┘
//! ```
//!
//! The slot lives behind an `embassy-sync` blocking mutex over
//! [`CriticalSectionRawMutex`], so the whole value is swapped inside one
//! critical section: readers never see a torn write, and the same `write()`
//! is safe from interrupt context (no heap, no blocking, no FreeRTOS queue).

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

#[derive(Clone, Copy)]
struct Slot<T> {
    value: Option<T>,
    /// Completed writes since creation (wrapping).
    version: u32,
    closed: bool,
}

/// Overwrite-semantics, capacity-one channel for `Copy` payloads.
pub struct Latest<T: Copy> {
    slot: Mutex<CriticalSectionRawMutex, Cell<Slot<T>>>,
}

impl<T: Copy> Latest<T> {
    /// Empty, open channel.  `const` so channels can live in statics.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(Slot {
                value: None,
                version: 0,
                closed: false,
            })),
        }
    }

    /// Store `value`, replacing whatever was there.
    ///
    /// ISR-safe.  Returns `false` only when the channel has been closed by
    /// the power-mode transition, in which case the value is dropped.
    pub fn write(&self, value: T) -> bool {
        self.slot.lock(|cell| {
            let mut slot = cell.get();
            if slot.closed {
                return false;
            }
            slot.value = Some(value);
            slot.version = slot.version.wrapping_add(1);
            cell.set(slot);
            true
        })
    }

    /// Most recent value, left in place.
    pub fn read(&self) -> Option<T> {
        self.slot.lock(|cell| cell.get().value)
    }

    /// Most recent value, removed from the slot.
    pub fn take(&self) -> Option<T> {
        self.slot.lock(|cell| {
            let mut slot = cell.get();
            let value = slot.value.take();
            cell.set(slot);
            value
        })
    }

    /// Value together with the write counter it was stored under.
    /// Consumers compare versions to tell a fresh value from a repeat.
    pub fn read_versioned(&self) -> (Option<T>, u32) {
        self.slot.lock(|cell| {
            let slot = cell.get();
            (slot.value, slot.version)
        })
    }

    /// Number of completed writes (wrapping).
    pub fn version(&self) -> u32 {
        self.slot.lock(|cell| cell.get().version)
    }

    /// Refuse every later write.  The last value stays readable.
    pub fn close(&self) {
        self.slot.lock(|cell| {
            let mut slot = cell.get();
            slot.closed = true;
            cell.set(slot);
        });
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock(|cell| cell.get().closed)
    }
}

impl<T: Copy> Default for Latest<T> {
    fn default() -> Self {
        Self::new()
    }
}
