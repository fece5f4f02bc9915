//! Mock hardware for integration tests.
//!
//! Every mock that takes part in an ordering-sensitive sequence writes
//! into a shared [`Journal`], so tests can assert on the full call history
//! across devices without touching real GPIO, I²C or sleep registers.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal::i2c::{self, ErrorKind, NoAcknowledgeSource, Operation};

use envnode::app::events::AppEvent;
use envnode::app::ports::{EventSink, Probe, SleepPort};
use envnode::channel::Latest;
use envnode::error::SensorError;

// ── Journal ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Pin(bool),
    WakeArmed,
    Slept,
}

#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Call>>>);

#[allow(dead_code)]
impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    /// Pin levels only, in order.
    pub fn levels(&self) -> Vec<bool> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Pin(l) => Some(l),
                _ => None,
            })
            .collect()
    }
}

// ── Output pin ────────────────────────────────────────────────

pub struct RecordingPin {
    pub journal: Journal,
}

#[allow(dead_code)]
impl RecordingPin {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.journal.push(Call::Pin(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.journal.push(Call::Pin(true));
        Ok(())
    }
}

// ── Probe ─────────────────────────────────────────────────────

/// Replays a fixed script of readings, then reports `NoResponse`.
pub struct ScriptedProbe {
    script: VecDeque<Result<f32, SensorError>>,
    pub reads: usize,
}

#[allow(dead_code)]
impl ScriptedProbe {
    pub fn new(script: impl IntoIterator<Item = Result<f32, SensorError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            reads: 0,
        }
    }
}

impl Probe for ScriptedProbe {
    fn read(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        self.script.pop_front().unwrap_or(Err(SensorError::NoResponse))
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Returns immediately and records every requested period.  After
/// `close_after` delays it closes `channel`, which stops the sampling
/// loop the way a power-mode transition would.
pub struct CountingDelay<'a> {
    pub periods_ms: Arc<Mutex<Vec<u32>>>,
    close_after: usize,
    channel: &'a Latest<f32>,
}

#[allow(dead_code)]
impl<'a> CountingDelay<'a> {
    pub fn new(close_after: usize, channel: &'a Latest<f32>) -> Self {
        Self {
            periods_ms: Arc::default(),
            close_after,
            channel,
        }
    }
}

impl DelayNs for CountingDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        let mut p = self.periods_ms.lock().unwrap();
        p.push(ms);
        if p.len() >= self.close_after {
            self.channel.close();
        }
    }
}

// ── I²C ───────────────────────────────────────────────────────

/// A single-device register file.  The first written byte sets the
/// register pointer; further bytes and reads auto-increment it.
pub struct MockI2c {
    pub address: u8,
    pub regs: [u8; 256],
    pub present: bool,
    pub writes: usize,
    ptr: u8,
}

#[allow(dead_code)]
impl MockI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            regs: [0; 256],
            present: true,
            writes: 0,
            ptr: 0,
        }
    }
}

impl i2c::ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl i2c::I2c for MockI2c {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        if !self.present || address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let Some((&reg, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.ptr = reg;
                    for &b in data {
                        self.regs[usize::from(self.ptr)] = b;
                        self.ptr = self.ptr.wrapping_add(1);
                        self.writes += 1;
                    }
                }
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.regs[usize::from(self.ptr)];
                        self.ptr = self.ptr.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

// ── Sleep ─────────────────────────────────────────────────────

/// Journals the sleep sequence, then panics in place of powering down.
pub struct PanickingSleeper {
    pub journal: Journal,
}

impl SleepPort for PanickingSleeper {
    fn arm_wake(&mut self) {
        self.journal.push(Call::WakeArmed);
    }

    fn deep_sleep(&mut self) -> ! {
        self.journal.push(Call::Slept);
        panic!("deep sleep entered");
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct CollectSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for CollectSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
