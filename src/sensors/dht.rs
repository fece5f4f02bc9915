//! DHT11 temperature / humidity sensor (single-wire, bit-banged).
//!
//! One 40-bit frame carries both quantities:
//!
//! ```text
//!   byte 0   humidity, integer %
//!   byte 1   humidity, tenths
//!   byte 2   temperature, integer °C
//!   byte 3   temperature, tenths in bits 0-3; bit 7 = negative
//!   byte 4   checksum = (b0 + b1 + b2 + b3) & 0xFF
//! ```
//!
//! The part must not be polled faster than about once every two seconds,
//! so the driver caches the last result (good or bad) for
//! [`MIN_INTERVAL_MS`].  The temperature and humidity sampling tasks share
//! one driver through [`SharedDht`] and each take their half of the frame.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the frame on [`pins::DHT_GPIO`](crate::pins::DHT_GPIO).
//! On host/test: returns the frame injected with [`sim_set_dht_frame`].

use std::sync::{Arc, Mutex};

use crate::app::ports::Probe;
use crate::drivers::hw_init;
use crate::error::SensorError;

/// Minimum spacing between two bus transactions.
pub const MIN_INTERVAL_MS: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhtReading {
    pub temperature_c: f32,
    pub humidity_percent: f32,
}

/// Check the checksum and convert a raw frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<DhtReading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ChecksumMismatch);
    }

    let humidity_percent = f32::from(frame[0]) + f32::from(frame[1]) * 0.1;
    let magnitude = f32::from(frame[2]) + f32::from(frame[3] & 0x0F) * 0.1;
    let temperature_c = if frame[3] & 0x80 != 0 { -magnitude } else { magnitude };

    Ok(DhtReading {
        temperature_c,
        humidity_percent,
    })
}

// ── Host simulation hook ──────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_DHT_FRAME: Mutex<Option<[u8; 5]>> = Mutex::new(None);

/// Frame the simulated sensor answers with; `None` = no response.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_dht_frame(frame: Option<[u8; 5]>) {
    if let Ok(mut slot) = SIM_DHT_FRAME.lock() {
        *slot = frame;
    }
}

// ── Driver ────────────────────────────────────────────────────

pub struct Dht {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    pin: i32,
    last_read_ms: Option<u32>,
    last: Result<DhtReading, SensorError>,
    bus_reads: u32,
}

impl Dht {
    pub fn new(pin: i32) -> Self {
        Self {
            pin,
            last_read_ms: None,
            last: Err(SensorError::NoResponse),
            bus_reads: 0,
        }
    }

    /// Latest reading, hitting the bus at most once per [`MIN_INTERVAL_MS`].
    pub fn read(&mut self) -> Result<DhtReading, SensorError> {
        let now_ms = (hw_init::micros() / 1000) as u32;
        self.read_at(now_ms)
    }

    pub fn read_at(&mut self, now_ms: u32) -> Result<DhtReading, SensorError> {
        self.refresh(now_ms, Self::fetch_frame)
    }

    /// Number of bus transactions performed so far.
    pub fn bus_reads(&self) -> u32 {
        self.bus_reads
    }

    fn refresh(
        &mut self,
        now_ms: u32,
        fetch: impl FnOnce(&Self) -> Result<[u8; 5], SensorError>,
    ) -> Result<DhtReading, SensorError> {
        if let Some(t) = self.last_read_ms {
            if now_ms.wrapping_sub(t) < MIN_INTERVAL_MS {
                return self.last;
            }
        }
        self.last_read_ms = Some(now_ms);
        self.bus_reads = self.bus_reads.wrapping_add(1);
        self.last = fetch(self).and_then(decode_frame);
        self.last
    }

    #[cfg(target_os = "espidf")]
    fn fetch_frame(&self) -> Result<[u8; 5], SensorError> {
        use hw_init::{delay_us, gpio_set_input, gpio_set_output, gpio_write};

        // Start signal: hold the line low for at least 18 ms.
        gpio_set_output(self.pin);
        gpio_write(self.pin, false);
        std::thread::sleep(std::time::Duration::from_millis(20));

        // The rest is microsecond-timed; keep interrupts off this core.
        hw_init::timing_critical(|| {
            gpio_write(self.pin, true);
            delay_us(40);
            gpio_set_input(self.pin);

            // Response: ~80 µs low, ~80 µs high.
            wait_while(self.pin, true, 100)?;
            wait_while(self.pin, false, 100)?;
            wait_while(self.pin, true, 100)?;

            let mut frame = [0u8; 5];
            for bit in 0..40 {
                // 50 µs low lead-in, then 26-28 µs high for 0 or 70 µs for 1.
                wait_while(self.pin, false, 80)?;
                let high_us = wait_while(self.pin, true, 100)?;
                frame[bit / 8] <<= 1;
                if high_us > 40 {
                    frame[bit / 8] |= 1;
                }
            }
            Ok(frame)
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn fetch_frame(&self) -> Result<[u8; 5], SensorError> {
        hw_init::timing_critical(|| {
            SIM_DHT_FRAME
                .lock()
                .map_err(|_| SensorError::Busy)?
                .ok_or(SensorError::NoResponse)
        })
    }
}

/// Spin while the line is at `level`; returns how long that took.
#[cfg(target_os = "espidf")]
fn wait_while(pin: i32, level: bool, timeout_us: u64) -> Result<u64, SensorError> {
    let start = hw_init::micros();
    while hw_init::gpio_read(pin) == level {
        if hw_init::micros().wrapping_sub(start) > timeout_us {
            return Err(SensorError::NoResponse);
        }
    }
    Ok(hw_init::micros().wrapping_sub(start))
}

// ── Probe adapters ────────────────────────────────────────────

/// One driver, two sampling tasks.
pub type SharedDht = Arc<Mutex<Dht>>;

pub fn shared(dht: Dht) -> SharedDht {
    Arc::new(Mutex::new(dht))
}

/// Temperature half of a shared DHT.
pub struct DhtTemperature(pub SharedDht);

/// Humidity half of a shared DHT.
pub struct DhtHumidity(pub SharedDht);

impl Probe for DhtTemperature {
    fn read(&mut self) -> Result<f32, SensorError> {
        let mut dht = self.0.lock().map_err(|_| SensorError::Busy)?;
        dht.read().map(|r| r.temperature_c)
    }
}

impl Probe for DhtHumidity {
    fn read(&mut self) -> Result<f32, SensorError> {
        let mut dht = self.0.lock().map_err(|_| SensorError::Busy)?;
        dht.read().map(|r| r.humidity_percent)
    }
}
