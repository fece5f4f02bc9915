//! The set of latest-value channels the firmware publishes into.
//!
//! One channel per physical quantity, one for the debounced event count,
//! and one for the alarm state derived from them.  Built once (usually as a
//! `static`) and shared by reference with producers and consumers.

use serde::Serialize;

use crate::channel::Latest;

pub struct Readings {
    /// Degrees Celsius.
    pub temperature: Latest<f32>,
    /// Relative humidity, percent.
    pub humidity: Latest<f32>,
    /// Light level, percent of ADC full scale.
    pub light: Latest<f32>,
    /// Accepted button / IR events.
    pub events: Latest<u32>,
    /// Alarm state computed by the alarm monitor.
    pub alarm: Latest<bool>,
}

/// Point-in-time copy of every channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReadingsSnapshot {
    pub temperature_c: Option<f32>,
    pub humidity_percent: Option<f32>,
    pub light_percent: Option<f32>,
    pub event_count: Option<u32>,
    pub alarm: Option<bool>,
}

impl Readings {
    pub const fn new() -> Self {
        Self {
            temperature: Latest::new(),
            humidity: Latest::new(),
            light: Latest::new(),
            events: Latest::new(),
            alarm: Latest::new(),
        }
    }

    pub fn snapshot(&self) -> ReadingsSnapshot {
        ReadingsSnapshot {
            temperature_c: self.temperature.read(),
            humidity_percent: self.humidity.read(),
            light_percent: self.light.read(),
            event_count: self.events.read(),
            alarm: self.alarm.read(),
        }
    }

    /// Close every channel.  Sampling loops exit on their next iteration
    /// and any write still in flight is dropped.
    pub fn close_all(&self) {
        self.temperature.close();
        self.humidity.close();
        self.light.close();
        self.events.close();
        self.alarm.close();
    }
}

impl Default for Readings {
    fn default() -> Self {
        Self::new()
    }
}
