//! System configuration parameters
//!
//! All tunable parameters for the envnode firmware.  Values are fixed at
//! compile time through `Default`; there is no runtime persistence.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::events::{DEBOUNCE_WINDOW_MS, DebounceMode};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Sampling ---
    /// Temperature sampling period (milliseconds)
    pub temperature_period_ms: u32,
    /// Humidity sampling period (milliseconds)
    pub humidity_period_ms: u32,
    /// Light sampling period (milliseconds)
    pub light_period_ms: u32,

    // --- Event counter ---
    /// Minimum spacing between accepted button / IR edges (milliseconds)
    pub debounce_window_ms: u32,
    /// Reference timestamp for the debounce comparison
    pub debounce_mode: DebounceMode,

    // --- Indicator ---
    /// Indicator on-time while the alarm blinks (milliseconds)
    pub led_on_ms: u32,
    /// Indicator off-time while the alarm blinks (milliseconds)
    pub led_off_ms: u32,

    // --- Alarm thresholds ---
    /// Temperature above which the alarm is raised (Celsius)
    pub alarm_temperature_c: f32,
    /// Relative humidity above which the alarm is raised (%)
    pub alarm_humidity_percent: f32,

    // --- Housekeeping ---
    /// Main loop period (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Telemetry log interval (seconds)
    pub telemetry_interval_secs: u32,
    /// Deep sleep after this long without an accepted event (seconds, 0 = never)
    pub idle_sleep_secs: u32,
    /// RTC timer wake from deep sleep (seconds, 0 = stay asleep until reset)
    pub wake_timer_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Sampling
            temperature_period_ms: 2500,
            humidity_period_ms: 3200,
            light_period_ms: 1600,

            // Event counter
            debounce_window_ms: DEBOUNCE_WINDOW_MS,
            debounce_mode: DebounceMode::SinceAccepted,

            // Indicator
            led_on_ms: 700,
            led_off_ms: 500,

            // Alarm
            alarm_temperature_c: 30.0,
            alarm_humidity_percent: 80.0,

            // Housekeeping
            control_loop_interval_ms: 100, // 10 Hz
            telemetry_interval_secs: 60,
            idle_sleep_secs: 3600,
            wake_timer_secs: 0,
        }
    }
}

impl SystemConfig {
    /// Reject values the firmware cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.temperature_period_ms == 0
            || self.humidity_period_ms == 0
            || self.light_period_ms == 0
        {
            return Err(Error::Config("sampling periods must be positive"));
        }
        if self.debounce_window_ms == 0 {
            return Err(Error::Config("debounce window must be positive"));
        }
        if self.led_on_ms == 0 || self.led_off_ms == 0 {
            return Err(Error::Config("blink timings must be positive"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(Error::Config("control loop interval must be positive"));
        }
        if !self.alarm_temperature_c.is_finite() {
            return Err(Error::Config("alarm temperature must be finite"));
        }
        if !(0.0..=100.0).contains(&self.alarm_humidity_percent) {
            return Err(Error::Config("alarm humidity must be within 0-100%"));
        }
        Ok(())
    }
}
