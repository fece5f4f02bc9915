//! Monitor service, the consumer side of the readings channels.
//!
//! [`MonitorService`] runs on the main loop.  Each tick it looks at the
//! channels the sampling tasks and the ISR publish into, drives the
//! indicator LED, and emits [`AppEvent`]s.  It never touches hardware
//! directly: the indicator is an `embedded-hal` `OutputPin` and events go
//! out through [`EventSink`], so the whole service runs on the host.
//!
//! ```text
//!  Readings ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!               │      MonitorService       │
//!  OutputPin ◀──│  alarm · blink · idle     │ ──▶ Tick::Sleep
//!               └──────────────────────────┘
//! ```

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::config::SystemConfig;
use crate::drivers::blink::Blinker;
use crate::power::WakeReason;
use crate::readings::Readings;

use super::alarm::AlarmMonitor;
use super::events::AppEvent;
use super::ports::EventSink;

/// What the main loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    /// Idle limit reached; hand over to the power controller.
    Sleep,
}

pub struct MonitorService {
    alarm: AlarmMonitor,
    blinker: Blinker,
    telemetry_interval_ms: u64,
    idle_sleep_ms: u64,
    idle_sleep_secs: u32,
    /// Event-channel version seen on the previous tick.
    seen_event_version: u32,
    last_activity_ms: u32,
    last_telemetry_ms: u32,
    tick_count: u64,
}

impl MonitorService {
    /// `now_ms` is the uptime the idle and telemetry timers start from.
    pub fn new(config: &SystemConfig, now_ms: u32) -> Self {
        Self {
            alarm: AlarmMonitor::new(config),
            blinker: Blinker::new(config.led_on_ms, config.led_off_ms),
            telemetry_interval_ms: u64::from(config.telemetry_interval_secs) * 1000,
            idle_sleep_ms: u64::from(config.idle_sleep_secs) * 1000,
            idle_sleep_secs: config.idle_sleep_secs,
            seen_event_version: 0,
            last_activity_ms: now_ms,
            last_telemetry_ms: now_ms,
            tick_count: 0,
        }
    }

    pub fn start(&mut self, wake: WakeReason, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(wake));
        info!("MonitorService started (wake: {:?})", wake);
    }

    /// Run one control cycle.
    ///
    /// `delta_ms` is the time since the previous tick and paces the blink
    /// pattern; `now_ms` is uptime and drives telemetry and idle timers.
    pub fn tick(
        &mut self,
        now_ms: u32,
        delta_ms: u32,
        readings: &Readings,
        indicator: &mut impl OutputPin,
        sink: &mut impl EventSink,
    ) -> Tick {
        self.tick_count += 1;

        // 1. Accepted events count as activity.
        let (count, version) = readings.events.read_versioned();
        if version != self.seen_event_version {
            self.seen_event_version = version;
            self.last_activity_ms = now_ms;
            if let Some(n) = count {
                sink.emit(&AppEvent::EventCounted(n));
            }
        }

        // 2. Alarm evaluation
        if let Some(active) = self.alarm.update(readings) {
            if active {
                warn!("Alarm raised");
            } else {
                info!("Alarm cleared");
            }
            self.blinker.set_active(active);
            sink.emit(&AppEvent::AlarmChanged(active));
        }

        // 3. Indicator
        let level = if self.blinker.tick(delta_ms) {
            indicator.set_high()
        } else {
            indicator.set_low()
        };
        if let Err(e) = level {
            warn!("Indicator write failed: {:?}", e);
        }

        // 4. Telemetry
        if self.telemetry_interval_ms > 0
            && u64::from(now_ms.wrapping_sub(self.last_telemetry_ms)) >= self.telemetry_interval_ms
        {
            self.last_telemetry_ms = now_ms;
            sink.emit(&AppEvent::Telemetry(readings.snapshot()));
        }

        // 5. Idle → sleep
        if self.idle_sleep_ms > 0
            && u64::from(now_ms.wrapping_sub(self.last_activity_ms)) >= self.idle_sleep_ms
        {
            sink.emit(&AppEvent::EnteringLowPower {
                idle_secs: self.idle_sleep_secs,
            });
            return Tick::Sleep;
        }

        Tick::Continue
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm.is_active()
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
