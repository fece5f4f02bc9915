//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART0 in production).

use log::{debug, info, warn};

use crate::app::clock::ClockStatus;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn opt(v: Option<f32>) -> String {
    v.map_or_else(|| "--".into(), |x| format!("{:.1}", x))
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | T={}\u{00b0}C | RH={}% | light={}% | events={} | alarm={}",
                    opt(t.temperature_c),
                    opt(t.humidity_percent),
                    opt(t.light_percent),
                    t.event_count.unwrap_or(0),
                    match t.alarm {
                        Some(true) => "ON",
                        Some(false) => "off",
                        None => "--",
                    },
                );
                if let Ok(json) = serde_json::to_string(t) {
                    debug!("TELEM | {}", json);
                }
            }
            AppEvent::EventCounted(n) => {
                info!("COUNT | {}", n);
            }
            AppEvent::AlarmChanged(true) => {
                warn!("ALARM | raised");
            }
            AppEvent::AlarmChanged(false) => {
                info!("ALARM | cleared");
            }
            AppEvent::ClockSynced(ClockStatus::Running) => {
                info!("CLOCK | running");
            }
            AppEvent::ClockSynced(ClockStatus::Reseeded(dt)) => {
                info!("CLOCK | reseeded to {}", dt);
            }
            AppEvent::Started(wake) => {
                info!("START | wake={:?}", wake);
            }
            AppEvent::EnteringLowPower { idle_secs } => {
                info!("SLEEP | idle for {}s", idle_secs);
            }
        }
    }
}
