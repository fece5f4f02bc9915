//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them (today: the serial log).

use crate::app::clock::ClockStatus;
use crate::power::WakeReason;
use crate::readings::ReadingsSnapshot;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service started (carries why the SoC booted).
    Started(WakeReason),

    /// Boot-time RTC check finished.
    ClockSynced(ClockStatus),

    /// Periodic copy of every channel.
    Telemetry(ReadingsSnapshot),

    /// The debounced event count moved.
    EventCounted(u32),

    /// Alarm raised (`true`) or cleared (`false`).
    AlarmChanged(bool),

    /// No accepted event for `idle_secs`; deep sleep follows.
    EnteringLowPower { idle_secs: u32 },
}
