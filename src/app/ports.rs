//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ sampling tasks / service (domain)
//! ```
//!
//! Drivers and adapters implement these traits; the sampling tasks, the
//! monitor service and the power controller consume them via generics, so
//! all of them run on the host against mocks.  Digital outputs and delays
//! use the `embedded-hal` traits directly (`OutputPin`, `DelayNs`).

use crate::app::clock::DateTime;
use crate::error::{RtcError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One physical quantity, read on demand by its sampling task.
pub trait Probe {
    /// Take one raw reading.  Validity (NaN, range) is judged by the caller;
    /// an `Err` means the driver itself could not produce a value.
    fn read(&mut self) -> Result<f32, SensorError>;
}

impl<P: Probe + ?Sized> Probe for &mut P {
    fn read(&mut self) -> Result<f32, SensorError> {
        (**self).read()
    }
}

// ───────────────────────────────────────────────────────────────
// Real-time clock port
// ───────────────────────────────────────────────────────────────

pub trait RtcPort {
    /// Check the device answers on its bus.
    fn probe(&mut self) -> Result<(), RtcError>;

    /// `true` if the oscillator stopped since the time was last set
    /// (battery removed or flat), i.e. the stored time is meaningless.
    fn lost_power(&mut self) -> Result<bool, RtcError>;

    /// Set the clock and clear the lost-power flag.
    fn set_datetime(&mut self, dt: &DateTime) -> Result<(), RtcError>;

    fn datetime(&mut self) -> Result<DateTime, RtcError>;
}

// ───────────────────────────────────────────────────────────────
// Sleep port (driven adapter: domain → SoC power management)
// ───────────────────────────────────────────────────────────────

pub trait SleepPort {
    /// Configure whatever wake source the platform offers.
    fn arm_wake(&mut self);

    /// Enter the lowest-power retention state.  Execution continues only
    /// through a full restart.
    fn deep_sleep(&mut self) -> !;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
