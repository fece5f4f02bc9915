//! Power-mode controller.
//!
//! The only way out of normal operation: quiesce the indicator, close
//! every channel so no sampling task can publish again, arm the wake
//! source, then hand the SoC to deep sleep.  Waking is a full restart;
//! the boot path reports why via [`wake_reason`].
//!
//! ```text
//!   indicator LOW ──▶ Readings::close_all() ──▶ arm wake ──▶ deep sleep (never returns)
//! ```

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::app::ports::SleepPort;
use crate::readings::Readings;

/// Why the SoC is running this boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    /// Cold boot or reset (not a wake from sleep).
    PowerOn,
    /// Deep-sleep timer expired.
    Timer,
    /// External GPIO wake (ext0 / ext1).
    External,
    /// Any other wake source.
    Other,
}

#[cfg(target_os = "espidf")]
#[allow(non_upper_case_globals)]
pub fn wake_reason() -> WakeReason {
    use esp_idf_svc::sys::*;

    // SAFETY: read-only query of the sleep subsystem.
    match unsafe { esp_sleep_get_wakeup_cause() } {
        esp_sleep_source_t_ESP_SLEEP_WAKEUP_UNDEFINED => WakeReason::PowerOn,
        esp_sleep_source_t_ESP_SLEEP_WAKEUP_TIMER => WakeReason::Timer,
        esp_sleep_source_t_ESP_SLEEP_WAKEUP_EXT0 | esp_sleep_source_t_ESP_SLEEP_WAKEUP_EXT1 => {
            WakeReason::External
        }
        _ => WakeReason::Other,
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn wake_reason() -> WakeReason {
    WakeReason::PowerOn
}

/// Stop here for good.  Used when boot cannot continue safely.
pub fn halt() -> ! {
    loop {
        std::thread::park();
    }
}

pub struct PowerController<S> {
    sleeper: S,
}

impl<S: SleepPort> PowerController<S> {
    pub fn new(sleeper: S) -> Self {
        Self { sleeper }
    }

    /// Enter the low-power retention state.  Never returns.
    ///
    /// The indicator is driven to its inactive level before anything else.
    /// A failure to do so is logged but does not stop the transition.
    pub fn enter_low_power<L: OutputPin>(&mut self, indicator: &mut L, readings: &Readings) -> ! {
        info!("Entering deep sleep...");
        if let Err(e) = indicator.set_low() {
            warn!("Power: indicator quiesce failed: {:?}", e);
        }
        readings.close_all();
        self.sleeper.arm_wake();
        self.sleeper.deep_sleep()
    }
}
