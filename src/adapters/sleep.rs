//! ESP32 deep-sleep adapter.
//!
//! The button and IR inputs (GPIO 5 / 19) are not RTC-domain pins, so they
//! cannot wake the chip.  The only wake source offered is the RTC timer;
//! with `timer_wake_secs = None` the node stays asleep until reset.

use log::info;

use crate::app::ports::SleepPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct DeepSleep {
    pub timer_wake_secs: Option<u32>,
}

impl DeepSleep {
    pub fn new(timer_wake_secs: Option<u32>) -> Self {
        Self { timer_wake_secs }
    }
}

impl SleepPort for DeepSleep {
    #[cfg(target_os = "espidf")]
    fn arm_wake(&mut self) {
        if let Some(secs) = self.timer_wake_secs {
            // SAFETY: plain configuration call before esp_deep_sleep_start().
            let ret = unsafe {
                esp_idf_svc::sys::esp_sleep_enable_timer_wakeup(u64::from(secs) * 1_000_000)
            };
            if ret != esp_idf_svc::sys::ESP_OK as i32 {
                log::warn!("Sleep: timer wake not armed (rc={})", ret);
            } else {
                info!("Sleep: timer wake in {}s", secs);
            }
        } else {
            info!("Sleep: no wake source, reset to resume");
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn arm_wake(&mut self) {
        info!("Sleep(sim): wake source {:?}", self.timer_wake_secs);
    }

    #[cfg(target_os = "espidf")]
    fn deep_sleep(&mut self) -> ! {
        // SAFETY: does not return; RAM outside RTC memory is lost.
        unsafe { esp_idf_svc::sys::esp_deep_sleep_start() }
    }

    #[cfg(not(target_os = "espidf"))]
    fn deep_sleep(&mut self) -> ! {
        info!("Sleep(sim): parked");
        crate::power::halt()
    }
}
