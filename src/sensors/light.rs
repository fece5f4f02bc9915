//! LDR light sensor on ADC1.
//!
//! The LDR sits in a voltage divider on an input-only pin; brighter light
//! pulls the node up.  The raw 12-bit conversion is reported as a
//! percentage of full scale, which is all the firmware needs.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::app::ports::Probe;
use crate::drivers::hw_init;
use crate::error::SensorError;

const ADC_MAX: f32 = 4095.0;

#[cfg(not(target_os = "espidf"))]
static SIM_LIGHT_ADC: AtomicU16 = AtomicU16::new(2048);
#[cfg(not(target_os = "espidf"))]
static SIM_LIGHT_FAIL: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_light_adc(raw: u16) {
    SIM_LIGHT_ADC.store(raw, Ordering::Relaxed);
}

/// Make the simulated ADC return an error until cleared.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_light_fail(fail: bool) {
    SIM_LIGHT_FAIL.store(fail, Ordering::Relaxed);
}

/// Raw 12-bit count to percent of full scale.
pub fn raw_to_percent(raw: u16) -> f32 {
    (f32::from(raw.min(4095)) / ADC_MAX) * 100.0
}

pub struct LightSensor {
    channel: u32,
}

impl LightSensor {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read(self.channel).map_err(|rc| {
            log::debug!("LDR: adc_oneshot_read rc={}", rc);
            SensorError::AdcReadFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        if SIM_LIGHT_FAIL.load(Ordering::Relaxed) {
            return Err(SensorError::AdcReadFailed);
        }
        // Same call path as on target, with the injected value on top.
        hw_init::adc1_read(self.channel).map_err(|_| SensorError::AdcReadFailed)?;
        Ok(SIM_LIGHT_ADC.load(Ordering::Relaxed))
    }
}

impl Probe for LightSensor {
    fn read(&mut self) -> Result<f32, SensorError> {
        self.read_adc().map(raw_to_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_endpoints() {
        assert_eq!(raw_to_percent(0), 0.0);
        assert_eq!(raw_to_percent(4095), 100.0);
        assert_eq!(raw_to_percent(u16::MAX), 100.0);
        assert!((raw_to_percent(2048) - 50.01).abs() < 0.01);
    }
}
