//! Threshold alarm over the latest temperature and humidity.
//!
//! A channel with no value yet never raises the alarm.  The state is
//! republished into `Readings::alarm` on every evaluation.

use crate::config::SystemConfig;
use crate::readings::Readings;

pub struct AlarmMonitor {
    temperature_limit_c: f32,
    humidity_limit_percent: f32,
    active: bool,
}

impl AlarmMonitor {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            temperature_limit_c: config.alarm_temperature_c,
            humidity_limit_percent: config.alarm_humidity_percent,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Re-evaluate against the current channel values.
    /// Returns the new state only when it changed.
    pub fn update(&mut self, readings: &Readings) -> Option<bool> {
        let too_hot = readings
            .temperature
            .read()
            .is_some_and(|t| t > self.temperature_limit_c);
        let too_humid = readings
            .humidity
            .read()
            .is_some_and(|h| h > self.humidity_limit_percent);
        let active = too_hot || too_humid;

        readings.alarm.write(active);

        if active == self.active {
            return None;
        }
        self.active = active;
        Some(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_no_alarm() {
        let r = Readings::new();
        let mut a = AlarmMonitor::new(&SystemConfig::default());
        assert_eq!(a.update(&r), None);
        assert_eq!(r.alarm.read(), Some(false));
    }

    #[test]
    fn raised_and_cleared_once() {
        let r = Readings::new();
        let mut a = AlarmMonitor::new(&SystemConfig::default());
        r.temperature.write(31.0);
        assert_eq!(a.update(&r), Some(true));
        assert_eq!(a.update(&r), None);
        r.temperature.write(24.0);
        assert_eq!(a.update(&r), Some(false));
        assert!(!a.is_active());
    }

    #[test]
    fn humidity_alone_raises() {
        let r = Readings::new();
        let mut a = AlarmMonitor::new(&SystemConfig::default());
        r.temperature.write(20.0);
        r.humidity.write(85.0);
        assert_eq!(a.update(&r), Some(true));
        assert_eq!(r.alarm.read(), Some(true));
    }
}
