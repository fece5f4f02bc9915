//! Task-level delay.
//!
//! Sampling periods are milliseconds to seconds, so the delay yields the
//! FreeRTOS task (`std::thread::sleep` maps onto `vTaskDelay` under
//! ESP-IDF) instead of spinning.  Microsecond protocol timing uses
//! [`hw_init::delay_us`](super::hw_init::delay_us) instead.

use std::time::Duration;

use embedded_hal::delay::DelayNs;

#[derive(Debug, Default, Clone, Copy)]
pub struct TaskDelay;

impl DelayNs for TaskDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
