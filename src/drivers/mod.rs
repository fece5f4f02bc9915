//! Output drivers, hardware initialisation, and peripheral helpers.

pub mod blink;
pub mod delay;
pub mod hw_init;
pub mod indicator;
pub mod task_pin;
