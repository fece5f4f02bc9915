//! Indicator LED driver.
//!
//! One active-HIGH LED on [`pins::LED_GPIO`].  Exposed as an
//! `embedded-hal` [`OutputPin`] so the monitor service and the power
//! controller drive it without knowing the board.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the GPIO level via hw_init.
//! On host/test: tracks state in-memory only.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::drivers::hw_init;
use crate::pins;

pub struct Indicator {
    on: bool,
}

impl Indicator {
    pub fn new() -> Self {
        Self { on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::LED_GPIO, on);
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl Default for Indicator {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorType for Indicator {
    type Error = Infallible;
}

impl OutputPin for Indicator {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true);
        Ok(())
    }
}
