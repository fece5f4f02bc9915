//! Periodic sampling tasks.
//!
//! One task per physical quantity, each on its own thread with its own
//! period.  Tasks never talk to each other; each only overwrites its own
//! [`Latest`] channel.
//!
//! ```text
//!   every period:  Probe::read() ──▶ validate ──▶ Latest::write()
//!                                        │
//!                                        └── invalid → drop, wait next period
//! ```
//!
//! A task runs until its channel is closed by the power-mode transition.
//! A sensor read in progress at that moment is simply abandoned: its value
//! is refused by the closed channel.

use core::ops::RangeInclusive;

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::app::ports::Probe;
use crate::channel::Latest;
use crate::config::SystemConfig;
use crate::error::SensorError;
use crate::readings::Readings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Temperature,
    Humidity,
    Light,
}

impl Quantity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Light => "light",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "\u{00b0}C",
            Self::Humidity | Self::Light => "%",
        }
    }

    /// Values outside this range cannot come from a working sensor.
    pub fn plausible_range(self) -> RangeInclusive<f32> {
        match self {
            Self::Temperature => -40.0..=80.0,
            Self::Humidity | Self::Light => 0.0..=100.0,
        }
    }

    /// Accept `raw` as a sample or say why not.
    pub fn validate(self, raw: f32) -> Result<f32, SensorError> {
        if !raw.is_finite() {
            return Err(SensorError::InvalidReading);
        }
        if !self.plausible_range().contains(&raw) {
            return Err(SensorError::OutOfRange);
        }
        Ok(raw)
    }

    pub fn period_ms(self, config: &SystemConfig) -> u32 {
        match self {
            Self::Temperature => config.temperature_period_ms,
            Self::Humidity => config.humidity_period_ms,
            Self::Light => config.light_period_ms,
        }
    }

    pub fn channel(self, readings: &Readings) -> &Latest<f32> {
        match self {
            Self::Temperature => &readings.temperature,
            Self::Humidity => &readings.humidity,
            Self::Light => &readings.light,
        }
    }
}

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// A valid sample was written.
    Published(f32),
    /// The reading was invalid and dropped; the channel is untouched.
    Discarded(SensorError),
    /// The channel is closed; the task must stop.
    Halted,
}

pub struct SamplingTask<'a, P, D> {
    quantity: Quantity,
    period_ms: u32,
    probe: P,
    delay: D,
    channel: &'a Latest<f32>,
}

impl<'a, P: Probe, D: DelayNs> SamplingTask<'a, P, D> {
    pub fn new(
        quantity: Quantity,
        period_ms: u32,
        probe: P,
        delay: D,
        channel: &'a Latest<f32>,
    ) -> Self {
        Self {
            quantity,
            period_ms,
            probe,
            delay,
            channel,
        }
    }

    /// Task wired to the quantity's configured period and channel.
    pub fn for_quantity(
        quantity: Quantity,
        config: &SystemConfig,
        readings: &'a Readings,
        probe: P,
        delay: D,
    ) -> Self {
        Self::new(
            quantity,
            quantity.period_ms(config),
            probe,
            delay,
            quantity.channel(readings),
        )
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// One read-validate-publish iteration, without the delay.
    pub fn step(&mut self) -> Step {
        if self.channel.is_closed() {
            return Step::Halted;
        }
        match self.probe.read().and_then(|raw| self.quantity.validate(raw)) {
            Ok(value) => {
                if self.channel.write(value) {
                    Step::Published(value)
                } else {
                    Step::Halted
                }
            }
            Err(e) => {
                debug!("{}: reading discarded ({})", self.quantity.label(), e);
                Step::Discarded(e)
            }
        }
    }

    /// Sample forever at the fixed period.  Returns only once the channel
    /// has been closed.
    pub fn run(mut self) {
        info!(
            "Sampling {} ({}) every {} ms",
            self.quantity.label(),
            self.quantity.unit(),
            self.period_ms
        );
        while self.step() != Step::Halted {
            self.delay.delay_ms(self.period_ms);
        }
        info!("Sampling {} stopped", self.quantity.label());
    }
}
