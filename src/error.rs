//! Unified error types for the envnode firmware.
//!
//! A single `Error` enum every subsystem converts into, so the boot path
//! handles failures uniformly.  All variants are `Copy`: sensor errors are
//! produced on the sampling hot path and must not allocate.

use core::fmt;

pub use crate::drivers::hw_init::HwInitError;
pub use crate::integrity::IntegrityError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned unusable data.
    Sensor(SensorError),
    /// A data block failed its checksum.
    Integrity(IntegrityError),
    /// The real-time clock is missing or misbehaving.
    Rtc(RtcError),
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Integrity(e) => write!(f, "integrity: {e}"),
            Self::Rtc(e) => write!(f, "rtc: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Why a reading was discarded.  None of these are fatal: the sampling
/// task drops the reading and tries again next period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error.
    AdcReadFailed,
    /// The sensor did not answer within its protocol timing.
    NoResponse,
    /// The sensor frame failed its own checksum.
    ChecksumMismatch,
    /// The driver produced NaN or an infinite value.
    InvalidReading,
    /// Reading is outside the physically plausible range.
    OutOfRange,
    /// The shared driver is unavailable (lock poisoned).
    Busy,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::NoResponse => write!(f, "no response"),
            Self::ChecksumMismatch => write!(f, "frame checksum mismatch"),
            Self::InvalidReading => write!(f, "invalid reading"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::Busy => write!(f, "driver busy"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Integrity errors
// ---------------------------------------------------------------------------

impl From<IntegrityError> for Error {
    fn from(e: IntegrityError) -> Self {
        Self::Integrity(e)
    }
}

// ---------------------------------------------------------------------------
// RTC errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcError {
    /// Nothing acknowledged the RTC address.
    NotFound,
    /// A bus transfer failed after the device was found.
    Bus,
    /// Register contents are not valid BCD / calendar values.
    InvalidData,
    /// The date to write is outside what the device can hold.
    UnsupportedDate,
}

impl fmt::Display for RtcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "RTC not found"),
            Self::Bus => write!(f, "I2C transfer failed"),
            Self::InvalidData => write!(f, "invalid register data"),
            Self::UnsupportedDate => write!(f, "date outside 2000-2199"),
        }
    }
}

impl From<RtcError> for Error {
    fn from(e: RtcError) -> Self {
        Self::Rtc(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
