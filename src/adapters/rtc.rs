//! DS3231 real-time clock over I²C.
//!
//! Generic over any `embedded-hal` 1.0 [`I2c`] bus: on target that is the
//! `esp-idf-hal` `I2cDriver`, in tests a register-file mock.
//!
//! Time registers (BCD, 24-hour mode):
//!
//! ```text
//!   0x00 seconds   0x01 minutes   0x02 hours
//!   0x03 weekday   0x04 date      0x05 month (bit 7 = century)
//!   0x06 year 00-99
//!   0x0F status    (bit 7 = OSF, oscillator stopped)
//! ```

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};
use log::debug;

use crate::app::clock::DateTime;
use crate::app::ports::RtcPort;
use crate::error::RtcError;

pub const DS3231_ADDR: u8 = 0x68;

const REG_SECONDS: u8 = 0x00;
const REG_STATUS: u8 = 0x0F;
const STATUS_OSF: u8 = 0x80;
const MONTH_CENTURY: u8 = 0x80;
const HOUR_12H: u8 = 0x40;
const HOUR_PM: u8 = 0x20;

pub struct Ds3231<I2C> {
    i2c: I2C,
}

fn bus_error<E: embedded_hal::i2c::Error>(e: E) -> RtcError {
    match e.kind() {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => RtcError::NotFound,
        kind => {
            debug!("DS3231: bus error {:?}", kind);
            RtcError::Bus
        }
    }
}

fn to_bcd(v: u8) -> u8 {
    ((v / 10) << 4) | (v % 10)
}

fn from_bcd(b: u8) -> Result<u8, RtcError> {
    let (hi, lo) = (b >> 4, b & 0x0F);
    if hi > 9 || lo > 9 {
        return Err(RtcError::InvalidData);
    }
    Ok(hi * 10 + lo)
}

/// Encode `dt` as the seven time registers.
pub fn encode_registers(dt: &DateTime) -> Result<[u8; 7], RtcError> {
    if !(2000..=2199).contains(&dt.year) || !dt.is_valid() {
        return Err(RtcError::UnsupportedDate);
    }
    let century = if dt.year >= 2100 { MONTH_CENTURY } else { 0 };
    Ok([
        to_bcd(dt.second),
        to_bcd(dt.minute),
        to_bcd(dt.hour),
        dt.weekday(),
        to_bcd(dt.day),
        to_bcd(dt.month) | century,
        to_bcd((dt.year % 100) as u8),
    ])
}

/// Decode the seven time registers.
pub fn decode_registers(regs: &[u8; 7]) -> Result<DateTime, RtcError> {
    let hour = if regs[2] & HOUR_12H != 0 {
        let h12 = from_bcd(regs[2] & 0x1F)?;
        if !(1..=12).contains(&h12) {
            return Err(RtcError::InvalidData);
        }
        (h12 % 12) + if regs[2] & HOUR_PM != 0 { 12 } else { 0 }
    } else {
        from_bcd(regs[2] & 0x3F)?
    };
    let century = if regs[5] & MONTH_CENTURY != 0 { 100 } else { 0 };

    let dt = DateTime {
        year: 2000 + century + u16::from(from_bcd(regs[6])?),
        month: from_bcd(regs[5] & 0x1F)?,
        day: from_bcd(regs[4] & 0x3F)?,
        hour,
        minute: from_bcd(regs[1] & 0x7F)?,
        second: from_bcd(regs[0] & 0x7F)?,
    };
    if !dt.is_valid() {
        return Err(RtcError::InvalidData);
    }
    Ok(dt)
}

impl<I2C: I2c> Ds3231<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Hand the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_status(&mut self) -> Result<u8, RtcError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(DS3231_ADDR, &[REG_STATUS], &mut buf)
            .map_err(bus_error)?;
        Ok(buf[0])
    }
}

impl<I2C: I2c> RtcPort for Ds3231<I2C> {
    fn probe(&mut self) -> Result<(), RtcError> {
        self.read_status().map(|_| ()).map_err(|e| match e {
            RtcError::Bus => RtcError::NotFound,
            other => other,
        })
    }

    fn lost_power(&mut self) -> Result<bool, RtcError> {
        Ok(self.read_status()? & STATUS_OSF != 0)
    }

    fn set_datetime(&mut self, dt: &DateTime) -> Result<(), RtcError> {
        let regs = encode_registers(dt)?;
        let mut frame = [0u8; 8];
        frame[0] = REG_SECONDS;
        frame[1..].copy_from_slice(&regs);
        self.i2c.write(DS3231_ADDR, &frame).map_err(bus_error)?;

        let status = self.read_status()?;
        self.i2c
            .write(DS3231_ADDR, &[REG_STATUS, status & !STATUS_OSF])
            .map_err(bus_error)
    }

    fn datetime(&mut self) -> Result<DateTime, RtcError> {
        let mut regs = [0u8; 7];
        self.i2c
            .write_read(DS3231_ADDR, &[REG_SECONDS], &mut regs)
            .map_err(bus_error)?;
        decode_registers(&regs)
    }
}
