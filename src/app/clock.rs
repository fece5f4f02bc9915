//! Wall-clock bootstrap.
//!
//! At boot the RTC is probed once.  A missing RTC is fatal for the caller;
//! an RTC whose oscillator stopped (battery flat) is reseeded with the
//! firmware build time so timestamps are at least monotonic with builds.

use core::fmt;

use log::{info, warn};

use crate::app::ports::RtcPort;
use crate::error::RtcError;

/// Calendar date and time, UTC, second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    /// Seconds since 1970-01-01T00:00:00Z to a calendar date.
    pub fn from_unix(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let rem = secs % 86_400;
        let (year, month, day) = civil_from_days(days);
        Self {
            year: year as u16,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: ((rem % 3600) / 60) as u8,
            second: (rem % 60) as u8,
        }
    }

    /// ISO weekday, Monday = 1 … Sunday = 7.
    pub fn weekday(&self) -> u8 {
        let days = days_from_civil(self.year as i64, self.month, self.day);
        // 1970-01-01 was a Thursday (4).
        ((days + 3).rem_euclid(7) + 1) as u8
    }

    /// Field ranges are sane (month 1-12, day within the month, …).
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

fn is_leap(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

// Howard Hinnant's days <-> civil algorithms (proleptic Gregorian).
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = i64::from(month);
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Firmware build time, stamped by `build.rs`.
pub fn build_time() -> DateTime {
    DateTime::from_unix(env!("ENVNODE_BUILD_UNIX").parse().unwrap_or(0))
}

/// What boot-time clock sync did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStatus {
    /// The RTC kept time; nothing written.
    Running,
    /// The RTC had lost power and was set to the given time.
    Reseeded(DateTime),
}

/// Probe the RTC and reseed it with `fallback` if it lost power.
///
/// An `Err` from the probe means the RTC is absent; the boot path treats
/// that as fatal rather than run with a known-bad clock.
pub fn sync_at_boot<R: RtcPort>(rtc: &mut R, fallback: &DateTime) -> Result<ClockStatus, RtcError> {
    rtc.probe()?;
    if rtc.lost_power()? {
        warn!("RTC lost power, setting time to {}", fallback);
        rtc.set_datetime(fallback)?;
        return Ok(ClockStatus::Reseeded(*fallback));
    }
    match rtc.datetime() {
        Ok(now) => info!("RTC time: {}", now),
        Err(e) => warn!("RTC time unreadable: {}", e),
    }
    Ok(ClockStatus::Running)
}
