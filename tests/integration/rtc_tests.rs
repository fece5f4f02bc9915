//! Boot-time clock sync against a mock DS3231.

use envnode::adapters::rtc::{DS3231_ADDR, Ds3231, encode_registers};
use envnode::app::clock::{ClockStatus, DateTime, sync_at_boot};
use envnode::app::ports::RtcPort;
use envnode::error::RtcError;

use super::mock_hw::MockI2c;

const STATUS: usize = 0x0F;

fn fallback() -> DateTime {
    DateTime::from_unix(1_704_067_200) // 2024-01-01T00:00:00
}

#[test]
fn missing_rtc_is_reported_as_not_found() {
    let mut bus = MockI2c::new(DS3231_ADDR);
    bus.present = false;
    let mut rtc = Ds3231::new(bus);

    assert_eq!(sync_at_boot(&mut rtc, &fallback()), Err(RtcError::NotFound));
}

#[test]
fn lost_power_reseeds_and_clears_the_flag() {
    let mut bus = MockI2c::new(DS3231_ADDR);
    bus.regs[STATUS] = 0x88; // OSF + EN32kHz
    let mut rtc = Ds3231::new(bus);

    let status = sync_at_boot(&mut rtc, &fallback()).unwrap();

    assert_eq!(status, ClockStatus::Reseeded(fallback()));
    assert_eq!(rtc.datetime().unwrap(), fallback());
    assert!(!rtc.lost_power().unwrap());

    let bus = rtc.release();
    assert_eq!(bus.regs[STATUS], 0x08, "other status bits untouched");
    assert_eq!(bus.regs[..7], encode_registers(&fallback()).unwrap());
}

#[test]
fn running_rtc_is_left_alone() {
    let now = DateTime::from_unix(1_715_000_000);
    let mut bus = MockI2c::new(DS3231_ADDR);
    bus.regs[..7].copy_from_slice(&encode_registers(&now).unwrap());
    let mut rtc = Ds3231::new(bus);

    assert_eq!(sync_at_boot(&mut rtc, &fallback()), Ok(ClockStatus::Running));
    assert_eq!(rtc.datetime().unwrap(), now);
    assert_eq!(rtc.release().writes, 0);
}

#[test]
fn unreadable_time_does_not_fail_boot() {
    let mut bus = MockI2c::new(DS3231_ADDR);
    bus.regs[0] = 0xFF; // not BCD
    let mut rtc = Ds3231::new(bus);

    assert_eq!(sync_at_boot(&mut rtc, &fallback()), Ok(ClockStatus::Running));
    assert_eq!(rtc.datetime(), Err(RtcError::InvalidData));
}
