//! GPIO / peripheral pin assignments for the envnode board (ESP32-WROOM).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT11 single-wire data line (temperature + humidity).
pub const DHT_GPIO: i32 = 13;

/// LDR voltage divider.  GPIO 34 is input-only, ADC1 channel 6.
pub const LDR_ADC_GPIO: i32 = 34;
pub const ADC1_CH_LDR: u32 = 6;

// ---------------------------------------------------------------------------
// Trigger inputs (falling edge → event counter ISR)
// ---------------------------------------------------------------------------

/// Momentary push-button, active-low with internal pull-up.
pub const BUTTON_GPIO: i32 = 5;
/// IR break-beam receiver, open-collector, LOW when the beam is broken.
pub const IR_BEAM_GPIO: i32 = 19;

// ---------------------------------------------------------------------------
// Indicator
// ---------------------------------------------------------------------------

/// Single indicator LED, active HIGH.
pub const LED_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// I²C bus (DS3231 RTC)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
pub const I2C_BAUDRATE_HZ: u32 = 100_000;
