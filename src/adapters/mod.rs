//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to              |
//! |------------|------------|--------------------------|
//! | `log_sink` | EventSink  | Serial log output        |
//! | `rtc`      | RtcPort    | DS3231 over I²C          |
//! | `sleep`    | SleepPort  | ESP32 deep sleep         |
//! | `time`     | -          | ESP32 high-res timer     |

pub mod log_sink;
pub mod rtc;
pub mod sleep;
pub mod time;
