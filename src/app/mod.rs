//! Application core: pure domain logic, zero I/O.
//!
//! Alarm evaluation, the monitor service, clock bootstrap and the events
//! they emit.  All interaction with hardware happens through **port
//! traits** defined in [`ports`] (or `embedded-hal` traits), keeping this
//! layer fully testable without real peripherals.

pub mod alarm;
pub mod clock;
pub mod events;
pub mod ports;
pub mod service;
