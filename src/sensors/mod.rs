//! Sensor drivers.
//!
//! Each driver implements [`Probe`](crate::app::ports::Probe) and is owned
//! by the sampling task of its quantity.  The DHT11 serves two tasks and is
//! shared behind a mutex.

pub mod dht;
pub mod light;
