//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host (x86_64) with no
//! real hardware required.

mod counter_tests;
mod mock_hw;
mod power_tests;
mod rtc_tests;
mod sampling_tests;
mod service_tests;
