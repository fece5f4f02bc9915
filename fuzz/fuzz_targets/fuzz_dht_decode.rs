//! Fuzz target: `sensors::dht::decode_frame`
//!
//! Any 5-byte frame either fails its checksum or decodes to finite values
//! inside the DHT11's encodable range.
//!
//! cargo fuzz run fuzz_dht_decode

#![no_main]

use envnode::sensors::dht::decode_frame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [u8; 5]| {
    if let Ok(r) = decode_frame(data) {
        assert!(r.temperature_c.is_finite() && r.humidity_percent.is_finite());
        assert!(r.temperature_c.abs() <= 256.5);
        assert!((0.0..=281.0).contains(&r.humidity_percent));
    }
});
