//! Fuzz target: `integrity::split_block`
//!
//! Arbitrary blocks must either verify (and then the returned payload is
//! the block minus its last byte and re-seals to the same block) or be
//! rejected without panicking.
//!
//! cargo fuzz run fuzz_block_verify

#![no_main]

use envnode::integrity::{crc8, seal, split_block};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match split_block(data) {
        Ok(payload) => {
            assert_eq!(payload.len() + 1, data.len());
            assert_eq!(crc8(data), 0, "valid block must leave zero residue");
            if let Ok(block) = seal::<512>(payload) {
                assert_eq!(&block[..], data);
            }
        }
        Err(_) => assert!(data.is_empty() || crc8(data) != 0),
    }
});
