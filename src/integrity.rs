//! CRC-8 block integrity.
//!
//! Polynomial 0x07, initial value 0x00, MSB-first, no reflection and no
//! final XOR (the "CRC-8/SMBUS" parameter set).  Any block that crosses a
//! trust boundary (read back from a peripheral, received from a peer) is
//! checked before use; a mismatch means the block is discarded.

use core::fmt;

const POLY: u8 = 0x07;

/// CRC-8 over `data`.  `crc8(&[]) == 0x00`.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0x00;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
        }
    }
    crc
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityError {
    /// Computed checksum disagrees with the expected one.
    Mismatch { expected: u8, computed: u8 },
    /// Block too short to carry a checksum byte.
    Truncated,
    /// Payload plus checksum does not fit the output buffer.
    Overflow,
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch { expected, computed } => {
                write!(f, "CRC mismatch (expected 0x{expected:02X}, computed 0x{computed:02X})")
            }
            Self::Truncated => write!(f, "block shorter than its checksum"),
            Self::Overflow => write!(f, "block exceeds buffer capacity"),
        }
    }
}

/// Check `data` against a separately transmitted checksum.
pub fn verify(data: &[u8], expected: u8) -> Result<(), IntegrityError> {
    let computed = crc8(data);
    if computed == expected {
        Ok(())
    } else {
        Err(IntegrityError::Mismatch { expected, computed })
    }
}

/// Validate a block whose last byte is the CRC of everything before it,
/// returning the payload.
pub fn split_block(block: &[u8]) -> Result<&[u8], IntegrityError> {
    let (&expected, payload) = block.split_last().ok_or(IntegrityError::Truncated)?;
    verify(payload, expected)?;
    Ok(payload)
}

/// Copy `payload` into a fixed-capacity buffer and append its CRC.
pub fn seal<const N: usize>(payload: &[u8]) -> Result<heapless::Vec<u8, N>, IntegrityError> {
    let mut block = heapless::Vec::new();
    block
        .extend_from_slice(payload)
        .map_err(|_| IntegrityError::Overflow)?;
    block
        .push(crc8(payload))
        .map_err(|_| IntegrityError::Overflow)?;
    Ok(block)
}
