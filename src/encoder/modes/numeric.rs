//! Numeric mode encoder (mode 0001).

use crate::encoder::bitstream::BitStream;
use crate::error::{EncodeError, Result};

/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
pub struct NumericEncoder;

impl NumericEncoder {
    /// True for ASCII digits
    pub fn is_valid(byte: u8) -> bool {
        byte.is_ascii_digit()
    }

    /// Reject any non-digit byte
    pub fn check(data: &[u8]) -> Result<()> {
        match data.iter().position(|&b| !Self::is_valid(b)) {
            Some(pos) => Err(EncodeError::invalid_input(format!(
                "byte 0x{:02x} at {} is not a digit",
                data[pos], pos
            ))),
            None => Ok(()),
        }
    }

    /// Payload bits for `count` digits
    pub fn estimate_bits(count: usize) -> usize {
        let bits = count / 3 * 10;
        match count % 3 {
            1 => bits + 4,
            2 => bits + 7,
            _ => bits,
        }
    }

    /// Append the payload of `data` (digits only)
    pub fn encode(data: &[u8], stream: &mut BitStream) -> Result<()> {
        Self::check(data)?;
        for group in data.chunks(3) {
            let value = group
                .iter()
                .fold(0u32, |acc, &digit| acc * 10 + (digit - b'0') as u32);
            let bits = match group.len() {
                3 => 10,
                2 => 7,
                _ => 4,
            };
            stream.append_num(bits, value)?;
        }
        Ok(())
    }
}
