//! Alphanumeric mode encoder (mode 0010).
//! Character set: 0-9, A-Z, space, $%*+-./:

use crate::encoder::bitstream::BitStream;
use crate::error::{EncodeError, Result};

const ALPHANUMERIC_TABLE: [u8; 45] = *b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericEncoder;

impl AlphanumericEncoder {
    /// Position of `byte` in the alphanumeric table
    pub fn index_of(byte: u8) -> Option<u8> {
        ALPHANUMERIC_TABLE
            .iter()
            .position(|&c| c == byte)
            .map(|i| i as u8)
    }

    /// True when `byte` belongs to the alphanumeric set (digits included)
    pub fn is_valid(byte: u8) -> bool {
        Self::index_of(byte).is_some()
    }

    /// Reject bytes outside the table
    pub fn check(data: &[u8]) -> Result<()> {
        match data.iter().position(|&b| !Self::is_valid(b)) {
            Some(pos) => Err(EncodeError::invalid_input(format!(
                "byte 0x{:02x} at {} is not alphanumeric",
                data[pos], pos
            ))),
            None => Ok(()),
        }
    }

    /// Payload bits for `count` characters
    pub fn estimate_bits(count: usize) -> usize {
        count / 2 * 11 + (count % 2) * 6
    }

    /// Append the payload of `data` (table characters only)
    pub fn encode(data: &[u8], stream: &mut BitStream) -> Result<()> {
        for pair in data.chunks(2) {
            let mut value = 0u32;
            for &c in pair {
                let index = Self::index_of(c).ok_or_else(|| {
                    EncodeError::invalid_input(format!("byte 0x{:02x} is not alphanumeric", c))
                })?;
                value = value * 45 + index as u32;
            }
            let bits = if pair.len() == 2 { 11 } else { 6 };
            stream.append_num(bits, value)?;
        }
        Ok(())
    }
}
