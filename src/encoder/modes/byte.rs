//! Byte mode encoder (mode 0100).

use crate::encoder::bitstream::BitStream;
use crate::error::Result;

/// Each byte = 8 bits, no character set restriction
pub struct ByteEncoder;

impl ByteEncoder {
    /// Payload bits for `count` bytes
    pub fn estimate_bits(count: usize) -> usize {
        count * 8
    }

    /// Append the raw bytes
    pub fn encode(data: &[u8], stream: &mut BitStream) -> Result<()> {
        stream.append_bytes(data)
    }
}
