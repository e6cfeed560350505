//! Append-only bit buffer, most significant bit first.

use crate::error::{EncodeError, Result};

/// Growable sequence of bits packed MSB-first into bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    data: Vec<u8>,
    len: usize,
}

impl BitStream {
    /// Create an empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream with room for `bits` bits
    pub fn with_capacity(bits: usize) -> Result<Self> {
        let mut stream = Self::new();
        stream.reserve(bits)?;
        Ok(stream)
    }

    /// Number of bits appended so far
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no bits were appended
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a single bit
    pub fn append_bit(&mut self, bit: bool) -> Result<()> {
        self.reserve(1)?;
        let bit_index = self.len % 8;
        if bit_index == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 0x80 >> bit_index;
        }
        self.len += 1;
        Ok(())
    }

    /// Append the low `bits` bits of `value`, most significant first.
    ///
    /// `bits` must not exceed 32.
    pub fn append_num(&mut self, bits: usize, value: u32) -> Result<()> {
        debug_assert!(bits <= 32, "append_num takes at most 32 bits");
        self.reserve(bits)?;
        for i in (0..bits).rev() {
            self.append_bit((value >> i) & 1 == 1)?;
        }
        Ok(())
    }

    /// Append whole bytes, 8 bits each
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len() * 8)?;
        if self.len % 8 == 0 {
            self.data.extend_from_slice(bytes);
            self.len += bytes.len() * 8;
            return Ok(());
        }
        for &byte in bytes {
            self.append_num(8, byte as u32)?;
        }
        Ok(())
    }

    /// Append every bit of `other`
    pub fn append(&mut self, other: &BitStream) -> Result<()> {
        self.reserve(other.len)?;
        let whole = other.len / 8;
        self.append_bytes(&other.data[..whole])?;
        for i in whole * 8..other.len {
            self.append_bit(other.bit(i))?;
        }
        Ok(())
    }

    /// Read bit `index`
    pub fn get(&self, index: usize) -> Result<bool> {
        if index >= self.len {
            return Err(EncodeError::InvalidIndex {
                index,
                len: self.len,
            });
        }
        Ok(self.bit(index))
    }

    /// Pack into bytes; a trailing partial byte is padded with zero bits
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn bit(&self, index: usize) -> bool {
        self.data[index / 8] & (0x80 >> (index % 8)) != 0
    }

    fn reserve(&mut self, bits: usize) -> Result<()> {
        let needed = (self.len + bits).div_ceil(8);
        if needed > self.data.capacity() {
            // Double, or jump straight to what is needed
            let target = needed.max(self.data.capacity() * 2);
            self.data
                .try_reserve_exact(target - self.data.len())
                .map_err(|_| EncodeError::allocation_failure(target))?;
        }
        Ok(())
    }
}
