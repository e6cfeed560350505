//! Input segments and their bit serialization.

use super::bitstream::BitStream;
use super::modes::alphanumeric::AlphanumericEncoder;
use super::modes::byte::ByteEncoder;
use super::modes::numeric::NumericEncoder;
use super::tables;
use crate::error::{EncodeError, Result};

/// Width of every mode indicator
pub const MODE_INDICATOR_SIZE: usize = 4;
/// Bits of a structured-append header (indicator, index, count, parity)
pub const STRUCTURE_HEADER_SIZE: usize = 20;
/// Most symbols one structured-append set may hold
pub const MAX_STRUCTURED_SYMBOLS: usize = 16;
/// Largest ECI assignment number
pub const MAX_ECI_ASSIGNMENT: u32 = 999_999;

/// Segment encoding mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Digits 0-9
    Numeric,
    /// 45-character alphanumeric set
    Alphanumeric,
    /// Arbitrary 8-bit data
    Byte,
    /// Structured-append header {count, index, parity}
    StructuredHeader,
    /// Extended Channel Interpretation designator
    Eci,
    /// FNC1 in first position (GS1)
    Fnc1First,
    /// FNC1 in second position, with application id
    Fnc1Second,
}

impl Mode {
    /// 4-bit mode indicator
    pub const fn indicator(self) -> u32 {
        match self {
            Mode::Numeric => 0b0001,
            Mode::Alphanumeric => 0b0010,
            Mode::StructuredHeader => 0b0011,
            Mode::Byte => 0b0100,
            Mode::Fnc1First => 0b0101,
            Mode::Eci => 0b0111,
            Mode::Fnc1Second => 0b1001,
        }
    }

    /// True for modes that carry character data and may be split
    pub const fn is_data(self) -> bool {
        matches!(self, Mode::Numeric | Mode::Alphanumeric | Mode::Byte)
    }
}

/// One run of input in a single mode.
///
/// The bit sequence is computed on demand for a given version and
/// discarded whenever the data changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    mode: Mode,
    data: Vec<u8>,
    bits: Option<BitStream>,
}

impl Segment {
    /// Validate `data` for `mode` and take a copy of it
    pub fn new(mode: Mode, data: &[u8]) -> Result<Self> {
        Self::check(mode, data)?;
        let mut owned = Vec::new();
        owned
            .try_reserve_exact(data.len())
            .map_err(|_| EncodeError::allocation_failure(data.len()))?;
        owned.extend_from_slice(data);
        Ok(Self {
            mode,
            data: owned,
            bits: None,
        })
    }

    /// Structured-append header for symbol `index` (1-based) of `count`
    pub fn structured_header(count: usize, index: usize, parity: u8) -> Result<Self> {
        if count > MAX_STRUCTURED_SYMBOLS {
            return Err(EncodeError::TooManySymbols { count });
        }
        Self::new(Mode::StructuredHeader, &[count as u8, index as u8, parity])
    }

    /// ECI designator for `assignment`
    pub fn eci(assignment: u32) -> Result<Self> {
        if assignment > MAX_ECI_ASSIGNMENT {
            return Err(EncodeError::invalid_input(format!(
                "ECI assignment {} exceeds {}",
                assignment, MAX_ECI_ASSIGNMENT
            )));
        }
        Self::new(Mode::Eci, &assignment.to_be_bytes())
    }

    /// Check a run of data against the rules of `mode`
    pub fn check(mode: Mode, data: &[u8]) -> Result<()> {
        match mode {
            Mode::Numeric | Mode::Alphanumeric | Mode::Byte if data.is_empty() => Err(
                EncodeError::invalid_input(format!("empty {:?} segment", mode)),
            ),
            Mode::Numeric => NumericEncoder::check(data),
            Mode::Alphanumeric => AlphanumericEncoder::check(data),
            Mode::Byte => Ok(()),
            Mode::StructuredHeader => match *data {
                [count, index, _]
                    if (1..=MAX_STRUCTURED_SYMBOLS as u8).contains(&count)
                        && (1..=count).contains(&index) =>
                {
                    Ok(())
                }
                _ => Err(EncodeError::invalid_input(
                    "structured-append header needs 1 <= index <= count <= 16",
                )),
            },
            Mode::Eci => match *data {
                [a, b, c, d] if u32::from_be_bytes([a, b, c, d]) <= MAX_ECI_ASSIGNMENT => Ok(()),
                _ => Err(EncodeError::invalid_input("invalid ECI designator")),
            },
            Mode::Fnc1First if data.is_empty() => Ok(()),
            Mode::Fnc1Second if data.len() == 1 => Ok(()),
            Mode::Fnc1First | Mode::Fnc1Second => {
                Err(EncodeError::invalid_input("invalid FNC1 header"))
            }
        }
    }

    /// Encoding mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Raw data bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bit sequence from the last [`Segment::encode`], if still valid
    pub fn bits(&self) -> Option<&BitStream> {
        self.bits.as_ref()
    }

    /// XOR of the data bytes; structured-append headers contribute nothing
    pub fn parity(&self) -> u8 {
        if self.mode == Mode::StructuredHeader {
            return 0;
        }
        self.data.iter().fold(0, |acc, &b| acc ^ b)
    }

    /// Estimated size in bits at `version` (0 is estimated as version 1)
    pub fn estimate_bits(&self, version: u8) -> usize {
        let version = version.max(1);
        let payload = match self.mode {
            Mode::Numeric => NumericEncoder::estimate_bits(self.data.len()),
            Mode::Alphanumeric => AlphanumericEncoder::estimate_bits(self.data.len()),
            Mode::Byte => ByteEncoder::estimate_bits(self.data.len()),
            Mode::StructuredHeader => return STRUCTURE_HEADER_SIZE,
            Mode::Eci => return MODE_INDICATOR_SIZE + eci_code_bits(self.eci_assignment()),
            Mode::Fnc1First => return MODE_INDICATOR_SIZE,
            Mode::Fnc1Second => return MODE_INDICATOR_SIZE + 8,
        };
        let length_bits = tables::length_indicator(self.mode, version);
        let headers = self.data.len().div_ceil(1 << length_bits);
        payload + headers * (MODE_INDICATOR_SIZE + length_bits)
    }

    /// Serialize at `version`, returning the number of bits.
    ///
    /// Data longer than one segment may declare is written as
    /// consecutive segments of the same mode.
    pub fn encode(&mut self, version: u8) -> Result<usize> {
        let mut stream = BitStream::new();
        let max_words = tables::maximum_words(self.mode, version);
        if max_words > 0 && self.data.len() > max_words {
            for chunk in self.data.chunks(max_words) {
                self.encode_chunk(chunk, version, &mut stream)?;
            }
        } else {
            self.encode_chunk(&self.data, version, &mut stream)?;
        }
        let len = stream.len();
        self.bits = Some(stream);
        Ok(len)
    }

    /// Keep the first `at` bytes and return the rest as a new segment
    pub(crate) fn split_off(&mut self, at: usize) -> Result<Segment> {
        if !self.mode.is_data() || at == 0 || at >= self.data.len() {
            return Err(EncodeError::invalid_input(format!(
                "cannot split a {:?} segment of {} bytes at {}",
                self.mode,
                self.data.len(),
                at
            )));
        }
        let tail = Segment::new(self.mode, &self.data[at..])?;
        self.data.truncate(at);
        self.bits = None;
        Ok(tail)
    }

    fn encode_chunk(&self, chunk: &[u8], version: u8, stream: &mut BitStream) -> Result<()> {
        stream.append_num(MODE_INDICATOR_SIZE, self.mode.indicator())?;
        match self.mode {
            Mode::Numeric | Mode::Alphanumeric | Mode::Byte => {
                let length_bits = tables::length_indicator(self.mode, version);
                stream.append_num(length_bits, chunk.len() as u32)?;
                match self.mode {
                    Mode::Numeric => NumericEncoder::encode(chunk, stream),
                    Mode::Alphanumeric => AlphanumericEncoder::encode(chunk, stream),
                    _ => ByteEncoder::encode(chunk, stream),
                }
            }
            Mode::StructuredHeader => {
                let (count, index, parity) = (chunk[0], chunk[1], chunk[2]);
                stream.append_num(4, index as u32 - 1)?;
                stream.append_num(4, count as u32 - 1)?;
                stream.append_num(8, parity as u32)
            }
            Mode::Eci => {
                let assignment = self.eci_assignment();
                let code = match eci_code_bits(assignment) {
                    8 => assignment,
                    16 => 0x8000 + assignment,
                    _ => 0xc0_0000 + assignment,
                };
                stream.append_num(eci_code_bits(assignment), code)
            }
            Mode::Fnc1First => Ok(()),
            Mode::Fnc1Second => stream.append_num(8, chunk[0] as u32),
        }
    }

    fn eci_assignment(&self) -> u32 {
        match *self.data {
            [a, b, c, d] => u32::from_be_bytes([a, b, c, d]),
            _ => 0,
        }
    }
}

fn eci_code_bits(assignment: u32) -> usize {
    match assignment {
        0..128 => 8,
        128..16384 => 16,
        _ => 24,
    }
}
