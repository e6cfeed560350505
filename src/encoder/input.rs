//! Input model and version resolution.

use super::bitstream::BitStream;
use super::segment::{Mode, Segment};
use super::tables::{self, VERSION_MAX};
use crate::error::{EncodeError, Result};
use crate::models::ECLevel;

/// FNC1 flag of an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fnc1 {
    /// FNC1 in first position
    First,
    /// FNC1 in second position with an application id
    Second(u8),
}

/// Ordered segments plus the target version and level of one symbol.
///
/// Encoding works on a copy, so the same model can be encoded any number
/// of times with identical results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputModel {
    version: u8,
    level: ECLevel,
    segments: Vec<Segment>,
    fnc1: Option<Fnc1>,
    strict_version: bool,
}

impl InputModel {
    /// Create an empty input. `version` 0 selects the smallest fitting version.
    pub fn new(version: u8, level: ECLevel) -> Result<Self> {
        check_version(version)?;
        Ok(Self {
            version,
            level,
            segments: Vec::new(),
            fnc1: None,
            strict_version: false,
        })
    }

    /// Requested (or, after resolution, resolved) version
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Change the requested version
    pub fn set_version(&mut self, version: u8) -> Result<()> {
        check_version(version)?;
        self.version = version;
        Ok(())
    }

    /// Error correction level
    pub fn level(&self) -> ECLevel {
        self.level
    }

    /// Change the error correction level
    pub fn set_level(&mut self, level: ECLevel) {
        self.level = level;
    }

    /// When set, a non-zero version is never raised during resolution
    pub fn set_strict_version(&mut self, strict: bool) {
        self.strict_version = strict;
    }

    /// Whether the requested version is a hard limit
    pub fn strict_version(&self) -> bool {
        self.strict_version
    }

    /// Segments in encoding order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when no segment was appended
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// FNC1 flag, if any
    pub fn fnc1(&self) -> Option<Fnc1> {
        self.fnc1
    }

    /// Append a segment of `mode` holding a copy of `data`
    pub fn append(&mut self, mode: Mode, data: &[u8]) -> Result<()> {
        let segment = Segment::new(mode, data)?;
        self.push(segment)
    }

    /// Append an ECI designator
    pub fn append_eci_header(&mut self, assignment: u32) -> Result<()> {
        let segment = Segment::eci(assignment)?;
        self.push(segment)
    }

    /// Mark the data as GS1 formatted (FNC1 in first position)
    pub fn set_fnc1_first(&mut self) {
        self.fnc1 = Some(Fnc1::First);
    }

    /// Mark the data as formatted per an industry application (FNC1 in second position)
    pub fn set_fnc1_second(&mut self, appid: u8) {
        self.fnc1 = Some(Fnc1::Second(appid));
    }

    /// Prepend a structured-append header
    pub fn insert_structured_append_header(
        &mut self,
        count: usize,
        index: usize,
        parity: u8,
    ) -> Result<()> {
        let header = Segment::structured_header(count, index, parity)?;
        reserve_one(&mut self.segments)?;
        self.segments.insert(0, header);
        Ok(())
    }

    /// XOR of every data byte, structured-append headers excluded
    pub fn parity(&self) -> u8 {
        self.segments.iter().fold(0, |acc, s| acc ^ s.parity())
    }

    /// Sum of segment estimates at `version`
    pub fn estimate_bit_stream_size(&self, version: u8) -> usize {
        self.segments.iter().map(|s| s.estimate_bits(version)).sum()
    }

    /// Smallest version that holds the estimated bit stream.
    ///
    /// Iterates until the version stops growing; estimates only grow
    /// with the version, so this terminates within the table. An estimate
    /// beyond every version yields the largest one and the exact size
    /// decides in [`InputModel::convert_data`].
    pub fn estimate_version(&self) -> u8 {
        let mut version = 0;
        loop {
            let previous = version;
            let bits = self.estimate_bit_stream_size(previous);
            version = tables::minimum_version(bits.div_ceil(8), self.level)
                .unwrap_or(VERSION_MAX);
            if version <= previous {
                return version;
            }
        }
    }

    /// Encode every segment at the current version and return the total bits
    pub fn create_bit_stream(&mut self) -> Result<usize> {
        let version = self.version;
        let mut total = 0;
        for segment in &mut self.segments {
            total += segment.encode(version)?;
        }
        Ok(total)
    }

    /// Resolve the version: raise it to the estimate, then re-encode until
    /// the exact size fits.
    pub fn convert_data(&mut self) -> Result<()> {
        let estimated = self.estimate_version();
        if estimated > self.version {
            let bits = self.estimate_bit_stream_size(self.version);
            self.raise_version(estimated, bits)?;
        }
        loop {
            let bits = self.create_bit_stream()?;
            let needed = tables::minimum_version(bits.div_ceil(8), self.level)?;
            if needed > self.version {
                self.raise_version(needed, bits)?;
            } else {
                tracing::debug!(version = self.version, bits, "resolved version");
                return Ok(());
            }
        }
    }

    /// Concatenate the segment bit sequences, after resolving the version
    pub fn merge_bit_stream(&mut self) -> Result<BitStream> {
        if let Some(fnc1) = self.fnc1.take() {
            self.insert_fnc1_header(fnc1)?;
        }
        self.convert_data()?;

        let total = self
            .segments
            .iter()
            .map(|s| s.bits().map_or(0, BitStream::len))
            .sum();
        let mut stream = BitStream::with_capacity(total)?;
        for segment in &self.segments {
            if let Some(bits) = segment.bits() {
                stream.append(bits)?;
            }
        }
        Ok(stream)
    }

    /// Merged bit stream with terminator and pad codewords
    pub fn bit_stream(&mut self) -> Result<BitStream> {
        let mut stream = self.merge_bit_stream()?;
        append_padding_bits(&mut stream, tables::data_length(self.version, self.level))?;
        Ok(stream)
    }

    /// Data codewords ready for error correction
    pub fn byte_stream(&mut self) -> Result<Vec<u8>> {
        Ok(self.bit_stream()?.to_bytes())
    }

    fn raise_version(&mut self, version: u8, bits: usize) -> Result<()> {
        if self.strict_version && self.version > 0 {
            let capacity = tables::data_length(self.version, self.level) * 8;
            return Err(EncodeError::capacity_exceeded(bits, capacity));
        }
        tracing::trace!(from = self.version, to = version, "raising version");
        self.version = version;
        Ok(())
    }

    fn insert_fnc1_header(&mut self, fnc1: Fnc1) -> Result<()> {
        let header = match fnc1 {
            Fnc1::First => Segment::new(Mode::Fnc1First, &[])?,
            Fnc1::Second(appid) => Segment::new(Mode::Fnc1Second, &[appid])?,
        };
        let position = self
            .segments
            .iter()
            .take_while(|s| matches!(s.mode(), Mode::StructuredHeader | Mode::Eci))
            .count();
        reserve_one(&mut self.segments)?;
        self.segments.insert(position, header);
        Ok(())
    }

    fn push(&mut self, segment: Segment) -> Result<()> {
        reserve_one(&mut self.segments)?;
        self.segments.push(segment);
        Ok(())
    }

    pub(crate) fn push_segment(&mut self, segment: Segment) -> Result<()> {
        self.push(segment)
    }
}

/// Terminate and pad `stream` to exactly `max_words` codewords.
///
/// Up to 4 bits of slack are filled with zeros only. Otherwise a
/// terminator runs to the next byte boundary and the remaining codewords
/// alternate 0xEC, 0x11.
pub fn append_padding_bits(stream: &mut BitStream, max_words: usize) -> Result<()> {
    let bits = stream.len();
    let max_bits = max_words * 8;
    if bits > max_bits {
        return Err(EncodeError::capacity_exceeded(bits, max_bits));
    }
    if bits == max_bits {
        return Ok(());
    }
    if max_bits - bits <= 4 {
        return stream.append_num(max_bits - bits, 0);
    }

    let words = (bits + 4).div_ceil(8);
    stream.append_num(words * 8 - bits, 0)?;
    for i in 0..max_words - words {
        stream.append_num(8, if i % 2 == 0 { 0xec } else { 0x11 })?;
    }
    Ok(())
}

fn check_version(version: u8) -> Result<()> {
    if version > VERSION_MAX {
        return Err(EncodeError::invalid_input(format!(
            "version {} is out of range 0-{}",
            version, VERSION_MAX
        )));
    }
    Ok(())
}

fn reserve_one(segments: &mut Vec<Segment>) -> Result<()> {
    segments
        .try_reserve(1)
        .map_err(|_| EncodeError::allocation_failure(std::mem::size_of::<Segment>()))
}
