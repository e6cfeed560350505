//! Minimal symbol reader used to check encoder output.
//!
//! Reads the format word from the grid, unmasks the data modules, walks
//! them in placement order, de-interleaves the blocks, verifies every
//! block with the Reed-Solomon syndromes and parses the segments.

#![allow(dead_code)]

use rust_qrencode::encoder::bch::BchEncoder;
use rust_qrencode::encoder::filler::FrameFiller;
use rust_qrencode::encoder::function_patterns::new_frame;
use rust_qrencode::encoder::modes::alphanumeric::AlphanumericEncoder;
use rust_qrencode::encoder::reed_solomon::ReedSolomonEncoder;
use rust_qrencode::encoder::tables;
use qrcodegen::{Mask, QrCode, QrCodeEcc, QrSegment};
use rust_qrencode::{ECLevel, MaskPattern, Mode, Symbol};

/// Everything read back from one symbol
#[derive(Debug)]
pub struct ReadSymbol {
    pub version: u8,
    pub level: ECLevel,
    pub mask: MaskPattern,
    /// Data codewords in block order, padding included
    pub data: Vec<u8>,
    pub segments: Vec<(Mode, Vec<u8>)>,
}

impl ReadSymbol {
    /// Concatenated payload of the Numeric, Alphanumeric and Byte segments
    pub fn payload(&self) -> Vec<u8> {
        self.segments
            .iter()
            .filter(|(mode, _)| matches!(mode, Mode::Numeric | Mode::Alphanumeric | Mode::Byte))
            .flat_map(|(_, data)| data.iter().copied())
            .collect()
    }
}

pub fn read_symbol(symbol: &Symbol) -> ReadSymbol {
    let width = symbol.width();
    let version = ((width - 17) / 4) as u8;
    assert_eq!(version, symbol.version().number());

    let (level, mask) = read_format(symbol);
    let codewords = read_codewords(symbol, version, mask);
    let data = deinterleave(&codewords, version, level);
    let segments = parse_segments(&data, version);
    ReadSymbol {
        version,
        level,
        mask,
        data,
        segments,
    }
}

/// Look up (level, mask) from both format copies
pub fn read_format(symbol: &Symbol) -> (ECLevel, MaskPattern) {
    let width = symbol.width();
    let mut first = 0u16;
    let mut second = 0u16;
    for i in 0..8 {
        if symbol.is_dark(width - 1 - i, 8) {
            second |= 1 << i;
        }
        let y = if i < 6 { i } else { i + 1 };
        if symbol.is_dark(8, y) {
            first |= 1 << i;
        }
    }
    for i in 0..7 {
        if symbol.is_dark(8, width - 7 + i) {
            second |= 1 << (8 + i);
        }
        let x = if i == 0 { 7 } else { 6 - i };
        if symbol.is_dark(x, 8) {
            first |= 1 << (8 + i);
        }
    }
    assert_eq!(first, second, "format copies disagree");

    for level in ECLevel::ALL {
        for mask in MaskPattern::ALL {
            if BchEncoder::format_info(level, mask) == first {
                return (level, mask);
            }
        }
    }
    panic!("unknown format word {:#06x}", first);
}

fn read_codewords(symbol: &Symbol, version: u8, mask: MaskPattern) -> Vec<u8> {
    let template = new_frame(version).unwrap();
    let mut filler = FrameFiller::new(template.width());
    let total = tables::total_codewords(version);
    let mut codewords = Vec::with_capacity(total);
    for _ in 0..total {
        let mut byte = 0u8;
        for _ in 0..8 {
            let (x, y) = filler.next(&template).expect("grid exhausted");
            let bit = symbol.is_dark(x, y) ^ mask.is_masked(x, y);
            byte = (byte << 1) | u8::from(bit);
        }
        codewords.push(byte);
    }
    codewords
}

/// Undo the interleaving and check every block's parity
fn deinterleave(codewords: &[u8], version: u8, level: ECLevel) -> Vec<u8> {
    let spec = tables::ecc_spec(version, level);
    let sizes: Vec<usize> = std::iter::repeat_n(spec.group1_data, spec.group1_blocks)
        .chain(std::iter::repeat_n(spec.group2_data, spec.group2_blocks))
        .collect();
    let mut blocks: Vec<Vec<u8>> = sizes.iter().map(|&n| Vec::with_capacity(n)).collect();

    let mut iter = codewords.iter().copied();
    let longest = sizes.iter().copied().max().unwrap_or(0);
    for col in 0..longest {
        for (block, &size) in blocks.iter_mut().zip(&sizes) {
            if col < size {
                block.push(iter.next().unwrap());
            }
        }
    }
    for _ in 0..spec.ecc_per_block {
        for block in blocks.iter_mut() {
            block.push(iter.next().unwrap());
        }
    }

    let rs = ReedSolomonEncoder::new(spec.ecc_per_block).unwrap();
    let mut data = Vec::new();
    for (block, &size) in blocks.iter().zip(&sizes) {
        assert!(
            rs.syndromes(block).iter().all(|&s| s == 0),
            "block failed the parity check"
        );
        data.extend_from_slice(&block[..size]);
    }
    data
}

struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl BitReader<'_> {
    fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    fn read(&mut self, bits: usize) -> u32 {
        let mut value = 0;
        for _ in 0..bits {
            let bit = (self.data[self.pos / 8] >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.pos += 1;
        }
        value
    }
}

/// Parse segments up to the terminator
pub fn parse_segments(data: &[u8], version: u8) -> Vec<(Mode, Vec<u8>)> {
    let mut reader = BitReader { data, pos: 0 };
    let mut segments = Vec::new();
    while reader.remaining() >= 4 {
        let mode = match reader.read(4) {
            0 => break,
            0b0001 => Mode::Numeric,
            0b0010 => Mode::Alphanumeric,
            0b0100 => Mode::Byte,
            0b0011 => Mode::StructuredHeader,
            0b0111 => Mode::Eci,
            0b0101 => Mode::Fnc1First,
            0b1001 => Mode::Fnc1Second,
            other => panic!("unexpected mode indicator {:#06b}", other),
        };
        let payload = match mode {
            Mode::Numeric => {
                let count = reader.read(tables::length_indicator(mode, version)) as usize;
                let mut digits = Vec::with_capacity(count);
                let mut left = count;
                while left > 0 {
                    let take = left.min(3);
                    let bits = [0, 4, 7, 10][take];
                    let value = reader.read(bits);
                    digits.extend(format!("{:0width$}", value, width = take).bytes());
                    left -= take;
                }
                digits
            }
            Mode::Alphanumeric => {
                let count = reader.read(tables::length_indicator(mode, version)) as usize;
                let table: Vec<u8> = (0..=255u8)
                    .filter(|&b| AlphanumericEncoder::is_valid(b))
                    .collect();
                let mut sorted = table.clone();
                sorted.sort_by_key(|&b| AlphanumericEncoder::index_of(b));
                let mut chars = Vec::with_capacity(count);
                let mut left = count;
                while left > 0 {
                    if left >= 2 {
                        let value = reader.read(11) as usize;
                        chars.push(sorted[value / 45]);
                        chars.push(sorted[value % 45]);
                        left -= 2;
                    } else {
                        chars.push(sorted[reader.read(6) as usize]);
                        left -= 1;
                    }
                }
                chars
            }
            Mode::Byte => {
                let count = reader.read(tables::length_indicator(mode, version)) as usize;
                (0..count).map(|_| reader.read(8) as u8).collect()
            }
            Mode::StructuredHeader => {
                let index = reader.read(4) as u8 + 1;
                let count = reader.read(4) as u8 + 1;
                let parity = reader.read(8) as u8;
                vec![count, index, parity]
            }
            Mode::Eci => {
                let first = reader.read(8);
                let assignment = if first & 0x80 == 0 {
                    first
                } else if first & 0xc0 == 0x80 {
                    ((first & 0x3f) << 8) | reader.read(8)
                } else {
                    ((first & 0x1f) << 16) | reader.read(16)
                };
                assignment.to_be_bytes().to_vec()
            }
            Mode::Fnc1First => Vec::new(),
            Mode::Fnc1Second => vec![reader.read(8) as u8],
        };
        segments.push((mode, payload));
    }
    segments
}

/// Dark modules of a symbol as '0'/'1' rows
pub fn grid_rows(symbol: &Symbol) -> Vec<String> {
    symbol
        .to_rows()
        .iter()
        .map(|row| row.iter().map(|&dark| if dark { '1' } else { '0' }).collect())
        .collect()
}

/// Same payload rebuilt by the qrcodegen crate at the symbol's version,
/// level and mask. `mode` picks the single segment qrcodegen is given.
pub fn reference_code(symbol: &Symbol, mode: Mode, data: &[u8]) -> QrCode {
    let text = std::str::from_utf8(data);
    let segment = match mode {
        Mode::Numeric => QrSegment::make_numeric(text.unwrap()),
        Mode::Alphanumeric => QrSegment::make_alphanumeric(text.unwrap()),
        Mode::Byte => QrSegment::make_bytes(data),
        other => panic!("no reference segment for {:?}", other),
    };
    let ecl = match symbol.level() {
        ECLevel::L => QrCodeEcc::Low,
        ECLevel::M => QrCodeEcc::Medium,
        ECLevel::Q => QrCodeEcc::Quartile,
        ECLevel::H => QrCodeEcc::High,
    };
    let version = qrcodegen::Version::new(symbol.version().number());
    let mask = Mask::new(symbol.mask().index() as u8);
    QrCode::encode_segments_advanced(&[segment], ecl, version, version, Some(mask), false)
        .unwrap()
}

/// Coordinates of every module that differs from the qrcodegen rendition
pub fn reference_mismatches(symbol: &Symbol, mode: Mode, data: &[u8]) -> Vec<(usize, usize)> {
    let reference = reference_code(symbol, mode, data);
    assert_eq!(reference.size() as usize, symbol.width());
    let width = symbol.width();
    (0..width)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .filter(|&(x, y)| symbol.is_dark(x, y) != reference.get_module(x as i32, y as i32))
        .collect()
}

pub fn assert_matches_reference(symbol: &Symbol, mode: Mode, data: &[u8]) {
    let mismatches = reference_mismatches(symbol, mode, data);
    assert!(
        mismatches.is_empty(),
        "version {} {:?} mask {:?}: {} modules differ, first at {:?}",
        symbol.version().number(),
        symbol.level(),
        symbol.mask(),
        mismatches.len(),
        mismatches[0]
    );
}
