//! BCH-coded format and version information words.
//!
//! Both lookup tables are computed at compile time from the generator
//! polynomials.

use crate::models::{ECLevel, MaskPattern};

// Index: [level][mask], BCH(15,5) already XORed with 0x5412
static FORMAT_INFO: [[u16; 8]; 4] = build_format_table();

// Index: version - 7, BCH(18,6)
static VERSION_PATTERN: [u32; 34] = build_version_table();

const FORMAT_GENERATOR: u32 = 0x537;
const FORMAT_MASK: u32 = 0x5412;
const VERSION_GENERATOR: u32 = 0x1f25;

/// BCH encoder for the two metadata words of a symbol
pub struct BchEncoder;

impl BchEncoder {
    /// 15-bit format information for (level, mask)
    pub fn format_info(level: ECLevel, mask: MaskPattern) -> u16 {
        FORMAT_INFO[level.index()][mask.index()]
    }

    /// 18-bit version information, `None` below version 7
    pub fn version_info(version: u8) -> Option<u32> {
        if !(7..=40).contains(&version) {
            return None;
        }
        Some(VERSION_PATTERN[version as usize - 7])
    }

    /// Compute the format word from scratch
    pub const fn compute_format(level: ECLevel, mask: MaskPattern) -> u16 {
        let data = ((level.format_bits() as u32) << 3) | mask.index() as u32;
        let word = (data << 10) | remainder(data, FORMAT_GENERATOR, 10);
        (word ^ FORMAT_MASK) as u16
    }

    /// Compute the version word from scratch
    pub const fn compute_version(version: u8) -> u32 {
        let data = version as u32;
        (data << 12) | remainder(data, VERSION_GENERATOR, 12)
    }
}

/// Polynomial remainder of `data * x^degree` modulo `generator`
const fn remainder(data: u32, generator: u32, degree: u32) -> u32 {
    let mut rem = data;
    let mut i = 0;
    while i < degree {
        rem = (rem << 1) ^ ((rem >> (degree - 1)) * generator);
        i += 1;
    }
    rem & ((1 << degree) - 1)
}

const fn build_format_table() -> [[u16; 8]; 4] {
    let mut table = [[0; 8]; 4];
    let mut l = 0;
    while l < 4 {
        let mut m = 0;
        while m < 8 {
            let level = ECLevel::ALL[l];
            table[level.index()][m] = BchEncoder::compute_format(level, MaskPattern::ALL[m]);
            m += 1;
        }
        l += 1;
    }
    table
}

const fn build_version_table() -> [u32; 34] {
    let mut table = [0; 34];
    let mut i = 0;
    while i < 34 {
        table[i] = BchEncoder::compute_version(i as u8 + 7);
        i += 1;
    }
    table
}
