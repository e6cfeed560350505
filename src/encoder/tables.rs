//! Symbol capacity tables (ISO/IEC 18004, Model 2).

use crate::encoder::segment::Mode;
use crate::error::{EncodeError, Result};
use crate::models::ECLevel;

/// Largest symbol version
pub const VERSION_MAX: u8 = 40;

/// Raw capacity of one version
#[derive(Debug, Clone, Copy)]
struct Capacity {
    width: usize,
    words: usize,
    remainder: usize,
}

impl Capacity {
    const fn new(width: usize, words: usize, remainder: usize) -> Self {
        Self {
            width,
            words,
            remainder,
        }
    }
}

/// Block structure of one (version, level) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EccSpec {
    /// Number of blocks in group 1
    pub group1_blocks: usize,
    /// Data codewords per group 1 block
    pub group1_data: usize,
    /// Error correction codewords per block (both groups)
    pub ecc_per_block: usize,
    /// Number of blocks in group 2 (0 when there is a single group)
    pub group2_blocks: usize,
    /// Data codewords per group 2 block
    pub group2_data: usize,
}

impl EccSpec {
    /// Total number of RS blocks
    pub fn block_count(&self) -> usize {
        self.group1_blocks + self.group2_blocks
    }

    /// Total data codewords
    pub fn data_codewords(&self) -> usize {
        self.group1_blocks * self.group1_data + self.group2_blocks * self.group2_data
    }

    /// Total error correction codewords
    pub fn ecc_codewords(&self) -> usize {
        self.block_count() * self.ecc_per_block
    }
}

// Index: [version], width / total codewords / remainder bits
static CAPACITY: [Capacity; 41] = [
    Capacity::new(0, 0, 0),
    Capacity::new(21, 26, 0), // 1
    Capacity::new(25, 44, 7), // 2
    Capacity::new(29, 70, 7), // 3
    Capacity::new(33, 100, 7), // 4
    Capacity::new(37, 134, 7), // 5
    Capacity::new(41, 172, 7), // 6
    Capacity::new(45, 196, 0), // 7
    Capacity::new(49, 242, 0), // 8
    Capacity::new(53, 292, 0), // 9
    Capacity::new(57, 346, 0), // 10
    Capacity::new(61, 404, 0), // 11
    Capacity::new(65, 466, 0), // 12
    Capacity::new(69, 532, 0), // 13
    Capacity::new(73, 581, 3), // 14
    Capacity::new(77, 655, 3), // 15
    Capacity::new(81, 733, 3), // 16
    Capacity::new(85, 815, 3), // 17
    Capacity::new(89, 901, 3), // 18
    Capacity::new(93, 991, 3), // 19
    Capacity::new(97, 1085, 3), // 20
    Capacity::new(101, 1156, 4), // 21
    Capacity::new(105, 1258, 4), // 22
    Capacity::new(109, 1364, 4), // 23
    Capacity::new(113, 1474, 4), // 24
    Capacity::new(117, 1588, 4), // 25
    Capacity::new(121, 1706, 4), // 26
    Capacity::new(125, 1828, 4), // 27
    Capacity::new(129, 1921, 3), // 28
    Capacity::new(133, 2051, 3), // 29
    Capacity::new(137, 2185, 3), // 30
    Capacity::new(141, 2323, 3), // 31
    Capacity::new(145, 2465, 3), // 32
    Capacity::new(149, 2611, 3), // 33
    Capacity::new(153, 2761, 3), // 34
    Capacity::new(157, 2876, 0), // 35
    Capacity::new(161, 3034, 0), // 36
    Capacity::new(165, 3196, 0), // 37
    Capacity::new(169, 3362, 0), // 38
    Capacity::new(173, 3532, 0), // 39
    Capacity::new(177, 3706, 0), // 40
];

// Index: [version][level], {group1 blocks, data, ecc per block, group2 blocks, data}
static ECC_SPEC: [[[u8; 5]; 4]; 41] = [
    [[0; 5]; 4],
    [[1, 19, 7, 0, 0], [1, 16, 10, 0, 0], [1, 13, 13, 0, 0], [1, 9, 17, 0, 0]], // 1
    [[1, 34, 10, 0, 0], [1, 28, 16, 0, 0], [1, 22, 22, 0, 0], [1, 16, 28, 0, 0]], // 2
    [[1, 55, 15, 0, 0], [1, 44, 26, 0, 0], [2, 17, 18, 0, 0], [2, 13, 22, 0, 0]], // 3
    [[1, 80, 20, 0, 0], [2, 32, 18, 0, 0], [2, 24, 26, 0, 0], [4, 9, 16, 0, 0]], // 4
    [[1, 108, 26, 0, 0], [2, 43, 24, 0, 0], [2, 15, 18, 2, 16], [2, 11, 22, 2, 12]], // 5
    [[2, 68, 18, 0, 0], [4, 27, 16, 0, 0], [4, 19, 24, 0, 0], [4, 15, 28, 0, 0]], // 6
    [[2, 78, 20, 0, 0], [4, 31, 18, 0, 0], [2, 14, 18, 4, 15], [4, 13, 26, 1, 14]], // 7
    [[2, 97, 24, 0, 0], [2, 38, 22, 2, 39], [4, 18, 22, 2, 19], [4, 14, 26, 2, 15]], // 8
    [[2, 116, 30, 0, 0], [3, 36, 22, 2, 37], [4, 16, 20, 4, 17], [4, 12, 24, 4, 13]], // 9
    [[2, 68, 18, 2, 69], [4, 43, 26, 1, 44], [6, 19, 24, 2, 20], [6, 15, 28, 2, 16]], // 10
    [[4, 81, 20, 0, 0], [1, 50, 30, 4, 51], [4, 22, 28, 4, 23], [3, 12, 24, 8, 13]], // 11
    [[2, 92, 24, 2, 93], [6, 36, 22, 2, 37], [4, 20, 26, 6, 21], [7, 14, 28, 4, 15]], // 12
    [[4, 107, 26, 0, 0], [8, 37, 22, 1, 38], [8, 20, 24, 4, 21], [12, 11, 22, 4, 12]], // 13
    [[3, 115, 30, 1, 116], [4, 40, 24, 5, 41], [11, 16, 20, 5, 17], [11, 12, 24, 5, 13]], // 14
    [[5, 87, 22, 1, 88], [5, 41, 24, 5, 42], [5, 24, 30, 7, 25], [11, 12, 24, 7, 13]], // 15
    [[5, 98, 24, 1, 99], [7, 45, 28, 3, 46], [15, 19, 24, 2, 20], [3, 15, 30, 13, 16]], // 16
    [[1, 107, 28, 5, 108], [10, 46, 28, 1, 47], [1, 22, 28, 15, 23], [2, 14, 28, 17, 15]], // 17
    [[5, 120, 30, 1, 121], [9, 43, 26, 4, 44], [17, 22, 28, 1, 23], [2, 14, 28, 19, 15]], // 18
    [[3, 113, 28, 4, 114], [3, 44, 26, 11, 45], [17, 21, 26, 4, 22], [9, 13, 26, 16, 14]], // 19
    [[3, 107, 28, 5, 108], [3, 41, 26, 13, 42], [15, 24, 30, 5, 25], [15, 15, 28, 10, 16]], // 20
    [[4, 116, 28, 4, 117], [17, 42, 26, 0, 0], [17, 22, 28, 6, 23], [19, 16, 30, 6, 17]], // 21
    [[2, 111, 28, 7, 112], [17, 46, 28, 0, 0], [7, 24, 30, 16, 25], [34, 13, 24, 0, 0]], // 22
    [[4, 121, 30, 5, 122], [4, 47, 28, 14, 48], [11, 24, 30, 14, 25], [16, 15, 30, 14, 16]], // 23
    [[6, 117, 30, 4, 118], [6, 45, 28, 14, 46], [11, 24, 30, 16, 25], [30, 16, 30, 2, 17]], // 24
    [[8, 106, 26, 4, 107], [8, 47, 28, 13, 48], [7, 24, 30, 22, 25], [22, 15, 30, 13, 16]], // 25
    [[10, 114, 28, 2, 115], [19, 46, 28, 4, 47], [28, 22, 28, 6, 23], [33, 16, 30, 4, 17]], // 26
    [[8, 122, 30, 4, 123], [22, 45, 28, 3, 46], [8, 23, 30, 26, 24], [12, 15, 30, 28, 16]], // 27
    [[3, 117, 30, 10, 118], [3, 45, 28, 23, 46], [4, 24, 30, 31, 25], [11, 15, 30, 31, 16]], // 28
    [[7, 116, 30, 7, 117], [21, 45, 28, 7, 46], [1, 23, 30, 37, 24], [19, 15, 30, 26, 16]], // 29
    [[5, 115, 30, 10, 116], [19, 47, 28, 10, 48], [15, 24, 30, 25, 25], [23, 15, 30, 25, 16]], // 30
    [[13, 115, 30, 3, 116], [2, 46, 28, 29, 47], [42, 24, 30, 1, 25], [23, 15, 30, 28, 16]], // 31
    [[17, 115, 30, 0, 0], [10, 46, 28, 23, 47], [10, 24, 30, 35, 25], [19, 15, 30, 35, 16]], // 32
    [[17, 115, 30, 1, 116], [14, 46, 28, 21, 47], [29, 24, 30, 19, 25], [11, 15, 30, 46, 16]], // 33
    [[13, 115, 30, 6, 116], [14, 46, 28, 23, 47], [44, 24, 30, 7, 25], [59, 16, 30, 1, 17]], // 34
    [[12, 121, 30, 7, 122], [12, 47, 28, 26, 48], [39, 24, 30, 14, 25], [22, 15, 30, 41, 16]], // 35
    [[6, 121, 30, 14, 122], [6, 47, 28, 34, 48], [46, 24, 30, 10, 25], [2, 15, 30, 64, 16]], // 36
    [[17, 122, 30, 4, 123], [29, 46, 28, 14, 47], [49, 24, 30, 10, 25], [24, 15, 30, 46, 16]], // 37
    [[4, 122, 30, 18, 123], [13, 46, 28, 32, 47], [48, 24, 30, 14, 25], [42, 15, 30, 32, 16]], // 38
    [[20, 117, 30, 4, 118], [40, 47, 28, 7, 48], [43, 24, 30, 22, 25], [10, 15, 30, 67, 16]], // 39
    [[19, 118, 30, 6, 119], [18, 47, 28, 31, 48], [34, 24, 30, 34, 25], [20, 15, 30, 61, 16]], // 40
];

// Index: [mode][version range 1-9, 10-26, 27-40]
const LENGTH_INDICATOR: [[usize; 3]; 3] = [
    [10, 12, 14], // Numeric
    [9, 11, 13],  // Alphanumeric
    [8, 16, 16],  // Byte
];

fn capacity(version: u8) -> &'static Capacity {
    &CAPACITY[(version as usize).min(VERSION_MAX as usize)]
}

/// Width of the symbol in modules
pub fn width(version: u8) -> usize {
    capacity(version).width
}

/// Total codewords (data + ecc) of a version
pub fn total_codewords(version: u8) -> usize {
    capacity(version).words
}

/// Filler bits left over after the last codeword
pub fn remainder(version: u8) -> usize {
    capacity(version).remainder
}

/// Block structure for (version, level)
pub fn ecc_spec(version: u8, level: ECLevel) -> EccSpec {
    let [b1, d1, ecc, b2, d2] =
        ECC_SPEC[(version as usize).min(VERSION_MAX as usize)][level.index()];
    EccSpec {
        group1_blocks: b1 as usize,
        group1_data: d1 as usize,
        ecc_per_block: ecc as usize,
        group2_blocks: b2 as usize,
        group2_data: d2 as usize,
    }
}

/// Data codewords available at (version, level)
pub fn data_length(version: u8, level: ECLevel) -> usize {
    ecc_spec(version, level).data_codewords()
}

/// Error correction codewords at (version, level)
pub fn ecc_length(version: u8, level: ECLevel) -> usize {
    ecc_spec(version, level).ecc_codewords()
}

/// Smallest version holding `size` data codewords at `level`
pub fn minimum_version(size: usize, level: ECLevel) -> Result<u8> {
    (1..=VERSION_MAX)
        .find(|&version| data_length(version, level) >= size)
        .ok_or_else(|| {
            EncodeError::capacity_exceeded(size * 8, data_length(VERSION_MAX, level) * 8)
        })
}

/// Bits of the character count field for `mode` at `version`.
///
/// Header-only modes have no count field and return 0. Version 0 is
/// treated as the smallest range.
pub fn length_indicator(mode: Mode, version: u8) -> usize {
    let row = match mode {
        Mode::Numeric => 0,
        Mode::Alphanumeric => 1,
        Mode::Byte => 2,
        _ => return 0,
    };
    let range = match version {
        0..=9 => 0,
        10..=26 => 1,
        _ => 2,
    };
    LENGTH_INDICATOR[row][range]
}

/// Largest character count one segment of `mode` can declare at `version`
pub fn maximum_words(mode: Mode, version: u8) -> usize {
    match length_indicator(mode, version) {
        0 => 0,
        bits => (1 << bits) - 1,
    }
}
