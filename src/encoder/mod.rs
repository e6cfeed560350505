//! QR code encoding modules
//!
//! This module turns payload bytes into a finished module grid:
//! - Mode segmentation and bit stream assembly
//! - Version resolution and padding
//! - Reed-Solomon blocks and interleaving
//! - Frame construction, module placement and masking

/// Bit buffer, most significant bit first
pub mod bitstream;
/// Error correction blocks and interleaved codeword order
pub mod blocks;
/// BCH words for format and version information
pub mod bch;
/// Zigzag placement cursor
pub mod filler;
/// Frame templates (finder/timing/alignment/format/version areas)
pub mod function_patterns;
/// Input model and version resolution
pub mod input;
/// Mask patterns, penalty scoring and mask selection
pub mod mask;
/// Per-mode payload encoders (numeric, alphanumeric, byte)
pub mod modes;
/// Main QR encoder that orchestrates the encoding pipeline
pub mod qr_encoder;
/// Reed-Solomon parity over GF(256)
pub mod reed_solomon;
/// Segments and mode indicators
pub mod segment;
/// Greedy mode segmentation of text
pub mod split;
/// Structured append sets
pub mod structured;
/// Capacity tables (codewords, ECC blocks, length indicators)
pub mod tables;
