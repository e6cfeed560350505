//! Per-mode payload encoders
//!
//! Each encoder validates its character set, estimates the payload size
//! in bits and appends the payload (without mode/length header):
//! - Numeric: digits 0-9, three per 10 bits
//! - Alphanumeric: 45-character set, two per 11 bits
//! - Byte: any 8-bit data

/// Alphanumeric mode
pub mod alphanumeric;
/// 8-bit byte mode
pub mod byte;
/// Numeric mode
pub mod numeric;
