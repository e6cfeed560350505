//! rust_qrencode - QR Code symbol encoder
//!
//! Encodes text or binary data into ISO/IEC 18004 QR Code symbols
//! (versions 1-40, levels L/M/Q/H), including ECI and FNC1 headers and
//! structured append across up to 16 symbols. The result is a module
//! matrix; rendering it is left to the caller.
//!
//! ```
//! use rust_qrencode::{encode_string, ECLevel, EncodeOptions};
//!
//! let symbol = encode_string("HELLO WORLD", &EncodeOptions::new().level(ECLevel::M)).unwrap();
//! assert_eq!(symbol.width(), 21);
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Encoder options (version, level, mode and mask policy)
pub mod config;
/// QR code encoding modules (segmentation, error correction, placement, masking)
pub mod encoder;
/// Error type and result alias
pub mod error;
/// Core data structures (Symbol, Frame, BitMatrix, Version, etc.)
pub mod models;
/// Utility types (buffer pools)
pub mod utils;

pub use config::{EncodeOptions, ModeHint};
pub use encoder::input::InputModel;
pub use encoder::segment::Mode;
pub use encoder::structured::StructuredSet;
pub use error::{EncodeError, Result};
pub use models::{BitMatrix, ECLevel, MaskPattern, Symbol, Version};
pub use utils::memory_pool::BufferPool;

use encoder::qr_encoder::QrEncoder;
use encoder::split::split_to_input;

/// Encode text into a single symbol
///
/// # Arguments
/// * `text` - Payload; segmented into Numeric/Alphanumeric/Byte runs unless
///   `options.mode` forces one mode
/// * `options` - Version, level, mode and mask policy
///
/// # Returns
/// The finished symbol, or an error when the text is empty, invalid for a
/// forced mode, or too large for the permitted versions
pub fn encode_string(text: &str, options: &EncodeOptions) -> Result<Symbol> {
    let input = build_input(text.as_bytes(), options, true)?;
    QrEncoder::encode(&input, options)
}

/// Encode binary data into a single symbol
///
/// With `ModeHint::Auto` the data is stored as one Byte segment.
pub fn encode_bytes(data: &[u8], options: &EncodeOptions) -> Result<Symbol> {
    let input = build_input(data, options, false)?;
    QrEncoder::encode(&input, options)
}

/// Encode a prepared input model
///
/// Only the mask policy of `options` applies; version and level come from
/// the input.
pub fn encode_input(input: &InputModel, options: &EncodeOptions) -> Result<Symbol> {
    QrEncoder::encode(input, options)
}

/// Encode binary data, reusing scratch buffers from `pool`
///
/// # Arguments
/// * `data` - Payload bytes
/// * `options` - Version, level, mode and mask policy
/// * `pool` - Buffer pool kept by the caller across calls
///
/// # Returns
/// Same symbol as [`encode_bytes`]
pub fn encode_with_pool(
    data: &[u8],
    options: &EncodeOptions,
    pool: &mut BufferPool,
) -> Result<Symbol> {
    let input = build_input(data, options, false)?;
    QrEncoder::encode_with_pool(&input, options, pool)
}

/// Encode binary data as a structured-append series
///
/// `options.version` must be set; every symbol uses that version.
pub fn encode_structured(data: &[u8], options: &EncodeOptions) -> Result<Vec<Symbol>> {
    structured(data, options, false)
}

/// Encode text as a structured-append series
///
/// # Arguments
/// * `text` - Payload, segmented as in [`encode_string`]
/// * `options` - Options with a non-zero version
///
/// # Returns
/// One symbol per part, in order (at most 16)
pub fn encode_string_structured(text: &str, options: &EncodeOptions) -> Result<Vec<Symbol>> {
    structured(text.as_bytes(), options, true)
}

fn structured(data: &[u8], options: &EncodeOptions, text: bool) -> Result<Vec<Symbol>> {
    if options.version == 0 {
        return Err(EncodeError::invalid_input(
            "structured append needs an explicit version",
        ));
    }

    // Step 1: Build the whole payload as one input
    let input = build_input(data, options, text)?;

    // Step 2: Split at the fixed version and add the headers
    let set = input.split_to_structured()?;

    // Step 3: Encode every part
    QrEncoder::encode_structured(&set, options)
}

fn build_input(data: &[u8], options: &EncodeOptions, text: bool) -> Result<InputModel> {
    if data.is_empty() {
        return Err(EncodeError::invalid_input("empty data"));
    }
    let mut input = InputModel::new(options.version, options.level)?;
    input.set_strict_version(options.strict_version);

    match options.mode {
        ModeHint::Auto if text => split_to_input(data, &mut input, options.case_sensitive)?,
        ModeHint::Auto | ModeHint::Byte => input.append(Mode::Byte, data)?,
        ModeHint::Numeric | ModeHint::Alphanumeric => {
            let mode = if options.mode == ModeHint::Numeric {
                Mode::Numeric
            } else {
                Mode::Alphanumeric
            };
            if options.case_sensitive {
                input.append(mode, data)?;
            } else {
                input.append(mode, &data.to_ascii_uppercase())?;
            }
        }
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_string_picks_smallest_version() {
        let symbol = encode_string("01234567", &EncodeOptions::new().level(ECLevel::H)).unwrap();
        assert_eq!(symbol.version(), Version::MIN);
        assert_eq!(symbol.width(), 21);
        assert_eq!(symbol.level(), ECLevel::H);
    }

    #[test]
    fn test_empty_payload() {
        let options = EncodeOptions::new();
        assert!(matches!(
            encode_string("", &options),
            Err(EncodeError::InvalidInput { .. })
        ));
        assert!(matches!(
            encode_bytes(&[], &options),
            Err(EncodeError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_forced_modes() {
        let numeric = EncodeOptions::new().mode(ModeHint::Numeric);
        assert!(encode_string("12345", &numeric).is_ok());
        assert!(matches!(
            encode_string("12a45", &numeric),
            Err(EncodeError::InvalidInput { .. })
        ));

        let alnum = EncodeOptions::new().mode(ModeHint::Alphanumeric);
        assert!(encode_string("hello", &alnum).is_err());
        assert!(encode_string("hello", &alnum.clone().case_sensitive(false)).is_ok());
    }

    #[test]
    fn test_capacity_exceeded() {
        // 2954 bytes overflow version 40-L (2953 bytes with a 16-bit count)
        let data = vec![0xa5; 2954];
        assert!(matches!(
            encode_bytes(&data, &EncodeOptions::new()),
            Err(EncodeError::CapacityExceeded { .. })
        ));
        let data = vec![0xa5; 2953];
        let symbol = encode_bytes(&data, &EncodeOptions::new()).unwrap();
        assert_eq!(symbol.version(), Version::MAX);
    }

    #[test]
    fn test_strict_version() {
        let text = "this text needs more than version 1";
        let lenient = encode_string(text, &EncodeOptions::new().version(1)).unwrap();
        assert!(lenient.version().number() > 1);

        let strict = EncodeOptions::new().version(1).strict_version(true);
        assert!(matches!(
            encode_string(text, &strict),
            Err(EncodeError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_structured_needs_version() {
        assert!(matches!(
            encode_structured(b"abc", &EncodeOptions::new()),
            Err(EncodeError::InvalidInput { .. })
        ));
        let symbols = encode_structured(&[0x41; 40], &EncodeOptions::new().version(1)).unwrap();
        assert_eq!(symbols.len(), 3);
    }

    #[test]
    fn test_pool_and_plain_agree() {
        let options = EncodeOptions::new().level(ECLevel::Q);
        let mut pool = BufferPool::new();
        let pooled = encode_with_pool(b"pooled", &options, &mut pool).unwrap();
        assert_eq!(pooled, encode_bytes(b"pooled", &options).unwrap());
    }
}
