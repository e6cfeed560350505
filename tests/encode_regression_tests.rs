//! Encode regression tests
//!
//! Symbols are checked module by module against a known grid, and read
//! back (format word, Reed-Solomon parity, segments) for everything else.

mod common;

use common::{grid_rows, parse_segments, read_format, read_symbol};
use rust_qrencode::encoder::function_patterns::new_frame;
use rust_qrencode::encoder::mask::evaluate_mask;
use rust_qrencode::models::frame::DATA;
use rust_qrencode::{
    ECLevel, EncodeError, EncodeOptions, InputModel, MaskPattern, Mode, ModeHint, Symbol,
    encode_bytes, encode_input, encode_string,
};

const GOLDEN_NUMERIC: [&str; 21] = [
    "111111100000101111111",
    "100000100100001000001",
    "101110100011001011101",
    "101110100010001011101",
    "101110100111101011101",
    "100000101010001000001",
    "111111101010101111111",
    "000000000100000000000",
    "100101101111110100000",
    "111010011001010101100",
    "100101111011001110001",
    "001010010000111110000",
    "001000110101011101100",
    "000000001010011110110",
    "111111100011101011110",
    "100000101000001100001",
    "101110100110111001011",
    "101110101010011110011",
    "101110100111011101001",
    "100000100111100110010",
    "111111101110010111000",
];

fn hex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

fn golden_input() -> InputModel {
    let mut input = InputModel::new(1, ECLevel::M).unwrap();
    input.append(Mode::Numeric, b"4376471154038").unwrap();
    input
}

/// Rebuild the unmasked frame behind a symbol
fn unmasked_frame(symbol: &Symbol) -> rust_qrencode::models::Frame {
    let mut frame = new_frame(symbol.version().number()).unwrap();
    let mask = symbol.mask();
    for y in 0..symbol.width() {
        for x in 0..symbol.width() {
            if !frame.is_reserved(x, y) {
                let bit = symbol.is_dark(x, y) ^ mask.is_masked(x, y);
                frame.set(x, y, DATA | u8::from(bit));
            }
        }
    }
    frame
}

#[test]
fn test_golden_numeric_grid() {
    let options = EncodeOptions::new().mask(MaskPattern::Pattern7);
    let symbol = encode_input(&golden_input(), &options).unwrap();
    assert_eq!(symbol.width(), 21);
    assert_eq!(grid_rows(&symbol), GOLDEN_NUMERIC);
    assert_eq!(read_format(&symbol), (ECLevel::M, MaskPattern::Pattern7));
}

#[test]
fn test_golden_numeric_auto_mask() {
    let symbol = encode_input(&golden_input(), &EncodeOptions::new()).unwrap();
    assert_eq!(symbol.mask(), MaskPattern::Pattern3);

    let read = read_symbol(&symbol);
    assert_eq!(read.payload(), b"4376471154038");
    assert_eq!(read.segments.len(), 1);
    assert_eq!(read.segments[0].0, Mode::Numeric);
}

#[test]
fn test_golden_numeric_demerits() {
    let options = EncodeOptions::new().mask(MaskPattern::Pattern7);
    let symbol = encode_input(&golden_input(), &options).unwrap();
    let frame = unmasked_frame(&symbol);

    let demerits: Vec<u32> = MaskPattern::ALL
        .iter()
        .map(|&mask| evaluate_mask(&frame, ECLevel::M, mask).unwrap())
        .collect();
    assert_eq!(demerits, vec![1087, 1041, 1002, 999, 1102, 1095, 1067, 1051]);
}

#[test]
fn test_hello_world_codewords() {
    let symbol = encode_string("HELLO WORLD", &EncodeOptions::new().level(ECLevel::M)).unwrap();
    let read = read_symbol(&symbol);
    assert_eq!(read.version, 1);
    assert_eq!(read.level, ECLevel::M);
    assert_eq!(read.data, hex("205b0b78d172dc4d4340ec11ec11ec11"));
}

#[test]
fn test_mixed_segments() {
    let cases: [(&str, ECLevel, u8, &str); 3] = [
        (
            "http://example.com/ABC123456789",
            ECLevel::L,
            2,
            "412687474703a2f2f6578616d706c652e636f6d2027993f62048f6e462a0ec11ec11",
        ),
        (
            "Hello, world! 123456789012",
            ECLevel::M,
            2,
            "40d48656c6c6f2c20776f726c6421200c82060f6e462a06000ec11ec",
        ),
        (
            "0123456789ABCDEFabc",
            ECLevel::Q,
            2,
            "10280c566a692031cd452a1500d85898c0ec11ec11ec",
        ),
    ];
    for (text, level, version, data) in cases {
        let symbol = encode_string(text, &EncodeOptions::new().level(level)).unwrap();
        let read = read_symbol(&symbol);
        assert_eq!(read.version, version, "{}", text);
        assert_eq!(read.data, hex(data), "{}", text);
        assert_eq!(read.payload(), text.as_bytes());
    }
}

#[test]
fn test_mixed_segment_modes() {
    let options = EncodeOptions::new().level(ECLevel::Q);
    let symbol = encode_string("0123456789ABCDEFabc", &options).unwrap();
    let modes: Vec<Mode> = read_symbol(&symbol).segments.iter().map(|(m, _)| *m).collect();
    assert_eq!(modes, vec![Mode::Numeric, Mode::Alphanumeric, Mode::Byte]);
}

#[test]
fn test_case_insensitive_folds_to_alphanumeric() {
    let options = EncodeOptions::new().level(ECLevel::M).case_sensitive(false);
    let symbol = encode_string("abc123", &options).unwrap();
    let read = read_symbol(&symbol);
    assert_eq!(read.data, hex("2031cd43a17400ec11ec11ec11ec11ec"));
    assert_eq!(read.payload(), b"ABC123");
}

#[test]
fn test_every_level_reads_back() {
    let text = "Round trip through every error correction level";
    for level in ECLevel::ALL {
        let symbol = encode_string(text, &EncodeOptions::new().level(level)).unwrap();
        let read = read_symbol(&symbol);
        assert_eq!(read.level, level);
        assert_eq!(read.payload(), text.as_bytes());
    }
}

#[test]
fn test_large_versions_read_back() {
    // Multiple block groups and version information areas
    for &len in &[200usize, 700, 1500, 2900] {
        let data: Vec<u8> = (0..len).map(|i| (i * 7 + 3) as u8).collect();
        let symbol = encode_bytes(&data, &EncodeOptions::new()).unwrap();
        let read = read_symbol(&symbol);
        assert!(read.version >= 7, "{} bytes fit in version {}", len, read.version);
        assert_eq!(read.payload(), data);
    }
}

#[test]
fn test_forced_version_is_a_minimum() {
    let symbol = encode_string("SMALL", &EncodeOptions::new().version(5)).unwrap();
    assert_eq!(symbol.version().number(), 5);
    assert_eq!(symbol.width(), 37);
    assert_eq!(read_symbol(&symbol).payload(), b"SMALL");
}

#[test]
fn test_padding_alternates() {
    let symbol = encode_bytes(b"A", &EncodeOptions::new().level(ECLevel::L)).unwrap();
    let read = read_symbol(&symbol);
    // Byte header, count 1, 'A', terminator, then 0xec/0x11 filler
    assert_eq!(&read.data[..3], &[0x40, 0x14, 0x10]);
    for (i, &word) in read.data[3..].iter().enumerate() {
        assert_eq!(word, if i % 2 == 0 { 0xec } else { 0x11 });
    }
}

#[test]
fn test_eci_and_fnc1_headers() {
    let mut input = InputModel::new(0, ECLevel::M).unwrap();
    input.append_eci_header(26).unwrap();
    input.append(Mode::Byte, "żółw".as_bytes()).unwrap();
    input.set_fnc1_second(0x41);
    let symbol = encode_input(&input, &EncodeOptions::new()).unwrap();

    let read = read_symbol(&symbol);
    let modes: Vec<Mode> = read.segments.iter().map(|(m, _)| *m).collect();
    assert_eq!(modes, vec![Mode::Eci, Mode::Fnc1Second, Mode::Byte]);
    assert_eq!(read.segments[0].1, 26u32.to_be_bytes());
    assert_eq!(read.segments[1].1, vec![0x41]);
    assert_eq!(read.payload(), "żółw".as_bytes());
}

#[test]
fn test_large_eci_assignment() {
    let mut input = InputModel::new(0, ECLevel::L).unwrap();
    input.append_eci_header(999_999).unwrap();
    input.append(Mode::Byte, b"x").unwrap();
    let symbol = encode_input(&input, &EncodeOptions::new()).unwrap();
    let read = read_symbol(&symbol);
    assert_eq!(read.segments[0], (Mode::Eci, 999_999u32.to_be_bytes().to_vec()));
}

#[test]
fn test_fnc1_first() {
    let mut input = InputModel::new(0, ECLevel::L).unwrap();
    input.append(Mode::Numeric, b"0101234567890128").unwrap();
    input.set_fnc1_first();
    let symbol = encode_input(&input, &EncodeOptions::new()).unwrap();
    let read = read_symbol(&symbol);
    assert_eq!(read.segments[0].0, Mode::Fnc1First);
    assert_eq!(read.payload(), b"0101234567890128");
}

#[test]
fn test_strict_version_overflow() {
    let options = EncodeOptions::new()
        .version(1)
        .level(ECLevel::H)
        .mode(ModeHint::Byte)
        .strict_version(true);
    assert!(encode_bytes(&[0x55; 7], &options).is_ok());
    assert!(matches!(
        encode_bytes(&[0x55; 8], &options),
        Err(EncodeError::CapacityExceeded { .. })
    ));
}

#[test]
fn test_terminator_stops_parsing() {
    // Numeric "1", terminator, then pad bytes that must not be read as segments
    let data = [0x10, 0x04, 0x40, 0xec, 0x11];
    let segments = parse_segments(&data, 1);
    assert_eq!(segments, vec![(Mode::Numeric, b"1".to_vec())]);
}
