//! Structured append tests
//!
//! Every symbol of a series is read back; the headers must agree on the
//! count and parity and the parts must rejoin into the original payload.

mod common;

use common::{ReadSymbol, read_symbol};
use rust_qrencode::{
    ECLevel, EncodeError, EncodeOptions, InputModel, Mode, StructuredSet, encode_input,
    encode_string_structured, encode_structured,
};

fn header(read: &ReadSymbol) -> (u8, u8, u8) {
    let (mode, data) = &read.segments[0];
    assert_eq!(*mode, Mode::StructuredHeader);
    (data[0], data[1], data[2])
}

#[test]
fn test_two_symbol_series() {
    let data: Vec<u8> = (0u8..30).map(|i| i.wrapping_mul(37)).collect();
    let parity = data.iter().fold(0, |acc, b| acc ^ b);

    let options = EncodeOptions::new().version(1).level(ECLevel::L);
    let symbols = encode_structured(&data, &options).unwrap();
    assert_eq!(symbols.len(), 2);

    let reads: Vec<ReadSymbol> = symbols.iter().map(read_symbol).collect();
    assert_eq!(header(&reads[0]), (2, 1, parity));
    assert_eq!(header(&reads[1]), (2, 2, parity));

    // 1-L holds 152 bits: 20 header bits and 12 byte-segment bits leave 15 bytes
    assert_eq!(reads[0].payload(), &data[..15]);
    assert_eq!(reads[1].payload(), &data[15..]);
    assert!(reads.iter().all(|r| r.version == 1 && r.level == ECLevel::L));
}

#[test]
fn test_text_series_rejoins() {
    let text = "STRUCTURED APPEND SPREADS ONE MESSAGE OVER SEVERAL SYMBOLS 0123456789";
    let options = EncodeOptions::new().version(2).level(ECLevel::H);
    let symbols = encode_string_structured(text, &options).unwrap();
    assert!(symbols.len() > 1);

    let mut joined = Vec::new();
    for (i, symbol) in symbols.iter().enumerate() {
        assert_eq!(symbol.version().number(), 2);
        let read = read_symbol(symbol);
        let (count, index, _) = header(&read);
        assert_eq!(count as usize, symbols.len());
        assert_eq!(index as usize, i + 1);
        joined.extend(read.payload());
    }
    assert_eq!(joined, text.as_bytes());
}

#[test]
fn test_single_part_keeps_header() {
    let options = EncodeOptions::new().version(3);
    let symbols = encode_structured(b"fits", &options).unwrap();
    assert_eq!(symbols.len(), 1);
    let read = read_symbol(&symbols[0]);
    let parity = b"fits".iter().fold(0, |acc, b| acc ^ b);
    assert_eq!(header(&read), (1, 1, parity));
}

#[test]
fn test_fnc1_in_every_part() {
    let mut input = InputModel::new(1, ECLevel::L).unwrap();
    input.append(Mode::Byte, &[0x5a; 25]).unwrap();
    input.set_fnc1_second(0x07);
    let set = input.split_to_structured().unwrap();
    assert_eq!(set.len(), 2);

    for part in set.inputs() {
        let symbol = encode_input(part, &EncodeOptions::new()).unwrap();
        let read = read_symbol(&symbol);
        assert_eq!(read.segments[0].0, Mode::StructuredHeader);
        assert_eq!(read.segments[1], (Mode::Fnc1Second, vec![0x07]));
    }
}

#[test]
fn test_manual_set() {
    let mut set = StructuredSet::new();
    for text in [&b"FIRST"[..], b"SECOND"] {
        let mut input = InputModel::new(1, ECLevel::M).unwrap();
        input.append(Mode::Alphanumeric, text).unwrap();
        set.append_input(input).unwrap();
    }
    set.insert_structured_append_headers().unwrap();

    let expected = b"FIRSTSECOND".iter().fold(0, |acc, b| acc ^ b);
    assert_eq!(set.parity(), Some(expected));
    let reads: Vec<ReadSymbol> = set
        .inputs()
        .iter()
        .map(|input| read_symbol(&encode_input(input, &EncodeOptions::new()).unwrap()))
        .collect();
    assert_eq!(header(&reads[0]), (2, 1, expected));
    assert_eq!(header(&reads[1]), (2, 2, expected));
    assert_eq!(reads[1].payload(), b"SECOND");
}

#[test]
fn test_too_many_symbols() {
    let options = EncodeOptions::new().version(1).level(ECLevel::H);
    let result = encode_structured(&[0x33; 200], &options);
    assert!(matches!(result, Err(EncodeError::TooManySymbols { .. })));
}
