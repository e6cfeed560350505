//! Structured append: one payload spread over up to 16 symbols.

use std::collections::VecDeque;

use super::input::{Fnc1, InputModel};
use super::segment::{MAX_STRUCTURED_SYMBOLS, MODE_INDICATOR_SIZE, Mode, STRUCTURE_HEADER_SIZE};
use super::tables;
use crate::error::{EncodeError, Result};

/// Ordered inputs of a structured-append set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredSet {
    inputs: Vec<InputModel>,
    parity: Option<u8>,
}

impl StructuredSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the next symbol's input
    pub fn append_input(&mut self, input: InputModel) -> Result<()> {
        if self.inputs.len() >= MAX_STRUCTURED_SYMBOLS {
            return Err(EncodeError::TooManySymbols {
                count: self.inputs.len() + 1,
            });
        }
        self.inputs
            .try_reserve(1)
            .map_err(|_| EncodeError::allocation_failure(std::mem::size_of::<InputModel>()))?;
        self.inputs.push(input);
        self.parity = None;
        Ok(())
    }

    /// Inputs in symbol order
    pub fn inputs(&self) -> &[InputModel] {
        &self.inputs
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// True for a set without inputs
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Parity fixed by the last header insertion, if any
    pub fn parity(&self) -> Option<u8> {
        self.parity
    }

    /// XOR of every data byte of every input
    pub fn calc_parity(&self) -> u8 {
        self.inputs.iter().fold(0, |acc, input| acc ^ input.parity())
    }

    /// Prepend a {count, index, parity} header to every input
    pub fn insert_structured_append_headers(&mut self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(EncodeError::invalid_input("empty structured-append set"));
        }
        let count = self.inputs.len();
        let parity = self.calc_parity();
        for (i, input) in self.inputs.iter_mut().enumerate() {
            input.insert_structured_append_header(count, i + 1, parity)?;
        }
        self.parity = Some(parity);
        Ok(())
    }
}

impl InputModel {
    /// Split this input into a structured-append set at its fixed version.
    ///
    /// Segments are placed in order; a data segment that overflows the
    /// current symbol is cut at the largest prefix that still fits and
    /// the rest starts the next symbol. Every resulting input carries its
    /// header.
    ///
    /// An FNC1 indicator set on this input is repeated in every part, not
    /// only the first.
    pub fn split_to_structured(&self) -> Result<StructuredSet> {
        let version = self.version();
        if version == 0 {
            return Err(EncodeError::invalid_input(
                "structured append needs an explicit version",
            ));
        }
        if self.is_empty() {
            return Err(EncodeError::invalid_input("no data to split"));
        }

        let fnc1_bits = match self.fnc1() {
            Some(Fnc1::First) => MODE_INDICATOR_SIZE,
            Some(Fnc1::Second(_)) => MODE_INDICATOR_SIZE + 8,
            None => 0,
        };
        let capacity = tables::data_length(version, self.level()) * 8;
        let max_bits = capacity.saturating_sub(STRUCTURE_HEADER_SIZE + fnc1_bits);

        let mut set = StructuredSet::new();
        let mut queue: VecDeque<_> = self.segments().iter().cloned().collect();
        let mut current = self.empty_part()?;
        let mut bits = 0;

        while let Some(mut segment) = queue.pop_front() {
            let size = segment.estimate_bits(version);
            if bits + size <= max_bits {
                current.push_segment(segment)?;
                bits += size;
                continue;
            }

            let fit = length_of_code(segment.mode(), version, max_bits - bits);
            if fit > 0 && fit < segment.data().len() {
                let tail = segment.split_off(fit)?;
                current.push_segment(segment)?;
                queue.push_front(tail);
            } else if current.is_empty() {
                return Err(EncodeError::capacity_exceeded(
                    size + STRUCTURE_HEADER_SIZE + fnc1_bits,
                    capacity,
                ));
            } else {
                queue.push_front(segment);
            }

            set.append_input(current)?;
            current = self.empty_part()?;
            bits = 0;
        }
        if !current.is_empty() {
            set.append_input(current)?;
        }

        set.insert_structured_append_headers()?;
        tracing::debug!(
            symbols = set.len(),
            version,
            parity = ?set.parity(),
            "split into structured-append set"
        );
        Ok(set)
    }

    fn empty_part(&self) -> Result<InputModel> {
        let mut part = InputModel::new(self.version(), self.level())?;
        part.set_strict_version(true);
        match self.fnc1() {
            Some(Fnc1::First) => part.set_fnc1_first(),
            Some(Fnc1::Second(appid)) => part.set_fnc1_second(appid),
            None => {}
        }
        Ok(part)
    }
}

/// Characters of `mode` that fit into `bits`, headers included
fn length_of_code(mode: Mode, version: u8, bits: usize) -> usize {
    if !mode.is_data() {
        return 0;
    }
    let overhead = MODE_INDICATOR_SIZE + tables::length_indicator(mode, version);
    let Some(payload) = bits.checked_sub(overhead) else {
        return 0;
    };
    let size = match mode {
        Mode::Numeric => {
            let rest = payload % 10;
            payload / 10 * 3
                + match rest {
                    7.. => 2,
                    4.. => 1,
                    _ => 0,
                }
        }
        Mode::Alphanumeric => payload / 11 * 2 + usize::from(payload % 11 >= 6),
        _ => payload / 8,
    };
    size.min(tables::maximum_words(mode, version))
}
