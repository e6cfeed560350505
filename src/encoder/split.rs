//! Greedy mode segmentation of text input.
//!
//! A single left-to-right scan. At each position the run is absorbed by
//! the mode of its first character; the absorber keeps extending while
//! staying in the current mode costs no more than switching, and may hand
//! the whole run over to a cheaper-to-extend mode. Ties keep the current
//! mode.

use super::input::InputModel;
use super::modes::alphanumeric::AlphanumericEncoder;
use super::modes::byte::ByteEncoder;
use super::modes::numeric::NumericEncoder;
use super::segment::{MODE_INDICATOR_SIZE, Mode};
use super::tables;
use crate::error::{EncodeError, Result};

/// Segment `text` and append the runs to `input`.
///
/// With `case_sensitive == false` ASCII lowercase letters are upper-cased
/// first, which makes them eligible for Alphanumeric mode.
pub fn split_to_input(text: &[u8], input: &mut InputModel, case_sensitive: bool) -> Result<()> {
    if text.is_empty() {
        return Err(EncodeError::invalid_input("empty text"));
    }
    let folded;
    let text = if case_sensitive {
        text
    } else {
        folded = text.to_ascii_uppercase();
        &folded[..]
    };

    let splitter = Splitter::new(text, input.version());
    let mut pos = 0;
    while pos < text.len() {
        let (mode, run) = splitter.next_run(pos);
        input.append(mode, &text[pos..pos + run])?;
        pos += run;
    }
    tracing::trace!(segments = input.segments().len(), "split text");
    Ok(())
}

struct Splitter<'a> {
    text: &'a [u8],
    ln: isize,
    la: isize,
    l8: isize,
}

impl<'a> Splitter<'a> {
    fn new(text: &'a [u8], version: u8) -> Self {
        Self {
            text,
            ln: tables::length_indicator(Mode::Numeric, version) as isize,
            la: tables::length_indicator(Mode::Alphanumeric, version) as isize,
            l8: tables::length_indicator(Mode::Byte, version) as isize,
        }
    }

    /// Mode and length of the run starting at `start`
    fn next_run(&self, start: usize) -> (Mode, usize) {
        match self.identify(start) {
            Some(Mode::Numeric) => self.eat_numeric(start),
            Some(Mode::Alphanumeric) => self.eat_alphanumeric(start),
            _ => self.eat_byte(start),
        }
    }

    fn identify(&self, pos: usize) -> Option<Mode> {
        let &c = self.text.get(pos)?;
        if NumericEncoder::is_valid(c) {
            Some(Mode::Numeric)
        } else if AlphanumericEncoder::is_valid(c) {
            Some(Mode::Alphanumeric)
        } else {
            Some(Mode::Byte)
        }
    }

    fn is_digit(&self, pos: usize) -> bool {
        self.identify(pos) == Some(Mode::Numeric)
    }

    fn is_alnum(&self, pos: usize) -> bool {
        matches!(
            self.identify(pos),
            Some(Mode::Numeric | Mode::Alphanumeric)
        )
    }

    fn digit_run(&self, start: usize) -> usize {
        let mut end = start;
        while self.is_digit(end) {
            end += 1;
        }
        end
    }

    fn alnum_run(&self, start: usize) -> usize {
        let mut end = start;
        while self.is_alnum(end) {
            end += 1;
        }
        end
    }

    fn eat_numeric(&self, start: usize) -> (Mode, usize) {
        let end = self.digit_run(start);
        let run = end - start;
        let header = MODE_INDICATOR_SIZE as isize;

        match self.identify(end) {
            Some(Mode::Byte) => {
                let dif = num(run) + header + self.ln + byte(1) - byte(run + 1);
                if dif > 0 {
                    return self.eat_byte(start);
                }
            }
            Some(Mode::Alphanumeric) => {
                let dif = num(run) + header + self.ln + an(1) - an(run + 1);
                if dif > 0 {
                    return self.eat_alphanumeric(start);
                }
            }
            _ => {}
        }
        (Mode::Numeric, run)
    }

    fn eat_alphanumeric(&self, start: usize) -> (Mode, usize) {
        let header = MODE_INDICATOR_SIZE as isize;
        let mut p = start;
        while self.is_alnum(p) {
            if self.is_digit(p) {
                let q = self.digit_run(p);
                // Resuming Alphanumeric after the digits is charged at the
                // Numeric length-indicator width
                let resume = if self.is_alnum(q) { header + self.ln } else { 0 };
                let dif = an(p - start) + num(q - p) + header + self.ln + resume - an(q - start);
                if dif >= 0 {
                    p = q;
                } else {
                    break;
                }
            } else {
                p += 1;
            }
        }

        let run = p - start;
        if p < self.text.len() && !self.is_alnum(p) {
            let dif = an(run) + header + self.la + byte(1) - byte(run + 1);
            if dif > 0 {
                return self.eat_byte(start);
            }
        }
        (Mode::Alphanumeric, run)
    }

    fn eat_byte(&self, start: usize) -> (Mode, usize) {
        let header = MODE_INDICATOR_SIZE as isize;
        let mut p = start + 1;
        while p < self.text.len() {
            let (q, body, length_bits) = match self.identify(p) {
                Some(Mode::Numeric) => {
                    let q = self.digit_run(p);
                    (q, num(q - p), self.ln)
                }
                Some(Mode::Alphanumeric) => {
                    let q = self.alnum_run(p);
                    (q, an(q - p), self.la)
                }
                _ => {
                    p += 1;
                    continue;
                }
            };
            let switch_back = if self.identify(q) == Some(Mode::Byte) {
                header + self.l8
            } else {
                0
            };
            let dif = byte(p - start) + body + header + length_bits + switch_back - byte(q - start);
            if dif >= 0 {
                p = q;
            } else {
                break;
            }
        }
        (Mode::Byte, p - start)
    }
}

fn num(count: usize) -> isize {
    NumericEncoder::estimate_bits(count) as isize
}

fn an(count: usize) -> isize {
    AlphanumericEncoder::estimate_bits(count) as isize
}

fn byte(count: usize) -> isize {
    ByteEncoder::estimate_bits(count) as isize
}
