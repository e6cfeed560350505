//! Encode pipeline: codewords, frame, placement, masking.

use super::blocks::RawCode;
use super::filler::FrameFiller;
use super::function_patterns::new_frame;
use super::input::InputModel;
use super::mask;
use super::structured::StructuredSet;
use crate::config::EncodeOptions;
use crate::error::{EncodeError, Result};
use crate::models::frame::DATA;
use crate::models::{Frame, MaskPattern, Symbol, Version};
use crate::utils::memory_pool::BufferPool;

/// Turns input models into finished symbols
pub struct QrEncoder;

impl QrEncoder {
    /// Encode one input.
    ///
    /// Version and level come from the input; `options` supplies the mask
    /// policy (`mask`, `parallel_masks`). The input itself is left as is,
    /// so encoding it again gives the same symbol.
    pub fn encode(input: &InputModel, options: &EncodeOptions) -> Result<Symbol> {
        let mut pool = BufferPool::new();
        Self::encode_with_pool(input, options, &mut pool)
    }

    /// Same as [`QrEncoder::encode`], with scratch buffers from `pool`
    pub fn encode_with_pool(
        input: &InputModel,
        options: &EncodeOptions,
        pool: &mut BufferPool,
    ) -> Result<Symbol> {
        if input.is_empty() {
            return Err(EncodeError::invalid_input("nothing to encode"));
        }

        // Resolve on a copy
        let mut working = input.clone();
        let raw = RawCode::new(&mut working)?;
        let number = working.version();
        let version = Version::new(number).ok_or_else(|| {
            EncodeError::invalid_input(format!("resolved version {} is out of range", number))
        })?;
        let level = working.level();

        let mut frame = new_frame(number)?;
        Self::fill(&mut frame, &raw, number)?;

        let (mask, masked) = match options.mask {
            Some(mask) => (mask, mask::make_mask(&frame, level, mask)?),
            None if options.parallel_masks => mask::select_mask_parallel(&frame, level)?,
            None => mask::select_mask(&frame, level, pool)?,
        };
        pool.give(frame.into_cells());

        let symbol = Symbol::from_frame(version, level, mask, &masked);
        pool.give(masked.into_cells());
        tracing::debug!(
            version = number,
            level = ?level,
            mask = mask.index(),
            "encoded symbol"
        );
        Ok(symbol)
    }

    /// Encode with an explicit mask, or the best one when `mask` is `None`
    pub fn encode_mask(input: &InputModel, mask: Option<MaskPattern>) -> Result<Symbol> {
        let options = match mask {
            Some(mask) => EncodeOptions::new().mask(mask),
            None => EncodeOptions::new(),
        };
        Self::encode(input, &options)
    }

    /// Encode every input of a structured-append set, in order
    pub fn encode_structured(set: &StructuredSet, options: &EncodeOptions) -> Result<Vec<Symbol>> {
        if set.is_empty() {
            return Err(EncodeError::invalid_input("empty structured-append set"));
        }
        let mut pool = BufferPool::new();
        let mut symbols = Vec::new();
        symbols
            .try_reserve_exact(set.len())
            .map_err(|_| EncodeError::allocation_failure(set.len()))?;
        for input in set.inputs() {
            symbols.push(Self::encode_with_pool(input, options, &mut pool)?);
        }
        Ok(symbols)
    }

    /// Write the interleaved codewords, MSB first, then the remainder bits
    fn fill(frame: &mut Frame, raw: &RawCode, version: u8) -> Result<()> {
        let overflow = || EncodeError::FrameOverflow { version };
        let mut filler = FrameFiller::new(frame.width());
        for codeword in raw.codewords()? {
            for shift in (0..8).rev() {
                let (x, y) = filler.next(frame).ok_or_else(overflow)?;
                frame.set(x, y, DATA | ((codeword >> shift) & 1));
            }
        }
        for _ in 0..raw.remainder() {
            let (x, y) = filler.next(frame).ok_or_else(overflow)?;
            frame.set(x, y, DATA);
        }
        Ok(())
    }
}
