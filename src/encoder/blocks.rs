//! Error-correction blocks and codeword interleaving.

use super::input::InputModel;
use super::reed_solomon::ReedSolomonEncoder;
use super::tables::{self, EccSpec};
use crate::error::{EncodeError, Result};
use crate::models::ECLevel;

/// One Reed-Solomon block: a run of data codewords and its parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsBlock {
    data_offset: usize,
    data_len: usize,
    ecc_offset: usize,
}

impl RsBlock {
    /// Number of data codewords in this block
    pub fn data_len(&self) -> usize {
        self.data_len
    }
}

/// Data and ECC codewords of one symbol, split into blocks
#[derive(Debug, Clone)]
pub struct RawCode {
    data: Vec<u8>,
    ecc: Vec<u8>,
    blocks: Vec<RsBlock>,
    spec: EccSpec,
    remainder: usize,
}

impl RawCode {
    /// Resolve the input's version, pad it and compute every block's ECC
    pub fn new(input: &mut InputModel) -> Result<Self> {
        let data = input.byte_stream()?;
        Self::from_data(data, input.version(), input.level())
    }

    fn from_data(data: Vec<u8>, version: u8, level: ECLevel) -> Result<Self> {
        let spec = tables::ecc_spec(version, level);
        if data.len() != spec.data_codewords() {
            return Err(EncodeError::capacity_exceeded(
                data.len() * 8,
                spec.data_codewords() * 8,
            ));
        }

        let mut blocks = Vec::new();
        blocks
            .try_reserve_exact(spec.block_count())
            .map_err(|_| EncodeError::allocation_failure(spec.block_count()))?;
        let mut ecc = Vec::new();
        ecc.try_reserve_exact(spec.ecc_codewords())
            .map_err(|_| EncodeError::allocation_failure(spec.ecc_codewords()))?;

        let rs = ReedSolomonEncoder::new(spec.ecc_per_block)?;
        let sizes = std::iter::repeat_n(spec.group1_data, spec.group1_blocks)
            .chain(std::iter::repeat_n(spec.group2_data, spec.group2_blocks));
        let mut data_offset = 0;
        for data_len in sizes {
            let ecc_offset = ecc.len();
            ecc.extend(rs.encode(&data[data_offset..data_offset + data_len])?);
            blocks.push(RsBlock {
                data_offset,
                data_len,
                ecc_offset,
            });
            data_offset += data_len;
        }

        tracing::trace!(
            version,
            blocks = blocks.len(),
            ecc_per_block = spec.ecc_per_block,
            "built error-correction blocks"
        );
        Ok(Self {
            data,
            ecc,
            blocks,
            spec,
            remainder: tables::remainder(version),
        })
    }

    /// Blocks, group 1 first
    pub fn blocks(&self) -> &[RsBlock] {
        &self.blocks
    }

    /// Padded data codewords in block order
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// ECC codewords of `block`
    pub fn block_ecc(&self, block: &RsBlock) -> &[u8] {
        &self.ecc[block.ecc_offset..block.ecc_offset + self.spec.ecc_per_block]
    }

    /// Data plus ECC codewords the version and level call for
    pub fn len(&self) -> usize {
        self.spec.data_codewords() + self.spec.ecc_codewords()
    }

    /// True for a zero-length code, which no version produces
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Filler bits after the last codeword
    pub fn remainder(&self) -> usize {
        self.remainder
    }

    /// Codeword `index` of the interleaved stream.
    ///
    /// Data codewords are read column by column across the blocks; once
    /// the shorter group-1 blocks run out only group-2 blocks contribute.
    /// ECC codewords follow, also column by column.
    pub fn codeword(&self, index: usize) -> Option<u8> {
        let count = self.blocks.len();
        let codeword = if index < self.data.len() {
            let mut row = index % count;
            let col = index / count;
            if col >= self.spec.group1_data {
                row += self.spec.group1_blocks;
            }
            let block = self.blocks.get(row)?;
            self.data.get(block.data_offset + col)
        } else {
            let index = index - self.data.len();
            let block = self.blocks.get(index % count)?;
            self.ecc.get(block.ecc_offset + index / count)
        };
        codeword.copied()
    }

    /// The interleaved codeword stream the frame filler consumes
    pub fn codewords(&self) -> Result<Vec<u8>> {
        (0..self.len())
            .map(|index| {
                self.codeword(index)
                    .ok_or(EncodeError::MissingCodeword { index })
            })
            .collect()
    }
}
