//! Data masking, format information and mask selection.
//!
//! Penalty rules, per row and per column unless noted:
//! - N1: 3 + (k - 5) for every same-color run of k >= 5 modules
//! - N2: 3 for every uniform 2x2 block (whole symbol)
//! - N3: 40 for every 1:1:3:1:1 dark/light pattern with 4 light modules
//!   (or the edge) on one side
//! - N4: 10 for every 5% the dark ratio deviates from 50% (whole symbol)

use rayon::prelude::*;

use super::bch::BchEncoder;
use crate::error::{EncodeError, Result};
use crate::models::frame::{DARK, FORMAT, RESERVED};
use crate::models::{ECLevel, Frame, MaskPattern};
use crate::utils::memory_pool::BufferPool;

const N1: u32 = 3;
const N2: u32 = 3;
const N3: u32 = 40;
const N4: u32 = 10;

/// XOR the data modules of `source` with `mask` into `target`.
///
/// Returns the number of dark modules in `target`.
pub fn apply_mask(source: &[u8], target: &mut [u8], width: usize, mask: MaskPattern) -> usize {
    let mut blacks = 0;
    for y in 0..width {
        for x in 0..width {
            let i = y * width + x;
            let state = source[i];
            let value = if state & RESERVED != 0 {
                state
            } else {
                state ^ u8::from(mask.is_masked(x, y))
            };
            target[i] = value;
            blacks += (value & DARK) as usize;
        }
    }
    blacks
}

/// Write both copies of the format word. Returns the dark modules written.
pub fn write_format_information(
    cells: &mut [u8],
    width: usize,
    level: ECLevel,
    mask: MaskPattern,
) -> usize {
    let format = BchEncoder::format_info(level, mask);
    let mut blacks = 0;
    let put = |cells: &mut [u8], x: usize, y: usize, bit: u8| {
        cells[y * width + x] = RESERVED | FORMAT | bit;
    };

    for i in 0..8 {
        let bit = ((format >> i) & 1) as u8;
        blacks += 2 * bit as usize;
        put(cells, width - 1 - i, 8, bit);
        if i < 6 {
            put(cells, 8, i, bit);
        } else {
            put(cells, 8, i + 1, bit);
        }
    }
    for i in 0..7 {
        let bit = ((format >> (8 + i)) & 1) as u8;
        blacks += 2 * bit as usize;
        put(cells, 8, width - 7 + i, bit);
        if i == 0 {
            put(cells, 7, 8, bit);
        } else {
            put(cells, 6 - i, 8, bit);
        }
    }
    blacks
}

/// Apply a given mask and write the format word
pub fn make_mask(frame: &Frame, level: ECLevel, mask: MaskPattern) -> Result<Frame> {
    let width = frame.width();
    let mut masked = frame.try_clone()?;
    apply_mask(frame.cells(), masked.cells_mut(), width, mask);
    write_format_information(masked.cells_mut(), width, level, mask);
    Ok(masked)
}

/// Total demerit of `frame` under `mask`
pub fn evaluate_mask(frame: &Frame, level: ECLevel, mask: MaskPattern) -> Result<u32> {
    let width = frame.width();
    let mut scratch = zeroed(width * width)?;
    let mut runs = zeroed_runs(width)?;
    Ok(score(frame.cells(), &mut scratch, &mut runs, width, level, mask))
}

/// Try every mask and keep the lowest demerit; ties keep the lower id.
///
/// Candidates are built in two pooled buffers that swap roles whenever
/// the candidate beats the best so far.
pub fn select_mask(
    frame: &Frame,
    level: ECLevel,
    pool: &mut BufferPool,
) -> Result<(MaskPattern, Frame)> {
    let width = frame.width();
    let mut scratch = pool.take(width * width)?;
    let mut best = pool.take(width * width)?;
    let mut runs = zeroed_runs(width)?;

    let mut best_mask = MaskPattern::Pattern0;
    let mut min_demerit = u32::MAX;
    for mask in MaskPattern::ALL {
        let demerit = score(frame.cells(), &mut scratch, &mut runs, width, level, mask);
        tracing::trace!(mask = mask.index(), demerit, "mask candidate");
        if demerit < min_demerit {
            min_demerit = demerit;
            best_mask = mask;
            std::mem::swap(&mut scratch, &mut best);
        }
    }
    pool.give(scratch);

    tracing::debug!(mask = best_mask.index(), demerit = min_demerit, "selected mask");
    Ok((best_mask, Frame::from_cells(width, best)?))
}

/// Same choice as [`select_mask`], scoring the candidates on the rayon pool
pub fn select_mask_parallel(frame: &Frame, level: ECLevel) -> Result<(MaskPattern, Frame)> {
    let width = frame.width();
    let scores = MaskPattern::ALL
        .par_iter()
        .map_init(
            || Ok::<_, EncodeError>((zeroed(width * width)?, zeroed_runs(width)?)),
            |state, &mask| -> Result<(u32, MaskPattern)> {
                let (scratch, runs) = state.as_mut().map_err(|e| e.clone())?;
                let demerit = score(frame.cells(), scratch, runs, width, level, mask);
                tracing::trace!(mask = mask.index(), demerit, "mask candidate");
                Ok((demerit, mask))
            },
        )
        .collect::<Result<Vec<_>>>()?;

    let (demerit, mask) = scores
        .into_iter()
        .min_by_key(|&(demerit, mask)| (demerit, mask.index()))
        .ok_or_else(|| EncodeError::invalid_input("no mask candidates"))?;
    tracing::debug!(mask = mask.index(), demerit, "selected mask");
    Ok((mask, make_mask(frame, level, mask)?))
}

fn score(
    source: &[u8],
    scratch: &mut [u8],
    runs: &mut [i32],
    width: usize,
    level: ECLevel,
    mask: MaskPattern,
) -> u32 {
    let mut blacks = apply_mask(source, scratch, width, mask);
    blacks += write_format_information(scratch, width, level, mask);
    balance_demerit(blacks, width) + evaluate_symbol(scratch, runs, width)
}

/// N4 from the dark module count
fn balance_demerit(blacks: usize, width: usize) -> u32 {
    let area = width * width;
    let ratio = ((200 * blacks + area) / area / 2) as i64;
    ((ratio - 50).unsigned_abs() / 5) as u32 * N4
}

/// N1 + N2 + N3 over every row and column
fn evaluate_symbol(cells: &[u8], runs: &mut [i32], width: usize) -> u32 {
    let mut demerit = 0;
    for y in 0..width {
        let row = &cells[y * width..(y + 1) * width];
        if y > 0 {
            let above = &cells[(y - 1) * width..y * width];
            for x in 1..width {
                let all = row[x] & row[x - 1] & above[x] & above[x - 1];
                let any = row[x] | row[x - 1] | above[x] | above[x - 1];
                if (all | !any) & DARK != 0 {
                    demerit += N2;
                }
            }
        }
        let length = calc_run_length(width, |x| row[x], runs);
        demerit += calc_n1_n3(&runs[..length]);
    }
    for x in 0..width {
        let length = calc_run_length(width, |y| cells[y * width + x], runs);
        demerit += calc_n1_n3(&runs[..length]);
    }
    demerit
}

/// Run lengths of a line; a leading -1 marks a line that starts dark,
/// so dark runs always sit at odd indices.
fn calc_run_length(width: usize, cell: impl Fn(usize) -> u8, runs: &mut [i32]) -> usize {
    let mut head = 0;
    if cell(0) & DARK != 0 {
        runs[0] = -1;
        head = 1;
    }
    runs[head] = 1;
    for i in 1..width {
        if (cell(i) ^ cell(i - 1)) & DARK != 0 {
            head += 1;
            runs[head] = 1;
        } else {
            runs[head] += 1;
        }
    }
    head + 1
}

fn calc_n1_n3(runs: &[i32]) -> u32 {
    let n = runs.len();
    let mut demerit = 0;
    for i in 0..n {
        if runs[i] >= 5 {
            demerit += N1 + (runs[i] - 5) as u32;
        }
        if i & 1 == 1 && i >= 3 && i + 2 < n && runs[i] % 3 == 0 {
            let fact = runs[i] / 3;
            if runs[i - 2] == fact
                && runs[i - 1] == fact
                && runs[i + 1] == fact
                && runs[i + 2] == fact
            {
                if i == 3 || runs[i - 3] >= 4 * fact {
                    demerit += N3;
                } else if i + 4 >= n || runs[i + 3] >= 4 * fact {
                    demerit += N3;
                }
            }
        }
    }
    demerit
}

fn zeroed(len: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| EncodeError::allocation_failure(len))?;
    buffer.resize(len, 0);
    Ok(buffer)
}

fn zeroed_runs(width: usize) -> Result<Vec<i32>> {
    let len = width + 1;
    let mut runs = Vec::new();
    runs.try_reserve_exact(len)
        .map_err(|_| EncodeError::allocation_failure(len * std::mem::size_of::<i32>()))?;
    runs.resize(len, 0);
    Ok(runs)
}
