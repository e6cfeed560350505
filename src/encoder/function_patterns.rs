//! Frame templates: finder, timing and alignment patterns plus the
//! reserved format and version areas of each version.

use std::sync::OnceLock;

use super::bch::BchEncoder;
use super::tables::{self, VERSION_MAX};
use crate::error::{EncodeError, Result};
use crate::models::Frame;
use crate::models::frame::{ALIGNMENT, DARK, FINDER, FORMAT, RESERVED, TIMING, VERSION};

// Built on first use, never written afterwards
static TEMPLATES: [OnceLock<Frame>; VERSION_MAX as usize] =
    [const { OnceLock::new() }; VERSION_MAX as usize];

const FINDER_LIGHT: u8 = RESERVED | FINDER;
const FINDER_DARK: u8 = RESERVED | FINDER | DARK;
const FORMAT_AREA: u8 = RESERVED | FORMAT;
const TIMING_LIGHT: u8 = RESERVED | TIMING;
const ALIGNMENT_LIGHT: u8 = RESERVED | ALIGNMENT;
const ALIGNMENT_DARK: u8 = RESERVED | ALIGNMENT | DARK;
const VERSION_AREA: u8 = RESERVED | VERSION;
const DARK_MODULE: u8 = RESERVED | DARK;

/// Fresh frame for `version`, copied from the shared template
pub fn new_frame(version: u8) -> Result<Frame> {
    if !(1..=VERSION_MAX).contains(&version) {
        return Err(EncodeError::invalid_input(format!(
            "no frame for version {}",
            version
        )));
    }
    let cell = &TEMPLATES[version as usize - 1];
    let template = match cell.get() {
        Some(template) => template,
        None => {
            let built = build_template(version)?;
            cell.get_or_init(|| built)
        }
    };
    template.try_clone()
}

/// Alignment pattern centers for a given version.
pub fn alignment_pattern_positions(version: u8) -> Vec<usize> {
    if version <= 1 {
        return Vec::new();
    }
    let count = (version / 7) as usize + 2;
    let size = tables::width(version);
    let step = if version == 32 {
        26
    } else {
        (version as usize * 4 + count * 2 + 1) / (count * 2 - 2) * 2
    };

    let mut positions = vec![6; count];
    let mut pos = size - 7;
    for slot in positions[1..].iter_mut().rev() {
        *slot = pos;
        pos = pos.saturating_sub(step);
    }
    positions
}

fn build_template(version: u8) -> Result<Frame> {
    let size = tables::width(version);
    let mut frame = Frame::new(size)?;

    // Finder patterns, then separators
    for (ox, oy) in [(0, 0), (size - 7, 0), (0, size - 7)] {
        put_finder(&mut frame, ox, oy);
    }
    for i in 0..8 {
        frame.set(i, 7, FINDER_LIGHT);
        frame.set(size - 8 + i, 7, FINDER_LIGHT);
        frame.set(i, size - 8, FINDER_LIGHT);
        frame.set(7, i, FINDER_LIGHT);
        frame.set(size - 8, i, FINDER_LIGHT);
        frame.set(7, size - 8 + i, FINDER_LIGHT);
    }

    // Format info areas
    for i in 0..9 {
        frame.set(i, 8, FORMAT_AREA);
    }
    for i in 0..8 {
        frame.set(size - 8 + i, 8, FORMAT_AREA);
        frame.set(8, i, FORMAT_AREA);
    }
    for i in 0..7 {
        frame.set(8, size - 7 + i, FORMAT_AREA);
    }

    // Timing patterns (row 6 and column 6)
    for i in 1..size - 15 {
        let value = TIMING_LIGHT | (i & 1) as u8;
        frame.set(7 + i, 6, value);
        frame.set(6, 7 + i, value);
    }

    let centers = alignment_pattern_positions(version);
    for &cy in &centers {
        for &cx in &centers {
            // Skip the three finder corners
            let corner = (cx == 6 && cy == 6)
                || (cx == 6 && cy == size - 7)
                || (cx == size - 7 && cy == 6);
            if !corner {
                put_alignment(&mut frame, cx, cy);
            }
        }
    }

    if let Some(info) = BchEncoder::version_info(version) {
        for i in 0..18 {
            let value = VERSION_AREA | ((info >> i) & 1) as u8;
            frame.set(i / 3, size - 11 + i % 3, value);
            frame.set(size - 11 + i % 3, i / 3, value);
        }
    }

    frame.set(8, size - 8, DARK_MODULE);
    Ok(frame)
}

fn put_finder(frame: &mut Frame, ox: usize, oy: usize) {
    for dy in 0..7 {
        for dx in 0..7 {
            let ring = dx == 0 || dx == 6 || dy == 0 || dy == 6;
            let core = (2..=4).contains(&dx) && (2..=4).contains(&dy);
            let value = if ring || core { FINDER_DARK } else { FINDER_LIGHT };
            frame.set(ox + dx, oy + dy, value);
        }
    }
}

fn put_alignment(frame: &mut Frame, cx: usize, cy: usize) {
    for dy in 0..5 {
        for dx in 0..5 {
            let inner_ring = (1..=3).contains(&dx)
                && (1..=3).contains(&dy)
                && !(dx == 2 && dy == 2);
            let value = if inner_ring { ALIGNMENT_LIGHT } else { ALIGNMENT_DARK };
            frame.set(cx - 2 + dx, cy - 2 + dy, value);
        }
    }
}
