use crate::error::{EncodeError, Result};

/// Module color (set = dark)
pub const DARK: u8 = 0x01;
/// Module written by the frame filler
pub const DATA: u8 = 0x02;
/// Format information area
pub const FORMAT: u8 = 0x04;
/// Version information area
pub const VERSION: u8 = 0x08;
/// Timing pattern
pub const TIMING: u8 = 0x10;
/// Alignment pattern
pub const ALIGNMENT: u8 = 0x20;
/// Finder pattern or separator
pub const FINDER: u8 = 0x40;
/// Function module: never masked, never filled
pub const RESERVED: u8 = 0x80;

/// Square grid of per-module state bytes.
///
/// The reserved bits are fixed by the frame template for a version;
/// only the color bit changes while filling and masking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    cells: Vec<u8>,
}

impl Frame {
    /// Allocate an all-zero frame
    pub fn new(width: usize) -> Result<Self> {
        let cells = zeroed(width * width)?;
        Ok(Self { width, cells })
    }

    /// Wrap an existing cell buffer. `cells.len()` must be `width * width`.
    pub fn from_cells(width: usize, cells: Vec<u8>) -> Result<Self> {
        if cells.len() != width * width {
            return Err(EncodeError::invalid_input(format!(
                "frame of width {} needs {} cells, got {}",
                width,
                width * width,
                cells.len()
            )));
        }
        Ok(Self { width, cells })
    }

    /// Clone with a fallible allocation
    pub fn try_clone(&self) -> Result<Self> {
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(self.cells.len())
            .map_err(|_| EncodeError::allocation_failure(self.cells.len()))?;
        cells.extend_from_slice(&self.cells);
        Ok(Self {
            width: self.width,
            cells,
        })
    }

    /// Width (and height) in modules
    pub fn width(&self) -> usize {
        self.width
    }

    /// State byte at (x, y)
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[y * self.width + x]
    }

    /// Overwrite the state byte at (x, y)
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.cells[y * self.width + x] = value;
    }

    /// True when the module's color bit is set
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.get(x, y) & DARK != 0
    }

    /// True for function modules
    pub fn is_reserved(&self, x: usize, y: usize) -> bool {
        self.get(x, y) & RESERVED != 0
    }

    /// Row-major cells
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Mutable row-major cells
    pub fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    /// Give the cell buffer back, e.g. to a pool
    pub fn into_cells(self) -> Vec<u8> {
        self.cells
    }
}

fn zeroed(len: usize) -> Result<Vec<u8>> {
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(len)
        .map_err(|_| EncodeError::allocation_failure(len))?;
    cells.resize(len, 0);
    Ok(cells)
}
