/// Square module matrix of a finished symbol.
///
/// Rows are packed MSB first and padded to whole bytes, so `row(y)` is
/// directly usable as a 1-bit scanline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    stride: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create an all-light matrix of `width` x `width` modules
    pub fn new(width: usize) -> Self {
        let stride = width.div_ceil(8);
        Self {
            width,
            stride,
            data: vec![0; stride * width],
        }
    }

    /// Modules per side
    pub fn width(&self) -> usize {
        self.width
    }

    /// Module at column `x`, row `y`; outside the matrix reads as light
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.width {
            return false;
        }
        self.data[y * self.stride + x / 8] & (0x80 >> (x % 8)) != 0
    }

    /// Set the module at column `x`, row `y`. Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, dark: bool) {
        if x >= self.width || y >= self.width {
            return;
        }
        let byte = &mut self.data[y * self.stride + x / 8];
        let bit = 0x80 >> (x % 8);
        if dark {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
    }

    /// Packed bytes of row `y`
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.stride]
    }

    /// Bytes per packed row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of dark modules
    pub fn count_dark(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }
}
