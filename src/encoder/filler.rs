//! Zigzag walk over the data modules of a frame.

use crate::models::Frame;
use crate::models::frame::RESERVED;

/// Cursor visiting data modules in placement order.
///
/// Starts at the bottom-right corner and moves up in two-column strips,
/// right column first, reversing direction at the edges. The strip that
/// would land on the vertical timing column is shifted one column left.
pub struct FrameFiller {
    width: isize,
    x: isize,
    y: isize,
    dir: isize,
    bit: i8,
}

impl FrameFiller {
    /// Cursor for a frame of `width` modules
    pub fn new(width: usize) -> Self {
        let width = width as isize;
        Self {
            width,
            x: width - 1,
            y: width - 1,
            dir: -1,
            bit: -1,
        }
    }

    /// Next data module of `frame`, or `None` once the grid is exhausted
    pub fn next(&mut self, frame: &Frame) -> Option<(usize, usize)> {
        if self.bit == -1 {
            self.bit = 0;
            return Some((self.x as usize, self.y as usize));
        }

        loop {
            if self.bit == 0 {
                self.x -= 1;
                self.bit = 1;
            } else {
                self.x += 1;
                self.y += self.dir;
                self.bit = 0;
            }

            if self.dir < 0 {
                if self.y < 0 {
                    self.y = 0;
                    self.x -= 2;
                    self.dir = 1;
                    if self.x == 6 {
                        self.x -= 1;
                        self.y = 9;
                    }
                }
            } else if self.y == self.width {
                self.y = self.width - 1;
                self.x -= 2;
                self.dir = -1;
                if self.x == 6 {
                    self.x -= 1;
                    self.y -= 8;
                }
            }

            if self.x < 0 || self.y < 0 {
                return None;
            }
            let (x, y) = (self.x as usize, self.y as usize);
            if frame.get(x, y) & RESERVED == 0 {
                return Some((x, y));
            }
        }
    }
}
