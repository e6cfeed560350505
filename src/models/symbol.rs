use super::{BitMatrix, Frame};

/// QR Code version (1-40)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Smallest version (21x21 modules)
    pub const MIN: Version = Version(1);
    /// Largest version (177x177 modules)
    pub const MAX: Version = Version(40);

    /// Create a version, returning `None` outside 1-40
    pub fn new(number: u8) -> Option<Self> {
        if (1..=40).contains(&number) {
            Some(Version(number))
        } else {
            None
        }
    }

    /// Get the version number
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Get the size in modules (width = height)
    pub const fn size(self) -> usize {
        4 * self.0 as usize + 17
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    #[default]
    L = 0,
    /// Medium (~15% recovery capacity)
    M = 1,
    /// Quartile (~25% recovery capacity)
    Q = 2,
    /// High (~30% recovery capacity)
    H = 3,
}

impl ECLevel {
    /// All levels, weakest first
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    /// Row index into the capacity tables
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Two-bit level field of the format information (01=L, 00=M, 11=Q, 10=H)
    pub const fn format_bits(self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }

    /// Inverse of [`ECLevel::format_bits`]
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }
}

/// Mask pattern (0-7)
///
/// A module at column `x`, row `y` is flipped when the pattern's
/// expression evaluates to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskPattern {
    /// (x + y) % 2
    Pattern0 = 0,
    /// y % 2
    Pattern1 = 1,
    /// x % 3
    Pattern2 = 2,
    /// (x + y) % 3
    Pattern3 = 3,
    /// (y/2 + x/3) % 2
    Pattern4 = 4,
    /// (x*y)%2 + (x*y)%3
    Pattern5 = 5,
    /// ((x*y)%2 + (x*y)%3) % 2
    Pattern6 = 6,
    /// ((x*y)%3 + (x+y)%2) % 2
    Pattern7 = 7,
}

impl MaskPattern {
    /// All patterns in id order
    pub const ALL: [MaskPattern; 8] = [
        MaskPattern::Pattern0,
        MaskPattern::Pattern1,
        MaskPattern::Pattern2,
        MaskPattern::Pattern3,
        MaskPattern::Pattern4,
        MaskPattern::Pattern5,
        MaskPattern::Pattern6,
        MaskPattern::Pattern7,
    ];

    /// Get mask pattern from bits
    pub fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0x07) as usize]
    }

    /// Pattern id (0-7)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Check if the module at column `x`, row `y` gets flipped
    pub fn is_masked(self, x: usize, y: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (x + y) % 2 == 0,
            MaskPattern::Pattern1 => y % 2 == 0,
            MaskPattern::Pattern2 => x % 3 == 0,
            MaskPattern::Pattern3 => (x + y) % 3 == 0,
            MaskPattern::Pattern4 => (y / 2 + x / 3) % 2 == 0,
            MaskPattern::Pattern5 => (x * y) % 2 + (x * y) % 3 == 0,
            MaskPattern::Pattern6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            MaskPattern::Pattern7 => ((x * y) % 3 + (x + y) % 2) % 2 == 0,
        }
    }
}

/// A finished QR Code symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    version: Version,
    level: ECLevel,
    mask: MaskPattern,
    modules: BitMatrix,
}

impl Symbol {
    /// Build a symbol from a masked frame, keeping only the color bit of each module
    pub fn from_frame(version: Version, level: ECLevel, mask: MaskPattern, frame: &Frame) -> Self {
        let width = frame.width();
        let mut modules = BitMatrix::new(width);
        for y in 0..width {
            for x in 0..width {
                if frame.is_dark(x, y) {
                    modules.set(x, y, true);
                }
            }
        }
        Self {
            version,
            level,
            mask,
            modules,
        }
    }

    /// Symbol version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Width (and height) in modules
    pub fn width(&self) -> usize {
        self.modules.width()
    }

    /// Error correction level
    pub fn level(&self) -> ECLevel {
        self.level
    }

    /// Mask pattern applied to the data area
    pub fn mask(&self) -> MaskPattern {
        self.mask
    }

    /// True when the module at column `x`, row `y` is dark.
    /// Coordinates outside the symbol read as light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules.get(x, y)
    }

    /// Module matrix (true = dark)
    pub fn modules(&self) -> &BitMatrix {
        &self.modules
    }

    /// Copy the modules out as rows of booleans, top row first
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        let width = self.width();
        (0..width)
            .map(|y| (0..width).map(|x| self.is_dark(x, y)).collect())
            .collect()
    }
}
