//! Encoder configuration.

use crate::models::{ECLevel, MaskPattern};

/// How the payload is divided into encoding modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeHint {
    /// Text is segmented automatically; raw bytes become one Byte segment.
    #[default]
    Auto,
    /// One Numeric segment (digits only).
    Numeric,
    /// One Alphanumeric segment (0-9, A-Z, space, `$%*+-./:`).
    Alphanumeric,
    /// One Byte segment.
    Byte,
}

/// Options for a single encode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Requested version, 0 picks the smallest version that fits.
    pub version: u8,

    /// Error correction level.
    pub level: ECLevel,

    /// Segmentation strategy.
    pub mode: ModeHint,

    /// When false, ASCII lowercase letters are upper-cased first.
    pub case_sensitive: bool,

    /// Fail instead of raising a non-zero `version` that is too small.
    pub strict_version: bool,

    /// Apply this mask instead of searching for the best one.
    pub mask: Option<MaskPattern>,

    /// Score mask candidates on the rayon thread pool.
    pub parallel_masks: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            version: 0,
            level: ECLevel::L,
            mode: ModeHint::Auto,
            case_sensitive: true,
            strict_version: false,
            mask: None,
            parallel_masks: false,
        }
    }
}

impl EncodeOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the requested version (0 = auto).
    #[must_use]
    pub const fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Sets the error correction level.
    #[must_use]
    pub const fn level(mut self, level: ECLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the segmentation strategy.
    #[must_use]
    pub const fn mode(mut self, mode: ModeHint) -> Self {
        self.mode = mode;
        self
    }

    /// Sets case sensitivity for text input.
    #[must_use]
    pub const fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    /// Sets whether the requested version is a hard limit.
    #[must_use]
    pub const fn strict_version(mut self, value: bool) -> Self {
        self.strict_version = value;
        self
    }

    /// Forces a mask pattern.
    #[must_use]
    pub const fn mask(mut self, mask: MaskPattern) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Sets whether mask candidates are scored in parallel.
    #[must_use]
    pub const fn parallel_masks(mut self, value: bool) -> Self {
        self.parallel_masks = value;
        self
    }
}
