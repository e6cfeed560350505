//! Error types for the encoder.

use thiserror::Error;

/// Result type for encoder operations.
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Errors that can occur while building or encoding a symbol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The caller supplied data or parameters the encoder cannot accept.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// The payload does not fit the largest permitted symbol.
    #[error("data too large: {bits} bits needed, {capacity} bits available")]
    CapacityExceeded {
        /// Bits required by the payload.
        bits: usize,
        /// Bits available in the largest permitted symbol.
        capacity: usize,
    },

    /// A structured-append split needs more symbols than the standard allows.
    #[error("structured append needs {count} symbols, at most 16 are allowed")]
    TooManySymbols {
        /// Number of symbols the split would need.
        count: usize,
    },

    /// A buffer could not be allocated.
    #[error("failed to allocate {bytes} bytes")]
    AllocationFailure {
        /// Size of the failed request.
        bytes: usize,
    },

    /// The codeword stream did not fit the module grid.
    #[error("codeword stream overflows the version {version} frame")]
    FrameOverflow {
        /// Version of the frame being filled.
        version: u8,
    },

    /// The interleaved stream has no codeword at `index`.
    #[error("no codeword at index {index} of the interleaved stream")]
    MissingCodeword {
        /// Position in the interleaved stream.
        index: usize,
    },

    /// A bit was read past the end of a bit stream.
    #[error("bit index {index} out of range for stream of {len} bits")]
    InvalidIndex {
        /// Requested bit index.
        index: usize,
        /// Length of the stream in bits.
        len: usize,
    },
}

impl EncodeError {
    /// Create an invalid input error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a capacity exceeded error.
    pub fn capacity_exceeded(bits: usize, capacity: usize) -> Self {
        Self::CapacityExceeded { bits, capacity }
    }

    /// Create an allocation failure error.
    pub fn allocation_failure(bytes: usize) -> Self {
        Self::AllocationFailure { bytes }
    }

    /// Returns true for errors that indicate a defect in the encoder rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::AllocationFailure { .. }
                | Self::FrameOverflow { .. }
                | Self::MissingCodeword { .. }
        )
    }
}
