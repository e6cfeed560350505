/// Per-module frame state used while building a symbol
pub mod frame;
/// Packed module matrix
pub mod matrix;
/// Version, level, mask and the finished symbol
pub mod symbol;

pub use frame::Frame;
pub use matrix::BitMatrix;
pub use symbol::{ECLevel, MaskPattern, Symbol, Version};
