//! Utility types shared by the encoder
//!
//! - Memory pools (buffer reuse across encodes)

pub mod memory_pool;
