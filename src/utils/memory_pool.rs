//! Buffer pool for module grids
//!
//! Every encode needs a few width² scratch buffers (the filled frame,
//! the mask candidate under test and the best candidate so far). A pool
//! owned by the caller lets repeated encodes reuse them.

use crate::error::{EncodeError, Result};

// Buffers kept for reuse beyond this are dropped
const MAX_RETAINED: usize = 8;

/// Reusable byte buffers, handed out zeroed
pub struct BufferPool {
    free: Vec<Vec<u8>>,
    stats: AllocationStats,
}

impl BufferPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            free: Vec::new(),
            stats: AllocationStats::new(),
        }
    }

    /// Create a pool holding one buffer of `capacity` bytes
    /// (177² covers a version 40 frame)
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut pool = Self::new();
        pool.free.push(allocate(capacity)?);
        pool.stats.record_allocation();
        Ok(pool)
    }

    /// Take a zeroed buffer of `len` bytes, reusing a returned one when possible
    pub fn take(&mut self, len: usize) -> Result<Vec<u8>> {
        let slot = self
            .free
            .iter()
            .position(|buffer| buffer.capacity() >= len);
        match slot {
            Some(index) => {
                let mut buffer = self.free.swap_remove(index);
                buffer.clear();
                buffer.resize(len, 0);
                self.stats.record_reuse(len);
                Ok(buffer)
            }
            None => {
                let mut buffer = allocate(len)?;
                buffer.resize(len, 0);
                self.stats.record_allocation();
                Ok(buffer)
            }
        }
    }

    /// Take a buffer holding a copy of `source`
    pub fn take_copy(&mut self, source: &[u8]) -> Result<Vec<u8>> {
        let mut buffer = self.take(source.len())?;
        buffer.copy_from_slice(source);
        Ok(buffer)
    }

    /// Return a buffer for later reuse
    pub fn give(&mut self, buffer: Vec<u8>) {
        if self.free.len() < MAX_RETAINED && buffer.capacity() > 0 {
            self.free.push(buffer);
        }
    }

    /// Number of buffers waiting for reuse
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Reuse and allocation counters
    pub fn stats(&self) -> &AllocationStats {
        &self.stats
    }

    /// Drop every retained buffer
    pub fn clear(&mut self) {
        self.free.clear();
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

fn allocate(len: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| EncodeError::allocation_failure(len))?;
    Ok(buffer)
}

/// Statistics for monitoring allocation patterns
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AllocationStats {
    /// Buffers served from the pool
    pub reuses: usize,
    /// Buffers that had to be allocated
    pub allocations: usize,
    /// Bytes served from the pool
    pub total_bytes_reused: usize,
}

impl AllocationStats {
    /// Zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    fn record_reuse(&mut self, bytes: usize) {
        self.reuses += 1;
        self.total_bytes_reused += bytes;
    }

    fn record_allocation(&mut self) {
        self.allocations += 1;
    }
}
