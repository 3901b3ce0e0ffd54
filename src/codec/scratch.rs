//! Growable scratch buffer for variable-length field values
//!
//! One buffer per handler context, reused across rows:
//! - starts at one step
//! - grows in whole steps, rounded up past the required size
//! - never shrinks; freed when the owning context goes away
//!
//! Not shared between contexts.

use crate::observability::{Logger, Severity};

/// Default growth step in bytes
pub const DEFAULT_STEP: usize = 1024;

/// Reusable byte buffer with step-rounded growth.
#[derive(Debug)]
pub struct ScratchBuffer {
    buf: Vec<u8>,
    step: usize,
    grows: u64,
}

impl ScratchBuffer {
    /// Creates a buffer of one `step`. A zero step is treated as 1.
    pub fn new(step: usize) -> Self {
        let step = step.max(1);
        Self {
            buf: vec![0; step],
            step,
            grows: 0,
        }
    }

    /// Current size in bytes
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Number of reallocations so far
    pub fn grow_count(&self) -> u64 {
        self.grows
    }

    /// First step boundary strictly above `needed`
    fn rounded(&self, needed: usize) -> usize {
        (needed / self.step + 1) * self.step
    }

    fn grow_to(&mut self, new_size: usize) {
        if Logger::is_enabled(Severity::Trace) {
            let from = self.buf.len().to_string();
            let to = new_size.to_string();
            Logger::trace("SCRATCH_GROW", &[("from", from.as_str()), ("to", to.as_str())]);
        }
        self.buf.resize(new_size, 0);
        self.grows += 1;
    }

    /// Copies `bytes` into the buffer and returns the staged slice.
    ///
    /// Grows only when the buffer is smaller than the value.
    pub fn stage(&mut self, bytes: &[u8]) -> &[u8] {
        if self.buf.len() < bytes.len() {
            let new_size = self.rounded(bytes.len());
            self.grow_to(new_size);
        }
        self.buf[..bytes.len()].copy_from_slice(bytes);
        &self.buf[..bytes.len()]
    }

    /// Copies `bytes` followed by a NUL terminator and returns the staged
    /// slice without the terminator.
    ///
    /// Grows when the buffer cannot also hold the terminator.
    pub fn stage_terminated(&mut self, bytes: &[u8]) -> &[u8] {
        if self.buf.len() <= bytes.len() {
            let new_size = self.rounded(bytes.len() + 1);
            self.grow_to(new_size);
        }
        self.buf[..bytes.len()].copy_from_slice(bytes);
        self.buf[bytes.len()] = 0;
        &self.buf[..bytes.len()]
    }
}

impl Default for ScratchBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}
