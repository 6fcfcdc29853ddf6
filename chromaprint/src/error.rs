use thiserror::Error;

/// Errors returned by chromaprint operations.
#[derive(Debug, Error)]
pub enum ChromaprintError {
    #[error("out of memory: cannot allocate {what} ({len} entries)")]
    Alloc { what: &'static str, len: usize },

    #[error("fingerprint blob must be a uint32 array (multiple of 4 bytes), got {len} bytes")]
    Misaligned { len: usize },

    #[error("parse fingerprint: {0}")]
    Parse(String),
}
