//! Streaming errors

use thiserror::Error;

/// Errors raised while digesting a byte source
#[derive(Error, Debug)]
pub enum Error {
    /// The source ended before the length it was declared with
    #[error("short read at offset {offset}: expected {expected} bytes, got {got}")]
    ShortRead {
        /// Message offset of the failed read
        offset: u64,
        /// Bytes requested
        expected: usize,
        /// Bytes actually read
        got: usize,
    },

    /// Requested batch is larger than the driver will allocate
    #[error("batch of {blocks} blocks exceeds the limit of {max}")]
    BatchTooLarge {
        /// Requested blocks per batch
        blocks: usize,
        /// Largest accepted value
        max: usize,
    },

    /// IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = core::result::Result<T, Error>;
