//! Error types shared across the pipeline.

use std::io;

use thiserror::Error;

/// Convenience alias for functions that return a [`PigzError`].
pub type PigzResult<T> = Result<T, PigzError>;

/// Errors that can escape the parallel compression pipeline.
///
/// Per the error-handling design, only I/O failures are recoverable
/// `Result`s; contract violations (bad level, zero block size, duplicate
/// sequence numbers) and encoder errors are programming errors asserted
/// deeper in the pipeline and never reach this type -- a `flate2` codec
/// error on an in-memory buffer is unreachable given validated `Options`,
/// so `worker.rs` asserts it rather than threading a codec-error variant
/// through this enum for a case that can never actually occur.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PigzError {
    #[error("compression level must be in 1..=9, got {0}")]
    InvalidLevel(u8),
    #[error("block size must be > 0")]
    InvalidBlockSize,
    #[error("worker count must be > 0")]
    InvalidWorkerCount,
    #[error(transparent)]
    Io(#[from] io::Error),
}
