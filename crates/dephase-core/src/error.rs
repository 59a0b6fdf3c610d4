//! Error types for dephase-core.

use thiserror::Error;

/// Error type for configuration and construction.
///
/// The audio path never produces these; invalid runtime states are clamped
/// where they occur.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid block size: {0}. Must be between {min} and {max}", min = crate::parameter::MIN_BLOCK_SIZE, max = crate::parameter::MAX_BLOCK_SIZE)]
    InvalidBlockSize(usize),

    #[error("Invalid channel count: expected {expected}, got {got}")]
    InvalidChannelCount { expected: usize, got: usize },
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
