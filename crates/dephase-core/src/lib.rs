//! Shared primitives for the dephase effect.
//!
//! # Primary API
//!
//! - [`AudioBuffer`]: planar multi-channel sample storage used for host
//!   buffers, fixed processing blocks, and overlap memories alike
//! - [`AtomicFloat`], [`AtomicFlag`]: lock-free parameter cells
//! - [`ParameterRange`]: normalized (0..1) <-> real value mapping for host automation
//! - [`Error`] / [`Result`]: configuration errors
//!
//! Nothing here allocates on the audio path once buffers are sized.

pub mod error;
pub use error::{Error, Result};

mod buffer;
pub use buffer::AudioBuffer;

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat};

pub mod parameter;
pub use parameter::{ParameterRange, ParameterScale};

pub use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
pub use std::sync::Arc;
