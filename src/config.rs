//! Build-time configuration.

use crate::{Error, Result};
use dephase_dsp::WolaKind;

/// Lowest sample rate accepted at prepare time.
pub const MIN_SAMPLE_RATE: f64 = 8_000.0;

/// Highest sample rate accepted at prepare time.
pub const MAX_SAMPLE_RATE: f64 = 384_000.0;

/// Settings fixed for the lifetime of a processor (until the next prepare).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct DephaseConfig {
    pub sample_rate: f64,
    pub channels: usize,
    /// Largest host buffer the processor will be handed.
    pub max_block_size: usize,
    /// Window pair and overlap of the framing stage.
    pub wola: WolaKind,
    /// Round the analysis block size up to a power of two.
    pub force_power_of_two: bool,
    /// Fixed seed for the random phase modes; `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for DephaseConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            channels: 2,
            max_block_size: 512,
            wola: WolaKind::default(),
            force_power_of_two: false,
            rng_seed: None,
        }
    }
}

impl DephaseConfig {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(Error::Core(dephase_core::Error::InvalidConfig(format!(
                "sample rate {} Hz outside {}-{} Hz",
                self.sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
            ))));
        }
        if self.channels == 0 {
            return Err(Error::Core(dephase_core::Error::InvalidChannelCount {
                expected: 1,
                got: 0,
            }));
        }
        if self.max_block_size == 0 {
            return Err(Error::Core(dephase_core::Error::InvalidConfig(
                "max block size must be non-zero".to_string(),
            )));
        }
        Ok(())
    }
}
