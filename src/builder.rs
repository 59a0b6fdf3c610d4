//! Builder for configuring and constructing a [`Dephase`] effect.

use crate::config::DephaseConfig;
use crate::params::PhaseParams;
use crate::processor::PhaseProcessor;
use crate::{Dephase, Error, Result};
use dephase_core::parameter::{MAX_BLOCK_SIZE, MIN_BLOCK_SIZE};
use dephase_core::Arc;
use dephase_dsp::WolaKind;

/// # Example
///
/// ```
/// use dephase::prelude::*;
///
/// let effect = Dephase::builder()
///     .sample_rate(44100.0)
///     .channels(1)
///     .wola(WolaKind::new(WolaWindows::SqrtHann, Overlap::ThreeQuarter))
///     .force_power_of_two(true)
///     .build()?;
///
/// assert_eq!(effect.block_size(), 1024);
/// # Ok::<(), dephase::Error>(())
/// ```
#[derive(Default)]
pub struct DephaseBuilder {
    config: DephaseConfig,
    params: Option<Arc<PhaseParams>>,
    block_size: Option<usize>,
}

impl DephaseBuilder {
    /// Default: 48000
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Default: 2
    pub fn channels(mut self, channels: usize) -> Self {
        self.config.channels = channels;
        self
    }

    /// Default: 512
    pub fn max_block_size(mut self, frames: usize) -> Self {
        self.config.max_block_size = frames;
        self
    }

    /// Default: square-root Hann at 50 % overlap.
    pub fn wola(mut self, kind: WolaKind) -> Self {
        self.config.wola = kind;
        self
    }

    pub fn force_power_of_two(mut self, enabled: bool) -> Self {
        self.config.force_power_of_two = enabled;
        self
    }

    /// Fix the random phase sequence. Without a seed it comes from OS entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = Some(seed);
        self
    }

    /// Initial analysis block size. Unlike the parameter setter this is
    /// checked strictly: out-of-range sizes fail the build.
    pub fn block_size(mut self, size: usize) -> Self {
        self.block_size = Some(size);
        self
    }

    /// Share an existing parameter store (e.g. one owned by the host wrapper).
    pub fn params(mut self, params: Arc<PhaseParams>) -> Self {
        self.params = Some(params);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: DephaseConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Dephase> {
        let params = self.params.unwrap_or_default();
        if let Some(size) = self.block_size {
            if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&size) {
                return Err(Error::Core(dephase_core::Error::InvalidBlockSize(size)));
            }
            params.set_block_size(size);
        }
        let processor = PhaseProcessor::new(self.config, params)?;
        Ok(Dephase::from_processor(processor))
    }
}
