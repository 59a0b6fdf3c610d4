//! Per-bin phase policies and the frequency band gate.

use crate::error::{Error, Result};
use crate::random::PhaseRng;
use core::f32::consts::PI;

/// Bins over which the band gate ramps from 0 to full effect.
pub const BAND_TRANSITION_BINS: f32 = 3.0;

/// What happens to the phase of each bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
#[repr(u8)]
pub enum PhaseMode {
    /// Force every phase to zero.
    #[default]
    Zero = 0,
    /// Replace phases with a previously captured spectrum.
    Frost = 1,
    /// Draw phases at random.
    Random = 2,
    /// Negate phases (time reversal of each frame).
    Flip = 3,
}

impl PhaseMode {
    pub fn name(&self) -> &'static str {
        match self {
            PhaseMode::Zero => "Zero",
            PhaseMode::Frost => "Frost",
            PhaseMode::Random => "Random",
            PhaseMode::Flip => "Flip",
        }
    }
}

impl TryFrom<u8> for PhaseMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(PhaseMode::Zero),
            1 => Ok(PhaseMode::Frost),
            2 => Ok(PhaseMode::Random),
            3 => Ok(PhaseMode::Flip),
            other => Err(Error::InvalidParameter(format!(
                "phase mode {} (expected 0-3)",
                other
            ))),
        }
    }
}

/// Distribution used by [`PhaseMode::Random`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
#[repr(u8)]
pub enum Distribution {
    /// Uniform over [-π, π].
    #[default]
    Uniform = 0,
    /// Normal, concentrated around 0 and clamped to [-π, π].
    Gaussian = 1,
}

impl TryFrom<u8> for Distribution {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Distribution::Uniform),
            1 => Ok(Distribution::Gaussian),
            other => Err(Error::InvalidParameter(format!(
                "distribution {} (expected 0-1)",
                other
            ))),
        }
    }
}

/// Restricts the effect to a range of bins with linear ramps at both edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandGate {
    pub low_bin: usize,
    pub high_bin: usize,
}

impl BandGate {
    /// Gate `[low_bin, high_bin]`; an inverted pair collapses to `low_bin`.
    pub fn new(low_bin: usize, high_bin: usize) -> Self {
        Self {
            low_bin,
            high_bin: high_bin.max(low_bin),
        }
    }

    /// Gate from edge frequencies for an FFT of `fft_size` at `sample_rate`.
    pub fn from_frequencies(low_hz: f32, high_hz: f32, fft_size: usize, sample_rate: f64) -> Self {
        let nyquist_bin = fft_size / 2;
        let to_bin = |hz: f32| -> usize {
            if sample_rate <= 0.0 || !hz.is_finite() {
                return 0;
            }
            let bin = (hz as f64 * fft_size as f64 / sample_rate).round();
            (bin.max(0.0) as usize).min(nyquist_bin)
        };
        Self::new(to_bin(low_hz), to_bin(high_hz))
    }

    /// Effect weight in [0, 1] for `bin`.
    #[inline]
    pub fn weight(&self, bin: usize) -> f32 {
        if bin < self.low_bin || bin > self.high_bin {
            return 0.0;
        }
        let distance = (bin - self.low_bin).min(self.high_bin - bin) as f32;
        ((distance + 1.0) / BAND_TRANSITION_BINS).clamp(0.0, 1.0)
    }
}

/// Candidate phase for one bin under `mode`.
///
/// `frost` is the captured spectrum; bins it does not cover fall back to 0.
#[inline]
pub fn candidate_phase(
    mode: PhaseMode,
    distribution: Distribution,
    original: f32,
    bin: usize,
    frost: &[f32],
    rng: &mut PhaseRng,
) -> f32 {
    match mode {
        PhaseMode::Zero => 0.0,
        PhaseMode::Frost => frost.get(bin).copied().unwrap_or(0.0),
        PhaseMode::Random => match distribution {
            Distribution::Uniform => rng.uniform_phase(),
            Distribution::Gaussian => rng.gaussian_phase(),
        },
        PhaseMode::Flip => -original,
    }
}

/// Blend `original` toward `candidate` by `weight`. A non-finite result keeps
/// the original phase.
#[inline]
pub fn blend_phase(original: f32, candidate: f32, weight: f32) -> f32 {
    let blended = original * (1.0 - weight) + candidate * weight;
    if blended.is_finite() {
        blended
    } else {
        original
    }
}

/// Wrap an angle into (-π, π].
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    let wrapped = (phase + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}
