//! Host-automatable parameter store.
//!
//! Every parameter lives in its own lock-free cell so the control thread can
//! write while the audio thread reads. The audio thread takes one
//! [`ParamSnapshot`] per frame and never looks at the cells mid-frame.

use dephase_core::parameter::{
    DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE, MAX_FREQ_HZ, MIN_BLOCK_SIZE, MIN_FREQ_HZ,
};
use dephase_core::{AtomicFlag, AtomicFloat, AtomicU8, AtomicUsize, Ordering, ParameterRange};
use dephase_dsp::{BandGate, Distribution, FrameParams, PhaseMode};
use tracing::warn;

/// Default lower band edge.
pub const DEFAULT_LOW_HZ: f32 = 100.0;

/// Default upper band edge.
pub const DEFAULT_HIGH_HZ: f32 = 5000.0;

/// Identifies one automatable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ParamId {
    Mode,
    BlockSize,
    DryWet,
    Distribution,
    BandMode,
    LowFreq,
    HighFreq,
}

impl ParamId {
    pub const ALL: [ParamId; 7] = [
        ParamId::Mode,
        ParamId::BlockSize,
        ParamId::DryWet,
        ParamId::Distribution,
        ParamId::BandMode,
        ParamId::LowFreq,
        ParamId::HighFreq,
    ];

    /// Stable identifier used by hosts and presets.
    pub fn id(self) -> &'static str {
        match self {
            ParamId::Mode => "mode",
            ParamId::BlockSize => "blocksize",
            ParamId::DryWet => "drywet",
            ParamId::Distribution => "distribution",
            ParamId::BandMode => "bandmode",
            ParamId::LowFreq => "lowfreq",
            ParamId::HighFreq => "highfreq",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamId::Mode => "Mode",
            ParamId::BlockSize => "Block Size",
            ParamId::DryWet => "Dry/Wet",
            ParamId::Distribution => "Distribution",
            ParamId::BandMode => "Band Mode",
            ParamId::LowFreq => "Low Frequency",
            ParamId::HighFreq => "High Frequency",
        }
    }

    pub fn range(self) -> ParameterRange {
        match self {
            ParamId::Mode => ParameterRange::integer(0, 3, PhaseMode::Zero as i32),
            ParamId::BlockSize => ParameterRange::integer(
                MIN_BLOCK_SIZE as i32,
                MAX_BLOCK_SIZE as i32,
                DEFAULT_BLOCK_SIZE as i32,
            ),
            ParamId::DryWet => ParameterRange::linear(0.0, 1.0, 1.0),
            ParamId::Distribution => ParameterRange::integer(0, 1, Distribution::Uniform as i32),
            ParamId::BandMode => ParameterRange::toggle(false),
            ParamId::LowFreq => {
                ParameterRange::logarithmic(MIN_FREQ_HZ, MAX_FREQ_HZ, DEFAULT_LOW_HZ)
            }
            ParamId::HighFreq => {
                ParameterRange::logarithmic(MIN_FREQ_HZ, MAX_FREQ_HZ, DEFAULT_HIGH_HZ)
            }
        }
    }
}

/// Lock-free parameter cells shared by the control and audio threads.
#[derive(Debug)]
pub struct PhaseParams {
    mode: AtomicU8,
    block_size: AtomicUsize,
    dry_wet: AtomicFloat,
    distribution: AtomicU8,
    band_mode: AtomicFlag,
    low_hz: AtomicFloat,
    high_hz: AtomicFloat,
}

impl Default for PhaseParams {
    fn default() -> Self {
        Self {
            mode: AtomicU8::new(PhaseMode::Zero as u8),
            block_size: AtomicUsize::new(DEFAULT_BLOCK_SIZE),
            dry_wet: AtomicFloat::new(1.0),
            distribution: AtomicU8::new(Distribution::Uniform as u8),
            band_mode: AtomicFlag::new(false),
            low_hz: AtomicFloat::new(DEFAULT_LOW_HZ),
            high_hz: AtomicFloat::new(DEFAULT_HIGH_HZ),
        }
    }
}

impl PhaseParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> PhaseMode {
        PhaseMode::try_from(self.mode.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn set_mode(&self, mode: PhaseMode) {
        self.mode.store(mode as u8, Ordering::Release);
    }

    /// Requested analysis block size, always within the supported range.
    pub fn block_size(&self) -> usize {
        self.block_size.load(Ordering::Acquire)
    }

    /// Out-of-range sizes are clamped. Takes effect at the next prepare.
    pub fn set_block_size(&self, size: usize) {
        let clamped = size.clamp(MIN_BLOCK_SIZE, MAX_BLOCK_SIZE);
        if clamped != size {
            warn!("Block size {} out of range, clamped to {}", size, clamped);
        }
        self.block_size.store(clamped, Ordering::Release);
    }

    pub fn dry_wet(&self) -> f32 {
        self.dry_wet.get()
    }

    pub fn set_dry_wet(&self, mix: f32) {
        self.dry_wet.set(ParamId::DryWet.range().clamp(mix));
    }

    pub fn distribution(&self) -> Distribution {
        Distribution::try_from(self.distribution.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn set_distribution(&self, distribution: Distribution) {
        self.distribution
            .store(distribution as u8, Ordering::Release);
    }

    pub fn band_mode(&self) -> bool {
        self.band_mode.get()
    }

    pub fn set_band_mode(&self, enabled: bool) {
        self.band_mode.set(enabled);
    }

    pub fn low_freq(&self) -> f32 {
        self.low_hz.get()
    }

    /// Raising the low edge above the high edge drags the high edge along.
    pub fn set_low_freq(&self, hz: f32) {
        let hz = ParamId::LowFreq.range().clamp(hz);
        self.low_hz.set(hz);
        if self.high_hz.get() < hz {
            self.high_hz.set(hz);
        }
    }

    pub fn high_freq(&self) -> f32 {
        self.high_hz.get()
    }

    /// Lowering the high edge below the low edge drags the low edge along.
    pub fn set_high_freq(&self, hz: f32) {
        let hz = ParamId::HighFreq.range().clamp(hz);
        self.high_hz.set(hz);
        if self.low_hz.get() > hz {
            self.low_hz.set(hz);
        }
    }

    /// Current real value of `id`.
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::Mode => self.mode() as u8 as f32,
            ParamId::BlockSize => self.block_size() as f32,
            ParamId::DryWet => self.dry_wet(),
            ParamId::Distribution => self.distribution() as u8 as f32,
            ParamId::BandMode => {
                if self.band_mode() {
                    1.0
                } else {
                    0.0
                }
            }
            ParamId::LowFreq => self.low_freq(),
            ParamId::HighFreq => self.high_freq(),
        }
    }

    /// Set `id` from a real value, clamped to its range.
    pub fn set(&self, id: ParamId, value: f32) {
        let value = id.range().clamp(value);
        match id {
            ParamId::Mode => {
                self.set_mode(PhaseMode::try_from(value as u8).unwrap_or_default())
            }
            ParamId::BlockSize => self.set_block_size(value as usize),
            ParamId::DryWet => self.set_dry_wet(value),
            ParamId::Distribution => {
                self.set_distribution(Distribution::try_from(value as u8).unwrap_or_default())
            }
            ParamId::BandMode => self.set_band_mode(value >= 0.5),
            ParamId::LowFreq => self.set_low_freq(value),
            ParamId::HighFreq => self.set_high_freq(value),
        }
    }

    pub fn normalized(&self, id: ParamId) -> f32 {
        id.range().normalize(self.get(id))
    }

    pub fn set_normalized(&self, id: ParamId, normalized: f32) {
        self.set(id, id.range().denormalize(normalized));
    }

    /// Read every cell once.
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            mode: self.mode(),
            distribution: self.distribution(),
            dry_wet: self.dry_wet(),
            band_mode: self.band_mode(),
            low_hz: self.low_freq(),
            high_hz: self.high_freq(),
            block_size: self.block_size(),
        }
    }
}

/// Parameter values as seen by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    pub mode: PhaseMode,
    pub distribution: Distribution,
    pub dry_wet: f32,
    pub band_mode: bool,
    pub low_hz: f32,
    pub high_hz: f32,
    pub block_size: usize,
}

impl ParamSnapshot {
    /// Resolve to per-frame settings for an FFT of `fft_size`. Band edges are
    /// limited to Nyquist.
    pub fn frame_params(&self, fft_size: usize, sample_rate: f64) -> FrameParams {
        let band = self.band_mode.then(|| {
            let nyquist = (sample_rate * 0.5) as f32;
            let limit = |hz: f32| hz.clamp(MIN_FREQ_HZ, nyquist.max(MIN_FREQ_HZ));
            BandGate::from_frequencies(
                limit(self.low_hz),
                limit(self.high_hz),
                fft_size,
                sample_rate,
            )
        });
        FrameParams {
            mode: self.mode,
            distribution: self.distribution,
            dry_wet: self.dry_wet,
            band,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let params = PhaseParams::new();
        assert_eq!(params.mode(), PhaseMode::Zero);
        assert_eq!(params.block_size(), 1024);
        assert_eq!(params.dry_wet(), 1.0);
        assert_eq!(params.distribution(), Distribution::Uniform);
        assert!(!params.band_mode());
        assert_eq!(params.low_freq(), 100.0);
        assert_eq!(params.high_freq(), 5000.0);

        for id in ParamId::ALL {
            assert_relative_eq!(
                params.normalized(id),
                id.range().default_normalized(),
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn test_block_size_clamped() {
        let params = PhaseParams::new();
        params.set_block_size(10);
        assert_eq!(params.block_size(), 256);
        params.set_block_size(100_000);
        assert_eq!(params.block_size(), 8192);
    }

    #[test]
    fn test_band_edges_self_correct() {
        let params = PhaseParams::new();
        params.set_low_freq(8000.0);
        assert_eq!(params.high_freq(), 8000.0);

        params.set_high_freq(50.0);
        assert_eq!(params.low_freq(), 50.0);
        assert_eq!(params.high_freq(), 50.0);

        params.set_high_freq(1.0);
        assert_eq!(params.high_freq(), MIN_FREQ_HZ);
    }

    #[test]
    fn test_normalized_roundtrip() {
        let params = PhaseParams::new();
        params.set_normalized(ParamId::Mode, 1.0);
        assert_eq!(params.mode(), PhaseMode::Flip);
        params.set_normalized(ParamId::Distribution, 0.9);
        assert_eq!(params.distribution(), Distribution::Gaussian);
        params.set_normalized(ParamId::BandMode, 0.7);
        assert!(params.band_mode());
        params.set_normalized(ParamId::BlockSize, 0.0);
        assert_eq!(params.block_size(), 256);
        params.set_normalized(ParamId::DryWet, 0.3);
        assert_relative_eq!(params.dry_wet(), 0.3);
    }

    #[test]
    fn test_snapshot_band_limited_to_nyquist() {
        let params = PhaseParams::new();
        params.set_band_mode(true);
        params.set_low_freq(100.0);
        params.set_high_freq(20000.0);

        let frame = params.snapshot().frame_params(1024, 22050.0);
        let gate = frame.band.expect("band mode on");
        assert_eq!(gate.high_bin, 512);
        assert_eq!(gate.low_bin, 5);
    }

    #[test]
    fn test_snapshot_without_band() {
        let frame = PhaseParams::new().snapshot().frame_params(1024, 48000.0);
        assert!(frame.band.is_none());
        assert_eq!(frame.mode, PhaseMode::Zero);
    }
}
