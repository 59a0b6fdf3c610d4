//! The phase effect's audio-side state: WOLA framing plus spectral processing.

use crate::config::DephaseConfig;
use crate::params::PhaseParams;
use crate::Result;
use dephase_core::{Arc, AudioBuffer};
use dephase_dsp::{
    FrameProcessor, OverlapAddEngine, PhaseRng, PhaseTrace, SpectralProcessor,
};
use dephase_midi::MidiEvent;
use parking_lot::Mutex;
use tracing::{debug, info};

/// Everything the audio callback touches.
///
/// Not internally synchronized; the owner wraps it in the audio lock (see
/// [`Dephase`](crate::Dephase)).
pub struct PhaseProcessor {
    config: DephaseConfig,
    params: Arc<PhaseParams>,
    engine: OverlapAddEngine,
    spectral: SpectralProcessor,
}

impl PhaseProcessor {
    pub fn new(config: DephaseConfig, params: Arc<PhaseParams>) -> Result<Self> {
        config.validate()?;

        let block_size = resolve_block_size(params.block_size(), config.force_power_of_two);
        let engine = OverlapAddEngine::new(config.channels, block_size, config.wola);
        let spectral = SpectralProcessor::new(
            config.channels,
            engine.frame_size(),
            PhaseRng::from_seed(config.rng_seed),
        );

        info!(
            "Phase processor created: {} Hz, {} channels, block {} ({:?}), latency {}",
            config.sample_rate,
            config.channels,
            engine.frame_size(),
            config.wola,
            engine.latency()
        );

        Ok(Self {
            config,
            params,
            engine,
            spectral,
        })
    }

    /// Adopt the host's stream settings and the current block size parameter.
    ///
    /// Buffers are only rebuilt when the block size or channel count actually
    /// changed, so redundant calls from the host cause no glitch.
    pub fn prepare_to_play(
        &mut self,
        sample_rate: f64,
        max_block_size: usize,
        channels: usize,
    ) -> Result<()> {
        let config = DephaseConfig {
            sample_rate,
            channels,
            max_block_size,
            ..self.config.clone()
        };
        config.validate()?;

        let block_size = self.desired_block_size();
        // compare the size the engine would actually run at, after overlap rounding
        let frame_size = config.wola.layout(block_size).frame_size;
        let unchanged =
            frame_size == self.engine.frame_size() && channels == self.config.channels;
        self.config = config;

        if unchanged {
            debug!(
                "prepare_to_play: block size {} unchanged, keeping buffers",
                block_size
            );
            return Ok(());
        }

        self.reconfigure(block_size);
        Ok(())
    }

    /// Rebuild at the block size currently requested by the parameters.
    /// Returns the new latency.
    pub fn reconfigure_from_params(&mut self) -> usize {
        let block_size = self.desired_block_size();
        self.reconfigure(block_size);
        self.latency_samples()
    }

    fn reconfigure(&mut self, block_size: usize) {
        let channels = self.config.channels;
        self.engine.configure(channels, block_size, self.config.wola);
        self.spectral.set_channels(channels);
        self.spectral.set_size(self.engine.frame_size());

        info!(
            "Phase processor reconfigured: block {}, {} channels, latency {}",
            self.engine.frame_size(),
            channels,
            self.latency_samples()
        );
    }

    /// Block size the parameters ask for, after power-of-two rounding.
    pub fn desired_block_size(&self) -> usize {
        resolve_block_size(self.params.block_size(), self.config.force_power_of_two)
    }

    /// Process one host callback in place.
    pub fn process_block(&mut self, io: &mut AudioBuffer, midi: &[MidiEvent]) {
        let mut stage = SpectralStage {
            spectral: &mut self.spectral,
            params: &self.params,
            sample_rate: self.config.sample_rate,
        };
        self.engine.process(io, midi, &mut stage);
    }

    /// Added delay in samples reported to the host.
    #[inline]
    pub fn latency_samples(&self) -> usize {
        self.engine.latency()
    }

    /// Current analysis block size.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.engine.frame_size()
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.spectral.num_bins()
    }

    pub fn config(&self) -> &DephaseConfig {
        &self.config
    }

    pub fn params(&self) -> &Arc<PhaseParams> {
        &self.params
    }

    /// Freeze the most recent input phase spectrum for frost mode.
    pub fn capture_frost(&mut self) {
        self.spectral.capture_frost();
        info!("Frost phase captured ({} bins)", self.spectral.num_bins());
    }

    pub fn frost(&self) -> &[f32] {
        self.spectral.frost()
    }

    pub(crate) fn trace_handle(&self) -> Arc<Mutex<PhaseTrace>> {
        self.spectral.trace_handle()
    }

    /// Restart the random phase sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.spectral.rng_mut().reseed(seed);
    }
}

/// Per-frame hook: snapshot the parameters, then run the spectral processor.
struct SpectralStage<'a> {
    spectral: &'a mut SpectralProcessor,
    params: &'a PhaseParams,
    sample_rate: f64,
}

impl FrameProcessor for SpectralStage<'_> {
    fn process_frame(&mut self, frame: &mut AudioBuffer, _midi: &[MidiEvent]) {
        let params = self
            .params
            .snapshot()
            .frame_params(self.spectral.size(), self.sample_rate);
        self.spectral.process(frame, &params);
    }
}

/// Apply power-of-two rounding. Exact powers of two are kept.
fn resolve_block_size(requested: usize, force_power_of_two: bool) -> usize {
    if !force_power_of_two {
        return requested;
    }
    let rounded = requested.next_power_of_two();
    if rounded != requested {
        debug!("Block size {} rounded up to {}", requested, rounded);
    }
    rounded
}
