//! FFT-domain phase processing of analysis frames.
//!
//! Each frame goes through a forward FFT, has the phase of every bin in
//! `0..=N/2` replaced according to the active [`PhaseMode`] (magnitudes are
//! kept), and is transformed back. The phases of channel 0 before and after
//! the change are published as a [`PhaseTrace`] for display.

use crate::phase::{blend_phase, candidate_phase, BandGate, Distribution, PhaseMode};
use crate::random::PhaseRng;
use dephase_core::AudioBuffer;
use parking_lot::Mutex;
use rustfft::{num_complex::Complex, Fft, FftPlanner, Length};
use std::sync::Arc;
use tracing::debug;

/// Phase of every bin before and after processing, for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PhaseTrace {
    pub pre: Vec<f32>,
    pub post: Vec<f32>,
}

impl PhaseTrace {
    pub fn zeroed(num_bins: usize) -> Self {
        Self {
            pre: vec![0.0; num_bins],
            post: vec![0.0; num_bins],
        }
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.pre.len()
    }
}

/// Parameter values applied to one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub mode: PhaseMode,
    pub distribution: Distribution,
    /// 0 = dry frame only, 1 = processed only.
    pub dry_wet: f32,
    /// `None` applies the effect to every bin.
    pub band: Option<BandGate>,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            mode: PhaseMode::Zero,
            distribution: Distribution::Uniform,
            dry_wet: 1.0,
            band: None,
        }
    }
}

/// Number of non-redundant bins of a real FFT of `size`.
#[inline]
pub fn num_bins(size: usize) -> usize {
    size / 2 + 1
}

/// Magnitude and phase of a bin. Silent or non-finite bins report phase 0.
#[inline]
pub fn polar(re: f32, im: f32) -> (f32, f32) {
    let magnitude = (re * re + im * im).sqrt();
    let phase = im.atan2(re);
    if magnitude == 0.0 || !phase.is_finite() {
        (magnitude, 0.0)
    } else {
        (magnitude, phase)
    }
}

pub struct SpectralProcessor {
    size: usize,
    num_channels: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    real: AudioBuffer,
    imag: AudioBuffer,
    dry: Vec<f32>,
    frost: Vec<f32>,
    pending: PhaseTrace,
    trace: Arc<Mutex<PhaseTrace>>,
    rng: PhaseRng,
}

impl SpectralProcessor {
    pub fn new(num_channels: usize, size: usize, rng: PhaseRng) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let mut processor = Self {
            size: 0,
            num_channels,
            forward,
            inverse,
            spectrum: Vec::new(),
            scratch: Vec::new(),
            real: AudioBuffer::default(),
            imag: AudioBuffer::default(),
            dry: Vec::new(),
            frost: Vec::new(),
            pending: PhaseTrace::default(),
            trace: Arc::new(Mutex::new(PhaseTrace::default())),
            rng,
        };
        processor.set_size(size);
        processor
    }

    /// Replan the FFT for frames of `size`.
    ///
    /// The captured frost spectrum and both phase traces are reset to zeros of
    /// the new bin count; old captures are discarded rather than resampled.
    pub fn set_size(&mut self, size: usize) {
        if size != self.forward.len() {
            let mut planner = FftPlanner::new();
            self.forward = planner.plan_fft_forward(size);
            self.inverse = planner.plan_fft_inverse(size);
            debug!("FFT replanned for {} points", size);
        }
        self.size = size;
        let bins = num_bins(size);

        self.spectrum = vec![Complex::new(0.0, 0.0); size];
        let scratch_len = self
            .forward
            .get_inplace_scratch_len()
            .max(self.inverse.get_inplace_scratch_len());
        self.scratch = vec![Complex::new(0.0, 0.0); scratch_len];
        self.real.resize(self.num_channels, bins);
        self.imag.resize(self.num_channels, bins);
        self.dry = vec![0.0; size];
        self.frost = vec![0.0; bins];
        self.pending = PhaseTrace::zeroed(bins);
        *self.trace.lock() = PhaseTrace::zeroed(bins);
    }

    /// Change the channel count, keeping the frame size.
    pub fn set_channels(&mut self, num_channels: usize) {
        self.num_channels = num_channels;
        let bins = num_bins(self.size);
        self.real.resize(num_channels, bins);
        self.imag.resize(num_channels, bins);
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        num_bins(self.size)
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn rng_mut(&mut self) -> &mut PhaseRng {
        &mut self.rng
    }

    /// Captured phase spectrum used by [`PhaseMode::Frost`].
    #[inline]
    pub fn frost(&self) -> &[f32] {
        &self.frost
    }

    /// Replace the frost spectrum with the most recent pre-processing phases.
    /// Before any frame has been processed this captures zeros.
    pub fn capture_frost(&mut self) {
        let trace = self.trace.lock();
        self.frost.fill(0.0);
        let n = self.frost.len().min(trace.pre.len());
        self.frost[..n].copy_from_slice(&trace.pre[..n]);
    }

    /// Shared handle to the published trace.
    pub fn trace_handle(&self) -> Arc<Mutex<PhaseTrace>> {
        Arc::clone(&self.trace)
    }

    /// Copy of the published trace.
    pub fn phase_trace(&self) -> PhaseTrace {
        self.trace.lock().clone()
    }

    /// Real and imaginary bins of the last processed frame of `channel`,
    /// after the phase change.
    pub fn bins(&self, channel: usize) -> (&[f32], &[f32]) {
        (self.real.channel(channel), self.imag.channel(channel))
    }

    /// Process one windowed frame in place.
    ///
    /// Frames whose length differs from the configured size are left as they
    /// are.
    pub fn process(&mut self, frame: &mut AudioBuffer, params: &FrameParams) {
        let n = self.size;
        if n == 0 || frame.num_frames() != n {
            return;
        }
        let bins = num_bins(n);
        let wet = params.dry_wet.clamp(0.0, 1.0);
        let channels = frame.num_channels().min(self.num_channels);
        let scale = 1.0 / n as f32;

        for ch in 0..channels {
            let samples = frame.channel_mut(ch);
            self.dry.copy_from_slice(samples);
            for (bin, &s) in self.spectrum.iter_mut().zip(samples.iter()) {
                *bin = Complex::new(s, 0.0);
            }
            self.forward
                .process_with_scratch(&mut self.spectrum, &mut self.scratch);

            let real = self.real.channel_mut(ch);
            let imag = self.imag.channel_mut(ch);
            for k in 0..bins {
                let (magnitude, original) = polar(self.spectrum[k].re, self.spectrum[k].im);
                let weight = params.band.map_or(1.0, |gate| gate.weight(k));
                let candidate = candidate_phase(
                    params.mode,
                    params.distribution,
                    original,
                    k,
                    &self.frost,
                    &mut self.rng,
                );
                let phase = blend_phase(original, candidate, weight);

                real[k] = magnitude * phase.cos();
                imag[k] = magnitude * phase.sin();

                if ch == 0 {
                    self.pending.pre[k] = original;
                    self.pending.post[k] = phase;
                }
            }

            // Hermitian fill so the inverse is real
            for k in 0..bins {
                self.spectrum[k] = Complex::new(real[k], imag[k]);
            }
            for k in bins..n {
                self.spectrum[k] = self.spectrum[n - k].conj();
            }
            self.inverse
                .process_with_scratch(&mut self.spectrum, &mut self.scratch);

            for ((out, bin), dry) in samples.iter_mut().zip(&self.spectrum).zip(&self.dry) {
                *out = dry * (1.0 - wet) + bin.re * scale * wet;
            }
        }

        if channels > 0 {
            self.publish_trace();
        }
    }

    /// Swap the pending trace into the shared one. The lock is only held for
    /// the swap.
    fn publish_trace(&mut self) {
        let mut shared = self.trace.lock();
        std::mem::swap(&mut *shared, &mut self.pending);
    }
}
