//! Test helpers and fixtures for dephase integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (passthrough, unity gain)
//! - `DSP_EPSILON` (1e-4): FFT round trips
//! - `PERCEPTUAL_EPSILON` (0.001): Perceptual equivalence (-60dB)
//! - `SILENCE_THRESHOLD` (0.0001): Silence detection (-80dB)

#![allow(dead_code)]

pub mod tolerances;

use dephase::prelude::*;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// Standard host buffer size for deterministic testing
pub const TEST_BUFFER_SIZE: usize = 512;

/// Effect with a fixed seed at the test sample rate.
pub fn test_effect(channels: usize) -> Dephase {
    Dephase::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .channels(channels)
        .seed(0xDE_FA5E)
        .build()
        .expect("Failed to create test effect")
}

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f64, sample_rate: f64, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}

/// Generate white noise in -1..1, reproducible from `seed`.
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_samples).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Largest absolute difference between two equally long signals.
pub fn max_difference(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "length mismatch");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0_f32, f32::max)
}

/// Assert that two signals match sample-for-sample within `epsilon`.
pub fn assert_signals_equal(a: &[f32], b: &[f32], epsilon: f32, context: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", context);
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!(
            (x - y).abs() <= epsilon,
            "{}: sample {} differs ({} vs {}, epsilon {})",
            context,
            i,
            x,
            y,
            epsilon
        );
    }
}

/// Assert that a signal is approximately silent (all values near zero).
pub fn assert_silence(samples: &[f32], tolerance: f32) {
    let max = peak(samples);
    assert!(
        max <= tolerance,
        "Expected silence, but peak amplitude was {}",
        max
    );
}

/// Assert that a signal has content (not silent).
pub fn assert_has_audio(samples: &[f32], min_rms: f32) {
    let r = rms(samples);
    assert!(
        r >= min_rms,
        "Expected audio content with RMS >= {}, but RMS was {}",
        min_rms,
        r
    );
}

/// Feed `input` (copied to every channel) through `effect` in host buffers of
/// `buffer_size`, returning channel 0 of the output.
pub fn run_mono(effect: &Dephase, input: &[f32], buffer_size: usize) -> Vec<f32> {
    let channels = effect.with_processor(|p| p.config().channels);
    let mut output = Vec::with_capacity(input.len());
    for chunk in input.chunks(buffer_size) {
        let mut io = AudioBuffer::from_mono(chunk, channels);
        effect.process(&mut io, &[]);
        output.extend_from_slice(io.channel(0));
    }
    output
}

/// `input` followed by `extra` zeros, so delayed output can be flushed.
pub fn padded(input: &[f32], extra: usize) -> Vec<f32> {
    let mut out = input.to_vec();
    out.resize(input.len() + extra, 0.0);
    out
}

// =============================================================================
// Naive DFT reference (independent of rustfft)
// =============================================================================

/// Magnitudes of bins `0..=N/2` by direct summation in f64.
pub fn naive_magnitudes(frame: &[f32]) -> Vec<f64> {
    let n = frame.len();
    (0..=n / 2)
        .map(|k| {
            let (mut re, mut im) = (0.0_f64, 0.0_f64);
            for (t, &x) in frame.iter().enumerate() {
                let angle = -2.0 * std::f64::consts::PI * (k * t % n) as f64 / n as f64;
                re += x as f64 * angle.cos();
                im += x as f64 * angle.sin();
            }
            (re * re + im * im).sqrt()
        })
        .collect()
}

/// Inverse of a magnitude-only (zero-phase) spectrum: a real, circularly even
/// signal.
pub fn zero_phase_inverse(magnitudes: &[f64], n: usize) -> Vec<f32> {
    (0..n)
        .map(|t| {
            let mut acc = magnitudes[0];
            for k in 1..magnitudes.len() {
                let weight = if 2 * k == n { 1.0 } else { 2.0 };
                let angle = 2.0 * std::f64::consts::PI * (k * t % n) as f64 / n as f64;
                acc += weight * magnitudes[k] * angle.cos();
            }
            (acc / n as f64) as f32
        })
        .collect()
}

// =============================================================================
// Host double
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Suspend,
    Resume,
    Latency(usize),
}

/// Records every host control call in order.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }
}

impl HostControl for RecordingHost {
    fn suspend_processing(&self) {
        self.calls.lock().push(HostCall::Suspend);
    }

    fn resume_processing(&self) {
        self.calls.lock().push(HostCall::Resume);
    }

    fn set_latency_samples(&self, samples: usize) {
        self.calls.lock().push(HostCall::Latency(samples));
    }
}
