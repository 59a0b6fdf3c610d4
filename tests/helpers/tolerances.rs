//! Tolerance constants for audio testing.
//!
//! Different operations require different precision levels.

/// Floating point rounding errors (passthrough, exact gain).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// FFT round trips and windowed overlap-add of unit-scale signals.
pub const DSP_EPSILON: f32 = 1e-4;

/// Audio perceptual tolerance (~-60dB, inaudible differences).
pub const PERCEPTUAL_EPSILON: f32 = 0.001;

/// Silence threshold (~-80dB).
pub const SILENCE_THRESHOLD: f32 = 0.0001;

/// Overlap-sum ripple of a symmetric Hann window of `len` samples (the
/// `len - 1` denominator makes the overlap sum deviate by about 1.6 / len).
pub fn hann_ripple(len: usize) -> f32 {
    2.0 / len as f32
}
