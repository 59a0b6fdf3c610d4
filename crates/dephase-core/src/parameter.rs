//! Parameter ranges for host automation.
//!
//! Hosts automate in normalized 0.0-1.0 space; the effect reads real values.
//! A [`ParameterRange`] converts between the two and clamps out-of-range input
//! to the nearest valid value, which is the only "error handling" a parameter
//! write ever gets on the audio path.
//!
//! # Example
//!
//! ```
//! use dephase_core::{ParameterRange, ParameterScale};
//!
//! // Band edge: 20Hz to 20kHz, logarithmic scaling
//! let low = ParameterRange::logarithmic(20.0, 20000.0, 100.0);
//!
//! let hz = low.denormalize(0.5); // ~632 Hz (geometric mean)
//! let back = low.normalize(hz); // ~0.5
//! assert!((back - 0.5).abs() < 1e-4);
//! ```

/// Smallest analysis block size a host may request.
pub const MIN_BLOCK_SIZE: usize = 256;

/// Largest analysis block size a host may request.
pub const MAX_BLOCK_SIZE: usize = 8192;

/// Analysis block size used until the host says otherwise.
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Lowest band-gate edge frequency.
pub const MIN_FREQ_HZ: f32 = 20.0;

/// Highest band-gate edge frequency (further limited to Nyquist at run time).
pub const MAX_FREQ_HZ: f32 = 20000.0;

/// How a parameter value is scaled between normalized (0-1) and real values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ParameterScale {
    /// `real = min + normalized * (max - min)`
    #[default]
    Linear,

    /// `real = min * (max/min)^normalized`, for frequencies.
    ///
    /// Requires `min > 0`.
    Logarithmic,

    /// On/off: normalized < 0.5 is `min`, otherwise `max`.
    Toggle,

    /// Discrete integer steps (block sizes, enum selectors).
    Integer,
}

/// Valid range, default, and scaling of one parameter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
    /// Default real value, always inside `[min, max]`.
    pub default: f32,
    pub scale: ParameterScale,
}

impl ParameterRange {
    pub fn new(min: f32, max: f32, default: f32, scale: ParameterScale) -> Self {
        debug_assert!(max > min, "max must be greater than min");

        Self {
            min,
            max,
            default: default.clamp(min, max),
            scale,
        }
    }

    pub fn linear(min: f32, max: f32, default: f32) -> Self {
        Self::new(min, max, default, ParameterScale::Linear)
    }

    /// # Panics
    ///
    /// Panics in debug mode if `min <= 0`.
    pub fn logarithmic(min: f32, max: f32, default: f32) -> Self {
        debug_assert!(min > 0.0, "logarithmic scale requires min > 0");
        Self::new(min, max, default, ParameterScale::Logarithmic)
    }

    pub fn toggle(default_on: bool) -> Self {
        Self::new(
            0.0,
            1.0,
            if default_on { 1.0 } else { 0.0 },
            ParameterScale::Toggle,
        )
    }

    pub fn integer(min: i32, max: i32, default: i32) -> Self {
        Self::new(
            min as f32,
            max as f32,
            default as f32,
            ParameterScale::Integer,
        )
    }

    /// Convert a real value to normalized (0.0-1.0).
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let value = self.clamp(value);
        let span = self.span();

        if span <= 0.0 {
            return 0.0;
        }

        match self.scale {
            ParameterScale::Linear => (value - self.min) / span,
            ParameterScale::Logarithmic if self.min > 0.0 => {
                (value / self.min).ln() / (self.max / self.min).ln()
            }
            ParameterScale::Logarithmic => (value - self.min) / span,
            ParameterScale::Toggle => {
                if value >= self.min + span * 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            ParameterScale::Integer => (value.round() - self.min) / span,
        }
    }

    /// Convert a normalized value (0.0-1.0) to a real value.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        let span = self.span();

        match self.scale {
            ParameterScale::Linear => self.min + normalized * span,
            ParameterScale::Logarithmic if self.min > 0.0 => {
                self.min * (self.max / self.min).powf(normalized)
            }
            ParameterScale::Logarithmic => self.min + normalized * span,
            ParameterScale::Toggle => {
                if normalized >= 0.5 {
                    self.max
                } else {
                    self.min
                }
            }
            ParameterScale::Integer => (self.min + normalized * span).round(),
        }
    }

    /// Clamp a real value to this range, snapping integers. NaN maps to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        let value = value.clamp(self.min, self.max);
        match self.scale {
            ParameterScale::Integer => value.round(),
            _ => value,
        }
    }

    #[inline]
    pub fn default_normalized(&self) -> f32 {
        self.normalize(self.default)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    #[inline]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

impl Default for ParameterRange {
    fn default() -> Self {
        Self::linear(0.0, 1.0, 0.5)
    }
}
