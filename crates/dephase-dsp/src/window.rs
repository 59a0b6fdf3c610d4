//! Analysis and synthesis window tables.

use core::f32::consts::PI;

/// Window shape applied before or after spectral processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum WindowKind {
    #[default]
    Rectangular,
    Hann,
    SqrtHann,
}

impl WindowKind {
    /// Generate `length` coefficients of this window.
    ///
    /// Hann is the symmetric form `0.5 * (1 - cos(2πn / (length - 1)))`.
    /// Lengths below 2 yield all-ones, so no length is invalid.
    pub fn generate(self, length: usize) -> Vec<f32> {
        if length < 2 {
            return vec![1.0; length];
        }

        match self {
            WindowKind::Rectangular => vec![1.0; length],
            WindowKind::Hann => (0..length).map(|n| hann(n, length)).collect(),
            WindowKind::SqrtHann => (0..length).map(|n| hann(n, length).sqrt()).collect(),
        }
    }
}

#[inline]
fn hann(n: usize, length: usize) -> f32 {
    let angle = 2.0 * PI * n as f32 / (length - 1) as f32;
    // cos can overshoot 1.0 by an ulp near the edges
    (0.5 * (1.0 - angle.cos())).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangular_is_all_ones() {
        assert!(WindowKind::Rectangular.generate(64).iter().all(|&c| c == 1.0));
    }

    #[test]
    fn test_hann_shape() {
        let w = WindowKind::Hann.generate(9);
        assert_relative_eq!(w[0], 0.0, epsilon = 1e-7);
        assert_relative_eq!(w[4], 1.0, epsilon = 1e-7);
        assert_relative_eq!(w[8], 0.0, epsilon = 1e-6);
        assert_relative_eq!(w[2], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_sqrt_hann_squares_to_hann() {
        let hann = WindowKind::Hann.generate(256);
        let sqrt = WindowKind::SqrtHann.generate(256);
        for (h, s) in hann.iter().zip(&sqrt) {
            assert_relative_eq!(s * s, *h, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_coefficients_in_unit_range() {
        for kind in [WindowKind::Hann, WindowKind::SqrtHann] {
            for len in [2, 3, 255, 1024] {
                assert!(kind
                    .generate(len)
                    .iter()
                    .all(|c| (0.0..=1.0).contains(c)));
            }
        }
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(WindowKind::Hann.generate(0).is_empty());
        assert_eq!(WindowKind::SqrtHann.generate(1), vec![1.0]);
    }
}
