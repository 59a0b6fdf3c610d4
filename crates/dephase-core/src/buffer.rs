//! Planar multi-channel audio buffer.

/// Planar audio storage: one contiguous `Vec<f32>` per channel, all of equal length.
///
/// Used for host callback buffers as well as the fixed-size internal blocks
/// and overlap memories of the processing chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    frames: usize,
}

impl AudioBuffer {
    /// Create a silent buffer.
    pub fn new(num_channels: usize, num_frames: usize) -> Self {
        Self {
            channels: vec![vec![0.0; num_frames]; num_channels],
            frames: num_frames,
        }
    }

    /// Wrap existing channel data.
    ///
    /// Channels shorter than the longest one are zero-padded.
    pub fn from_channels(mut channels: Vec<Vec<f32>>) -> Self {
        let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
        for ch in &mut channels {
            ch.resize(frames, 0.0);
        }
        Self { channels, frames }
    }

    /// Build a buffer holding the same signal on every channel.
    pub fn from_mono(samples: &[f32], num_channels: usize) -> Self {
        Self {
            channels: vec![samples.to_vec(); num_channels],
            frames: samples.len(),
        }
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.frames
    }

    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    /// Resize and zero-fill. Allocates only when growing.
    pub fn resize(&mut self, num_channels: usize, num_frames: usize) {
        self.channels.resize_with(num_channels, Vec::new);
        for ch in &mut self.channels {
            ch.clear();
            ch.resize(num_frames, 0.0);
        }
        self.frames = num_frames;
    }

    /// Multiply every sample by `gain`.
    pub fn apply_gain(&mut self, gain: f32) {
        if gain == 1.0 {
            return;
        }
        for ch in &mut self.channels {
            ch.iter_mut().for_each(|s| *s *= gain);
        }
    }

    /// Multiply each channel pointwise by `window` (must match the frame count).
    pub fn apply_window(&mut self, window: &[f32]) {
        debug_assert_eq!(window.len(), self.frames);
        for ch in &mut self.channels {
            ch.iter_mut().zip(window).for_each(|(s, w)| *s *= w);
        }
    }

    /// Copy `len` frames of channel `src_channel` of `src` starting at
    /// `src_start` into this buffer at `dest_start`.
    #[inline]
    pub fn copy_from(
        &mut self,
        dest_channel: usize,
        dest_start: usize,
        src: &AudioBuffer,
        src_channel: usize,
        src_start: usize,
        len: usize,
    ) {
        self.channels[dest_channel][dest_start..dest_start + len]
            .copy_from_slice(&src.channels[src_channel][src_start..src_start + len]);
    }

    /// Add `len` frames of `src` into this buffer (mixing).
    #[inline]
    pub fn add_from(
        &mut self,
        dest_channel: usize,
        dest_start: usize,
        src: &AudioBuffer,
        src_channel: usize,
        src_start: usize,
        len: usize,
    ) {
        self.channels[dest_channel][dest_start..dest_start + len]
            .iter_mut()
            .zip(&src.channels[src_channel][src_start..src_start + len])
            .for_each(|(d, s)| *d += s);
    }

    /// Peak absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|ch| ch.iter())
            .fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }
}
