//! Windowed overlap-add (WOLA) framing.
//!
//! [`OverlapAddEngine`] sits on top of a [`FixedBlockRebuffer`] running at the
//! hop size. Each hop it assembles a full analysis frame from the newest
//! sub-block plus the retained history, windows it, hands it to a
//! [`FrameProcessor`], windows the result again and overlap-adds it into the
//! output stream.
//!
//! Total latency is one full frame regardless of overlap: one sub-block from
//! the rebuffer plus `depth` sub-blocks of history.

use crate::rebuffer::FixedBlockRebuffer;
use crate::window::WindowKind;
use dephase_core::AudioBuffer;
use dephase_midi::MidiEvent;
use tracing::debug;

/// Frames shorter than this are passed through untouched.
pub const MIN_FRAME_SIZE: usize = 4;

/// Receives each windowed analysis frame and transforms it in place.
pub trait FrameProcessor {
    fn process_frame(&mut self, frame: &mut AudioBuffer, midi: &[MidiEvent]);
}

impl<F> FrameProcessor for F
where
    F: FnMut(&mut AudioBuffer, &[MidiEvent]),
{
    #[inline]
    fn process_frame(&mut self, frame: &mut AudioBuffer, midi: &[MidiEvent]) {
        self(frame, midi)
    }
}

/// Overlap between consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Overlap {
    /// 50 %: hop = frame / 2.
    #[default]
    Half,
    /// 75 %: hop = frame / 4.
    ThreeQuarter,
}

impl Overlap {
    /// Frames per hop.
    #[inline]
    pub fn factor(self) -> usize {
        match self {
            Overlap::Half => 2,
            Overlap::ThreeQuarter => 4,
        }
    }

    /// Number of earlier frames still overlapping the current hop.
    #[inline]
    pub fn depth(self) -> usize {
        self.factor() - 1
    }
}

/// Analysis/synthesis window pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum WolaWindows {
    /// No windowing on either side.
    Rectangular,
    /// Hann before processing, nothing after.
    HannAnalysis,
    /// Nothing before processing, Hann after.
    HannSynthesis,
    /// Square-root Hann on both sides.
    #[default]
    SqrtHann,
}

impl WolaWindows {
    pub fn analysis(self) -> WindowKind {
        match self {
            WolaWindows::Rectangular | WolaWindows::HannSynthesis => WindowKind::Rectangular,
            WolaWindows::HannAnalysis => WindowKind::Hann,
            WolaWindows::SqrtHann => WindowKind::SqrtHann,
        }
    }

    pub fn synthesis(self) -> WindowKind {
        match self {
            WolaWindows::Rectangular | WolaWindows::HannAnalysis => WindowKind::Rectangular,
            WolaWindows::HannSynthesis => WindowKind::Hann,
            WolaWindows::SqrtHann => WindowKind::SqrtHann,
        }
    }
}

/// One of the eight window/overlap combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct WolaKind {
    pub windows: WolaWindows,
    pub overlap: Overlap,
}

impl WolaKind {
    pub const fn new(windows: WolaWindows, overlap: Overlap) -> Self {
        Self { windows, overlap }
    }

    /// Every supported combination.
    pub fn all() -> [WolaKind; 8] {
        use Overlap::*;
        use WolaWindows::*;
        [
            WolaKind::new(Rectangular, Half),
            WolaKind::new(Rectangular, ThreeQuarter),
            WolaKind::new(HannAnalysis, Half),
            WolaKind::new(HannAnalysis, ThreeQuarter),
            WolaKind::new(HannSynthesis, Half),
            WolaKind::new(HannSynthesis, ThreeQuarter),
            WolaKind::new(SqrtHann, Half),
            WolaKind::new(SqrtHann, ThreeQuarter),
        ]
    }

    /// Output gain that brings the overlapped window product back to unity.
    pub fn gain(self) -> f32 {
        match (self.windows, self.overlap) {
            (WolaWindows::Rectangular, Overlap::Half) => 0.5,
            (WolaWindows::Rectangular, Overlap::ThreeQuarter) => 0.25,
            (_, Overlap::Half) => 1.0,
            (_, Overlap::ThreeQuarter) => 0.5,
        }
    }

    /// Resolve sizes for a requested frame size. Sizes that do not divide by
    /// the overlap factor are rounded down to the nearest multiple.
    pub fn layout(self, frame_size: usize) -> WolaLayout {
        let factor = self.overlap.factor();
        let hop = frame_size / factor;
        if frame_size < MIN_FRAME_SIZE || hop == 0 {
            return WolaLayout {
                frame_size: 0,
                hop_size: 0,
                depth: self.overlap.depth(),
                gain: 1.0,
            };
        }
        WolaLayout {
            frame_size: hop * factor,
            hop_size: hop,
            depth: self.overlap.depth(),
            gain: self.gain(),
        }
    }
}

/// Sizes and constants of a configured engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WolaLayout {
    /// Analysis frame length; 0 when passing through.
    pub frame_size: usize,
    pub hop_size: usize,
    /// Rotating accumulator slots.
    pub depth: usize,
    pub gain: f32,
}

impl WolaLayout {
    #[inline]
    pub fn is_passthrough(&self) -> bool {
        self.frame_size == 0
    }

    #[inline]
    pub fn latency(&self) -> usize {
        self.frame_size
    }
}

/// Per-hop framing state, kept apart from the rebuffer so the two can be
/// borrowed independently.
#[derive(Debug, Clone)]
struct FrameState {
    layout: WolaLayout,
    analysis: Vec<f32>,
    synthesis: Vec<f32>,
    frame: AudioBuffer,
    /// Last `depth` sub-blocks of input, oldest first.
    history: AudioBuffer,
    /// Tail of each of the last `depth` synthesized frames.
    accumulators: Vec<AudioBuffer>,
    out_counter: usize,
}

impl FrameState {
    fn new(num_channels: usize, kind: WolaKind, layout: WolaLayout) -> Self {
        let tail = layout.depth * layout.hop_size;
        Self {
            layout,
            analysis: kind.windows.analysis().generate(layout.frame_size),
            synthesis: kind.windows.synthesis().generate(layout.frame_size),
            frame: AudioBuffer::new(num_channels, layout.frame_size),
            history: AudioBuffer::new(num_channels, tail),
            accumulators: vec![AudioBuffer::new(num_channels, tail); layout.depth],
            out_counter: 0,
        }
    }

    fn process_hop<F>(&mut self, block: &mut AudioBuffer, midi: &[MidiEvent], frames: &mut F)
    where
        F: FrameProcessor + ?Sized,
    {
        let hop = self.layout.hop_size;
        let depth = self.layout.depth;
        let tail = depth * hop;
        let channels = block.num_channels().min(self.frame.num_channels());

        for ch in 0..channels {
            self.frame.copy_from(ch, 0, &self.history, ch, 0, tail);
            self.frame.copy_from(ch, tail, block, ch, 0, hop);
            self.history.copy_from(ch, 0, &self.frame, ch, hop, tail);
        }

        self.frame.apply_window(&self.analysis);
        frames.process_frame(&mut self.frame, midi);
        self.frame.apply_window(&self.synthesis);

        let oc = self.out_counter;
        for ch in 0..channels {
            block.copy_from(ch, 0, &self.frame, ch, 0, hop);
            for (slot, acc) in self.accumulators.iter().enumerate() {
                let segment = (oc + depth - 1 - slot) % depth;
                block.add_from(ch, 0, acc, ch, segment * hop, hop);
            }
            self.accumulators[oc].copy_from(ch, 0, &self.frame, ch, hop, tail);
        }
        self.out_counter = (oc + 1) % depth;

        block.apply_gain(self.layout.gain);
    }
}

/// WOLA engine with a fixed one-frame latency.
#[derive(Debug, Clone)]
pub struct OverlapAddEngine {
    kind: WolaKind,
    num_channels: usize,
    rebuffer: FixedBlockRebuffer,
    state: FrameState,
}

impl OverlapAddEngine {
    pub fn new(num_channels: usize, frame_size: usize, kind: WolaKind) -> Self {
        let layout = kind.layout(frame_size);
        Self {
            kind,
            num_channels,
            rebuffer: FixedBlockRebuffer::new(num_channels, layout.hop_size),
            state: FrameState::new(num_channels, kind, layout),
        }
    }

    /// Rebuild windows and buffers. All history is discarded.
    pub fn configure(&mut self, num_channels: usize, frame_size: usize, kind: WolaKind) {
        let layout = kind.layout(frame_size);
        self.kind = kind;
        self.num_channels = num_channels;
        self.rebuffer.configure(num_channels, layout.hop_size);
        self.state = FrameState::new(num_channels, kind, layout);
        debug!(
            "WOLA configured: frame {}, hop {}, depth {}, gain {}",
            layout.frame_size, layout.hop_size, layout.depth, layout.gain
        );
    }

    #[inline]
    pub fn kind(&self) -> WolaKind {
        self.kind
    }

    #[inline]
    pub fn layout(&self) -> WolaLayout {
        self.state.layout
    }

    #[inline]
    pub fn frame_size(&self) -> usize {
        self.state.layout.frame_size
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Added delay in frames: one full analysis frame, or 0 when passing
    /// through.
    #[inline]
    pub fn latency(&self) -> usize {
        self.state.layout.latency()
    }

    /// Run one host callback. `frames` is invoked once per hop with the
    /// windowed analysis frame.
    pub fn process<F>(&mut self, io: &mut AudioBuffer, midi: &[MidiEvent], frames: &mut F)
    where
        F: FrameProcessor + ?Sized,
    {
        if self.state.layout.is_passthrough() {
            return;
        }

        let state = &mut self.state;
        self.rebuffer.process(
            io,
            midi,
            &mut |block: &mut AudioBuffer, midi: &[MidiEvent], _: usize| {
                state.process_hop(block, midi, frames);
            },
        );
    }
}
