//! DSP core of dephase: fixed-block rebuffering, windowed overlap-add framing
//! and FFT-domain phase manipulation.
//!
//! The pieces compose bottom-up. [`FixedBlockRebuffer`] turns host callbacks
//! into fixed blocks, [`OverlapAddEngine`] turns those into overlapping
//! windowed frames, and [`SpectralProcessor`] rewrites the phase of each frame.
//!
//! ```
//! use dephase_core::AudioBuffer;
//! use dephase_dsp::{FrameParams, OverlapAddEngine, PhaseRng, SpectralProcessor, WolaKind};
//! use dephase_midi::MidiEvent;
//!
//! let mut engine = OverlapAddEngine::new(2, 1024, WolaKind::default());
//! let mut spectral = SpectralProcessor::new(2, engine.frame_size(), PhaseRng::new(1));
//! let params = FrameParams::default();
//!
//! let mut io = AudioBuffer::new(2, 480);
//! engine.process(&mut io, &[], &mut |frame: &mut AudioBuffer, _: &[MidiEvent]| {
//!     spectral.process(frame, &params);
//! });
//! assert_eq!(engine.latency(), 1024);
//! ```

mod error;
pub use error::{Error, Result};

pub mod phase;
pub use phase::{BandGate, Distribution, PhaseMode};

mod random;
pub use random::{PhaseRng, GAUSSIAN_CONCENTRATION};

mod rebuffer;
pub use rebuffer::{BlockProcessor, FixedBlockRebuffer};

mod spectral;
pub use spectral::{num_bins, polar, FrameParams, PhaseTrace, SpectralProcessor};

mod window;
pub use window::WindowKind;

mod wola;
pub use wola::{FrameProcessor, OverlapAddEngine, Overlap, WolaKind, WolaLayout, WolaWindows};
