//! # dephase - spectral phase effect
//!
//! Rewrites the phase spectrum of incoming audio while keeping its magnitude
//! spectrum, using windowed overlap-add STFT framing with a fixed latency of
//! one analysis block.
//!
//! ## Architecture
//!
//! dephase is an umbrella crate over:
//! - **dephase-core** - audio buffers, lock-free parameter cells, parameter ranges
//! - **dephase-midi** - sample-accurate MIDI events
//! - **dephase-dsp** - fixed-block rebuffering, WOLA framing, spectral phase processing
//!
//! On top of these it provides the parameter store ([`PhaseParams`]), the
//! audio-side [`PhaseProcessor`], the lock-holding host wrapper [`Dephase`] and
//! the GUI-side [`PhaseController`].
//!
//! ## Quick Start
//!
//! ```
//! use dephase::prelude::*;
//!
//! let effect = Dephase::builder().sample_rate(48000.0).channels(2).build()?;
//! let latency = effect.prepare_to_play(48000.0, 256, 2)?;
//!
//! effect.params().set_mode(PhaseMode::Random);
//! effect.params().set_distribution(Distribution::Gaussian);
//!
//! let mut io = AudioBuffer::new(2, 256);
//! effect.process(&mut io, &[]);
//!
//! // GUI timer
//! let trace = effect.controller().phase_trace();
//! assert_eq!(trace.num_bins(), 1024 / 2 + 1);
//! assert_eq!(latency, 1024);
//! # Ok::<(), dephase::Error>(())
//! ```

pub use dephase_core as core;
pub use dephase_dsp as dsp;
pub use dephase_midi as midi;

pub use dephase_core::{AudioBuffer, ParameterRange, ParameterScale};
pub use dephase_dsp::{
    BandGate, Distribution, Overlap, PhaseMode, PhaseTrace, WindowKind, WolaKind, WolaWindows,
};
pub use dephase_midi::MidiEvent;

mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::DephaseConfig;

pub mod params;
pub use params::{ParamId, ParamSnapshot, PhaseParams};

mod host;
pub use host::{HostControl, NoHost};

mod processor;
pub use processor::PhaseProcessor;

mod controller;
pub use controller::PhaseController;

mod builder;
mod effect;

pub use builder::DephaseBuilder;
pub use effect::Dephase;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Dephase, DephaseBuilder, DephaseConfig, PhaseController};

    pub use crate::{HostControl, NoHost, ParamId, PhaseParams};

    pub use crate::{
        AudioBuffer, Distribution, MidiEvent, Overlap, PhaseMode, PhaseTrace, WolaKind,
        WolaWindows,
    };

    pub use crate::{Error, Result};
}
