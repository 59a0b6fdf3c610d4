//! Host-facing wrapper around the phase processor.

use crate::controller::PhaseController;
use crate::params::PhaseParams;
use crate::processor::PhaseProcessor;
use crate::{DephaseBuilder, Result};
use dephase_core::{Arc, AudioBuffer};
use dephase_dsp::PhaseTrace;
use dephase_midi::MidiEvent;
use parking_lot::Mutex;

/// The phase effect as a host sees it.
///
/// The processor sits behind a single audio lock. The audio callback holds it
/// for one `process` call, and control-side actions hold it only for short
/// copies or a paused reconfiguration.
///
/// # Example
///
/// ```
/// use dephase::prelude::*;
///
/// let effect = Dephase::builder()
///     .sample_rate(48000.0)
///     .channels(2)
///     .seed(7)
///     .build()?;
///
/// effect.params().set_mode(PhaseMode::Flip);
///
/// let mut io = AudioBuffer::new(2, 480);
/// effect.process(&mut io, &[]);
/// assert_eq!(effect.latency_samples(), 1024);
/// # Ok::<(), dephase::Error>(())
/// ```
pub struct Dephase {
    processor: Arc<Mutex<PhaseProcessor>>,
    params: Arc<PhaseParams>,
    trace: Arc<Mutex<PhaseTrace>>,
}

impl Dephase {
    pub fn builder() -> DephaseBuilder {
        DephaseBuilder::default()
    }

    pub(crate) fn from_processor(processor: PhaseProcessor) -> Self {
        let params = Arc::clone(processor.params());
        let trace = processor.trace_handle();
        Self {
            processor: Arc::new(Mutex::new(processor)),
            params,
            trace,
        }
    }

    /// Audio callback: process `io` in place.
    pub fn process(&self, io: &mut AudioBuffer, midi: &[MidiEvent]) {
        self.processor.lock().process_block(io, midi);
    }

    /// Host prepare call. Returns the latency to report.
    pub fn prepare_to_play(
        &self,
        sample_rate: f64,
        max_block_size: usize,
        channels: usize,
    ) -> Result<usize> {
        let mut processor = self.processor.lock();
        processor.prepare_to_play(sample_rate, max_block_size, channels)?;
        Ok(processor.latency_samples())
    }

    pub fn latency_samples(&self) -> usize {
        self.processor.lock().latency_samples()
    }

    pub fn block_size(&self) -> usize {
        self.processor.lock().block_size()
    }

    pub fn params(&self) -> &Arc<PhaseParams> {
        &self.params
    }

    /// Handle for the GUI thread.
    pub fn controller(&self) -> PhaseController {
        PhaseController::new(
            Arc::clone(&self.processor),
            Arc::clone(&self.params),
            Arc::clone(&self.trace),
        )
    }

    /// Run `f` with exclusive access to the processor.
    pub fn with_processor<R>(&self, f: impl FnOnce(&mut PhaseProcessor) -> R) -> R {
        f(&mut self.processor.lock())
    }
}
