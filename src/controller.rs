//! Control-thread handle: trace display, frost capture and live block size
//! changes.

use crate::host::HostControl;
use crate::params::PhaseParams;
use crate::processor::PhaseProcessor;
use dephase_core::Arc;
use dephase_dsp::PhaseTrace;
use parking_lot::Mutex;
use tracing::info;

/// Cheap to clone; every clone talks to the same processor.
#[derive(Clone)]
pub struct PhaseController {
    processor: Arc<Mutex<PhaseProcessor>>,
    params: Arc<PhaseParams>,
    trace: Arc<Mutex<PhaseTrace>>,
}

impl PhaseController {
    pub(crate) fn new(
        processor: Arc<Mutex<PhaseProcessor>>,
        params: Arc<PhaseParams>,
        trace: Arc<Mutex<PhaseTrace>>,
    ) -> Self {
        Self {
            processor,
            params,
            trace,
        }
    }

    pub fn params(&self) -> &Arc<PhaseParams> {
        &self.params
    }

    /// Copy of the latest pre/post phase trace.
    pub fn phase_trace(&self) -> PhaseTrace {
        self.trace.lock().clone()
    }

    /// Copy the latest trace into caller-owned vectors, reusing their storage.
    pub fn copy_trace_into(&self, pre: &mut Vec<f32>, post: &mut Vec<f32>) {
        let trace = self.trace.lock();
        pre.clear();
        pre.extend_from_slice(&trace.pre);
        post.clear();
        post.extend_from_slice(&trace.post);
    }

    /// Freeze the current input phase spectrum for frost mode.
    pub fn capture_frost(&self) {
        self.processor.lock().capture_frost();
    }

    /// Change the analysis block size while the host is running.
    ///
    /// Suspends the host's audio callback, rebuilds the processor under the
    /// audio lock, reports the new latency and resumes. Returns the new
    /// latency in samples.
    pub fn set_block_size(&self, size: usize, host: &dyn HostControl) -> usize {
        self.params.set_block_size(size);

        host.suspend_processing();
        let latency = self.processor.lock().reconfigure_from_params();
        host.set_latency_samples(latency);
        host.resume_processing();

        info!("Block size changed to {} (latency {})", size, latency);
        latency
    }
}
