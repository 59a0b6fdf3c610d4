//! Capabilities the host exposes to the effect.

/// Host-side controls used by live reconfiguration.
///
/// A block size change runs `suspend_processing`, rebuilds the processor,
/// reports the new latency and then calls `resume_processing`. The host must
/// not invoke the audio callback between the suspend and resume calls.
pub trait HostControl {
    /// Stop calling the audio callback. Returns once no callback is in flight.
    fn suspend_processing(&self);

    /// Allow the audio callback to run again.
    fn resume_processing(&self);

    /// Report the effect's added delay in samples.
    fn set_latency_samples(&self, samples: usize);
}

/// Host without pause or latency reporting, for offline use and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHost;

impl HostControl for NoHost {
    fn suspend_processing(&self) {}

    fn resume_processing(&self) {}

    fn set_latency_samples(&self, _samples: usize) {}
}
