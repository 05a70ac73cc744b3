//! Common generator contract

use crate::error::ComponentError;
use crate::report::ComponentReport;
use crate::shutdown::StopSignal;
use async_trait::async_trait;

/// What a component does to the system under test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Issues requests against the platform's network API
    pub drives_network_load: bool,
    /// Issues statements against the isolated datastore copy
    pub drives_datastore_load: bool,
    /// Observes without generating load
    pub observes_only: bool,
}

/// One load-generating or observing component of a run.
///
/// Components run until the stop signal fires or their own bound is
/// reached, then produce their report. A `Setup` error aborts the whole
/// run; any later failure is the component's own problem and surfaces as
/// `completed: false` in its report.
#[async_trait]
pub trait LoadComponent: Send {
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    async fn run(&mut self, stop: StopSignal) -> Result<ComponentReport, ComponentError>;
}
