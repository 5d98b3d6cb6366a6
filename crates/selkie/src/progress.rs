//! Cooperative progress reporting.
//!
//! Phases look at [`ProgressMonitor::is_canceled`] once, before they touch the graph. A phase
//! that has started mutating always runs to completion.

use crate::{Error, Result};

pub trait ProgressMonitor {
    fn begin(&mut self, _task: &str) {}

    fn done(&mut self) {}

    fn is_canceled(&self) -> bool {
        false
    }
}

/// Monitor that reports nothing and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMonitor;

impl ProgressMonitor for NullMonitor {}

pub(crate) fn begin_phase(monitor: &mut dyn ProgressMonitor, phase: &'static str) -> Result<()> {
    if monitor.is_canceled() {
        tracing::debug!(phase, "wrapping phase canceled before start");
        return Err(Error::Canceled { phase });
    }
    monitor.begin(phase);
    Ok(())
}
