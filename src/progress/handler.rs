//! Progress handler trait and events

use std::time::Duration;

/// Events emitted during a sync pass
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Sync started
    Started { projects: usize },

    PhaseStarted { phase: String },

    PhaseComplete { phase: String, duration: Duration },

    /// Project has none of the recognized capability markers
    KindUnrecognized { project: String, markers: Vec<String> },

    /// Descriptors of one project were computed
    ProjectResolved {
        project: String,
        classpath_entries: usize,
        modules: usize,
    },

    /// Descriptors of one project could not be computed
    ProjectFailed { project: String, error: String },

    /// Sync finished (possibly with failed projects)
    Completed {
        resolved: usize,
        failed: usize,
        total_time: Duration,
    },
}

/// Trait for handling progress events during a sync pass
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
