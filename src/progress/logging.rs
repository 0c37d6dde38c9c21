//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { projects } => {
                info!(projects, "Starting sync");
            }
            ProgressEvent::PhaseStarted { phase } => {
                debug!(phase = %phase, "Starting phase");
            }
            ProgressEvent::PhaseComplete { phase, duration } => {
                debug!(
                    phase = %phase,
                    duration_ms = duration.as_millis(),
                    "Phase complete"
                );
            }
            ProgressEvent::KindUnrecognized { project, markers } => {
                info!(
                    project = %project,
                    markers = %markers.join(","),
                    "No recognized project kind, emitting classpath only"
                );
            }
            ProgressEvent::ProjectResolved {
                project,
                classpath_entries,
                modules,
            } => {
                debug!(
                    project = %project,
                    classpath_entries,
                    modules,
                    "Project descriptors resolved"
                );
            }
            ProgressEvent::ProjectFailed { project, error } => {
                warn!(project = %project, error = %error, "Project failed");
            }
            ProgressEvent::Completed {
                resolved,
                failed,
                total_time,
            } => {
                if *failed > 0 {
                    warn!(
                        resolved,
                        failed,
                        total_time_ms = total_time.as_millis(),
                        "Sync complete with failures"
                    );
                } else {
                    info!(
                        resolved,
                        total_time_ms = total_time.as_millis(),
                        "Sync complete"
                    );
                }
            }
        }
    }
}
