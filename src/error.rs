//! Error types for a sync pass
//!
//! [`SyncError`] aborts the whole pass before any descriptor is computed.
//! [`ProjectError`] aborts a single project (and everything that depends on
//! it); other projects in the same pass are still resolved.

use crate::project::ProjectId;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("Project dependency cycle: {}", format_cycle(.path))]
    Cycle { path: Vec<ProjectId> },

    #[error("Project {from} depends on unknown project {to}")]
    UnknownProject { from: ProjectId, to: ProjectId },

    #[error("Project {0} is declared more than once")]
    DuplicateProject(ProjectId),
}

fn format_cycle(path: &[ProjectId]) -> String {
    path.iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ProjectError {
    #[error(
        "Dependency '{selector}' of {project} could not be resolved: {}",
        .reason.as_deref().unwrap_or("no reason given")
    )]
    UnresolvedDependency {
        project: ProjectId,
        selector: String,
        reason: Option<String>,
    },

    #[error("Project {project} depends on {dependency}, which failed")]
    DependencyFailed {
        project: ProjectId,
        dependency: ProjectId,
    },

    #[error("Model of {dependency} is not available yet (required by {project})")]
    DependencyNotReady {
        project: ProjectId,
        dependency: ProjectId,
    },

    #[error("Descriptors of {project} are inconsistent: {message}")]
    InconsistentModel { project: ProjectId, message: String },
}

impl ProjectError {
    pub fn project(&self) -> &ProjectId {
        match self {
            ProjectError::UnresolvedDependency { project, .. }
            | ProjectError::DependencyFailed { project, .. }
            | ProjectError::DependencyNotReady { project, .. }
            | ProjectError::InconsistentModel { project, .. } => project,
        }
    }
}
