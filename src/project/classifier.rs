//! Project classification from applied capability markers

use super::{PluginId, ProjectInput, ProjectKind, SourceRoot};
use serde::{Deserialize, Serialize};

pub const DEFAULT_JAVA_SOURCE_DIR: &str = "src/main/java";
pub const DEFAULT_WEBAPP_DIR: &str = "src/main/webapp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// `None` when no recognized marker is applied
    pub kind: Option<ProjectKind>,
    /// Canonical source roots for the kind, in deployment order
    pub source_roots: Vec<SourceRoot>,
}

impl Classification {
    pub fn unrecognized() -> Self {
        Self {
            kind: None,
            source_roots: Vec::new(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.kind.is_some()
    }
}

/// `war` implies a web application even when `java` is applied alongside it.
pub fn kind_from_markers(markers: &[PluginId]) -> Option<ProjectKind> {
    if markers.contains(&PluginId::War) {
        Some(ProjectKind::WebApplication)
    } else if markers
        .iter()
        .any(|m| matches!(m, PluginId::Java | PluginId::JavaLibrary))
    {
        Some(ProjectKind::JavaLibrary)
    } else {
        None
    }
}

pub fn classify(project: &ProjectInput) -> Classification {
    let Some(kind) = kind_from_markers(&project.plugins) else {
        return Classification::unrecognized();
    };

    let java_root = SourceRoot::java(
        project
            .java_source_dir
            .as_deref()
            .unwrap_or(DEFAULT_JAVA_SOURCE_DIR),
    );

    let source_roots = match kind {
        ProjectKind::JavaLibrary => vec![java_root],
        ProjectKind::WebApplication => vec![
            java_root,
            SourceRoot::webapp(project.webapp_dir.as_deref().unwrap_or(DEFAULT_WEBAPP_DIR)),
        ],
    };

    Classification {
        kind: Some(kind),
        source_roots,
    }
}
