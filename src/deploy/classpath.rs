//! Classpath entries with deployment markers

use super::policy::{DecidedDependency, DeploymentAttribute};
use crate::project::{Origin, Scope};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginKind {
    Lib,
    Project,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathEntry {
    pub entry_id: String,
    pub origin_kind: OriginKind,
    /// Absent when the dependency carries no deployment marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_attribute: Option<DeploymentAttribute>,
    pub scope: Scope,
    pub transitive: bool,
}

/// One entry per decided dependency, in the order given. Dependencies without a
/// marker are still emitted since compilation needs them.
pub fn build_classpath(decided: &[DecidedDependency]) -> Vec<ClasspathEntry> {
    decided
        .iter()
        .map(|d| ClasspathEntry {
            entry_id: d.dependency.id.to_string(),
            origin_kind: match d.dependency.origin() {
                Origin::ExternalArtifact(_) => OriginKind::Lib,
                Origin::Subproject(_) => OriginKind::Project,
            },
            deployment_attribute: d.decision.marker(),
            scope: d.dependency.scope,
            transitive: d.dependency.transitive,
        })
        .collect()
}
