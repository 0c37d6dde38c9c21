//! Project inputs and their normalization.
//!
//! A sync pass receives a [`WorkspaceInput`] from the build/resolution
//! collaborator. Before any descriptor is computed, each project is classified
//! ([`classifier`]) and its configurations are collapsed into scoped
//! dependencies ([`scope`]).
//!
//! # Project kinds
//!
//! [`ProjectKind`] is closed: a project is either a plain Java library or a web
//! application. Projects whose capability markers match neither are carried
//! through with `kind: None` and get no facets and no component.

#[macro_use]
pub mod id_enum_macro;

pub mod artifact;
pub mod classifier;
pub mod input;
pub mod plugin_id;
pub mod scope;

pub use artifact::{ArtifactId, ArtifactParseError, DependencyId, Origin};
pub use classifier::{classify, kind_from_markers, Classification};
pub use input::{ConfigurationInput, ProjectInput, ResolvedEntry, WorkspaceInput};
pub use plugin_id::PluginId;
pub use scope::{map_scopes, Scope, ScopedDependency};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Project path within the build, e.g. `:lib` or `:apps:web`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, used as the default deploy name
    pub fn leaf_name(&self) -> &str {
        self.0
            .rsplit(|c: char| c == ':' || c == '/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("root")
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Deployment role of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    JavaLibrary,
    WebApplication,
}

impl ProjectKind {
    pub fn all() -> [ProjectKind; 2] {
        [ProjectKind::JavaLibrary, ProjectKind::WebApplication]
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKind::JavaLibrary => write!(f, "java-library"),
            ProjectKind::WebApplication => write!(f, "web-application"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceRootRole {
    /// Compiled sources
    Java,
    /// Web content deployed as-is
    WebApp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRoot {
    pub path: String,
    pub role: SourceRootRole,
}

impl SourceRoot {
    pub fn java(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            role: SourceRootRole::Java,
        }
    }

    pub fn webapp(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            role: SourceRootRole::WebApp,
        }
    }
}
