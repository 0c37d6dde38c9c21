//! Dependency identities
//!
//! External artifacts are identified by their coordinates, sub-projects by
//! their project path. The version is part of an artifact's identity, so two
//! versions of the same module are two classpath entries.

use super::ProjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid artifact coordinates '{0}': expected group:name:version[:classifier]")]
pub struct ArtifactParseError(pub String);

/// Maven-style coordinates of a resolved external artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId {
    pub group: String,
    pub name: String,
    pub version: String,
    pub classifier: Option<String>,
}

impl ArtifactId {
    pub fn new(group: &str, name: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: &str) -> Self {
        self.classifier = Some(classifier.to_string());
        self
    }

    /// File name the artifact is packaged under, e.g. `guava-31.1-jre.jar`
    pub fn file_name(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!("{}-{}-{}.jar", self.name, self.version, classifier),
            None => format!("{}-{}.jar", self.name, self.version),
        }
    }
}

impl FromStr for ArtifactId {
    type Err = ArtifactParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if !(3..=4).contains(&parts.len()) || parts.iter().any(|p| p.is_empty()) {
            return Err(ArtifactParseError(s.to_string()));
        }

        let mut id = ArtifactId::new(parts[0], parts[1], parts[2]);
        if let Some(classifier) = parts.get(3) {
            id = id.with_classifier(classifier);
        }
        Ok(id)
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = ArtifactParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        Ok(())
    }
}

/// Identity used to deduplicate dependencies within a project
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DependencyId {
    Artifact(ArtifactId),
    Project(ProjectId),
}

impl DependencyId {
    pub fn origin(&self) -> Origin<'_> {
        match self {
            DependencyId::Artifact(artifact) => Origin::ExternalArtifact(artifact),
            DependencyId::Project(project) => Origin::Subproject(project),
        }
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyId::Artifact(artifact) => write!(f, "{}", artifact),
            DependencyId::Project(project) => write!(f, "{}", project),
        }
    }
}

/// Where a dependency comes from. Drives the classpath origin kind and the
/// component module reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin<'a> {
    ExternalArtifact(&'a ArtifactId),
    Subproject(&'a ProjectId),
}
