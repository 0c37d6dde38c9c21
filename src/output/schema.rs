//! Descriptor model produced by a sync pass
//!
//! A [`ProjectModel`] bundles the three outgoing descriptors of one project:
//! the classpath entries, the component (module assembly) and the facet set.
//! Serialization to the IDE's own file formats is left to the consumer; these
//! types only fix the content.

use crate::deploy::{ClasspathEntry, Component, DeployNameLookup, FacetSet};
use crate::error::ProjectError;
use crate::project::{ProjectId, ProjectKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectModel {
    pub project: ProjectId,
    /// `None` when no recognized capability marker is applied
    pub kind: Option<ProjectKind>,
    pub deploy_name: String,
    pub classpath: Vec<ClasspathEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<Component>,
    pub facets: FacetSet,
}

impl ProjectModel {
    pub fn classpath_entry(&self, entry_id: &str) -> Option<&ClasspathEntry> {
        self.classpath.iter().find(|e| e.entry_id == entry_id)
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.component
            .iter()
            .flat_map(|c| c.modules.iter())
            .map(|m| m.reference.name())
            .collect()
    }
}

impl DeployNameLookup for BTreeMap<ProjectId, ProjectModel> {
    fn deploy_name_of(&self, project: &ProjectId) -> Option<String> {
        self.get(project).map(|model| model.deploy_name.clone())
    }
}

/// Outcome of one sync pass over a workspace
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub models: BTreeMap<ProjectId, ProjectModel>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<ProjectId, ProjectError>,
}

impl SyncReport {
    pub fn model(&self, project: &str) -> Option<&ProjectModel> {
        self.models.get(&ProjectId::new(project))
    }

    pub fn failure(&self, project: &str) -> Option<&ProjectError> {
        self.failures.get(&ProjectId::new(project))
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// SHA-256 over the canonical JSON of all models. Equal inputs give equal
    /// fingerprints.
    pub fn fingerprint(&self) -> Result<String> {
        let canonical =
            serde_json::to_vec(&self.models).context("Failed to serialize project models")?;
        Ok(hex::encode(Sha256::digest(&canonical)))
    }
}
