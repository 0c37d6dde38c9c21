//! Workspace input document
//!
//! This is what the build/resolution collaborator hands over for one sync
//! pass: every project with its capability markers, declared source roots and
//! already-resolved configurations. Nothing here is resolved by us.

use super::{ArtifactId, PluginId, ProjectId};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceInput {
    #[serde(default)]
    pub projects: Vec<ProjectInput>,
}

impl WorkspaceInput {
    pub fn new(projects: Vec<ProjectInput>) -> Self {
        Self { projects }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse workspace input as JSON")
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse workspace input as YAML")
    }

    /// Loads a workspace document, choosing the parser by file extension
    /// (`.json`, otherwise YAML)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read workspace input {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
        .with_context(|| format!("Invalid workspace input {}", path.display()))
    }

    pub fn project(&self, id: &ProjectId) -> Option<&ProjectInput> {
        self.projects.iter().find(|p| &p.path == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub path: ProjectId,

    /// Name dependents reference this project by (defaults to the last path segment)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_name: Option<String>,

    /// Web context root (defaults to the deploy name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_path: Option<String>,

    #[serde(default)]
    pub plugins: Vec<PluginId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_source_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webapp_dir: Option<String>,

    /// Source compatibility, e.g. `11`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_version: Option<String>,

    #[serde(default)]
    pub configurations: Vec<ConfigurationInput>,
}

impl ProjectInput {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: ProjectId::new(path),
            deploy_name: None,
            context_path: None,
            plugins: Vec::new(),
            java_source_dir: None,
            webapp_dir: None,
            java_version: None,
            configurations: Vec::new(),
        }
    }

    pub fn with_plugin(mut self, plugin: PluginId) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn with_deploy_name(mut self, name: &str) -> Self {
        self.deploy_name = Some(name.to_string());
        self
    }

    pub fn with_configuration(mut self, name: &str, entries: Vec<ResolvedEntry>) -> Self {
        self.configurations.push(ConfigurationInput {
            name: name.to_string(),
            entries,
        });
        self
    }

    pub fn deploy_name(&self) -> String {
        self.deploy_name
            .clone()
            .unwrap_or_else(|| self.path.leaf_name().to_string())
    }

    /// Sub-projects referenced from any configuration, in declaration order
    pub fn project_references(&self) -> Vec<&ProjectId> {
        let mut refs: Vec<&ProjectId> = Vec::new();
        for entry in self.configurations.iter().flat_map(|c| &c.entries) {
            if let ResolvedEntry::Project { project, .. } = entry {
                if !refs.contains(&project) {
                    refs.push(project);
                }
            }
        }
        refs
    }
}

/// One resolved configuration: its name and every artifact or sub-project it
/// brought in, direct and transitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationInput {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<ResolvedEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedEntry {
    Artifact {
        artifact: ArtifactId,
        #[serde(default)]
        transitive: bool,
    },
    Project {
        project: ProjectId,
        #[serde(default)]
        transitive: bool,
    },
    /// The resolver could not resolve this selector
    Unresolved {
        unresolved: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl ResolvedEntry {
    pub fn artifact(id: ArtifactId) -> Self {
        ResolvedEntry::Artifact {
            artifact: id,
            transitive: false,
        }
    }

    pub fn transitive_artifact(id: ArtifactId) -> Self {
        ResolvedEntry::Artifact {
            artifact: id,
            transitive: true,
        }
    }

    pub fn project(path: &str) -> Self {
        ResolvedEntry::Project {
            project: ProjectId::new(path),
            transitive: false,
        }
    }

    pub fn unresolved(selector: &str, reason: Option<&str>) -> Self {
        ResolvedEntry::Unresolved {
            unresolved: selector.to_string(),
            reason: reason.map(str::to_string),
        }
    }
}
