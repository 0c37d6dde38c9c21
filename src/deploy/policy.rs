//! Deployment policy
//!
//! Decides, per `(project kind, scope)`, how a dependency shows up in the two
//! outgoing descriptors: the deployment attribute on its classpath entry, and
//! whether it becomes a component module.
//!
//! The decision table is data. [`DeploymentTable`] ships the reference table
//! and a corrected variant, and can be loaded from TOML:
//!
//! ```toml
//! [[rule]]
//! kind = "web-application"
//! scope = "provided"
//! attribute = "excluded"
//! module = "/WEB-INF/lib"
//! ```
//!
//! Any other implementation of [`DeploymentPolicy`] can be plugged into the
//! resolver instead.

use crate::project::{ProjectKind, Scope, ScopedDependency};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_LIB_DEPLOY_PATH: &str = "/WEB-INF/lib";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentAttribute {
    Deployed,
    Excluded,
    None,
}

impl fmt::Display for DeploymentAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentAttribute::Deployed => write!(f, "deployed"),
            DeploymentAttribute::Excluded => write!(f, "excluded"),
            DeploymentAttribute::None => write!(f, "none"),
        }
    }
}

/// Where a dependency's deployment is expressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "location", rename_all = "snake_case")]
pub enum DecisionLocation {
    ClasspathAttribute,
    ComponentModule { deployed_at: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentDecision {
    pub attribute: DeploymentAttribute,
    #[serde(flatten)]
    pub location: DecisionLocation,
}

impl DeploymentDecision {
    pub fn classpath(attribute: DeploymentAttribute) -> Self {
        Self {
            attribute,
            location: DecisionLocation::ClasspathAttribute,
        }
    }

    pub fn module(attribute: DeploymentAttribute, deployed_at: &str) -> Self {
        Self {
            attribute,
            location: DecisionLocation::ComponentModule {
                deployed_at: deployed_at.to_string(),
            },
        }
    }

    /// No marker, no module
    pub fn none() -> Self {
        Self::classpath(DeploymentAttribute::None)
    }

    pub fn module_path(&self) -> Option<&str> {
        match &self.location {
            DecisionLocation::ComponentModule { deployed_at } => Some(deployed_at),
            DecisionLocation::ClasspathAttribute => None,
        }
    }

    /// Marker written on the classpath entry; `None` means no marker at all
    pub fn marker(&self) -> Option<DeploymentAttribute> {
        match self.attribute {
            DeploymentAttribute::None => None,
            attribute => Some(attribute),
        }
    }
}

/// A dependency paired with the decision taken for it in one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecidedDependency {
    pub dependency: ScopedDependency,
    pub decision: DeploymentDecision,
}

pub trait DeploymentPolicy: Send + Sync {
    fn decide(&self, kind: ProjectKind, scope: Scope) -> DeploymentDecision;

    fn name(&self) -> &str {
        "custom"
    }
}

/// Applies a policy to every dependency of a project. Unrecognized projects get
/// no markers and no modules.
pub fn decide_all(
    policy: &dyn DeploymentPolicy,
    kind: Option<ProjectKind>,
    dependencies: &[ScopedDependency],
) -> Vec<DecidedDependency> {
    dependencies
        .iter()
        .map(|dependency| DecidedDependency {
            dependency: dependency.clone(),
            decision: match kind {
                Some(kind) => policy.decide(kind, dependency.scope),
                None => DeploymentDecision::none(),
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("No deployment rule for {kind} / {scope}")]
    MissingRule { kind: ProjectKind, scope: Scope },

    #[error("More than one deployment rule for {kind} / {scope}")]
    DuplicateRule { kind: ProjectKind, scope: Scope },

    #[error("Rule for {kind} / {scope} assigns a component module, but libraries have no module assembly")]
    ModuleForLibrary { kind: ProjectKind, scope: Scope },

    #[error("Rule for {kind} / {scope} marks dependencies as deployed on the classpath; web applications deploy through component modules only")]
    DeployedInWebApplication { kind: ProjectKind, scope: Scope },

    #[error("Module deploy path '{path}' must be absolute")]
    RelativeModulePath { path: String },

    #[error("Failed to parse deployment table: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRule {
    pub kind: ProjectKind,
    pub scope: Scope,
    pub attribute: DeploymentAttribute,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl DeploymentRule {
    fn decision(&self) -> DeploymentDecision {
        match &self.module {
            Some(path) => DeploymentDecision::module(self.attribute, path),
            None => DeploymentDecision::classpath(self.attribute),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RawTable {
    #[serde(default, rename = "rule")]
    rules: Vec<DeploymentRule>,
}

/// Validated decision table covering every `(kind, scope)` pair exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTable {
    name: String,
    rules: Vec<DeploymentRule>,
    lookup: BTreeMap<(ProjectKind, Scope), DeploymentDecision>,
}

impl DeploymentTable {
    pub fn from_rules(name: &str, rules: Vec<DeploymentRule>) -> Result<Self, PolicyError> {
        let mut lookup = BTreeMap::new();

        for rule in &rules {
            match (rule.kind, &rule.module) {
                (ProjectKind::JavaLibrary, Some(_)) => {
                    return Err(PolicyError::ModuleForLibrary {
                        kind: rule.kind,
                        scope: rule.scope,
                    });
                }
                (_, Some(path)) if !path.starts_with('/') => {
                    return Err(PolicyError::RelativeModulePath { path: path.clone() });
                }
                _ => {}
            }

            if rule.kind == ProjectKind::WebApplication
                && rule.attribute == DeploymentAttribute::Deployed
            {
                return Err(PolicyError::DeployedInWebApplication {
                    kind: rule.kind,
                    scope: rule.scope,
                });
            }

            if lookup
                .insert((rule.kind, rule.scope), rule.decision())
                .is_some()
            {
                return Err(PolicyError::DuplicateRule {
                    kind: rule.kind,
                    scope: rule.scope,
                });
            }
        }

        for kind in ProjectKind::all() {
            for scope in Scope::all() {
                if !lookup.contains_key(&(kind, scope)) {
                    return Err(PolicyError::MissingRule { kind, scope });
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            rules,
            lookup,
        })
    }

    pub fn from_toml_str(name: &str, content: &str) -> Result<Self, PolicyError> {
        let raw: RawTable =
            toml::from_str(content).map_err(|e| PolicyError::Parse(e.to_string()))?;
        Self::from_rules(name, raw.rules)
    }

    pub fn to_toml_string(&self) -> Result<String, PolicyError> {
        toml::to_string_pretty(&RawTable {
            rules: self.rules.clone(),
        })
        .map_err(|e| PolicyError::Parse(e.to_string()))
    }

    /// Reference behavior: libraries mark compile and provided dependencies as
    /// deployed; web applications exclude everything from the classpath and
    /// deploy each dependency as a module under `lib_path`.
    pub fn reference_with(lib_path: &str) -> Result<Self, PolicyError> {
        Self::from_rules("reference", Self::base_rules(DeploymentAttribute::Deployed, lib_path))
    }

    pub fn reference() -> Self {
        Self::builtin(DeploymentAttribute::Deployed, "reference")
    }

    /// Same as the reference table, except provided dependencies of a library
    /// carry no deployment marker.
    pub fn corrected_with(lib_path: &str) -> Result<Self, PolicyError> {
        Self::from_rules("corrected", Self::base_rules(DeploymentAttribute::None, lib_path))
    }

    pub fn corrected() -> Self {
        Self::builtin(DeploymentAttribute::None, "corrected")
    }

    fn builtin(library_provided: DeploymentAttribute, name: &str) -> Self {
        let rules = Self::base_rules(library_provided, DEFAULT_LIB_DEPLOY_PATH);
        let lookup = rules
            .iter()
            .map(|rule| ((rule.kind, rule.scope), rule.decision()))
            .collect();
        Self {
            name: name.to_string(),
            rules,
            lookup,
        }
    }

    fn base_rules(library_provided: DeploymentAttribute, lib_path: &str) -> Vec<DeploymentRule> {
        let library = |scope, attribute| DeploymentRule {
            kind: ProjectKind::JavaLibrary,
            scope,
            attribute,
            module: None,
        };
        let web = |scope| DeploymentRule {
            kind: ProjectKind::WebApplication,
            scope,
            attribute: DeploymentAttribute::Excluded,
            module: Some(lib_path.to_string()),
        };

        vec![
            library(Scope::Compile, DeploymentAttribute::Deployed),
            library(Scope::Provided, library_provided),
            library(Scope::Test, DeploymentAttribute::None),
            web(Scope::Compile),
            web(Scope::Provided),
            web(Scope::Test),
        ]
    }

    pub fn rules(&self) -> &[DeploymentRule] {
        &self.rules
    }
}

impl Default for DeploymentTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl DeploymentPolicy for DeploymentTable {
    fn decide(&self, kind: ProjectKind, scope: Scope) -> DeploymentDecision {
        self.lookup
            .get(&(kind, scope))
            .cloned()
            .unwrap_or_else(DeploymentDecision::none)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
