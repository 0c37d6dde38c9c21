//! Dependency scope mapping
//!
//! Configurations are collapsed into one scoped entry per distinct dependency.
//! Transitive entries carry the scope of the configuration they came through,
//! and a dependency seen under several configurations keeps the most visible
//! scope (`compile > provided > test`).

use super::{DependencyId, Origin, ProjectInput, ResolvedEntry};
use crate::error::ProjectError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Ordered by visibility, so `max` picks the winning scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Test,
    Provided,
    Compile,
}

impl Scope {
    pub fn all() -> [Scope; 3] {
        [Scope::Compile, Scope::Provided, Scope::Test]
    }

    /// Scope declared by a configuration, or `None` when the configuration
    /// does not declare deployable dependencies
    pub fn for_configuration(name: &str) -> Option<Scope> {
        match name {
            "compile" | "implementation" | "api" | "runtime" | "runtimeOnly"
            | "compileClasspath" | "runtimeClasspath" => Some(Scope::Compile),
            "providedCompile" | "providedRuntime" | "compileOnly" => Some(Scope::Provided),
            "testCompile" | "testImplementation" | "testRuntime" | "testRuntimeOnly"
            | "testCompileOnly" | "testCompileClasspath" | "testRuntimeClasspath" => {
                Some(Scope::Test)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Compile => write!(f, "compile"),
            Scope::Provided => write!(f, "provided"),
            Scope::Test => write!(f, "test"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedDependency {
    pub id: DependencyId,
    pub scope: Scope,
    /// False as soon as any configuration declares it directly
    pub transitive: bool,
}

impl ScopedDependency {
    pub fn origin(&self) -> Origin<'_> {
        self.id.origin()
    }
}

/// Collapses a project's configurations into scoped dependencies in
/// first-appearance order. Fails on the first unresolved entry: a project with
/// an unresolved dependency gets no descriptors at all.
pub fn map_scopes(project: &ProjectInput) -> Result<Vec<ScopedDependency>, ProjectError> {
    let mut dependencies: Vec<ScopedDependency> = Vec::new();
    let mut index: HashMap<DependencyId, usize> = HashMap::new();

    for configuration in &project.configurations {
        let Some(scope) = Scope::for_configuration(&configuration.name) else {
            debug!(
                project = %project.path,
                configuration = %configuration.name,
                "Skipping configuration without deployment scope"
            );
            continue;
        };

        for entry in &configuration.entries {
            let (id, transitive) = match entry {
                ResolvedEntry::Artifact {
                    artifact,
                    transitive,
                } => (DependencyId::Artifact(artifact.clone()), *transitive),
                ResolvedEntry::Project {
                    project,
                    transitive,
                } => (DependencyId::Project(project.clone()), *transitive),
                ResolvedEntry::Unresolved { unresolved, reason } => {
                    return Err(ProjectError::UnresolvedDependency {
                        project: project.path.clone(),
                        selector: unresolved.clone(),
                        reason: reason.clone(),
                    });
                }
            };

            match index.get(&id) {
                Some(&position) => {
                    let existing = &mut dependencies[position];
                    if scope > existing.scope {
                        debug!(
                            project = %project.path,
                            dependency = %id,
                            from = %existing.scope,
                            to = %scope,
                            "Scope conflict resolved by precedence"
                        );
                        existing.scope = scope;
                    }
                    existing.transitive &= transitive;
                }
                None => {
                    index.insert(id.clone(), dependencies.len());
                    dependencies.push(ScopedDependency {
                        id,
                        scope,
                        transitive,
                    });
                }
            }
        }
    }

    Ok(dependencies)
}
