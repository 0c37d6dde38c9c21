//! Component (module assembly) model
//!
//! Resources map source roots to their location inside the deployed artifact.
//! Modules are the dependencies a web application packages; a library never has
//! any.

use super::policy::DecidedDependency;
use crate::error::ProjectError;
use crate::project::{
    Classification, Origin, ProjectId, ProjectInput, ProjectKind, SourceRootRole,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const WEB_CLASSES_PATH: &str = "/WEB-INF/classes";
pub const ROOT_PATH: &str = "/";

/// Resolves the deploy name of an already-computed sub-project
pub trait DeployNameLookup {
    fn deploy_name_of(&self, project: &ProjectId) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentResource {
    pub source_root: String,
    pub deployed_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModuleReference {
    Artifact { file_name: String },
    Project { deploy_name: String },
}

impl ModuleReference {
    pub fn name(&self) -> &str {
        match self {
            ModuleReference::Artifact { file_name } => file_name,
            ModuleReference::Project { deploy_name } => deploy_name,
        }
    }

    /// Handle the IDE uses to address the module
    pub fn handle(&self) -> String {
        match self {
            ModuleReference::Artifact { file_name } => {
                format!("module:/classpath/lib/{}", file_name)
            }
            ModuleReference::Project { deploy_name } => {
                format!("module:/resource/{}/{}", deploy_name, deploy_name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentModule {
    pub reference: ModuleReference,
    pub deployed_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentProperty {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub deploy_name: String,
    pub resources: Vec<ComponentResource>,
    pub modules: Vec<ComponentModule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ComponentProperty>,
}

impl Component {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// Builds the component for a classified project; `None` for projects of an
/// unrecognized kind.
pub fn assemble_component(
    project: &ProjectInput,
    classification: &Classification,
    decided: &[DecidedDependency],
    names: &dyn DeployNameLookup,
) -> Result<Option<Component>, ProjectError> {
    let Some(kind) = classification.kind else {
        return Ok(None);
    };

    let deploy_name = project.deploy_name();

    let resources = classification
        .source_roots
        .iter()
        .map(|root| ComponentResource {
            source_root: root.path.clone(),
            deployed_at: match (kind, root.role) {
                (ProjectKind::WebApplication, SourceRootRole::Java) => WEB_CLASSES_PATH,
                _ => ROOT_PATH,
            }
            .to_string(),
        })
        .collect();

    let mut modules = Vec::new();
    let mut properties = vec![ComponentProperty {
        name: "java-output-path".to_string(),
        value: format!("/{}/build/classes", deploy_name),
    }];

    match kind {
        ProjectKind::JavaLibrary => {
            if let Some(stray) = decided.iter().find(|d| d.decision.module_path().is_some()) {
                warn!(
                    project = %project.path,
                    dependency = %stray.dependency.id,
                    "Ignoring component module decision for a library project"
                );
            }
        }
        ProjectKind::WebApplication => {
            for d in decided {
                let Some(deployed_at) = d.decision.module_path() else {
                    continue;
                };
                let reference = match d.dependency.origin() {
                    Origin::ExternalArtifact(artifact) => ModuleReference::Artifact {
                        file_name: artifact.file_name(),
                    },
                    Origin::Subproject(dependency) => ModuleReference::Project {
                        deploy_name: names.deploy_name_of(dependency).ok_or_else(|| {
                            ProjectError::DependencyNotReady {
                                project: project.path.clone(),
                                dependency: dependency.clone(),
                            }
                        })?,
                    },
                };
                modules.push(ComponentModule {
                    reference,
                    deployed_at: deployed_at.to_string(),
                });
            }

            properties.insert(
                0,
                ComponentProperty {
                    name: "context-root".to_string(),
                    value: project
                        .context_path
                        .clone()
                        .unwrap_or_else(|| deploy_name.clone()),
                },
            );
        }
    }

    Ok(Some(Component {
        deploy_name,
        resources,
        modules,
        properties,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::policy::{DeploymentAttribute, DeploymentDecision};
    use crate::project::{classify, ArtifactId, DependencyId, PluginId, Scope, ScopedDependency};
    use std::collections::BTreeMap;

    struct Names(BTreeMap<ProjectId, String>);

    impl DeployNameLookup for Names {
        fn deploy_name_of(&self, project: &ProjectId) -> Option<String> {
            self.0.get(project).cloned()
        }
    }

    fn names(entries: &[(&str, &str)]) -> Names {
        Names(
            entries
                .iter()
                .map(|(id, name)| (ProjectId::new(*id), name.to_string()))
                .collect(),
        )
    }

    fn module_decision(id: DependencyId) -> DecidedDependency {
        DecidedDependency {
            dependency: ScopedDependency {
                id,
                scope: Scope::Compile,
                transitive: false,
            },
            decision: DeploymentDecision::module(DeploymentAttribute::Excluded, "/WEB-INF/lib"),
        }
    }

    #[test]
    fn test_library_component() {
        let project = ProjectInput::new(":lib").with_plugin(PluginId::Java);
        let component = assemble_component(&project, &classify(&project), &[], &names(&[]))
            .unwrap()
            .unwrap();

        assert_eq!(component.deploy_name, "lib");
        assert_eq!(
            component.resources,
            vec![ComponentResource {
                source_root: "src/main/java".to_string(),
                deployed_at: "/".to_string()
            }]
        );
        assert!(component.modules.is_empty());
        assert_eq!(component.property("context-root"), None);
    }

    #[test]
    fn test_library_ignores_module_decisions() {
        let project = ProjectInput::new(":lib").with_plugin(PluginId::Java);
        let decided = vec![module_decision(DependencyId::Artifact(ArtifactId::new(
            "junit", "junit", "4.13.2",
        )))];

        let component = assemble_component(&project, &classify(&project), &decided, &names(&[]))
            .unwrap()
            .unwrap();
        assert!(component.modules.is_empty());
    }

    #[test]
    fn test_web_component() {
        let project = ProjectInput::new(":web").with_plugin(PluginId::War);
        let decided = vec![
            module_decision(DependencyId::Artifact(ArtifactId::new(
                "org.apache.commons",
                "commons-lang3",
                "3.12.0",
            ))),
            module_decision(DependencyId::Project(ProjectId::new(":lib"))),
        ];

        let component = assemble_component(
            &project,
            &classify(&project),
            &decided,
            &names(&[(":lib", "core")]),
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            component.resources,
            vec![
                ComponentResource {
                    source_root: "src/main/java".to_string(),
                    deployed_at: "/WEB-INF/classes".to_string()
                },
                ComponentResource {
                    source_root: "src/main/webapp".to_string(),
                    deployed_at: "/".to_string()
                },
            ]
        );
        assert_eq!(component.modules.len(), 2);
        assert_eq!(component.modules[0].reference.name(), "commons-lang3-3.12.0.jar");
        assert_eq!(
            component.modules[1].reference,
            ModuleReference::Project {
                deploy_name: "core".to_string()
            }
        );
        assert!(component.modules.iter().all(|m| m.deployed_at == "/WEB-INF/lib"));
        assert_eq!(component.property("context-root"), Some("web"));
    }

    #[test]
    fn test_web_skips_classpath_only_decisions() {
        let project = ProjectInput::new(":web").with_plugin(PluginId::War);
        let decided = vec![DecidedDependency {
            dependency: ScopedDependency {
                id: DependencyId::Artifact(ArtifactId::new("junit", "junit", "4.13.2")),
                scope: Scope::Test,
                transitive: false,
            },
            decision: DeploymentDecision::none(),
        }];

        let component = assemble_component(&project, &classify(&project), &decided, &names(&[]))
            .unwrap()
            .unwrap();
        assert!(component.modules.is_empty());
    }

    #[test]
    fn test_missing_subproject_model() {
        let project = ProjectInput::new(":web").with_plugin(PluginId::War);
        let decided = vec![module_decision(DependencyId::Project(ProjectId::new(":lib")))];

        let err = assemble_component(&project, &classify(&project), &decided, &names(&[]))
            .unwrap_err();
        assert_eq!(
            err,
            ProjectError::DependencyNotReady {
                project: ProjectId::new(":web"),
                dependency: ProjectId::new(":lib"),
            }
        );
    }

    #[test]
    fn test_context_path_override() {
        let mut project = ProjectInput::new(":web").with_plugin(PluginId::War);
        project.context_path = Some("shop".to_string());

        let component = assemble_component(&project, &classify(&project), &[], &names(&[]))
            .unwrap()
            .unwrap();
        assert_eq!(component.property("context-root"), Some("shop"));
    }

    #[test]
    fn test_unrecognized_kind_has_no_component() {
        let project = ProjectInput::new(":docs");
        assert_eq!(
            assemble_component(&project, &classify(&project), &[], &names(&[])).unwrap(),
            None
        );
    }

    #[test]
    fn test_module_handles() {
        let artifact = ModuleReference::Artifact {
            file_name: "guava-31.1-jre.jar".to_string(),
        };
        let project = ModuleReference::Project {
            deploy_name: "lib".to_string(),
        };
        assert_eq!(artifact.handle(), "module:/classpath/lib/guava-31.1-jre.jar");
        assert_eq!(project.handle(), "module:/resource/lib/lib");
    }
}
