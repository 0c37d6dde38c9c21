use crate::deploy::component::{ROOT_PATH, WEB_CLASSES_PATH};
use crate::deploy::DeploymentAttribute;
use crate::output::schema::ProjectModel;
use crate::project::ProjectKind;
use anyhow::Result;
use std::collections::HashSet;

pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, model: &ProjectModel) -> Result<()>;
}

/// A web application packages its dependencies as component modules, so none
/// of its classpath entries may be marked deployed.
pub struct WebDeploymentExclusivityRule;

impl ValidationRule for WebDeploymentExclusivityRule {
    fn name(&self) -> &'static str {
        "WebDeploymentExclusivity"
    }

    fn validate(&self, model: &ProjectModel) -> Result<()> {
        if model.kind != Some(ProjectKind::WebApplication) {
            return Ok(());
        }
        if let Some(entry) = model
            .classpath
            .iter()
            .find(|e| e.deployment_attribute == Some(DeploymentAttribute::Deployed))
        {
            anyhow::bail!(
                "Classpath entry {} is marked deployed in a web application",
                entry.entry_id
            );
        }
        let modules = model.component.as_ref().map_or(0, |c| c.modules.len());
        if modules > model.classpath.len() {
            anyhow::bail!(
                "{} component modules but only {} classpath entries",
                modules,
                model.classpath.len()
            );
        }
        Ok(())
    }
}

pub struct LibraryModulesRule;

impl ValidationRule for LibraryModulesRule {
    fn name(&self) -> &'static str {
        "LibraryModules"
    }

    fn validate(&self, model: &ProjectModel) -> Result<()> {
        if model.kind != Some(ProjectKind::JavaLibrary) {
            return Ok(());
        }
        if let Some(component) = &model.component {
            if !component.modules.is_empty() {
                anyhow::bail!(
                    "Library component declares {} modules",
                    component.modules.len()
                );
            }
        }
        Ok(())
    }
}

pub struct UniqueClasspathRule;

impl ValidationRule for UniqueClasspathRule {
    fn name(&self) -> &'static str {
        "UniqueClasspath"
    }

    fn validate(&self, model: &ProjectModel) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &model.classpath {
            if !seen.insert(entry.entry_id.as_str()) {
                anyhow::bail!("Duplicate classpath entry {}", entry.entry_id);
            }
        }
        Ok(())
    }
}

pub struct ResourceLayoutRule;

impl ValidationRule for ResourceLayoutRule {
    fn name(&self) -> &'static str {
        "ResourceLayout"
    }

    fn validate(&self, model: &ProjectModel) -> Result<()> {
        let Some(component) = &model.component else {
            return Ok(());
        };
        if component.deploy_name != model.deploy_name {
            anyhow::bail!(
                "Component deploy name {} differs from project deploy name {}",
                component.deploy_name,
                model.deploy_name
            );
        }

        let targets: Vec<&str> = component
            .resources
            .iter()
            .map(|r| r.deployed_at.as_str())
            .collect();
        let expected: &[&str] = match model.kind {
            Some(ProjectKind::JavaLibrary) => &[ROOT_PATH],
            Some(ProjectKind::WebApplication) => &[WEB_CLASSES_PATH, ROOT_PATH],
            None => &[],
        };
        if targets != expected {
            anyhow::bail!(
                "Resources deploy to {:?}, expected {:?}",
                targets,
                expected
            );
        }
        Ok(())
    }
}

/// A project without a recognized kind only contributes plain classpath
/// entries.
pub struct UnrecognizedKindRule;

impl ValidationRule for UnrecognizedKindRule {
    fn name(&self) -> &'static str {
        "UnrecognizedKind"
    }

    fn validate(&self, model: &ProjectModel) -> Result<()> {
        if model.kind.is_some() {
            return Ok(());
        }
        if model.component.is_some() {
            anyhow::bail!("Unrecognized project has a component");
        }
        if !model.facets.is_empty() {
            anyhow::bail!("Unrecognized project has facets");
        }
        if model.classpath.iter().any(|e| e.deployment_attribute.is_some()) {
            anyhow::bail!("Unrecognized project has deployment markers");
        }
        Ok(())
    }
}
