//! Deployment descriptor resolution for a single project.
//!
//! [`DescriptorResolver`] ties the pieces together: the policy decides each
//! dependency once, and both the classpath and the component are built from
//! those same decisions so the two descriptors never disagree.

pub mod classpath;
pub mod component;
pub mod facets;
pub mod policy;

pub use classpath::{build_classpath, ClasspathEntry, OriginKind};
pub use component::{
    assemble_component, Component, ComponentModule, ComponentProperty, ComponentResource,
    DeployNameLookup, ModuleReference,
};
pub use facets::{resolve_facets, FacetId, FacetSet, FacetVersions, InstalledFacet};
pub use policy::{
    decide_all, DecidedDependency, DecisionLocation, DeploymentAttribute, DeploymentDecision,
    DeploymentPolicy, DeploymentRule, DeploymentTable, PolicyError,
};

use crate::error::ProjectError;
use crate::output::schema::ProjectModel;
use crate::project::{Classification, ProjectInput, ScopedDependency};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct DescriptorResolver {
    policy: Arc<dyn DeploymentPolicy>,
    facet_versions: FacetVersions,
}

impl DescriptorResolver {
    pub fn new(policy: Arc<dyn DeploymentPolicy>, facet_versions: FacetVersions) -> Self {
        Self {
            policy,
            facet_versions,
        }
    }

    pub fn policy(&self) -> &dyn DeploymentPolicy {
        self.policy.as_ref()
    }

    pub fn facet_versions(&self) -> &FacetVersions {
        &self.facet_versions
    }

    /// Computes every descriptor of one project. Sub-project deploy names are
    /// read through `names`, which must already hold their models.
    pub fn resolve(
        &self,
        project: &ProjectInput,
        classification: &Classification,
        dependencies: &[ScopedDependency],
        names: &dyn DeployNameLookup,
    ) -> Result<ProjectModel, ProjectError> {
        let decided = decide_all(self.policy.as_ref(), classification.kind, dependencies);

        for d in &decided {
            debug!(
                project = %project.path,
                dependency = %d.dependency.id,
                scope = %d.dependency.scope,
                attribute = %d.decision.attribute,
                module = d.decision.module_path().unwrap_or("-"),
                "Deployment decision"
            );
        }

        let component = assemble_component(project, classification, &decided, names)?;
        let classpath = build_classpath(&decided);
        let facets = resolve_facets(
            classification.kind,
            &self.facet_versions,
            project.java_version.as_deref(),
        );

        Ok(ProjectModel {
            project: project.path.clone(),
            kind: classification.kind,
            deploy_name: project.deploy_name(),
            classpath,
            component,
            facets,
        })
    }
}

impl Default for DescriptorResolver {
    fn default() -> Self {
        Self::new(Arc::new(DeploymentTable::reference()), FacetVersions::default())
    }
}

impl std::fmt::Debug for DescriptorResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorResolver")
            .field("policy", &self.policy.name())
            .field("facet_versions", &self.facet_versions)
            .finish()
    }
}
