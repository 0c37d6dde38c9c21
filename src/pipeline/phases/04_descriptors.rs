use crate::deploy::DescriptorResolver;
use crate::error::ProjectError;
use crate::output::schema::ProjectModel;
use crate::pipeline::context::SyncContext;
use crate::pipeline::phase_trait::SyncPhase;
use crate::progress::ProgressEvent;
use crate::project::{Classification, ProjectId, ProjectInput, ScopedDependency};
use crate::validation::Validator;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything needed to compute one project's model apart from the models of
/// its sub-projects
#[derive(Debug, Clone)]
pub struct DescriptorJob {
    pub project: ProjectInput,
    pub classification: Classification,
    pub dependencies: Vec<ScopedDependency>,
}

/// Builds the job for `id`, or `None` when the project already failed or one
/// of its sub-projects did (the latter is recorded here).
pub fn prepare_job(context: &mut SyncContext, id: &ProjectId) -> Option<DescriptorJob> {
    if context.failures.contains_key(id) {
        return None;
    }
    let project = context.project(id)?.clone();

    if let Some(dependency) = context.failed_dependency(&project) {
        context.fail(ProjectError::DependencyFailed {
            project: id.clone(),
            dependency,
        });
        return None;
    }

    Some(DescriptorJob {
        classification: context
            .classifications
            .get(id)
            .cloned()
            .unwrap_or_else(Classification::unrecognized),
        dependencies: context.dependencies.get(id).cloned().unwrap_or_default(),
        project,
    })
}

pub fn resolve_job(
    resolver: &DescriptorResolver,
    validator: &Validator,
    job: &DescriptorJob,
    models: &BTreeMap<ProjectId, ProjectModel>,
) -> Result<ProjectModel, ProjectError> {
    let model = resolver.resolve(&job.project, &job.classification, &job.dependencies, models)?;
    validator
        .validate(&model)
        .map_err(|e| ProjectError::InconsistentModel {
            project: job.project.path.clone(),
            message: e.to_string(),
        })?;
    Ok(model)
}

pub fn record_result(context: &mut SyncContext, result: Result<ProjectModel, ProjectError>) {
    match result {
        Ok(model) => {
            context.emit(ProgressEvent::ProjectResolved {
                project: model.project.to_string(),
                classpath_entries: model.classpath.len(),
                modules: model.component.as_ref().map_or(0, |c| c.modules.len()),
            });
            context.models.insert(model.project.clone(), model);
        }
        Err(error) => context.fail(error),
    }
}

/// Computes descriptors project by project in build order, memoizing each
/// finished model for its dependents.
pub struct DescriptorPhase {
    resolver: DescriptorResolver,
    validator: Arc<Validator>,
}

impl DescriptorPhase {
    pub fn new(resolver: DescriptorResolver, validator: Arc<Validator>) -> Self {
        Self {
            resolver,
            validator,
        }
    }
}

impl SyncPhase for DescriptorPhase {
    fn name(&self) -> &'static str {
        "DescriptorPhase"
    }

    fn execute(&self, context: &mut SyncContext) -> Result<()> {
        let order = context
            .build_order
            .as_ref()
            .map(|b| b.order.clone())
            .context("Build order must be computed before descriptors")?;

        for id in &order {
            let Some(job) = prepare_job(context, id) else {
                continue;
            };
            let result = resolve_job(&self.resolver, &self.validator, &job, &context.models);
            record_result(context, result);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::phases::{build_order::BuildOrderPhase, classify::ClassifyPhase, scope::ScopePhase};
    use crate::project::{PluginId, ResolvedEntry, WorkspaceInput};

    fn run(projects: Vec<ProjectInput>) -> SyncContext {
        let mut context = SyncContext::new(WorkspaceInput::new(projects));
        BuildOrderPhase.execute(&mut context).unwrap();
        ClassifyPhase.execute(&mut context).unwrap();
        ScopePhase.execute(&mut context).unwrap();
        DescriptorPhase::new(DescriptorResolver::default(), Arc::new(Validator::new()))
            .execute(&mut context)
            .unwrap();
        context
    }

    #[test]
    fn test_requires_build_order() {
        let mut context = SyncContext::new(WorkspaceInput::new(vec![]));
        let result = DescriptorPhase::new(DescriptorResolver::default(), Arc::new(Validator::new()))
            .execute(&mut context);
        assert!(result.is_err());
    }

    #[test]
    fn test_web_declared_before_library() {
        let context = run(vec![
            ProjectInput::new(":web")
                .with_plugin(PluginId::War)
                .with_configuration("compile", vec![ResolvedEntry::project(":lib")]),
            ProjectInput::new(":lib")
                .with_plugin(PluginId::Java)
                .with_deploy_name("core"),
        ]);

        assert!(context.failures.is_empty());
        let web = &context.models[&ProjectId::new(":web")];
        assert_eq!(web.module_names(), vec!["core"]);
    }

    #[test]
    fn test_failure_propagates_to_dependents() {
        let context = run(vec![
            ProjectInput::new(":lib")
                .with_plugin(PluginId::Java)
                .with_configuration(
                    "compile",
                    vec![ResolvedEntry::unresolved("com.example:missing:1.0", None)],
                ),
            ProjectInput::new(":web")
                .with_plugin(PluginId::War)
                .with_configuration("compile", vec![ResolvedEntry::project(":lib")]),
            ProjectInput::new(":standalone").with_plugin(PluginId::Java),
        ]);

        assert_eq!(
            context.failures.get(&ProjectId::new(":web")),
            Some(&ProjectError::DependencyFailed {
                project: ProjectId::new(":web"),
                dependency: ProjectId::new(":lib"),
            })
        );
        assert!(!context.models.contains_key(&ProjectId::new(":lib")));
        assert!(context.models.contains_key(&ProjectId::new(":standalone")));
    }
}
