//! Mutable state shared by the phases of one sync pass

use crate::error::ProjectError;
use crate::output::schema::{ProjectModel, SyncReport};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::project::{Classification, ProjectId, ProjectInput, ScopedDependency, WorkspaceInput};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::phases::build_order::BuildOrder;

pub struct SyncContext {
    /// Projects in declaration order
    pub projects: Vec<ProjectInput>,

    /// Position of each project in `projects`, filled by the build order phase
    pub index: BTreeMap<ProjectId, usize>,

    pub build_order: Option<BuildOrder>,

    pub classifications: BTreeMap<ProjectId, Classification>,

    pub dependencies: BTreeMap<ProjectId, Vec<ScopedDependency>>,

    /// Finished models, keyed by project. Sub-project deploy names are read
    /// from here.
    pub models: BTreeMap<ProjectId, ProjectModel>,

    pub failures: BTreeMap<ProjectId, ProjectError>,

    pub progress: Arc<dyn ProgressHandler>,
}

impl SyncContext {
    pub fn new(workspace: WorkspaceInput) -> Self {
        Self::with_progress(workspace, Arc::new(NoOpHandler))
    }

    pub fn with_progress(workspace: WorkspaceInput, progress: Arc<dyn ProgressHandler>) -> Self {
        Self {
            projects: workspace.projects,
            index: BTreeMap::new(),
            build_order: None,
            classifications: BTreeMap::new(),
            dependencies: BTreeMap::new(),
            models: BTreeMap::new(),
            failures: BTreeMap::new(),
            progress,
        }
    }

    pub fn project(&self, id: &ProjectId) -> Option<&ProjectInput> {
        self.index.get(id).map(|&i| &self.projects[i])
    }

    pub fn emit(&self, event: ProgressEvent) {
        self.progress.on_progress(&event);
    }

    /// Records a failed project. The first failure recorded for a project wins.
    pub fn fail(&mut self, error: ProjectError) {
        self.emit(ProgressEvent::ProjectFailed {
            project: error.project().to_string(),
            error: error.to_string(),
        });
        self.failures
            .entry(error.project().clone())
            .or_insert(error);
    }

    /// First sub-project of `project` that has already failed
    pub fn failed_dependency(&self, project: &ProjectInput) -> Option<ProjectId> {
        project
            .project_references()
            .into_iter()
            .find(|dep| self.failures.contains_key(*dep))
            .cloned()
    }

    pub fn into_report(self) -> SyncReport {
        SyncReport {
            models: self.models,
            failures: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ResolvedEntry;

    #[test]
    fn test_fail_keeps_first_error() {
        let mut context = SyncContext::new(WorkspaceInput::new(vec![]));
        context.fail(ProjectError::DependencyFailed {
            project: ProjectId::new(":web"),
            dependency: ProjectId::new(":lib"),
        });
        context.fail(ProjectError::DependencyNotReady {
            project: ProjectId::new(":web"),
            dependency: ProjectId::new(":lib"),
        });

        assert!(matches!(
            context.failures.get(&ProjectId::new(":web")),
            Some(ProjectError::DependencyFailed { .. })
        ));
    }

    #[test]
    fn test_failed_dependency() {
        let web = ProjectInput::new(":web")
            .with_configuration("compile", vec![ResolvedEntry::project(":lib")]);
        let mut context = SyncContext::new(WorkspaceInput::new(vec![web.clone()]));
        assert_eq!(context.failed_dependency(&web), None);

        context.fail(ProjectError::UnresolvedDependency {
            project: ProjectId::new(":lib"),
            selector: "com.example:missing:1.0".to_string(),
            reason: None,
        });
        assert_eq!(context.failed_dependency(&web), Some(ProjectId::new(":lib")));
    }
}
