use crate::pipeline::context::SyncContext;
use crate::pipeline::phase_trait::SyncPhase;
use crate::project::map_scopes;
use anyhow::Result;
use tracing::debug;

/// Maps configurations to scopes. A project with an unresolved dependency is
/// recorded as failed here and gets no descriptors.
pub struct ScopePhase;

impl SyncPhase for ScopePhase {
    fn name(&self) -> &'static str {
        "ScopePhase"
    }

    fn execute(&self, context: &mut SyncContext) -> Result<()> {
        let mut failures = Vec::new();

        for project in &context.projects {
            match map_scopes(project) {
                Ok(dependencies) => {
                    debug!(
                        project = %project.path,
                        dependencies = dependencies.len(),
                        "Mapped dependency scopes"
                    );
                    context
                        .dependencies
                        .insert(project.path.clone(), dependencies);
                }
                Err(e) => failures.push(e),
            }
        }

        for error in failures {
            context.fail(error);
        }
        Ok(())
    }
}
