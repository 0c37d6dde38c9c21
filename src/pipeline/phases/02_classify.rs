use crate::pipeline::context::SyncContext;
use crate::pipeline::phase_trait::SyncPhase;
use crate::progress::ProgressEvent;
use crate::project::classify;
use anyhow::Result;
use tracing::debug;

pub struct ClassifyPhase;

impl SyncPhase for ClassifyPhase {
    fn name(&self) -> &'static str {
        "ClassifyPhase"
    }

    fn execute(&self, context: &mut SyncContext) -> Result<()> {
        let mut unrecognized = Vec::new();

        for project in &context.projects {
            let classification = classify(project);
            match classification.kind {
                Some(kind) => debug!(project = %project.path, kind = %kind, "Classified project"),
                None => unrecognized.push(ProgressEvent::KindUnrecognized {
                    project: project.path.to_string(),
                    markers: project.plugins.iter().map(|p| p.id().to_string()).collect(),
                }),
            }
            context
                .classifications
                .insert(project.path.clone(), classification);
        }

        for event in unrecognized {
            context.emit(event);
        }
        Ok(())
    }
}
