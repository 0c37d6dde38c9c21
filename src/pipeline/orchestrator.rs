use super::context::SyncContext;
use super::phase_trait::SyncPhase;
use super::phases::{
    build_order::BuildOrderPhase,
    classify::ClassifyPhase,
    descriptors::{prepare_job, record_result, resolve_job, DescriptorPhase},
    scope::ScopePhase,
};
use crate::config::{ConfigError, WtpgenConfig};
use crate::deploy::{DeploymentPolicy, DeploymentTable, DescriptorResolver, FacetVersions};
use crate::error::ProjectError;
use crate::output::schema::{ProjectModel, SyncReport};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::project::{ProjectId, WorkspaceInput};
use crate::validation::Validator;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info};

const DESCRIPTOR_PHASE: &str = "DescriptorPhase";

pub struct SyncOrchestrator {
    resolver: DescriptorResolver,
    validator: Arc<Validator>,
    progress_handler: Arc<dyn ProgressHandler>,
}

impl SyncOrchestrator {
    pub fn new(policy: Arc<dyn DeploymentPolicy>, facet_versions: FacetVersions) -> Self {
        Self {
            resolver: DescriptorResolver::new(policy, facet_versions),
            validator: Arc::new(Validator::new()),
            progress_handler: Arc::new(NoOpHandler),
        }
    }

    pub fn from_config(config: &WtpgenConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = config.load_policy()?;
        Ok(Self::new(Arc::new(table), config.facet_versions.clone()))
    }

    pub fn with_progress_handler(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress_handler = handler;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    pub fn resolver(&self) -> &DescriptorResolver {
        &self.resolver
    }

    fn preparation_phases() -> Vec<Box<dyn SyncPhase>> {
        vec![
            Box::new(BuildOrderPhase),
            Box::new(ClassifyPhase),
            Box::new(ScopePhase),
        ]
    }

    fn run_phase(&self, phase: &dyn SyncPhase, context: &mut SyncContext) -> Result<()> {
        let phase_name = phase.name();
        info!("Phase: {}", phase_name);
        context.emit(ProgressEvent::PhaseStarted {
            phase: phase_name.to_string(),
        });

        let phase_start = Instant::now();
        phase
            .execute(context)
            .with_context(|| format!("Phase {} failed", phase_name))?;

        context.emit(ProgressEvent::PhaseComplete {
            phase: phase_name.to_string(),
            duration: phase_start.elapsed(),
        });
        debug!("Phase {} complete", phase_name);
        Ok(())
    }

    fn begin(&self, workspace: WorkspaceInput) -> SyncContext {
        info!(
            "Starting sync of {} project(s) with policy {}",
            workspace.projects.len(),
            self.resolver.policy().name()
        );
        let context = SyncContext::with_progress(workspace, self.progress_handler.clone());
        context.emit(ProgressEvent::Started {
            projects: context.projects.len(),
        });
        context
    }

    fn finish(&self, context: SyncContext, start: Instant) -> SyncReport {
        info!(
            "Sync complete: {} model(s), {} failure(s)",
            context.models.len(),
            context.failures.len()
        );
        context.emit(ProgressEvent::Completed {
            resolved: context.models.len(),
            failed: context.failures.len(),
            total_time: start.elapsed(),
        });
        context.into_report()
    }

    /// Runs every phase in order on the calling thread. A fatal error (cycle,
    /// unknown or duplicate project) aborts before any descriptor is computed;
    /// per-project failures end up in the report.
    pub fn execute(&self, workspace: WorkspaceInput) -> Result<SyncReport> {
        let start = Instant::now();
        let mut context = self.begin(workspace);

        let descriptors = DescriptorPhase::new(self.resolver.clone(), self.validator.clone());
        let mut phases = Self::preparation_phases();
        phases.push(Box::new(descriptors));

        for phase in &phases {
            self.run_phase(phase.as_ref(), &mut context)?;
        }

        Ok(self.finish(context, start))
    }

    /// Same result as [`execute`](Self::execute), but the descriptors of each
    /// topological wave are computed concurrently on the blocking pool. Models
    /// of earlier waves are shared read-only with the tasks.
    pub async fn execute_parallel(&self, workspace: WorkspaceInput) -> Result<SyncReport> {
        let start = Instant::now();
        let mut context = self.begin(workspace);

        for phase in Self::preparation_phases() {
            self.run_phase(phase.as_ref(), &mut context)?;
        }

        info!("Phase: {} (parallel)", DESCRIPTOR_PHASE);
        context.emit(ProgressEvent::PhaseStarted {
            phase: DESCRIPTOR_PHASE.to_string(),
        });
        let phase_start = Instant::now();

        let waves = context
            .build_order
            .as_ref()
            .map(|b| b.waves.clone())
            .context("Build order must be computed before descriptors")?;

        for (index, wave) in waves.iter().enumerate() {
            let jobs: Vec<_> = wave
                .iter()
                .filter_map(|id| prepare_job(&mut context, id))
                .collect();
            debug!(wave = index, projects = jobs.len(), "Resolving wave");

            let memo = Arc::new(std::mem::take(&mut context.models));
            let mut tasks = JoinSet::new();
            for job in jobs {
                let resolver = self.resolver.clone();
                let validator = self.validator.clone();
                let memo = Arc::clone(&memo);
                tasks.spawn_blocking(move || resolve_job(&resolver, &validator, &job, &memo));
            }

            let mut results = Vec::new();
            while let Some(joined) = tasks.join_next().await {
                results.push(joined.with_context(|| format!("Phase {} failed", DESCRIPTOR_PHASE))?);
            }

            context.models = Arc::try_unwrap(memo).unwrap_or_else(|shared| (*shared).clone());
            results.sort_by(|a, b| result_project(a).cmp(result_project(b)));
            for result in results {
                record_result(&mut context, result);
            }
        }

        context.emit(ProgressEvent::PhaseComplete {
            phase: DESCRIPTOR_PHASE.to_string(),
            duration: phase_start.elapsed(),
        });
        debug!("Phase {} complete", DESCRIPTOR_PHASE);

        Ok(self.finish(context, start))
    }
}

impl Default for SyncOrchestrator {
    fn default() -> Self {
        Self::new(Arc::new(DeploymentTable::reference()), FacetVersions::default())
    }
}

fn result_project(result: &Result<ProjectModel, ProjectError>) -> &ProjectId {
    match result {
        Ok(model) => &model.project,
        Err(error) => error.project(),
    }
}
