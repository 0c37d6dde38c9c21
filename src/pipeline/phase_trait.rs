use super::context::SyncContext;
use anyhow::Result;

pub trait SyncPhase: Send + Sync {
    fn name(&self) -> &'static str;

    fn execute(&self, context: &mut SyncContext) -> Result<()>;
}
