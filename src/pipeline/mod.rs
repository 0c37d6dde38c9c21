pub mod context;
pub mod orchestrator;
pub mod phase_trait;
pub mod phases;

pub use context::SyncContext;
pub use orchestrator::SyncOrchestrator;
pub use phase_trait::SyncPhase;
