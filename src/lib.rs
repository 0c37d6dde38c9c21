//! wtpgen - deployment descriptors for IDE web tooling
//!
//! Given the resolved dependency graph of every project in a multi-project
//! build, this library computes what an IDE needs to deploy each project:
//! classpath entries carrying deployment markers, the component (module
//! assembly) model, and the facet set.
//!
//! # Core Concepts
//!
//! - **Project kind**: a project is a Java library or a web application,
//!   decided by its applied plugins. Other projects only get plain classpath
//!   entries.
//! - **Scope**: every dependency configuration maps to compile, provided or
//!   test; a dependency declared in several configurations keeps the most
//!   visible scope.
//! - **Deployment policy**: a decision table from `(kind, scope)` to a
//!   classpath marker or a component module. Both descriptors read the same
//!   decision, so a dependency is never deployed twice.
//! - **Sync pass**: one run over the whole workspace, in dependency order,
//!   producing a [`SyncReport`].
//!
//! # Example Usage
//!
//! ```no_run
//! use wtpgen::{SyncOrchestrator, WorkspaceInput};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let workspace = WorkspaceInput::load(Path::new("workspace.yaml"))?;
//! let report = SyncOrchestrator::default().execute(workspace)?;
//!
//! for (project, model) in &report.models {
//!     println!("{}: {} classpath entries", project, model.classpath.len());
//! }
//! println!("fingerprint {}", report.fingerprint()?);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`project`]: input model, classification and scope mapping
//! - [`deploy`]: policy engine, classpath, component and facet resolution
//! - [`pipeline`]: phase orchestration over a whole workspace
//! - [`validation`]: consistency checks on computed models

pub mod cli;
pub mod config;
pub mod deploy;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod project;
pub mod util;
pub mod validation;

pub use config::{ConfigError, PolicyChoice, WtpgenConfig};
pub use deploy::{DeploymentPolicy, DeploymentTable, DescriptorResolver, FacetVersions};
pub use error::{ProjectError, SyncError};
pub use output::{ProjectModel, SyncReport};
pub use pipeline::SyncOrchestrator;
pub use project::{ProjectId, ProjectInput, ProjectKind, WorkspaceInput};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
