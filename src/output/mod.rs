//! Output model of a sync pass

pub mod schema;

pub use schema::{ProjectModel, SyncReport};
