pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, FingerprintArgs, PolicyArgs, ResolveArgs};
pub use output::{OutputFormat, OutputFormatter};
