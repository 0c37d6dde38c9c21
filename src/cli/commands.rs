use crate::config::PolicyChoice;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Computes IDE deployment descriptors for the projects of a resolved build
#[derive(Parser, Debug)]
#[command(
    name = "wtpgen",
    about = "Computes IDE deployment descriptors for the projects of a resolved build",
    version,
    long_about = "wtpgen reads a workspace document describing each project's applied \
                  plugins and resolved dependency configurations, and prints the classpath \
                  entries, component modules and facets an IDE needs to deploy the projects."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase verbosity (can be used multiple times)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Resolve deployment descriptors for a workspace",
        long_about = "Computes classpath, component and facet descriptors for every project in \
                      the workspace document (JSON or YAML).\n\n\
                      Examples:\n  \
                      wtpgen resolve workspace.yaml\n  \
                      wtpgen resolve workspace.json --format json --policy corrected\n  \
                      wtpgen resolve workspace.yaml --project :web"
    )]
    Resolve(ResolveArgs),

    #[command(about = "Print the fingerprint of the computed models")]
    Fingerprint(FingerprintArgs),

    #[command(
        about = "Print the effective deployment decision table",
        long_about = "Prints the decision table the resolver would use. The output in TOML \
                      format can be edited and passed back with --policy-file."
    )]
    Policy(PolicyArgs),

    #[command(about = "Print the effective configuration (environment plus flags)")]
    Config(ConfigArgs),
}

/// Options shared by every command that builds a decision table
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PolicyOptions {
    #[arg(long, value_name = "POLICY", help = "Built-in policy (reference or corrected)")]
    pub policy: Option<PolicyChoice>,

    #[arg(
        long,
        value_name = "FILE",
        help = "TOML decision table; overrides --policy"
    )]
    pub policy_file: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ResolveArgs {
    #[arg(value_name = "INPUT", help = "Workspace document (.json, .yaml or .yml)")]
    pub input: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[command(flatten)]
    pub policy: PolicyOptions,

    #[arg(long, help = "Resolve independent projects concurrently")]
    pub parallel: bool,

    #[arg(
        long,
        value_name = "PATH",
        help = "Print only the model of this project (e.g. :web)"
    )]
    pub project: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct FingerprintArgs {
    #[arg(value_name = "INPUT", help = "Workspace document (.json, .yaml or .yml)")]
    pub input: PathBuf,

    #[command(flatten)]
    pub policy: PolicyOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct PolicyArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: PolicyFormatArg,

    #[command(flatten)]
    pub policy: PolicyOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[command(flatten)]
    pub policy: PolicyOptions,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyFormatArg {
    Json,
    Yaml,
    Toml,
    Human,
}

impl From<PolicyFormatArg> for super::output::OutputFormat {
    fn from(arg: PolicyFormatArg) -> Self {
        match arg {
            PolicyFormatArg::Json => super::output::OutputFormat::Json,
            PolicyFormatArg::Yaml => super::output::OutputFormat::Yaml,
            PolicyFormatArg::Toml => super::output::OutputFormat::Toml,
            PolicyFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
