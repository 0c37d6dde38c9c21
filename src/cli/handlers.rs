//! Command handlers. Each returns the process exit code.

use super::commands::{ConfigArgs, FingerprintArgs, PolicyArgs, PolicyOptions, ResolveArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::WtpgenConfig;
use crate::output::schema::SyncReport;
use crate::pipeline::SyncOrchestrator;
use crate::progress::LoggingHandler;
use crate::project::WorkspaceInput;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, Level};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FATAL: i32 = 1;
pub const EXIT_PROJECT_FAILED: i32 = 2;

/// Environment configuration with command-line overrides applied. `log_level`
/// is the level logging was initialized with, so a bad `WTPGEN_LOG_LEVEL`
/// already overridden (or defaulted) there does not fail validation.
pub fn load_config(options: &PolicyOptions, log_level: Level) -> Result<WtpgenConfig> {
    let mut config = WtpgenConfig::default();
    config.log_level = log_level.to_string().to_lowercase();
    if let Some(policy) = options.policy {
        config.policy = policy;
        config.policy_file = None;
    }
    if let Some(file) = &options.policy_file {
        config.policy_file = Some(file.clone());
    }
    config.validate()?;
    debug!("{}", config);
    Ok(config)
}

async fn run_sync(config: &WtpgenConfig, input: &Path, parallel: bool) -> Result<SyncReport> {
    let workspace = WorkspaceInput::load(input)?;
    let orchestrator =
        SyncOrchestrator::from_config(config)?.with_progress_handler(Arc::new(LoggingHandler));

    if parallel || config.parallel {
        orchestrator.execute_parallel(workspace).await
    } else {
        orchestrator.execute(workspace)
    }
}

fn report_exit_code(report: &SyncReport) -> i32 {
    if report.is_complete() {
        EXIT_SUCCESS
    } else {
        EXIT_PROJECT_FAILED
    }
}

fn fatal(e: anyhow::Error) -> i32 {
    error!("{:#}", e);
    eprintln!("Error: {:#}", e);
    EXIT_FATAL
}

pub async fn handle_resolve(args: &ResolveArgs, log_level: Level) -> i32 {
    match resolve(args, log_level).await {
        Ok(code) => code,
        Err(e) => fatal(e),
    }
}

async fn resolve(args: &ResolveArgs, log_level: Level) -> Result<i32> {
    let config = load_config(&args.policy, log_level)?;
    let report = run_sync(&config, &args.input, args.parallel).await?;
    let formatter = OutputFormatter::new(args.format.into());

    let Some(project) = &args.project else {
        println!("{}", formatter.format_report(&report)?);
        return Ok(report_exit_code(&report));
    };

    if let Some(model) = report.model(project) {
        println!("{}", formatter.format_model(model)?);
        return Ok(EXIT_SUCCESS);
    }
    match report.failure(project) {
        Some(failure) => {
            eprintln!("Error: {}", failure);
            Ok(EXIT_PROJECT_FAILED)
        }
        None => anyhow::bail!("Project {} is not part of the workspace", project),
    }
}

pub async fn handle_fingerprint(args: &FingerprintArgs, log_level: Level) -> i32 {
    let result = async {
        let config = load_config(&args.policy, log_level)?;
        let report = run_sync(&config, &args.input, false).await?;
        let fingerprint = report
            .fingerprint()
            .context("Failed to compute model fingerprint")?;
        println!("{}", fingerprint);
        Ok::<_, anyhow::Error>(report_exit_code(&report))
    }
    .await;

    result.unwrap_or_else(fatal)
}

pub fn handle_policy(args: &PolicyArgs, log_level: Level) -> i32 {
    let result = load_config(&args.policy, log_level).and_then(|config| {
        let table = config.load_policy()?;
        let format: OutputFormat = args.format.into();
        println!("{}", OutputFormatter::new(format).format_policy(&table)?);
        Ok(EXIT_SUCCESS)
    });

    result.unwrap_or_else(fatal)
}

pub fn handle_config(args: &ConfigArgs, log_level: Level) -> i32 {
    let result = load_config(&args.policy, log_level).and_then(|config| {
        let formatter = OutputFormatter::new(args.format.into());
        println!("{}", formatter.format_config(&config)?);
        Ok(EXIT_SUCCESS)
    });

    result.unwrap_or_else(fatal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyChoice;
    use serial_test::serial;
    use std::path::PathBuf;

    #[test]
    #[serial]
    fn test_policy_option_overrides_file() {
        std::env::set_var("WTPGEN_POLICY_FILE", "/tmp/policy.toml");
        let config = load_config(
            &PolicyOptions {
                policy: Some(PolicyChoice::Corrected),
                policy_file: None,
            },
            Level::INFO,
        );
        std::env::remove_var("WTPGEN_POLICY_FILE");

        let config = config.unwrap();
        assert_eq!(config.policy, PolicyChoice::Corrected);
        assert_eq!(config.policy_file, None);
    }

    #[test]
    #[serial]
    fn test_policy_file_option() {
        let config = load_config(
            &PolicyOptions {
                policy: None,
                policy_file: Some(PathBuf::from("custom.toml")),
            },
            Level::INFO,
        )
        .unwrap();
        assert_eq!(config.policy_file, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    #[serial]
    fn test_effective_log_level_replaces_invalid_env_level() {
        std::env::set_var("WTPGEN_LOG_LEVEL", "chatty");
        let config = load_config(&PolicyOptions::default(), Level::DEBUG);
        std::env::remove_var("WTPGEN_LOG_LEVEL");

        let config = config.unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_report_exit_code() {
        let mut report = SyncReport::default();
        assert_eq!(report_exit_code(&report), EXIT_SUCCESS);

        report.failures.insert(
            crate::project::ProjectId::new(":lib"),
            crate::error::ProjectError::UnresolvedDependency {
                project: crate::project::ProjectId::new(":lib"),
                selector: "x:y:1".to_string(),
                reason: None,
            },
        );
        assert_eq!(report_exit_code(&report), EXIT_PROJECT_FAILED);
    }
}
