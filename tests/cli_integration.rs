//! CLI integration tests
//!
//! Runs the built `wtpgen` binary against workspace documents and checks
//! stdout, stderr and exit codes.

mod support;

use std::fs;
use std::process::{Command, Output};
use support::fixture_path;
use tempfile::TempDir;

fn wtpgen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wtpgen"))
        .args(args)
        .env_remove("WTPGEN_POLICY")
        .env_remove("WTPGEN_POLICY_FILE")
        .env_remove("WTPGEN_PARALLEL")
        .env_remove("WTPGEN_LIB_DEPLOY_PATH")
        .output()
        .expect("Failed to execute wtpgen")
}

fn fixture(name: &str) -> String {
    fixture_path(name).to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_cli_help() {
    let output = wtpgen(&["--help"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("wtpgen"));
    assert!(stdout.contains("resolve"));
    assert!(stdout.contains("fingerprint"));
    assert!(stdout.contains("policy"));
}

#[test]
fn test_cli_version() {
    let output = wtpgen(&["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_resolve_json_output() {
    let output = wtpgen(&["resolve", &fixture("workspace.yaml"), "--format", "json"]);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["models"][":lib"]["kind"], "java-library");
    assert_eq!(report["models"][":web"]["kind"], "web-application");
    assert_eq!(
        report["models"][":web"]["component"]["deploy_name"],
        "web"
    );
    assert!(report.get("failures").is_none());
}

#[test]
fn test_resolve_human_output() {
    let output = wtpgen(&["resolve", &fixture("workspace.yaml")]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains(":web (web-application)"));
    assert!(stdout.contains("resource src/main/java -> /WEB-INF/classes"));
}

#[test]
fn test_resolve_single_project() {
    let output = wtpgen(&[
        "resolve",
        &fixture("workspace.yaml"),
        "--format",
        "json",
        "--project",
        ":lib",
    ]);

    assert!(output.status.success());
    let model: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(model["project"], ":lib");
    assert_eq!(model["deploy_name"], "lib");
}

#[test]
fn test_resolve_unknown_project_is_fatal() {
    let output = wtpgen(&["resolve", &fixture("workspace.yaml"), "--project", ":nope"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains(":nope"));
}

#[test]
fn test_resolve_parallel_matches_sequential() {
    let sequential = wtpgen(&["resolve", &fixture("workspace.yaml"), "--format", "json"]);
    let parallel = wtpgen(&[
        "resolve",
        &fixture("workspace.yaml"),
        "--format",
        "json",
        "--parallel",
    ]);

    assert!(sequential.status.success());
    assert!(parallel.status.success());
    assert_eq!(sequential.stdout, parallel.stdout);
}

#[test]
fn test_cycle_exits_fatal() {
    let output = wtpgen(&["resolve", &fixture("cycle.yaml"), "--format", "json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cycle"));
}

#[test]
fn test_failed_project_exit_code() {
    let output = wtpgen(&["resolve", &fixture("unresolved.json"), "--format", "json"]);

    assert_eq!(output.status.code(), Some(2));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        report["failures"][":lib"]["error"],
        "unresolved_dependency"
    );
    assert_eq!(report["failures"][":web"]["error"], "dependency_failed");
    assert!(report["models"][":util"].is_object());
}

#[test]
fn test_fingerprint_is_stable() {
    let first = wtpgen(&["fingerprint", &fixture("workspace.yaml")]);
    let second = wtpgen(&["fingerprint", &fixture("workspace.yaml")]);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let fingerprint = stdout(&first);
    assert_eq!(fingerprint.trim().len(), 64);
}

#[test]
fn test_fingerprint_depends_on_policy() {
    let reference = wtpgen(&["fingerprint", &fixture("workspace.yaml")]);
    let corrected = wtpgen(&[
        "fingerprint",
        &fixture("workspace.yaml"),
        "--policy",
        "corrected",
    ]);

    assert!(corrected.status.success());
    assert_ne!(reference.stdout, corrected.stdout);
}

#[test]
fn test_invalid_input_exits_fatal() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.json");
    fs::write(&input, "{ not json").unwrap();

    let output = wtpgen(&["resolve", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_policy_toml_round_trips_through_policy_file() {
    let output = wtpgen(&["policy", "--format", "toml", "--policy", "corrected"]);
    assert!(output.status.success());

    let dir = TempDir::new().unwrap();
    let policy_file = dir.path().join("policy.toml");
    fs::write(&policy_file, &output.stdout).unwrap();

    let from_file = wtpgen(&[
        "fingerprint",
        &fixture("workspace.yaml"),
        "--policy-file",
        policy_file.to_str().unwrap(),
    ]);
    let builtin = wtpgen(&[
        "fingerprint",
        &fixture("workspace.yaml"),
        "--policy",
        "corrected",
    ]);

    assert!(from_file.status.success());
    assert_eq!(from_file.stdout, builtin.stdout);
}

#[test]
fn test_invalid_policy_file_exits_fatal() {
    let dir = TempDir::new().unwrap();
    let policy_file = dir.path().join("policy.toml");
    fs::write(
        &policy_file,
        "[[rule]]\nkind = \"web-application\"\nscope = \"compile\"\nattribute = \"deployed\"\n",
    )
    .unwrap();

    let output = wtpgen(&["policy", "--policy-file", policy_file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_logs_stay_off_stdout() {
    let output = wtpgen(&[
        "-vv",
        "resolve",
        &fixture("workspace.yaml"),
        "--format",
        "json",
    ]);

    assert!(output.status.success());
    assert!(serde_json::from_str::<serde_json::Value>(&stdout(&output)).is_ok());
}

#[test]
fn test_config_command_reflects_flags() {
    let output = wtpgen(&["config", "--format", "json", "--policy", "corrected"]);

    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(config["policy"], "corrected");
    assert_eq!(config["lib_deploy_path"], "/WEB-INF/lib");
}

#[test]
fn test_log_level_flag_overrides_invalid_env_level() {
    let output = Command::new(env!("CARGO_BIN_EXE_wtpgen"))
        .args(["--log-level", "info", "config", "--format", "json"])
        .env("WTPGEN_LOG_LEVEL", "chatty")
        .env_remove("WTPGEN_POLICY")
        .env_remove("WTPGEN_POLICY_FILE")
        .output()
        .expect("Failed to execute wtpgen");

    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(config["log_level"], "info");
}
