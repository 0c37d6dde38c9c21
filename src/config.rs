//! Configuration management for wtpgen
//!
//! Settings are loaded from environment variables with defaults and checked
//! with [`WtpgenConfig::validate`]. Command-line flags override individual
//! fields after loading.
//!
//! # Environment Variables
//!
//! - `WTPGEN_POLICY`: Built-in decision table (reference|corrected) - default: "reference"
//! - `WTPGEN_POLICY_FILE`: TOML decision table, replaces `WTPGEN_POLICY` when set
//! - `WTPGEN_LIB_DEPLOY_PATH`: Module deploy path of the built-in tables - default: "/WEB-INF/lib"
//! - `WTPGEN_JAVA_FACET_VERSION`: Java facet version - default: "1.8"
//! - `WTPGEN_WEB_FACET_VERSION`: Web module facet version - default: "2.4"
//! - `WTPGEN_UTILITY_FACET_VERSION`: Utility module facet version - default: "1.0"
//! - `WTPGEN_PARALLEL`: Resolve independent projects concurrently (true|false) - default: "false"
//! - `WTPGEN_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use wtpgen::WtpgenConfig;
//!
//! let config = WtpgenConfig::default();
//! config.validate().expect("Invalid configuration");
//! let table = config.load_policy().expect("Invalid policy");
//! ```

use crate::deploy::policy::DEFAULT_LIB_DEPLOY_PATH;
use crate::deploy::{DeploymentTable, FacetVersions};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_PARALLEL: bool = false;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    #[error("Failed to load policy file {}: {error}", .path.display())]
    PolicyFile { path: PathBuf, error: String },
}

/// Which built-in decision table to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyChoice {
    #[default]
    Reference,
    Corrected,
}

impl PolicyChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyChoice::Reference => "reference",
            PolicyChoice::Corrected => "corrected",
        }
    }
}

impl FromStr for PolicyChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reference" => Ok(PolicyChoice::Reference),
            "corrected" => Ok(PolicyChoice::Corrected),
            other => Err(ConfigError::ParseError {
                field: "policy".to_string(),
                error: format!("unknown policy '{}', expected reference or corrected", other),
            }),
        }
    }
}

impl fmt::Display for PolicyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct WtpgenConfig {
    pub policy: PolicyChoice,

    /// Overrides `policy` when set
    pub policy_file: Option<PathBuf>,

    pub lib_deploy_path: String,

    pub facet_versions: FacetVersions,

    pub parallel: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for WtpgenConfig {
    /// Loads from `WTPGEN_*` environment variables, falling back to defaults
    fn default() -> Self {
        let policy = match env::var("WTPGEN_POLICY") {
            Ok(value) => value.parse::<PolicyChoice>().unwrap_or_else(|e| {
                warn!("{}; using reference policy", e);
                PolicyChoice::Reference
            }),
            Err(_) => PolicyChoice::Reference,
        };

        let policy_file = env::var("WTPGEN_POLICY_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let lib_deploy_path = env::var("WTPGEN_LIB_DEPLOY_PATH")
            .unwrap_or_else(|_| DEFAULT_LIB_DEPLOY_PATH.to_string());

        let defaults = FacetVersions::default();
        let facet_versions = FacetVersions {
            java: env::var("WTPGEN_JAVA_FACET_VERSION").unwrap_or(defaults.java),
            web: env::var("WTPGEN_WEB_FACET_VERSION").unwrap_or(defaults.web),
            utility: env::var("WTPGEN_UTILITY_FACET_VERSION").unwrap_or(defaults.utility),
        };

        let parallel = env::var("WTPGEN_PARALLEL")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_PARALLEL);

        let log_level = env::var("WTPGEN_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            policy,
            policy_file,
            lib_deploy_path,
            facet_versions,
            parallel,
            log_level,
        }
    }
}

impl WtpgenConfig {
    /// Checks that deploy paths are absolute, facet versions are non-empty and
    /// the log level is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.lib_deploy_path.starts_with('/') {
            return Err(ConfigError::ValidationFailed(format!(
                "Library deploy path must start with '/': {}",
                self.lib_deploy_path
            )));
        }

        for (name, version) in [
            ("java", &self.facet_versions.java),
            ("web", &self.facet_versions.web),
            ("utility", &self.facet_versions.utility),
        ] {
            if version.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "Facet version for {} cannot be empty",
                    name
                )));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Builds the effective decision table: the policy file when one is
    /// configured, otherwise the selected built-in table.
    pub fn load_policy(&self) -> Result<DeploymentTable, ConfigError> {
        if let Some(path) = &self.policy_file {
            let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PolicyFile {
                path: path.clone(),
                error: e.to_string(),
            })?;
            return DeploymentTable::from_toml_str(&path.display().to_string(), &content).map_err(
                |e| ConfigError::PolicyFile {
                    path: path.clone(),
                    error: e.to_string(),
                },
            );
        }

        let table = match self.policy {
            PolicyChoice::Reference => DeploymentTable::reference_with(&self.lib_deploy_path),
            PolicyChoice::Corrected => DeploymentTable::corrected_with(&self.lib_deploy_path),
        };
        table.map_err(|e| ConfigError::ValidationFailed(e.to_string()))
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("policy".to_string(), self.policy.to_string());
        if let Some(ref file) = self.policy_file {
            map.insert("policy_file".to_string(), file.display().to_string());
        }
        map.insert("lib_deploy_path".to_string(), self.lib_deploy_path.clone());
        map.insert(
            "java_facet_version".to_string(),
            self.facet_versions.java.clone(),
        );
        map.insert(
            "web_facet_version".to_string(),
            self.facet_versions.web.clone(),
        );
        map.insert(
            "utility_facet_version".to_string(),
            self.facet_versions.utility.clone(),
        );
        map.insert("parallel".to_string(), self.parallel.to_string());
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Display for WtpgenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wtpgen Configuration:")?;
        writeln!(f, "  Policy: {}", self.policy)?;
        if let Some(ref file) = self.policy_file {
            writeln!(f, "  Policy File: {}", file.display())?;
        }
        writeln!(f, "  Library Deploy Path: {}", self.lib_deploy_path)?;
        writeln!(
            f,
            "  Facet Versions: java={} web={} utility={}",
            self.facet_versions.java, self.facet_versions.web, self.facet_versions.utility
        )?;
        writeln!(f, "  Parallel: {}", self.parallel)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::{DeploymentAttribute, DeploymentPolicy};
    use crate::project::{ProjectKind, Scope};
    use serial_test::serial;
    use std::io::Write;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn clear_env() -> Vec<EnvGuard> {
        [
            "WTPGEN_POLICY",
            "WTPGEN_POLICY_FILE",
            "WTPGEN_LIB_DEPLOY_PATH",
            "WTPGEN_JAVA_FACET_VERSION",
            "WTPGEN_WEB_FACET_VERSION",
            "WTPGEN_UTILITY_FACET_VERSION",
            "WTPGEN_PARALLEL",
            "WTPGEN_LOG_LEVEL",
        ]
        .into_iter()
        .map(EnvGuard::unset)
        .collect()
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = clear_env();

        let config = WtpgenConfig::default();

        assert_eq!(config.policy, PolicyChoice::Reference);
        assert_eq!(config.policy_file, None);
        assert_eq!(config.lib_deploy_path, "/WEB-INF/lib");
        assert_eq!(config.facet_versions, FacetVersions::default());
        assert!(!config.parallel);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _cleared = clear_env();
        let _guards = vec![
            EnvGuard::set("WTPGEN_POLICY", "Corrected"),
            EnvGuard::set("WTPGEN_LIB_DEPLOY_PATH", "/lib"),
            EnvGuard::set("WTPGEN_WEB_FACET_VERSION", "3.1"),
            EnvGuard::set("WTPGEN_PARALLEL", "true"),
            EnvGuard::set("WTPGEN_LOG_LEVEL", "DEBUG"),
        ];

        let config = WtpgenConfig::default();

        assert_eq!(config.policy, PolicyChoice::Corrected);
        assert_eq!(config.lib_deploy_path, "/lib");
        assert_eq!(config.facet_versions.web, "3.1");
        assert_eq!(config.facet_versions.java, "1.8");
        assert!(config.parallel);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_unknown_policy_falls_back_to_reference() {
        let _cleared = clear_env();
        let _guard = EnvGuard::set("WTPGEN_POLICY", "lenient");

        assert_eq!(WtpgenConfig::default().policy, PolicyChoice::Reference);
    }

    #[test]
    #[serial]
    fn test_validation_relative_deploy_path() {
        let _cleared = clear_env();
        let mut config = WtpgenConfig::default();
        config.lib_deploy_path = "WEB-INF/lib".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    #[serial]
    fn test_validation_empty_facet_version() {
        let _cleared = clear_env();
        let mut config = WtpgenConfig::default();
        config.facet_versions.utility = " ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_validation_invalid_log_level() {
        let _cleared = clear_env();
        let mut config = WtpgenConfig::default();
        config.log_level = "invalid".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_load_builtin_policy() {
        let _cleared = clear_env();
        let mut config = WtpgenConfig::default();
        config.policy = PolicyChoice::Corrected;
        config.lib_deploy_path = "/lib".to_string();

        let table = config.load_policy().unwrap();
        assert_eq!(table.name(), "corrected");
        assert_eq!(
            table
                .decide(ProjectKind::JavaLibrary, Scope::Provided)
                .attribute,
            DeploymentAttribute::None
        );
        assert_eq!(
            table
                .decide(ProjectKind::WebApplication, Scope::Compile)
                .module_path(),
            Some("/lib")
        );
    }

    #[test]
    #[serial]
    fn test_load_policy_file() {
        let _cleared = clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            DeploymentTable::corrected().to_toml_string().unwrap()
        )
        .unwrap();

        let mut config = WtpgenConfig::default();
        config.policy_file = Some(file.path().to_path_buf());

        let table = config.load_policy().unwrap();
        assert_eq!(table.rules(), DeploymentTable::corrected().rules());
    }

    #[test]
    #[serial]
    fn test_load_invalid_policy_file() {
        let _cleared = clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[rule]]\nkind = \"java-library\"\n").unwrap();

        let mut config = WtpgenConfig::default();
        config.policy_file = Some(file.path().to_path_buf());

        assert!(matches!(
            config.load_policy(),
            Err(ConfigError::PolicyFile { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_missing_policy_file() {
        let _cleared = clear_env();
        let mut config = WtpgenConfig::default();
        config.policy_file = Some(PathBuf::from("/nonexistent/policy.toml"));

        assert!(matches!(
            config.load_policy(),
            Err(ConfigError::PolicyFile { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_display_and_map() {
        let _cleared = clear_env();
        let config = WtpgenConfig::default();

        let display = format!("{}", config);
        assert!(display.contains("Wtpgen Configuration:"));
        assert!(display.contains("Policy: reference"));

        let map = config.to_display_map();
        assert_eq!(map.get("lib_deploy_path").map(String::as_str), Some("/WEB-INF/lib"));
        assert!(!map.contains_key("policy_file"));
    }

    #[test]
    fn test_policy_choice_parse() {
        assert_eq!("reference".parse::<PolicyChoice>().unwrap(), PolicyChoice::Reference);
        assert!("strict".parse::<PolicyChoice>().is_err());
    }
}
