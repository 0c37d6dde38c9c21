//! Output formatting for multiple formats
//!
//! JSON and YAML render the serde form of the model. The human format is a
//! compact tree per project meant for reading in a terminal.

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::config::WtpgenConfig;
use crate::deploy::{ClasspathEntry, DeploymentPolicy, DeploymentTable, OriginKind};
use crate::output::schema::{ProjectModel, SyncReport};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    /// Only supported for decision tables
    Toml,
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_report(&self, report: &SyncReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Yaml => to_yaml(report),
            OutputFormat::Toml => bail!("TOML output is only available for decision tables"),
            OutputFormat::Human => Ok(self.format_report_human(report)),
        }
    }

    pub fn format_model(&self, model: &ProjectModel) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(model),
            OutputFormat::Yaml => to_yaml(model),
            OutputFormat::Toml => bail!("TOML output is only available for decision tables"),
            OutputFormat::Human => Ok(self.format_model_human(model)),
        }
    }

    pub fn format_policy(&self, table: &DeploymentTable) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(&table.rules()),
            OutputFormat::Yaml => to_yaml(&table.rules()),
            OutputFormat::Toml => table
                .to_toml_string()
                .context("Failed to serialize decision table to TOML"),
            OutputFormat::Human => Ok(self.format_policy_human(table)),
        }
    }

    pub fn format_config(&self, config: &WtpgenConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(&config.to_display_map()),
            OutputFormat::Yaml => to_yaml(&config.to_display_map()),
            OutputFormat::Toml => bail!("TOML output is only available for decision tables"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_report_human(&self, report: &SyncReport) -> String {
        let mut output = String::new();

        for model in report.models.values() {
            output.push_str(&self.format_model_human(model));
            output.push('\n');
        }

        if !report.failures.is_empty() {
            output.push_str("\u{26A0} Failed projects\n");
            output.push_str(RULE);
            output.push('\n');
            for (project, error) in &report.failures {
                output.push_str(&format!("{}: {}\n", project, error));
            }
        }

        output
    }

    fn format_model_human(&self, model: &ProjectModel) -> String {
        let mut output = String::new();

        let kind = model
            .kind
            .map(|k| k.to_string())
            .unwrap_or_else(|| "unrecognized".to_string());
        output.push_str(&format!("\u{2713} {} ({})\n", model.project, kind));
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!("Deploy name:  {}\n\n", model.deploy_name));

        output.push_str("Classpath:\n");
        if model.classpath.is_empty() {
            output.push_str("\u{2514}\u{2500} (none)\n");
        }
        for (i, entry) in model.classpath.iter().enumerate() {
            let connector = tree_connector(i, model.classpath.len());
            output.push_str(&format!("{}\u{2500} {}\n", connector, classpath_line(entry)));
        }
        output.push('\n');

        if let Some(component) = &model.component {
            output.push_str("Component:\n");
            let mut lines: Vec<String> = component
                .resources
                .iter()
                .map(|r| format!("resource {} -> {}", r.source_root, r.deployed_at))
                .collect();
            lines.extend(
                component
                    .modules
                    .iter()
                    .map(|m| format!("module {} -> {}", m.reference.handle(), m.deployed_at)),
            );
            lines.extend(
                component
                    .properties
                    .iter()
                    .map(|p| format!("property {} = {}", p.name, p.value)),
            );
            for (i, line) in lines.iter().enumerate() {
                output.push_str(&format!("{}\u{2500} {}\n", tree_connector(i, lines.len()), line));
            }
            output.push('\n');
        }

        if !model.facets.is_empty() {
            let fixed: Vec<&str> = model.facets.fixed.iter().map(|f| f.id()).collect();
            let installed: Vec<String> = model
                .facets
                .installed
                .iter()
                .map(|f| format!("{} {}", f.id, f.version))
                .collect();
            output.push_str("Facets:\n");
            output.push_str(&format!("\u{251C}\u{2500} fixed:      {}\n", fixed.join(", ")));
            output.push_str(&format!(
                "\u{2514}\u{2500} installed:  {}\n",
                installed.join(", ")
            ));
        }

        output
    }

    fn format_policy_human(&self, table: &DeploymentTable) -> String {
        let mut output = format!("Deployment policy: {}\n{}\n", table.name(), RULE);
        for rule in table.rules() {
            let location = match &rule.module {
                Some(path) => format!("module at {}", path),
                None => "classpath".to_string(),
            };
            output.push_str(&format!(
                "{:<16} {:<9} {:<9} {}\n",
                rule.kind.to_string(),
                rule.scope.to_string(),
                rule.attribute.to_string(),
                location
            ));
        }
        output
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")
}

fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).context("Failed to serialize output to YAML")
}

fn tree_connector(index: usize, len: usize) -> &'static str {
    if index + 1 == len {
        "\u{2514}"
    } else {
        "\u{251C}"
    }
}

fn classpath_line(entry: &ClasspathEntry) -> String {
    let origin = match entry.origin_kind {
        OriginKind::Lib => "lib",
        OriginKind::Project => "project",
    };
    let mut line = format!("{} [{}, {}]", entry.entry_id, origin, entry.scope);
    if let Some(attribute) = entry.deployment_attribute {
        line.push_str(&format!(" {}", attribute));
    }
    line
}
