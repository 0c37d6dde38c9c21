//! Facet resolution
//!
//! Facet ids depend only on the project kind. Installed facets also carry a
//! version, taken from [`FacetVersions`] (the Java facet follows the project's
//! source compatibility when it declares one).

use crate::project::ProjectKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_JAVA_FACET_VERSION: &str = "1.8";
pub const DEFAULT_WEB_FACET_VERSION: &str = "2.4";
pub const DEFAULT_UTILITY_FACET_VERSION: &str = "1.0";

crate::define_id_enum! {
    /// IDE facet identifier
    FacetId {
        JstJava => "jst.java" : "Java",
        JstWeb => "jst.web" : "Dynamic Web Module",
        JstUtility => "jst.utility" : "Utility Module",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstalledFacet {
    pub id: FacetId,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetVersions {
    pub java: String,
    pub web: String,
    pub utility: String,
}

impl Default for FacetVersions {
    fn default() -> Self {
        Self {
            java: DEFAULT_JAVA_FACET_VERSION.to_string(),
            web: DEFAULT_WEB_FACET_VERSION.to_string(),
            utility: DEFAULT_UTILITY_FACET_VERSION.to_string(),
        }
    }
}

impl FacetVersions {
    fn version_of(&self, id: &FacetId, java_version: Option<&str>) -> String {
        match id {
            FacetId::JstJava => java_version
                .map(normalize_java_version)
                .unwrap_or_else(|| self.java.clone()),
            FacetId::JstWeb => self.web.clone(),
            FacetId::JstUtility => self.utility.clone(),
            FacetId::Custom(_) => String::new(),
        }
    }
}

/// Facet versions use the `1.x` spelling up to Java 8 and the bare major
/// version afterwards, so `8` becomes `1.8` and `1.11` becomes `11`.
fn normalize_java_version(version: &str) -> String {
    let version = version.trim();
    let major = version.strip_prefix("1.").unwrap_or(version);
    match major.parse::<u32>() {
        Ok(n) if n <= 8 => format!("1.{}", n),
        Ok(n) => n.to_string(),
        Err(_) => version.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSet {
    pub fixed: BTreeSet<FacetId>,
    pub installed: BTreeSet<InstalledFacet>,
}

impl FacetSet {
    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty() && self.installed.is_empty()
    }

    pub fn installed_ids(&self) -> BTreeSet<FacetId> {
        self.installed.iter().map(|f| f.id.clone()).collect()
    }
}

pub fn resolve_facets(
    kind: Option<ProjectKind>,
    versions: &FacetVersions,
    java_version: Option<&str>,
) -> FacetSet {
    let (fixed, installed) = match kind {
        Some(ProjectKind::JavaLibrary) => (
            vec![FacetId::JstJava],
            vec![FacetId::JstUtility, FacetId::JstJava],
        ),
        Some(ProjectKind::WebApplication) => (
            vec![FacetId::JstJava, FacetId::JstWeb],
            vec![FacetId::JstWeb, FacetId::JstJava],
        ),
        None => (Vec::new(), Vec::new()),
    };

    FacetSet {
        fixed: fixed.into_iter().collect(),
        installed: installed
            .into_iter()
            .map(|id| InstalledFacet {
                version: versions.version_of(&id, java_version),
                id,
            })
            .collect(),
    }
}
