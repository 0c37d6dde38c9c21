use crate::output::schema::ProjectModel;
use crate::validation::rules::{
    LibraryModulesRule, ResourceLayoutRule, UniqueClasspathRule, UnrecognizedKindRule,
    ValidationRule, WebDeploymentExclusivityRule,
};
use anyhow::Result;

pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    pub fn validate(&self, model: &ProjectModel) -> Result<()> {
        for rule in &self.rules {
            if let Err(e) = rule.validate(model) {
                anyhow::bail!("[{}] {}", rule.name(), e);
            }
        }
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            rules: vec![
                Box::new(UniqueClasspathRule),
                Box::new(WebDeploymentExclusivityRule),
                Box::new(LibraryModulesRule),
                Box::new(ResourceLayoutRule),
                Box::new(UnrecognizedKindRule),
            ],
        }
    }
}
