//! Validation Pipeline - Single Entry Point
//!
//! Every rule set goes through the engine version check before its rules run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::rules::RuleError;
use crate::rulesets::{RuleSet, RuleSetRegistry};
use crate::validation::{ErrorsMapping, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Rule set not found: {0}")]
    RuleSetNotFound(String),

    #[error("Rule set version {0} requires engine >= {1}, current is {2}")]
    EngineVersionMismatch(String, String, String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub rule_set_id: String,
    pub rule_set_version: String,
    pub errors: ErrorsMapping,
}

/// The validation pipeline - runs registered rule sets against submitted values
pub struct ValidationPipeline {
    registry: RuleSetRegistry,
    validator: Validator,
}

impl ValidationPipeline {
    pub fn new(registry: RuleSetRegistry) -> Self {
        Self {
            registry,
            validator: Validator::new(),
        }
    }

    pub fn list_rule_sets(&self) -> Vec<&RuleSet> {
        self.registry.list()
    }

    pub fn get_rule_set(&self, id: &str) -> Option<&RuleSet> {
        self.registry.get(id)
    }

    /// Validate `values` against the rule set `rule_set_id`.
    pub fn validate(
        &self,
        rule_set_id: &str,
        values: &HashMap<String, String>,
    ) -> Result<ValidationReport, PipelineError> {
        let rule_set = self
            .registry
            .get(rule_set_id)
            .ok_or_else(|| PipelineError::RuleSetNotFound(rule_set_id.to_string()))?;

        self.check_engine_version(rule_set)?;

        let compiled = rule_set.compile()?;
        let errors =
            self.validator
                .validate_compiled_fields(values, &compiled.fields, Some(&compiled.messages));

        info!(
            rule_set = %compiled.id,
            invalid_fields = errors.len(),
            "validation finished"
        );

        Ok(ValidationReport {
            valid: errors.is_empty(),
            rule_set_id: compiled.id,
            rule_set_version: compiled.version,
            errors,
        })
    }

    /// Parse a JSON object of field -> value and validate it.
    pub fn validate_json(
        &self,
        rule_set_id: &str,
        payload: &str,
    ) -> Result<ValidationReport, PipelineError> {
        let values: HashMap<String, String> = serde_json::from_str(payload)?;
        self.validate(rule_set_id, &values)
    }

    fn check_engine_version(&self, rule_set: &RuleSet) -> Result<(), PipelineError> {
        let engine_ver = semver::Version::parse(ENGINE_VERSION)
            .map_err(|_| PipelineError::InvalidVersion(ENGINE_VERSION.to_string()))?;
        let min_ver = semver::Version::parse(&rule_set.engine_min_version)
            .map_err(|_| PipelineError::InvalidVersion(rule_set.engine_min_version.clone()))?;

        if engine_ver < min_ver {
            return Err(PipelineError::EngineVersionMismatch(
                rule_set.version.clone(),
                rule_set.engine_min_version.clone(),
                ENGINE_VERSION.to_string(),
            ));
        }

        debug!(rule_set = %rule_set.id, %min_ver, "engine version ok");
        Ok(())
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::new(RuleSetRegistry::default())
    }
}
