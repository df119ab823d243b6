//! Rule Sets - Declarative Field Contracts
//!
//! A rule set is a JSON document naming the fields of a form, the rules
//! each field must satisfy and the messages to show when they do not.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::messages::FieldMessages;
use crate::rules::{split_rules, RuleError, RuleSpec};

pub type RuleSetId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    pub id: RuleSetId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    pub engine_min_version: String,
    #[serde(default)]
    pub deprecated: bool,
    /// Field name -> pipe-delimited rules, in declaration order
    pub fields: IndexMap<String, String>,
    #[serde(default)]
    pub messages: FieldMessages,
}

impl RuleSet {
    /// Resolve every field's rules. The first unsupported rule fails the set.
    pub fn compile(&self) -> Result<CompiledRuleSet, RuleError> {
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for (name, rules) in &self.fields {
            fields.insert(name.clone(), split_rules(rules)?);
        }

        Ok(CompiledRuleSet {
            id: self.id.clone(),
            version: self.version.clone(),
            fields,
            messages: self.messages.clone(),
        })
    }
}

/// A rule set whose rule strings have all been parsed
#[derive(Debug, Clone)]
pub struct CompiledRuleSet {
    pub id: RuleSetId,
    pub version: String,
    pub fields: IndexMap<String, Vec<RuleSpec>>,
    pub messages: FieldMessages,
}

/// Rule set registry - loads and caches rule sets
pub struct RuleSetRegistry {
    rule_sets: HashMap<RuleSetId, RuleSet>,
}

impl RuleSetRegistry {
    pub fn new() -> Self {
        Self { rule_sets: HashMap::new() }
    }

    /// Load every `*.json` rule set in `dir`. Unreadable or malformed files are skipped.
    pub fn load_from_dir(dir: &Path) -> Result<Self, std::io::Error> {
        let mut registry = Self::new();
        if !dir.exists() {
            debug!(dir = %dir.display(), "rule set directory missing");
            return Ok(registry);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |e| e == "json") {
                let parsed = fs::read_to_string(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|content| {
                        serde_json::from_str::<RuleSet>(&content).map_err(|e| e.to_string())
                    });
                match parsed {
                    Ok(rule_set) => {
                        debug!(id = %rule_set.id, path = %path.display(), "loaded rule set");
                        registry.register(rule_set);
                    }
                    Err(error) => {
                        warn!(path = %path.display(), %error, "skipping rule set file");
                    }
                }
            }
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&RuleSet> {
        self.rule_sets.get(id)
    }

    pub fn list(&self) -> Vec<&RuleSet> {
        let mut rule_sets: Vec<_> = self.rule_sets.values().collect();
        rule_sets.sort_by(|a, b| a.id.cmp(&b.id));
        rule_sets
    }

    pub fn register(&mut self, rule_set: RuleSet) {
        self.rule_sets.insert(rule_set.id.clone(), rule_set);
    }
}

impl Default for RuleSetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
