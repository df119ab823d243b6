//! Validation System - Rules Evaluate, Messages Explain
//!
//! Rules decide pass/fail for one value.
//! Messages are resolved only for rules that fail.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::formats::{FormatChecks, StandardFormats};
use crate::messages::{resolve_message, FieldMessages, MessageOverrides};
use crate::rules::{split_rules, BuiltinRule, IntoRuleSpec, RuleError, RuleSpec};

/// Field name -> messages for its failing rules. Valid fields are absent.
pub type ErrorsMapping = IndexMap<String, Vec<String>>;

/// Validator evaluates rules against values using a set of format checks
#[derive(Debug, Clone, Default)]
pub struct Validator<F = StandardFormats> {
    formats: F,
}

impl Validator<StandardFormats> {
    pub fn new() -> Self {
        Self {
            formats: StandardFormats,
        }
    }
}

impl<F: FormatChecks> Validator<F> {
    pub fn with_formats(formats: F) -> Self {
        Self { formats }
    }

    /// Returns true when `rule` rejects `value`.
    ///
    /// Only `required` looks at absent or empty values; every other
    /// built-in rule lets them through.
    pub fn rule_fails(&self, rule: &RuleSpec, value: Option<&str>) -> bool {
        match rule {
            RuleSpec::Custom(custom) => !custom.is_valid(value),
            RuleSpec::Builtin(builtin) => self.builtin_fails(*builtin, value),
        }
    }

    fn builtin_fails(&self, rule: BuiltinRule, value: Option<&str>) -> bool {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => return rule == BuiltinRule::Required,
        };

        match rule {
            BuiltinRule::Required => false,
            BuiltinRule::Email => !self.formats.is_email(value),
            BuiltinRule::CreditCard => !self.formats.is_credit_card(value),
            BuiltinRule::Alpha => !self.formats.is_alpha(value),
            BuiltinRule::Max(limit) => value.chars().count() >= limit,
            BuiltinRule::Min(limit) => value.chars().count() <= limit,
        }
    }

    /// Messages for every failing rule, in rule order. Rules are already resolved.
    pub fn check_value(
        &self,
        value: Option<&str>,
        rules: &[RuleSpec],
        name: &str,
        messages: Option<&MessageOverrides>,
    ) -> Vec<String> {
        rules
            .iter()
            .filter(|rule| self.rule_fails(rule, value))
            .map(|rule| {
                trace!(field = name, rule = %rule, "rule failed");
                resolve_message(rule.name(), name, messages)
            })
            .collect()
    }

    /// Validate one value against a list of rules.
    ///
    /// Rules may be tokens (`"max:10"`), resolved rules or custom predicates.
    /// Every rule is resolved before any is evaluated, so an unsupported rule
    /// returns an error and no messages.
    pub fn validate_value<I>(
        &self,
        value: Option<&str>,
        rules: I,
        name: &str,
        messages: Option<&MessageOverrides>,
    ) -> Result<Vec<String>, RuleError>
    where
        I: IntoIterator,
        I::Item: IntoRuleSpec,
    {
        let rules = rules
            .into_iter()
            .map(IntoRuleSpec::into_rule_spec)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.check_value(value, &rules, name, messages))
    }

    /// Validate every field declared in `validation_rules`.
    ///
    /// Each rule string is pipe-delimited (`required|email`). Fields only
    /// present in `values` are ignored. Any unsupported rule aborts the whole
    /// call.
    pub fn validate_fields(
        &self,
        values: &HashMap<String, String>,
        validation_rules: &IndexMap<String, String>,
        messages: Option<&FieldMessages>,
    ) -> Result<ErrorsMapping, RuleError> {
        let compiled = validation_rules
            .iter()
            .map(|(name, rules)| split_rules(rules).map(|parsed| (name.clone(), parsed)))
            .collect::<Result<IndexMap<_, _>, _>>()?;

        Ok(self.validate_compiled_fields(values, &compiled, messages))
    }

    /// Same as `validate_fields`, for rule tables parsed ahead of time.
    pub fn validate_compiled_fields(
        &self,
        values: &HashMap<String, String>,
        validation_rules: &IndexMap<String, Vec<RuleSpec>>,
        messages: Option<&FieldMessages>,
    ) -> ErrorsMapping {
        let mut errors = ErrorsMapping::new();

        for (name, rules) in validation_rules {
            let value = values.get(name).map(String::as_str);
            let overrides = messages.and_then(|m| m.get(name));
            let field_errors = self.check_value(value, rules, name, overrides);

            if !field_errors.is_empty() {
                debug!(field = %name, failures = field_errors.len(), "field invalid");
                errors.insert(name.clone(), field_errors);
            }
        }

        debug!(
            fields = validation_rules.len(),
            invalid = errors.len(),
            "validated fields"
        );
        errors
    }
}

/// Validate one value with the standard format checks.
pub fn validate_value<I>(
    value: Option<&str>,
    rules: I,
    name: &str,
    messages: Option<&MessageOverrides>,
) -> Result<Vec<String>, RuleError>
where
    I: IntoIterator,
    I::Item: IntoRuleSpec,
{
    Validator::new().validate_value(value, rules, name, messages)
}

/// Validate declared fields with the standard format checks.
pub fn validate_fields(
    values: &HashMap<String, String>,
    validation_rules: &IndexMap<String, String>,
    messages: Option<&FieldMessages>,
) -> Result<ErrorsMapping, RuleError> {
    Validator::new().validate_fields(values, validation_rules, messages)
}
