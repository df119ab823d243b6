//! Rule System - Tokens Become Typed Rules
//!
//! A rule token is `name` or `name:constraint`. Tokens are resolved into
//! `RuleSpec` values up front, so an unknown rule name is rejected before
//! any value is looked at.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

/// Separator between a rule identifier and its constraint (`max:10`).
pub const CONSTRAINT_SEPARATOR: char = ':';

/// Separator between rules in a composed rule string (`required|email`).
pub const RULE_SEPARATOR: char = '|';

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Rule {rule} is not supported")]
    UnsupportedRule { rule: String },

    #[error("Rule {rule} expects a numeric length constraint, got {constraint:?}")]
    InvalidConstraint {
        rule: String,
        constraint: Option<String>,
    },
}

/// Split a rule token on the first separator into identifier and constraint.
/// Whitespace around either part is dropped.
pub fn parse_rule_token(token: &str) -> (&str, Option<&str>) {
    match token.split_once(CONSTRAINT_SEPARATOR) {
        Some((rule, constraint)) => (rule.trim(), Some(constraint.trim())),
        None => (token.trim(), None),
    }
}

/// Parse a pipe-delimited rule string into typed rules.
///
/// Empty segments are skipped. The first unsupported rule aborts the whole
/// string; no partial list is returned.
pub fn split_rules(rules: &str) -> Result<Vec<RuleSpec>, RuleError> {
    rules
        .split(RULE_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(RuleSpec::parse)
        .collect()
}

/// Built-in rules. Length bounds carry their parsed constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinRule {
    Required,
    Email,
    CreditCard,
    Alpha,
    Max(usize),
    Min(usize),
}

impl BuiltinRule {
    /// Resolve an identifier and optional constraint into a built-in rule.
    pub fn from_parts(rule: &str, constraint: Option<&str>) -> Result<Self, RuleError> {
        match rule {
            "required" => Ok(Self::Required),
            "email" => Ok(Self::Email),
            "creditCard" => Ok(Self::CreditCard),
            "alpha" => Ok(Self::Alpha),
            "max" => parse_length(rule, constraint).map(Self::Max),
            "min" => parse_length(rule, constraint).map(Self::Min),
            other => Err(RuleError::UnsupportedRule {
                rule: other.to_string(),
            }),
        }
    }

    /// Identifier used for message overrides.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Email => "email",
            Self::CreditCard => "creditCard",
            Self::Alpha => "alpha",
            Self::Max(_) => "max",
            Self::Min(_) => "min",
        }
    }
}

impl fmt::Display for BuiltinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Max(limit) | Self::Min(limit) => {
                write!(f, "{}{}{}", self.name(), CONSTRAINT_SEPARATOR, limit)
            }
            _ => f.write_str(self.name()),
        }
    }
}

fn parse_length(rule: &str, constraint: Option<&str>) -> Result<usize, RuleError> {
    constraint
        .and_then(|c| c.trim().parse::<usize>().ok())
        .ok_or_else(|| RuleError::InvalidConstraint {
            rule: rule.to_string(),
            constraint: constraint.map(str::to_string),
        })
}

type Predicate = dyn Fn(Option<&str>) -> bool + Send + Sync;

/// A caller-supplied predicate. Returns true when the value is valid.
#[derive(Clone)]
pub struct CustomRule {
    name: String,
    predicate: Arc<Predicate>,
}

impl CustomRule {
    pub fn new<P>(name: impl Into<String>, predicate: P) -> Self
    where
        P: Fn(Option<&str>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_valid(&self, value: Option<&str>) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A resolved rule: either built in or a custom predicate.
#[derive(Debug, Clone)]
pub enum RuleSpec {
    Builtin(BuiltinRule),
    Custom(CustomRule),
}

impl RuleSpec {
    /// Parse a single rule token such as `required` or `max:10`.
    pub fn parse(token: &str) -> Result<Self, RuleError> {
        let (rule, constraint) = parse_rule_token(token);
        BuiltinRule::from_parts(rule, constraint).map(Self::Builtin)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(rule) => rule.name(),
            Self::Custom(rule) => rule.name(),
        }
    }
}

impl FromStr for RuleSpec {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<BuiltinRule> for RuleSpec {
    fn from(rule: BuiltinRule) -> Self {
        Self::Builtin(rule)
    }
}

impl From<CustomRule> for RuleSpec {
    fn from(rule: CustomRule) -> Self {
        Self::Custom(rule)
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(rule) => rule.fmt(f),
            Self::Custom(rule) => f.write_str(rule.name()),
        }
    }
}

/// Anything that can stand in a rule list: tokens, resolved rules, predicates.
pub trait IntoRuleSpec {
    fn into_rule_spec(self) -> Result<RuleSpec, RuleError>;
}

impl IntoRuleSpec for RuleSpec {
    fn into_rule_spec(self) -> Result<RuleSpec, RuleError> {
        Ok(self)
    }
}

impl IntoRuleSpec for &RuleSpec {
    fn into_rule_spec(self) -> Result<RuleSpec, RuleError> {
        Ok(self.clone())
    }
}

impl IntoRuleSpec for BuiltinRule {
    fn into_rule_spec(self) -> Result<RuleSpec, RuleError> {
        Ok(RuleSpec::Builtin(self))
    }
}

impl IntoRuleSpec for CustomRule {
    fn into_rule_spec(self) -> Result<RuleSpec, RuleError> {
        Ok(RuleSpec::Custom(self))
    }
}

impl IntoRuleSpec for &str {
    fn into_rule_spec(self) -> Result<RuleSpec, RuleError> {
        RuleSpec::parse(self)
    }
}

impl IntoRuleSpec for String {
    fn into_rule_spec(self) -> Result<RuleSpec, RuleError> {
        RuleSpec::parse(&self)
    }
}
