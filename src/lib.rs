//! FieldCheck Core - Declarative Field Validation
//!
//! # Contract
//! 1. Rules run in declaration order
//! 2. Absent or empty values only fail `required`
//! 3. A field is reported iff at least one of its rules fails
//! 4. An unsupported rule aborts the whole call, with no partial result

pub mod rules;
pub mod formats;
pub mod messages;
pub mod validation;
pub mod rulesets;
pub mod pipeline;
pub mod logging;

pub use rules::{BuiltinRule, CustomRule, IntoRuleSpec, RuleError, RuleSpec, parse_rule_token, split_rules};
pub use formats::{FormatChecks, StandardFormats};
pub use messages::{FieldMessages, MessageOverrides, DEFAULT_MESSAGE_TEMPLATE};
pub use validation::{ErrorsMapping, Validator, validate_fields, validate_value};
pub use rulesets::{CompiledRuleSet, RuleSet, RuleSetRegistry};
pub use pipeline::{PipelineError, ValidationPipeline, ValidationReport};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
