//! Contract Invariant Tests
//!
//! These tests verify the guarantees callers rely on.

use std::collections::HashMap;

use indexmap::IndexMap;

use fieldcheck_core::{
    validate_fields, validate_value, CustomRule, FieldMessages, MessageOverrides, PipelineError,
    RuleError, RuleSet, RuleSetRegistry, ValidationPipeline,
};

fn signup_values() -> HashMap<String, String> {
    HashMap::from([
        ("firstName".to_string(), String::new()),
        ("lastName".to_string(), String::new()),
        ("email".to_string(), String::new()),
    ])
}

fn signup_rules() -> IndexMap<String, String> {
    IndexMap::from([
        ("firstName".to_string(), "required".to_string()),
        ("lastName".to_string(), "required".to_string()),
        ("email".to_string(), "email".to_string()),
    ])
}

fn create_test_rule_set() -> RuleSet {
    RuleSet {
        id: "signup".to_string(),
        name: "Signup".to_string(),
        description: "Test rule set".to_string(),
        version: "1.0.0".to_string(),
        engine_min_version: "1.0.0".to_string(),
        deprecated: false,
        fields: IndexMap::from([
            ("firstName".to_string(), "required|alpha".to_string()),
            ("email".to_string(), "required|email".to_string()),
            ("card".to_string(), "creditCard".to_string()),
        ]),
        messages: FieldMessages::from([(
            "email".to_string(),
            MessageOverrides::from([("email".to_string(), "Enter a valid email".to_string())]),
        )]),
    }
}

fn create_pipeline() -> ValidationPipeline {
    let mut registry = RuleSetRegistry::new();
    registry.register(create_test_rule_set());
    ValidationPipeline::new(registry)
}

#[test]
fn invariant_only_failing_fields_are_reported() {
    let errors = validate_fields(&signup_values(), &signup_rules(), None).unwrap();

    // email passes: an empty value only fails `required`
    assert_eq!(errors.len(), 2);
    assert!(errors.contains_key("firstName"));
    assert!(errors.contains_key("lastName"));
    assert!(!errors.contains_key("email"));
}

#[test]
fn invariant_field_overrides_apply_per_field() {
    let messages = FieldMessages::from([(
        "firstName".to_string(),
        MessageOverrides::from([(
            "required".to_string(),
            "First name is a required field".to_string(),
        )]),
    )]);

    let errors = validate_fields(&signup_values(), &signup_rules(), Some(&messages)).unwrap();

    assert_eq!(errors.len(), 2);
    assert_eq!(errors["firstName"][0], "First name is a required field");
    assert_eq!(errors["lastName"][0], "The lastName is invalid");
}

#[test]
fn invariant_credit_card_checksum() {
    let invalid = validate_value(Some("9999554048674408"), ["creditCard"], "foo", None).unwrap();
    assert_eq!(invalid.len(), 1);

    let valid = validate_value(Some("4929554048674408"), ["creditCard"], "foo", None).unwrap();
    assert!(valid.is_empty());
}

#[test]
fn invariant_max_length() {
    let errors = validate_value(Some("12345678901"), ["max:10"], "foo", None).unwrap();
    assert_eq!(errors, ["The foo is invalid"]);
}

#[test]
fn invariant_unsupported_rule_is_fatal() {
    let err = validate_value(None, ["idonotexists"], "foo", None).unwrap_err();
    assert!(err.to_string().contains("idonotexists"));
    assert_eq!(err.to_string(), "Rule idonotexists is not supported");
}

#[test]
fn invariant_unsupported_rule_aborts_all_fields() {
    let mut rules = signup_rules();
    rules.insert("age".to_string(), "integer".to_string());

    let result = validate_fields(&signup_values(), &rules, None);
    assert_eq!(
        result,
        Err(RuleError::UnsupportedRule {
            rule: "integer".to_string()
        })
    );
}

#[test]
fn invariant_custom_predicate() {
    let is_bar = CustomRule::new("isBar", |v| v == Some("bar"));

    let passes = validate_value(Some("bar"), [is_bar.clone()], "foo", None).unwrap();
    assert!(passes.is_empty());

    let fails = validate_value(Some("baz"), [is_bar], "foo", None).unwrap();
    assert_eq!(fails.len(), 1);
}

#[test]
fn invariant_pipeline_reports_invalid_fields() {
    let pipeline = create_pipeline();
    let values = HashMap::from([
        ("firstName".to_string(), "Ada".to_string()),
        ("email".to_string(), "not-an-email".to_string()),
    ]);

    let report = pipeline.validate("signup", &values).unwrap();

    assert!(!report.valid);
    assert_eq!(report.rule_set_id, "signup");
    assert_eq!(report.rule_set_version, "1.0.0");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors["email"], ["Enter a valid email"]);
}

#[test]
fn invariant_pipeline_valid_payload() {
    let pipeline = create_pipeline();
    let report = pipeline
        .validate_json(
            "signup",
            r#"{"firstName": "Ada", "email": "ada@example.com", "card": "4929554048674408"}"#,
        )
        .unwrap();

    assert!(report.valid);
    assert!(report.errors.is_empty());
}

#[test]
fn invariant_rule_set_not_found_error() {
    let pipeline = create_pipeline();
    let result = pipeline.validate("nonexistent", &HashMap::new());
    assert!(matches!(result, Err(PipelineError::RuleSetNotFound(_))));
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Rule set not found"));
}

#[test]
fn invariant_engine_version_enforced() {
    let mut rule_set = create_test_rule_set();
    rule_set.engine_min_version = "99.0.0".to_string();

    let mut registry = RuleSetRegistry::new();
    registry.register(rule_set);
    let pipeline = ValidationPipeline::new(registry);

    let result = pipeline.validate("signup", &HashMap::new());
    assert!(matches!(
        result,
        Err(PipelineError::EngineVersionMismatch(..))
    ));
}

#[test]
fn invariant_pipeline_surfaces_rule_errors() {
    let mut rule_set = create_test_rule_set();
    rule_set
        .fields
        .insert("nickname".to_string(), "max:lots".to_string());

    let mut registry = RuleSetRegistry::new();
    registry.register(rule_set);
    let pipeline = ValidationPipeline::new(registry);

    let result = pipeline.validate("signup", &HashMap::new());
    assert!(matches!(
        result,
        Err(PipelineError::Rule(RuleError::InvalidConstraint { .. }))
    ));
}

#[test]
fn invariant_bad_payload_is_an_error() {
    let pipeline = create_pipeline();
    let result = pipeline.validate_json("signup", "[1, 2, 3]");
    assert!(matches!(result, Err(PipelineError::Serialization(_))));
}
