//! FieldCheck CLI - JSON bridge to the validation engine
//!
//! Commands: rulesets, validate, check
//! Outputs JSON to stdout, logs to stderr
//! Exit codes: 0 valid, 2 invalid, 1 error

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use fieldcheck_core::{
    logging, rulesets::RuleSetRegistry, split_rules, MessageOverrides, ValidationPipeline,
    Validator,
};

#[derive(Parser)]
#[command(name = "fieldcheck-cli")]
#[command(about = "FieldCheck CLI - Declarative field validation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to rule sets directory
    #[arg(short = 'd', long, default_value = "rulesets", global = true)]
    rules_dir: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List available rule sets
    Rulesets,

    /// Validate a payload against a rule set
    Validate {
        /// Rule set ID
        #[arg(short = 's', long)]
        ruleset: String,

        /// JSON object of field -> value
        #[arg(short, long)]
        payload: String,
    },

    /// Validate a single value against a rule string
    Check {
        /// Field name used in messages
        #[arg(short, long)]
        name: String,

        /// Pipe-delimited rules, e.g. "required|max:10"
        #[arg(short = 'r', long)]
        rules: String,

        /// Value to check; omitted means absent
        #[arg(long)]
        value: Option<String>,

        /// JSON object of rule -> message
        #[arg(short, long)]
        messages: Option<String>,
    },
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => println!(r#"{{"error": "Failed to encode output: {}"}}"#, e),
    }
}

fn error_exit(message: impl std::fmt::Display) -> ExitCode {
    tracing::error!(%message, "command failed");
    print_json(&serde_json::json!({ "error": message.to_string() }));
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Rulesets => {
            let registry = match RuleSetRegistry::load_from_dir(&cli.rules_dir) {
                Ok(r) => r,
                Err(e) => return error_exit(format!("Failed to load rule sets: {}", e)),
            };
            let pipeline = ValidationPipeline::new(registry);

            let rule_sets: Vec<_> = pipeline
                .list_rule_sets()
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "id": r.id,
                        "name": r.name,
                        "version": r.version,
                        "fields": r.fields.keys().collect::<Vec<_>>(),
                        "deprecated": r.deprecated,
                    })
                })
                .collect();

            print_json(&serde_json::Value::from(rule_sets));
            ExitCode::SUCCESS
        }

        Commands::Validate { ruleset, payload } => {
            let registry = match RuleSetRegistry::load_from_dir(&cli.rules_dir) {
                Ok(r) => r,
                Err(e) => return error_exit(format!("Failed to load rule sets: {}", e)),
            };
            let pipeline = ValidationPipeline::new(registry);

            match pipeline.validate_json(&ruleset, &payload) {
                Ok(report) => {
                    match serde_json::to_value(&report) {
                        Ok(value) => print_json(&value),
                        Err(e) => return error_exit(e),
                    }
                    if report.valid {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(2) // Validation failure
                    }
                }
                Err(e) => error_exit(e),
            }
        }

        Commands::Check {
            name,
            rules,
            value,
            messages,
        } => {
            let overrides = match messages.as_deref().map(serde_json::from_str::<MessageOverrides>) {
                Some(Ok(m)) => Some(m),
                Some(Err(e)) => return error_exit(format!("Invalid messages: {}", e)),
                None => None,
            };

            let validator = Validator::new();
            let result = split_rules(&rules).map(|rules| {
                validator.check_value(value.as_deref(), &rules, &name, overrides.as_ref())
            });

            match result {
                Ok(errors) => {
                    let valid = errors.is_empty();
                    print_json(&serde_json::json!({ "name": name, "errors": errors }));
                    if valid {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(2)
                    }
                }
                Err(e) => error_exit(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rules_dir_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fieldcheck-cli",
            "validate",
            "--rules-dir",
            "forms",
            "--ruleset",
            "signup",
            "--payload",
            "{}",
        ])
        .unwrap();
        assert_eq!(cli.rules_dir, PathBuf::from("forms"));
        assert!(matches!(cli.command, Commands::Validate { .. }));
    }

    #[test]
    fn test_rules_dir_before_subcommand() {
        let cli = Cli::try_parse_from(["fieldcheck-cli", "-d", "forms", "-v", "rulesets"]).unwrap();
        assert_eq!(cli.rules_dir, PathBuf::from("forms"));
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_check_rules_short_flag() {
        let cli = Cli::try_parse_from(["fieldcheck-cli", "check", "-n", "foo", "-r", "required"]).unwrap();
        match cli.command {
            Commands::Check { rules, value, .. } => {
                assert_eq!(rules, "required");
                assert!(value.is_none());
            }
            _ => panic!("expected check command"),
        }
    }
}
