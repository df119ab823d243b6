//! Error messages for failing rules.

use std::collections::HashMap;

/// Rule identifier -> literal message, for one field.
pub type MessageOverrides = HashMap<String, String>;

/// Field name -> that field's overrides.
pub type FieldMessages = HashMap<String, MessageOverrides>;

pub const DEFAULT_MESSAGE_TEMPLATE: &str = "The {field} is invalid";

pub fn default_message(field: &str) -> String {
    DEFAULT_MESSAGE_TEMPLATE.replace("{field}", field)
}

/// Pick the override for `rule` if one is set, else the default message.
///
/// Empty overrides count as unset.
pub fn resolve_message(rule: &str, field: &str, overrides: Option<&MessageOverrides>) -> String {
    overrides
        .and_then(|messages| messages.get(rule))
        .filter(|message| !message.is_empty())
        .cloned()
        .unwrap_or_else(|| default_message(field))
}
