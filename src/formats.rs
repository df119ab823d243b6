//! Format checks used by the built-in rules.
//!
//! The engine only needs three predicates. `StandardFormats` backs them with
//! the `validator` crate; any other implementation can be plugged into a
//! `Validator`.

use validator::{ValidateCreditCard, ValidateEmail};

pub trait FormatChecks {
    fn is_email(&self, value: &str) -> bool;
    fn is_credit_card(&self, value: &str) -> bool;
    fn is_alpha(&self, value: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormats;

impl FormatChecks for StandardFormats {
    /// HTML5 email syntax, with a top-level domain.
    fn is_email(&self, value: &str) -> bool {
        value.validate_email() && has_tld(value)
    }

    /// Known card number formats with a valid Luhn checksum.
    /// Spaces and dashes between digit groups are ignored.
    fn is_credit_card(&self, value: &str) -> bool {
        let digits: String = value.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
        !digits.is_empty() && digits.validate_credit_card()
    }

    /// ASCII letters only.
    fn is_alpha(&self, value: &str) -> bool {
        !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic())
    }
}

/// The domain needs at least two labels, and the last one must be a real TLD:
/// two or more letters, or a punycode label.
fn has_tld(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    match domain.rsplit_once('.') {
        Some((rest, tld)) => {
            !rest.is_empty()
                && (tld.starts_with("xn--")
                    || (tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic)))
        }
        None => false,
    }
}
