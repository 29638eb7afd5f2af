//! Structural validation shared by agenda and contact inputs.
//!
//! These checks mirror the column constraints in the schema so that invalid
//! input is rejected with a field-level message before reaching SQLite.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound for agenda and contact names, counted in chars.
pub const NAME_MAX_CHARS: usize = 255;

static AREA_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}$").expect("valid area code regex"));
static PHONE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{8,9}$").expect("valid phone number regex"));

/// Field-level rejection of a structurally invalid input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty or whitespace only.
    Blank { field: &'static str },
    /// Field exceeds its maximum char count.
    TooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    /// Field does not match its digit pattern.
    Pattern {
        field: &'static str,
        expected: &'static str,
    },
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field } | Self::TooLong { field, .. } | Self::Pattern { field, .. } => {
                field
            }
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} cannot be blank"),
            Self::TooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "{field} must not exceed {max_chars} characters, got {actual_chars}"
            ),
            Self::Pattern { field, expected } => write!(f, "{field} must have {expected}"),
        }
    }
}

impl Error for ValidationError {}

/// Rejects blank names and names longer than [`NAME_MAX_CHARS`].
pub fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }

    let actual_chars = value.chars().count();
    if actual_chars > NAME_MAX_CHARS {
        return Err(ValidationError::TooLong {
            field,
            max_chars: NAME_MAX_CHARS,
            actual_chars,
        });
    }

    Ok(())
}

/// Case-folded form of a name, stored next to it as `name_key`.
///
/// Every "ignoring case" comparison (unique agenda names, the name filter,
/// the prefix delete) goes through this key. Folding is full Unicode, so
/// "FAMÍLIA" and "Família" share a key; SQLite's `lower()` is ASCII-only and
/// is never used for names.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Area codes are exactly two ASCII digits.
pub fn validate_area_code(value: &str) -> Result<(), ValidationError> {
    if AREA_CODE_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::Pattern {
            field: "areaCode",
            expected: "2 digits",
        })
    }
}

/// Phone numbers are 8 or 9 ASCII digits, without area code.
pub fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    if PHONE_NUMBER_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::Pattern {
            field: "phoneNumber",
            expected: "8 or 9 digits",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_whitespace_names_are_rejected() {
        assert_eq!(
            validate_name("name", "   "),
            Err(ValidationError::Blank { field: "name" })
        );
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "Familia").is_ok());
    }

    #[test]
    fn name_limit_counts_chars_not_bytes() {
        let at_limit = "é".repeat(NAME_MAX_CHARS);
        assert!(validate_name("name", &at_limit).is_ok());

        let over = "a".repeat(NAME_MAX_CHARS + 1);
        let err = validate_name("name", &over).unwrap_err();
        assert_eq!(err.field(), "name");
        assert!(err.to_string().contains("256"));
    }

    #[test]
    fn area_code_requires_exactly_two_ascii_digits() {
        assert!(validate_area_code("11").is_ok());
        assert!(validate_area_code("1").is_err());
        assert!(validate_area_code("123").is_err());
        assert!(validate_area_code("1a").is_err());
        // Arabic-Indic digits are not accepted.
        assert!(validate_area_code("١١").is_err());
    }

    #[test]
    fn phone_number_accepts_eight_or_nine_digits() {
        assert!(validate_phone_number("12345678").is_ok());
        assert!(validate_phone_number("987654321").is_ok());
        assert!(validate_phone_number("1234567").is_err());
        assert!(validate_phone_number("9876543210").is_err());
        assert!(validate_phone_number("98765-432").is_err());
    }
}
