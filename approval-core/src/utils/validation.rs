//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use thiserror::Error;

// ── Text length limits ──────────────────────────────────────────────

/// Staff names, project owner, vendor
pub const MAX_NAME_LEN: usize = 100;

/// Project name / code, currency, remittance account, contact
pub const MAX_SHORT_TEXT_LEN: usize = 200;

/// Descriptions and reasons (rejection, deletion)
pub const MAX_NOTE_LEN: usize = 2000;

/// Credentials (before hashing)
pub const MAX_CREDENTIAL_LEN: usize = 128;

/// A single field failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidField {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} is too long ({len} chars, max {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

impl InvalidField {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty(field) => field,
            Self::TooLong { field, .. } => field,
        }
    }
}

/// Validate that a required string is non-empty (after trim) and within the length limit.
pub fn validate_required_text(
    value: &str,
    field: &'static str,
    max_len: usize,
) -> Result<(), InvalidField> {
    if value.trim().is_empty() {
        return Err(InvalidField::Empty(field));
    }
    validate_optional_text(value, field, max_len)
}

/// Validate that an optional string is within the length limit.
pub fn validate_optional_text(
    value: &str,
    field: &'static str,
    max_len: usize,
) -> Result<(), InvalidField> {
    let len = value.chars().count();
    if len > max_len {
        return Err(InvalidField::TooLong {
            field,
            len,
            max: max_len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Eve", "name", MAX_NAME_LEN).is_ok());
        assert_eq!(
            validate_required_text("   ", "vendor", MAX_NAME_LEN),
            Err(InvalidField::Empty("vendor"))
        );
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // 4 CJK chars are 12 bytes
        assert!(validate_required_text("宋威績王", "name", 4).is_ok());
        let err = validate_required_text("宋威績王五", "name", 4).unwrap_err();
        assert_eq!(err.field(), "name");
        assert!(matches!(err, InvalidField::TooLong { len: 5, max: 4, .. }));
    }
}
