//! Domain validation errors.

use std::fmt;

/// Why a phone number failed validation.
///
/// These never escape as hard failures; they are carried inside a
/// [`ValidationResult`](super::ValidationResult) so a form can re-prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Nothing usable was entered.
    EmptyInput,

    /// Fewer digits than the generic or country minimum.
    TooShort,

    /// More digits than the generic or country maximum.
    TooLong,

    /// NANP area code starts with 0 or 1.
    InvalidAreaCode,

    /// NANP exchange code starts with 0 or 1.
    InvalidExchangeCode,

    /// Repeated, sequential or well-known placeholder number.
    InvalidPattern,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "Phone number is required"),
            Self::TooShort => write!(f, "Phone number is too short"),
            Self::TooLong => write!(f, "Phone number is too long"),
            Self::InvalidAreaCode => write!(f, "Invalid area code - cannot start with 0 or 1"),
            Self::InvalidExchangeCode => {
                write!(f, "Invalid exchange code - cannot start with 0 or 1")
            }
            Self::InvalidPattern => write!(f, "Please enter a valid phone number"),
        }
    }
}

impl std::error::Error for ValidationErrorKind {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(
            ValidationErrorKind::EmptyInput.to_string(),
            "Phone number is required"
        );
        assert!(ValidationErrorKind::InvalidAreaCode
            .to_string()
            .contains("area code"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ValidationErrorKind::InvalidExchangeCode).unwrap();
        assert_eq!(json, "\"invalid_exchange_code\"");
    }
}
