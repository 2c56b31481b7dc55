//! Rule violations reported by the validator.

use serde::Serialize;
use std::fmt;

/// The rule family a violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    Internal,
    TooShort,
    TooLong,
    NotEnoughNumeric,
    TooManyNumeric,
    FirstIsNumeric,
    LastIsNumeric,
    NotEnoughAlpha,
    TooManyAlpha,
    NotEnoughNonAlpha,
    TooManyNonAlpha,
    NotEnoughUpper,
    TooManyUpper,
    NotEnoughLower,
    TooManyLower,
    NotEnoughSpecial,
    TooManySpecial,
    FirstIsSpecial,
    LastIsSpecial,
    TooManyRepeat,
    TooManyConsecutive,
    NotEnoughUnique,
    NotEnoughGroups,
    SameAsOld,
    TooManyOldChars,
    UsingDisallowed,
    SameAsAttribute,
    TooWeak,
    InvalidChar,
    InWordlist,
    CustomError,
    UnknownValidation,
}

impl ViolationKind {
    /// Default human-readable message for this kind.
    pub fn message(self) -> &'static str {
        match self {
            Self::Internal => "Internal error while validating the password",
            Self::TooShort => "Password is too short",
            Self::TooLong => "Password is too long",
            Self::NotEnoughNumeric => "Password does not contain enough numeric characters",
            Self::TooManyNumeric => "Password contains too many numeric characters",
            Self::FirstIsNumeric => "Password may not begin with a numeric character",
            Self::LastIsNumeric => "Password may not end with a numeric character",
            Self::NotEnoughAlpha => "Password does not contain enough letters",
            Self::TooManyAlpha => "Password contains too many letters",
            Self::NotEnoughNonAlpha => "Password does not contain enough non-letter characters",
            Self::TooManyNonAlpha => "Password contains too many non-letter characters",
            Self::NotEnoughUpper => "Password does not contain enough uppercase characters",
            Self::TooManyUpper => "Password contains too many uppercase characters",
            Self::NotEnoughLower => "Password does not contain enough lowercase characters",
            Self::TooManyLower => "Password contains too many lowercase characters",
            Self::NotEnoughSpecial => "Password does not contain enough special characters",
            Self::TooManySpecial => "Password contains too many special characters",
            Self::FirstIsSpecial => "Password may not begin with a special character",
            Self::LastIsSpecial => "Password may not end with a special character",
            Self::TooManyRepeat => "Password contains too many repeated characters",
            Self::TooManyConsecutive => "Password contains too many consecutive characters",
            Self::NotEnoughUnique => "Password does not contain enough unique characters",
            Self::NotEnoughGroups => "Password does not contain enough character groups",
            Self::SameAsOld => "Password is the same as the current password",
            Self::TooManyOldChars => "Password shares too many characters with the current password",
            Self::UsingDisallowed => "Password contains a disallowed value",
            Self::SameAsAttribute => "Password contains a value from the user profile",
            Self::TooWeak => "Password is too weak",
            Self::InvalidChar => "Password contains an invalid character or pattern",
            Self::InWordlist => "Password is in the list of common or previously used passwords",
            Self::CustomError => "Password was rejected by an external rule",
            Self::UnknownValidation => "Password was rejected for an unknown reason",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A single rule failure.
///
/// `detail` carries a custom message, typically supplied by the external
/// rule service. Violations are never de-duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Violation {
    pub fn new(kind: ViolationKind) -> Self {
        Self { kind, detail: None }
    }

    pub fn with_detail(kind: ViolationKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: Some(detail.into()),
        }
    }

    /// Text shown to the user: the custom detail if present, otherwise the
    /// kind's default message.
    pub fn message(&self) -> &str {
        self.detail.as_deref().unwrap_or(self.kind.message())
    }
}

impl From<ViolationKind> for Violation {
    fn from(kind: ViolationKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_overrides_default_message() {
        let violation = Violation::with_detail(ViolationKind::CustomError, "too common");
        assert_eq!(violation.to_string(), "too common");

        let violation = Violation::new(ViolationKind::TooShort);
        assert_eq!(violation.to_string(), "Password is too short");
    }

    #[test]
    fn test_serializes_kind_as_code() {
        let json = serde_json::to_string(&Violation::new(ViolationKind::NotEnoughNumeric)).unwrap();
        assert_eq!(json, r#"{"kind":"NOT_ENOUGH_NUMERIC"}"#);
    }
}
