//! Error types.

use thiserror::Error;

use crate::violation::Violation;

/// Errors raised while building a [`Policy`](crate::Policy).
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Unknown password rule: {0}")]
    UnknownRule(String),
    #[error("Invalid value for rule {rule}: {value}")]
    InvalidValue { rule: &'static str, value: String },
    #[error("Failed to parse policy: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the external rule service call.
#[derive(Error, Debug)]
pub enum RuleServiceError {
    #[error("Rule service request failed: {0}")]
    Transport(String),
    #[error("Rule service returned HTTP status {0}")]
    Status(u16),
    #[error("Rule service returned an unreadable response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Outcome of a failed validation.
///
/// `Rejected` carries the collected rule violations; every other variant is
/// fatal and aborts the validation attempt.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Password rejected: {first}")]
    Rejected {
        first: Violation,
        violations: Vec<Violation>,
    },
    #[error("Directory unavailable during password policy check: {0}")]
    DirectoryUnavailable(String),
    #[error("Error executing external rule call: {0}")]
    ExternalRuleHalted(#[source] RuleServiceError),
    #[error("External rule call failed: {0}")]
    ExternalRuleFailed(#[source] RuleServiceError),
}

impl ValidationError {
    /// Builds a rejection from a non-empty violation list.
    pub(crate) fn rejected(violations: Vec<Violation>) -> Option<Self> {
        let first = violations.first()?.clone();
        Some(ValidationError::Rejected { first, violations })
    }

    pub fn is_fatal(&self) -> bool {
        !matches!(self, ValidationError::Rejected { .. })
    }

    /// Every violation behind a rejection; empty for fatal errors.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationError::Rejected { violations, .. } => violations,
            _ => &[],
        }
    }
}
