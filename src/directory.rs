//! Directory-side password policy check.
//!
//! The directory holding the account may enforce its own password policy.
//! Implementations of [`DirectoryPolicy`] ask it whether a password would be
//! accepted and report the answer as one of three outcomes.

use thiserror::Error;

use crate::violation::ViolationKind;

/// Rejection reasons a directory can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryErrorCode {
    TooShort,
    TooLong,
    NotEnoughNumeric,
    NotEnoughAlpha,
    NotEnoughSpecial,
    NotEnoughLower,
    NotEnoughUpper,
    NotEnoughUnique,
    TooManyRepeat,
    TooManyNumeric,
    TooManyAlpha,
    TooManyLower,
    TooManyUpper,
    TooManySpecial,
    FirstIsNumeric,
    LastIsNumeric,
    FirstIsSpecial,
    LastIsSpecial,
    NumericDisallowed,
    SpecialDisallowed,
    InvalidChar,
    InWordlist,
    SameAsAttribute,
    HistoryFull,
    TooSoon,
    Unknown,
}

impl DirectoryErrorCode {
    /// The violation this code maps to, if any.
    pub fn violation_kind(self) -> Option<ViolationKind> {
        use DirectoryErrorCode as Code;
        let kind = match self {
            Code::TooShort => ViolationKind::TooShort,
            Code::TooLong => ViolationKind::TooLong,
            Code::NotEnoughNumeric => ViolationKind::NotEnoughNumeric,
            Code::NotEnoughAlpha => ViolationKind::NotEnoughAlpha,
            Code::NotEnoughSpecial => ViolationKind::NotEnoughSpecial,
            Code::NotEnoughLower => ViolationKind::NotEnoughLower,
            Code::NotEnoughUpper => ViolationKind::NotEnoughUpper,
            Code::NotEnoughUnique => ViolationKind::NotEnoughUnique,
            Code::TooManyRepeat => ViolationKind::TooManyRepeat,
            Code::TooManyNumeric | Code::NumericDisallowed => ViolationKind::TooManyNumeric,
            Code::TooManyAlpha => ViolationKind::TooManyAlpha,
            Code::TooManyLower => ViolationKind::TooManyLower,
            Code::TooManyUpper => ViolationKind::TooManyUpper,
            Code::TooManySpecial | Code::SpecialDisallowed => ViolationKind::TooManySpecial,
            Code::FirstIsNumeric => ViolationKind::FirstIsNumeric,
            Code::LastIsNumeric => ViolationKind::LastIsNumeric,
            Code::FirstIsSpecial => ViolationKind::FirstIsSpecial,
            Code::LastIsSpecial => ViolationKind::LastIsSpecial,
            Code::InvalidChar => ViolationKind::InvalidChar,
            Code::InWordlist => ViolationKind::InWordlist,
            Code::SameAsAttribute => ViolationKind::SameAsAttribute,
            Code::HistoryFull | Code::TooSoon | Code::Unknown => return None,
        };
        Some(kind)
    }
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The directory cannot test passwords; the check is skipped.
    #[error("Directory does not support password policy testing")]
    Unsupported,
    /// The directory could not be reached; validation aborts.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
    /// The directory rejected the password.
    #[error("Directory rejected the password: {code:?}")]
    PolicyViolation { code: DirectoryErrorCode },
}

/// Asks the directory whether it would accept a password.
pub trait DirectoryPolicy: Send + Sync {
    fn test_password_policy(&self, password: &str) -> Result<(), DirectoryError>;
}
