//! Collaborators the validator delegates to.
//!
//! All of them are passed in explicitly; the validator owns no global state.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::user::UserContext;

/// Availability of a lookup service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Open,
    Closed,
}

/// Expands tokens embedded in configured values.
pub trait MacroExpander: Send + Sync {
    fn expand(&self, template: &str, user: Option<&UserContext>) -> String;
}

/// Decides whether a password contains (a fragment of) a user attribute
/// value. A threshold of 0 means any containment of the whole value.
pub trait AttributeMatcher: Send + Sync {
    fn contains_disallowed_value(&self, password: &str, value: &str, threshold: usize) -> bool;
}

/// Scores a password, higher is stronger.
pub trait StrengthJudge: Send + Sync {
    fn judge(&self, password: &str) -> i64;
}

/// A word set queried for exact password matches, e.g. a dictionary or the
/// shared password history.
pub trait WordlistService: Send + Sync {
    fn status(&self) -> ServiceStatus;
    fn contains_word(&self, word: &str) -> bool;
}

/// Externally visible counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    DirectoryUnavailable,
}

pub trait Statistics: Send + Sync {
    fn increment(&self, statistic: Statistic);
}

/// In-process [`Statistics`] sink.
#[derive(Debug, Default)]
pub struct StatisticsCounter {
    directory_unavailable: AtomicU64,
}

impl StatisticsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, statistic: Statistic) -> u64 {
        match statistic {
            Statistic::DirectoryUnavailable => self.directory_unavailable.load(Ordering::Relaxed),
        }
    }
}

impl Statistics for StatisticsCounter {
    fn increment(&self, statistic: Statistic) {
        match statistic {
            Statistic::DirectoryUnavailable => {
                self.directory_unavailable.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
