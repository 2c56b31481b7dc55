//! Password strength scoring.
//!
//! Produces a 0..=100 score from length, character variety and uniqueness,
//! minus a penalty for every weakness found (common word, short length,
//! missing character classes, repetitive or sequential patterns).

use pwd_types::{PasswordEvaluation, PasswordScore};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::counter::CharCounter;
use crate::services::{ServiceStatus, StrengthJudge, WordlistService};

const MIN_LENGTH: usize = 8;
const REASON_PENALTY: i64 = 10;
const MAX_SCORE: i64 = 100;

/// Evaluates password strength and returns a detailed evaluation.
///
/// # Arguments
/// * `password` - The password to evaluate
/// * `wordlist` - Optional list of common passwords
pub fn evaluate_password_strength(
    password: &SecretString,
    wordlist: Option<&dyn WordlistService>,
) -> PasswordEvaluation {
    score_password(password.expose_secret(), wordlist)
}

fn score_password(pwd: &str, wordlist: Option<&dyn WordlistService>) -> PasswordEvaluation {
    let counter = CharCounter::new(pwd);
    let mut reasons = Vec::new();

    if let Some(wordlist) = wordlist {
        if wordlist.status() == ServiceStatus::Open && wordlist.contains_word(pwd) {
            reasons.push("Password is in the list of common passwords".to_string());
        }
    }

    if counter.length() < MIN_LENGTH {
        reasons.push(format!("Password must be at least {} characters", MIN_LENGTH));
    }

    let variety = [
        (counter.upper_count() > 0, "uppercase"),
        (counter.lower_count() > 0, "lowercase"),
        (counter.numeric_count() > 0, "numbers"),
        (counter.special_count() > 0, "special characters"),
    ];
    let missing: Vec<_> = variety
        .iter()
        .filter(|(present, _)| !present)
        .map(|(_, name)| *name)
        .collect();
    if !missing.is_empty() {
        reasons.push(format!("Missing: {}", missing.join(", ")));
    }

    if counter.sequential_repeat() >= 3 {
        reasons.push("Password contains repetitive patterns".to_string());
    }
    if counter.consecutive_run() >= 4 {
        reasons.push("Password contains sequential patterns".to_string());
    }

    let length = counter.length() as i64;

    // Length bonus: up to 20 points (0.5 per character)
    let mut score = (length / 2).min(20);

    // Character variety: 15 per class present
    score += (variety.len() - missing.len()) as i64 * 15;

    // Extra length bonus: +5 if > 12, +10 if > 16
    if length > 16 {
        score += 10;
    } else if length > 12 {
        score += 5;
    }

    if counter.special_count() >= 2 {
        score += 5;
    }

    let unique = counter.unique_count();
    if unique >= 16 {
        score += 10;
    } else if unique >= 12 {
        score += 5;
    }

    score -= reasons.len() as i64 * REASON_PENALTY;

    PasswordEvaluation {
        score: Some(PasswordScore::new(score.clamp(0, MAX_SCORE))),
        reasons,
    }
}

/// [`StrengthJudge`] using [`evaluate_password_strength`].
#[derive(Clone, Default)]
pub struct StrengthMeter {
    wordlist: Option<Arc<dyn WordlistService>>,
}

impl StrengthMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wordlist(wordlist: Arc<dyn WordlistService>) -> Self {
        StrengthMeter {
            wordlist: Some(wordlist),
        }
    }
}

impl StrengthJudge for StrengthMeter {
    fn judge(&self, password: &str) -> i64 {
        score_password(password, self.wordlist.as_deref())
            .score
            .map(|score| score.value() as i64)
            .unwrap_or(0)
    }
}
