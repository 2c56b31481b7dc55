//! Active Directory complexity section.
//!
//! Mirrors the directory's own complexity policy: the password must draw on
//! at least three character classes and must not contain the account name or
//! any significant token of the display name. Each missing class and each
//! name match counts as one group violation; the section fails once the
//! count exceeds `ADComplexityMaxViolations`.

use super::{SectionContext, SectionResult, threshold};
use crate::counter::{CharCounter, is_special};
use crate::policy::{AdComplexity, Rule};
use crate::user::UserContext;
use crate::violation::{Violation, ViolationKind};

const REQUIRED_CLASSES: usize = 3;
const ACCOUNT_NAME_ATTRIBUTE: &str = "sAMAccountName";
const DISPLAY_NAME_ATTRIBUTE: &str = "displayName";
const DISPLAY_NAME_DELIMITERS: &[char] = &[',', '.', '-', '_', '#', '\t', ' '];

pub fn ad_complexity_section(ctx: &SectionContext<'_>) -> SectionResult {
    let level = ctx.rules.ad_complexity_level();
    if !level.is_enabled() {
        return Vec::new();
    }

    let max_violations = threshold(&ctx.rules, Rule::ADComplexityMaxViolations);
    let min_token = threshold(&ctx.rules, Rule::ADComplexityMinTokenLength).max(1);
    let group_violations =
        ad_complexity_violations(level, ctx.password, ctx.counter, ctx.user, min_token);

    if group_violations > max_violations {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            "password rejected, {} AD complexity group violations (allowed {})",
            group_violations,
            max_violations
        );
        return vec![Violation::new(ViolationKind::NotEnoughGroups)];
    }
    Vec::new()
}

/// Counts the group violations of `password` under `level`.
fn ad_complexity_violations(
    level: AdComplexity,
    password: &str,
    counter: &CharCounter,
    user: Option<&UserContext>,
    min_token: usize,
) -> usize {
    let symbols = password
        .chars()
        .any(|c| is_special(c) && !c.is_control());

    let mut classes = [
        counter.upper_count() > 0,
        counter.lower_count() > 0,
        counter.numeric_count() > 0,
        symbols,
    ]
    .iter()
    .filter(|&&present| present)
    .count();

    if level == AdComplexity::Ad2008 && counter.caseless_alpha_count() > 0 {
        classes += 1;
    }

    let mut violations = REQUIRED_CLASSES.saturating_sub(classes);

    if let Some(user) = user {
        let lowered = password.to_lowercase();
        let account_name = user
            .attribute(ACCOUNT_NAME_ATTRIBUTE)
            .or_else(|| user.username());
        if let Some(name) = account_name {
            if name.chars().count() >= min_token && lowered.contains(&name.to_lowercase()) {
                violations += 1;
            }
        }

        if let Some(display_name) = user.attribute(DISPLAY_NAME_ATTRIBUTE) {
            violations += display_name
                .split(DISPLAY_NAME_DELIMITERS)
                .filter(|token| token.chars().count() >= min_token)
                .filter(|token| lowered.contains(&token.to_lowercase()))
                .count();
        }
    }

    violations
}
