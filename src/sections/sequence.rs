//! Sequence section - repeated and consecutive characters.

use super::{SectionContext, SectionResult, threshold};
use crate::policy::Rule;
use crate::violation::{Violation, ViolationKind};

/// Checks repetition and ordinal sequences.
///
/// Each limit is gated by its own rule and reports on its own, so a password
/// may collect up to three violations here.
pub fn sequence_section(ctx: &SectionContext<'_>) -> SectionResult {
    let rules = &ctx.rules;
    let counter = ctx.counter;
    let mut violations = Vec::new();

    let max_sequential = threshold(rules, Rule::MaximumSequentialRepeat);
    if max_sequential > 0 && counter.sequential_repeat() > max_sequential {
        violations.push(Violation::new(ViolationKind::TooManyRepeat));
    }

    let max_repeat = threshold(rules, Rule::MaximumRepeat);
    if max_repeat > 0 && counter.repeated_count() > max_repeat {
        violations.push(Violation::new(ViolationKind::TooManyRepeat));
    }

    // a run of exactly `max_consecutive` already counts
    let max_consecutive = threshold(rules, Rule::MaximumConsecutive);
    if max_consecutive > 1 && counter.consecutive_run() >= max_consecutive {
        violations.push(Violation::new(ViolationKind::TooManyConsecutive));
    }

    violations
}
