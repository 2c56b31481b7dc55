//! Casing section - upper and lower case counts.

use super::{SectionContext, SectionResult, threshold};
use crate::policy::Rule;
use crate::violation::{Violation, ViolationKind};

/// Upper and lower case limits. These are always enforced; a threshold of 0
/// disables the corresponding limit.
///
/// Too many lower-case characters reports `TooManyLower`. Older validators
/// reported `TooManyUpper` for this case; that mix-up is not carried over.
pub fn casing_section(ctx: &SectionContext<'_>) -> SectionResult {
    let rules = &ctx.rules;
    let mut violations = Vec::new();

    let upper = ctx.counter.upper_count();
    if upper < threshold(rules, Rule::MinimumUpperCase) {
        violations.push(Violation::new(ViolationKind::NotEnoughUpper));
    }
    let max_upper = threshold(rules, Rule::MaximumUpperCase);
    if max_upper > 0 && upper > max_upper {
        violations.push(Violation::new(ViolationKind::TooManyUpper));
    }

    let lower = ctx.counter.lower_count();
    if lower < threshold(rules, Rule::MinimumLowerCase) {
        violations.push(Violation::new(ViolationKind::NotEnoughLower));
    }
    let max_lower = threshold(rules, Rule::MaximumLowerCase);
    if max_lower > 0 && lower > max_lower {
        violations.push(Violation::new(ViolationKind::TooManyLower));
    }

    violations
}
