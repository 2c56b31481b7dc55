//! Numeric section - digit counts and digit placement.

use super::{SectionContext, SectionResult, threshold};
use crate::policy::Rule;
use crate::violation::{Violation, ViolationKind};

/// Checks numeric characters.
///
/// With `AllowNumeric` off any digit is a violation. Otherwise the minimum,
/// maximum and first/last placement rules apply independently.
pub fn numeric_section(ctx: &SectionContext<'_>) -> SectionResult {
    let rules = &ctx.rules;
    let numeric = ctx.counter.numeric_count();
    let mut violations = Vec::new();

    if !rules.read_bool(Rule::AllowNumeric) {
        if numeric > 0 {
            violations.push(Violation::new(ViolationKind::TooManyNumeric));
        }
        return violations;
    }

    if numeric < threshold(rules, Rule::MinimumNumeric) {
        violations.push(Violation::new(ViolationKind::NotEnoughNumeric));
    }

    let maximum = threshold(rules, Rule::MaximumNumeric);
    if maximum > 0 && numeric > maximum {
        violations.push(Violation::new(ViolationKind::TooManyNumeric));
    }

    if !rules.read_bool(Rule::AllowFirstCharNumeric) && ctx.counter.is_first_numeric() {
        violations.push(Violation::new(ViolationKind::FirstIsNumeric));
    }

    if !rules.read_bool(Rule::AllowLastCharNumeric) && ctx.counter.is_last_numeric() {
        violations.push(Violation::new(ViolationKind::LastIsNumeric));
    }

    violations
}
