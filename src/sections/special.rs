//! Special character section.

use super::{SectionContext, SectionResult, threshold};
use crate::policy::Rule;
use crate::violation::{Violation, ViolationKind};

/// Special characters are anything that is neither a letter nor a digit.
pub fn special_section(ctx: &SectionContext<'_>) -> SectionResult {
    let rules = &ctx.rules;
    let special = ctx.counter.special_count();
    let mut violations = Vec::new();

    if !rules.read_bool(Rule::AllowSpecial) {
        if special > 0 {
            violations.push(Violation::new(ViolationKind::TooManySpecial));
        }
        return violations;
    }

    if special < threshold(rules, Rule::MinimumSpecial) {
        violations.push(Violation::new(ViolationKind::NotEnoughSpecial));
    }

    let maximum = threshold(rules, Rule::MaximumSpecial);
    if maximum > 0 && special > maximum {
        violations.push(Violation::new(ViolationKind::TooManySpecial));
    }

    if !rules.read_bool(Rule::AllowFirstCharSpecial) && ctx.counter.is_first_special() {
        violations.push(Violation::new(ViolationKind::FirstIsSpecial));
    }

    if !rules.read_bool(Rule::AllowLastCharSpecial) && ctx.counter.is_last_special() {
        violations.push(Violation::new(ViolationKind::LastIsSpecial));
    }

    violations
}
