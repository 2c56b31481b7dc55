//! Alpha section - letter and non-letter counts.

use super::{SectionContext, SectionResult, threshold};
use crate::policy::Rule;
use crate::violation::{Violation, ViolationKind};

pub fn alpha_section(ctx: &SectionContext<'_>) -> SectionResult {
    let rules = &ctx.rules;
    let mut violations = Vec::new();

    let alpha = ctx.counter.alpha_count();
    if alpha < threshold(rules, Rule::MinimumAlpha) {
        violations.push(Violation::new(ViolationKind::NotEnoughAlpha));
    }
    let maximum = threshold(rules, Rule::MaximumAlpha);
    if maximum > 0 && alpha > maximum {
        violations.push(Violation::new(ViolationKind::TooManyAlpha));
    }

    let non_alpha = ctx.counter.non_alpha_count();
    if rules.read_bool(Rule::AllowNonAlpha) {
        if non_alpha < threshold(rules, Rule::MinimumNonAlpha) {
            violations.push(Violation::new(ViolationKind::NotEnoughNonAlpha));
        }
        let maximum = threshold(rules, Rule::MaximumNonAlpha);
        if maximum > 0 && non_alpha > maximum {
            violations.push(Violation::new(ViolationKind::TooManyNonAlpha));
        }
    } else if non_alpha > 0 {
        violations.push(Violation::new(ViolationKind::TooManyNonAlpha));
    }

    violations
}
