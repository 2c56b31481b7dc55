//! Length sections - minimum and maximum password length.

use super::{SectionContext, SectionResult, threshold};
use crate::policy::Rule;
use crate::violation::{Violation, ViolationKind};

/// Reports `TooShort` when the password has fewer characters than
/// `MinimumLength`.
pub fn minimum_length_section(ctx: &SectionContext<'_>) -> SectionResult {
    if ctx.counter.length() < threshold(&ctx.rules, Rule::MinimumLength) {
        return vec![Violation::new(ViolationKind::TooShort)];
    }
    Vec::new()
}

/// Reports `TooLong` when `MaximumLength` is set and exceeded.
pub fn maximum_length_section(ctx: &SectionContext<'_>) -> SectionResult {
    let maximum = threshold(&ctx.rules, Rule::MaximumLength);
    if maximum > 0 && ctx.counter.length() > maximum {
        return vec![Violation::new(ViolationKind::TooLong)];
    }
    Vec::new()
}
