//! Basic syntax rule sections
//!
//! Each section checks one family of composition rules. Sections are
//! independent: every one of them runs and contributes its own violations.

mod alpha;
mod casing;
mod complexity;
mod length;
mod numeric;
mod sequence;
mod special;
mod unique;

use crate::counter::CharCounter;
use crate::policy::RuleHelper;
use crate::user::UserContext;
use crate::violation::Violation;

/// Everything a section may look at.
#[derive(Debug, Clone, Copy)]
pub struct SectionContext<'a> {
    pub password: &'a str,
    pub counter: &'a CharCounter,
    pub rules: RuleHelper<'a>,
    pub user: Option<&'a UserContext>,
}

/// Violations found by one section, empty when the section passed.
pub type SectionResult = Vec<Violation>;

type Section = fn(&SectionContext<'_>) -> SectionResult;

/// Sections in evaluation order.
const BASIC_SECTIONS: [(&str, Section); 9] = [
    ("minimum length", length::minimum_length_section),
    ("maximum length", length::maximum_length_section),
    ("numeric", numeric::numeric_section),
    ("alpha", alpha::alpha_section),
    ("casing", casing::casing_section),
    ("special", special::special_section),
    ("unique", unique::unique_section),
    ("sequence", sequence::sequence_section),
    ("ad complexity", complexity::ad_complexity_section),
];

/// Runs every basic syntax section against the password.
pub fn basic_syntax_checks(
    password: &str,
    rules: RuleHelper<'_>,
    user: Option<&UserContext>,
) -> Vec<Violation> {
    let counter = CharCounter::new(password);
    let ctx = SectionContext {
        password,
        counter: &counter,
        rules,
        user,
    };

    let mut violations = Vec::new();
    for (_section_name, section_fn) in BASIC_SECTIONS {
        let found = section_fn(&ctx);
        #[cfg(feature = "tracing")]
        if !found.is_empty() {
            tracing::trace!("section {} reported {} violation(s)", _section_name, found.len());
        }
        violations.extend(found);
    }
    violations
}

/// Reads a count threshold, negative values count as 0.
pub(crate) fn threshold(rules: &RuleHelper<'_>, rule: crate::policy::Rule) -> usize {
    usize::try_from(rules.read_int(rule)).unwrap_or(0)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::policy::Policy;
    use crate::violation::ViolationKind;

    /// Runs one section and returns the kinds it reported.
    pub fn run(section: Section, password: &str, policy: &Policy) -> Vec<ViolationKind> {
        run_for(section, password, policy, None)
    }

    pub fn run_for(
        section: Section,
        password: &str,
        policy: &Policy,
        user: Option<&UserContext>,
    ) -> Vec<ViolationKind> {
        let counter = CharCounter::new(password);
        let ctx = SectionContext {
            password,
            counter: &counter,
            rules: policy.rules(),
            user,
        };
        section(&ctx).into_iter().map(|v| v.kind).collect()
    }
}
