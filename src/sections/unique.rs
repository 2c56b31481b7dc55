//! Unique character section.

use super::{SectionContext, SectionResult, threshold};
use crate::policy::Rule;
use crate::violation::{Violation, ViolationKind};

pub fn unique_section(ctx: &SectionContext<'_>) -> SectionResult {
    let minimum = threshold(&ctx.rules, Rule::MinimumUnique);
    if minimum > 0 && ctx.counter.unique_count() < minimum {
        return vec![Violation::new(ViolationKind::NotEnoughUnique)];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;
    use crate::sections::testing::run;

    #[test]
    fn test_unique_section() {
        let policy = Policy::builder()
            .set(Rule::MinimumUnique, 4)
            .build()
            .unwrap();
        assert_eq!(
            run(unique_section, "aAaBbB", &policy),
            vec![ViolationKind::NotEnoughUnique]
        );
        assert!(run(unique_section, "abcd", &policy).is_empty());
    }
}
