//! History and containment checks: reuse of the current password, and
//! configured values or user attributes appearing inside the new one.

use std::collections::{BTreeSet, HashSet};

use crate::policy::{Rule, RuleHelper};
use crate::services::{AttributeMatcher, MacroExpander};
use crate::user::UserContext;
use crate::violation::{Violation, ViolationKind};

/// Compares the candidate against the current password.
///
/// Only runs when `DisallowCurrent` is set. Reuse (ignoring case) is a
/// violation, and when `MaximumOldChars` is positive the distinct characters
/// (ignoring case) found in both passwords must stay below it.
pub fn old_password_checks(
    password: &str,
    old_password: Option<&str>,
    rules: &RuleHelper<'_>,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    if !rules.read_bool(Rule::DisallowCurrent) {
        return violations;
    }
    let Some(old_password) = old_password.filter(|old| !old.is_empty()) else {
        return violations;
    };

    let old_lowered = old_password.to_lowercase();
    let lowered = password.to_lowercase();

    if old_lowered == lowered {
        #[cfg(feature = "tracing")]
        tracing::trace!("password rejected, same as current password");
        violations.push(Violation::new(ViolationKind::SameAsOld));
    }

    let max_old_chars = rules.read_int(Rule::MaximumOldChars);
    if max_old_chars > 0 {
        let old_chars: HashSet<char> = old_lowered.chars().collect();
        let shared = lowered
            .chars()
            .filter(|c| old_chars.contains(c))
            .collect::<HashSet<_>>()
            .len();
        if i64::try_from(shared).unwrap_or(i64::MAX) >= max_old_chars {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                "password rejected, shares {} characters with current password",
                shared
            );
            violations.push(Violation::new(ViolationKind::TooManyOldChars));
        }
    }

    violations
}

/// Rejects passwords containing any configured disallowed value.
///
/// Values are de-duplicated, expanded, lower-cased and then searched for in
/// the lower-cased password; values that expand to blank text are ignored.
pub fn disallowed_value_checks(
    password: &str,
    rules: &RuleHelper<'_>,
    macros: Option<&dyn MacroExpander>,
    user: Option<&UserContext>,
) -> Vec<Violation> {
    let values: BTreeSet<String> = rules
        .disallowed_values()
        .into_iter()
        .filter(|value| !value.is_empty())
        .collect();
    if values.is_empty() {
        return Vec::new();
    }

    let lowered = password.to_lowercase();
    values
        .iter()
        .map(|value| match macros {
            Some(macros) => macros.expand(value, user),
            None => value.clone(),
        })
        .filter(|expanded| !expanded.trim().is_empty())
        .filter(|expanded| lowered.contains(&expanded.to_lowercase()))
        .map(|_| Violation::new(ViolationKind::UsingDisallowed))
        .collect()
}

/// Rejects passwords containing the value of a configured user attribute.
/// Without a user there is nothing to compare against.
pub fn disallowed_attribute_checks(
    password: &str,
    rules: &RuleHelper<'_>,
    user: Option<&UserContext>,
    matcher: &dyn AttributeMatcher,
) -> Vec<Violation> {
    let Some(user) = user else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    for attribute in rules.disallowed_attributes() {
        let value = user.attribute(&attribute.name).unwrap_or_default();
        if matcher.contains_disallowed_value(password, value, attribute.threshold) {
            #[cfg(feature = "tracing")]
            tracing::trace!("password rejected, same as user attr {}", attribute.name);
            violations.push(Violation::new(ViolationKind::SameAsAttribute));
        }
    }
    violations
}

/// Case-insensitive [`AttributeMatcher`].
///
/// With a threshold of 0 the whole value must appear in the password. With a
/// positive threshold any `threshold`-character window of the value is
/// enough; values shorter than the threshold never match.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAttributeMatcher;

impl AttributeMatcher for DefaultAttributeMatcher {
    fn contains_disallowed_value(&self, password: &str, value: &str, threshold: usize) -> bool {
        if password.is_empty() || value.is_empty() {
            return false;
        }
        let password = password.to_lowercase();
        let value: Vec<char> = value.to_lowercase().chars().collect();

        if threshold == 0 {
            let whole: String = value.iter().collect();
            return password.contains(&whole);
        }

        value
            .windows(threshold)
            .map(|window| window.iter().collect::<String>())
            .any(|chunk| password.contains(&chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::UserMacroExpander;
    use crate::policy::Policy;

    fn kinds(violations: Vec<Violation>) -> Vec<ViolationKind> {
        violations.into_iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_same_as_old_ignores_case() {
        let policy = Policy::builder()
            .set(Rule::DisallowCurrent, true)
            .build()
            .unwrap();
        let found = old_password_checks("SUMMER2023", Some("Summer2023"), &policy.rules());
        assert_eq!(kinds(found), vec![ViolationKind::SameAsOld]);
    }

    #[test]
    fn test_reuse_allowed_when_not_disallowed() {
        let policy = Policy::builder()
            .set(Rule::DisallowCurrent, false)
            .build()
            .unwrap();
        assert!(old_password_checks("Summer2023", Some("Summer2023"), &policy.rules()).is_empty());
    }

    #[test]
    fn test_shared_characters_threshold() {
        let policy = Policy::builder()
            .set(Rule::MaximumOldChars, 3)
            .build()
            .unwrap();
        let found = old_password_checks("xyzabc", Some("abcdef"), &policy.rules());
        assert_eq!(kinds(found), vec![ViolationKind::TooManyOldChars]);

        let policy = Policy::builder()
            .set(Rule::MaximumOldChars, 4)
            .build()
            .unwrap();
        assert!(old_password_checks("xyzabc", Some("abcdef"), &policy.rules()).is_empty());
    }

    #[test]
    fn test_shared_characters_are_distinct_and_case_insensitive() {
        let policy = Policy::builder()
            .set(Rule::MaximumOldChars, 2)
            .build()
            .unwrap();
        // only "a" is shared, however often it appears
        assert!(old_password_checks("AAAAxyz", Some("aaaa"), &policy.rules()).is_empty());
        let found = old_password_checks("ABxyz", Some("ab"), &policy.rules());
        assert_eq!(kinds(found), vec![ViolationKind::TooManyOldChars]);
    }

    #[test]
    fn test_shared_characters_ignored_when_reuse_allowed() {
        let policy = Policy::builder()
            .set(Rule::MaximumOldChars, 2)
            .set(Rule::DisallowCurrent, false)
            .build()
            .unwrap();
        assert!(old_password_checks("ABxyz", Some("ab"), &policy.rules()).is_empty());
        assert!(old_password_checks("xyzabc", Some("abcdef"), &policy.rules()).is_empty());
    }

    #[test]
    fn test_no_old_password() {
        let policy = Policy::builder()
            .set(Rule::MaximumOldChars, 1)
            .build()
            .unwrap();
        assert!(old_password_checks("anything", None, &policy.rules()).is_empty());
        assert!(old_password_checks("anything", Some(""), &policy.rules()).is_empty());
    }

    #[test]
    fn test_disallowed_values() {
        let policy = Policy::builder()
            .set(Rule::DisallowedValues, vec!["Acme", "acme", "secret", "  "])
            .build()
            .unwrap();
        let found = disallowed_value_checks("MyACME-Secret1", &policy.rules(), None, None);
        // "Acme" and "acme" are distinct entries, both match
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|v| v.kind == ViolationKind::UsingDisallowed));
        assert!(disallowed_value_checks("unrelated", &policy.rules(), None, None).is_empty());
    }

    #[test]
    fn test_disallowed_values_are_expanded() {
        let policy = Policy::builder()
            .set(Rule::DisallowedValues, vec!["@User:ID@", "@LDAP:sn@"])
            .build()
            .unwrap();
        let user = UserContext::new().with_username("jdoe");
        let expander = UserMacroExpander;
        let found =
            disallowed_value_checks("xJDoe99", &policy.rules(), Some(&expander), Some(&user));
        // "@LDAP:sn@" expands to nothing and is skipped
        assert_eq!(kinds(found), vec![ViolationKind::UsingDisallowed]);
    }

    #[test]
    fn test_disallowed_attributes() {
        let policy = Policy::builder()
            .set(Rule::DisallowedAttributes, vec!["givenName", "sn:3", "cn"])
            .build()
            .unwrap();
        let user = UserContext::new()
            .with_attribute("givenName", "John")
            .with_attribute("sn", "Doeberg");
        let found = disallowed_attribute_checks(
            "john-erg!",
            &policy.rules(),
            Some(&user),
            &DefaultAttributeMatcher,
        );
        assert_eq!(
            kinds(found),
            vec![ViolationKind::SameAsAttribute, ViolationKind::SameAsAttribute]
        );
        assert!(
            disallowed_attribute_checks("john", &policy.rules(), None, &DefaultAttributeMatcher)
                .is_empty()
        );
    }

    #[test]
    fn test_default_matcher_thresholds() {
        let matcher = DefaultAttributeMatcher;
        assert!(matcher.contains_disallowed_value("xxSmithxx", "smith", 0));
        assert!(!matcher.contains_disallowed_value("xxSmitxx", "smith", 0));
        assert!(matcher.contains_disallowed_value("xxMitxx", "smith", 3));
        assert!(!matcher.contains_disallowed_value("xxMixx", "smith", 3));
        assert!(!matcher.contains_disallowed_value("ab", "ab", 3));
        assert!(!matcher.contains_disallowed_value("", "smith", 0));
        assert!(!matcher.contains_disallowed_value("smith", "", 0));
    }
}
