//! Password rule validator - runs every rule stage in order.
//!
//! Stages: old password, basic syntax, disallowed values, disallowed
//! attributes, strength, regex match, regex no-match, character groups,
//! wordlist, shared history, then the external rule service. Violations are
//! collected across stages. With [`Flag::FailFast`] the pipeline stops after
//! any stage that leaves more than one violation behind.
//!
//! [`PasswordRuleValidator::test_password`] additionally consults the
//! directory and turns the collected violations into a single outcome.

use secrecy::{ExposeSecret, SecretString};

#[cfg(feature = "async")]
use tokio::sync::mpsc;

use crate::directory::{DirectoryError, DirectoryPolicy};
use crate::error::ValidationError;
use crate::external::ExternalRuleInvoker;
use crate::history::{self, DefaultAttributeMatcher};
use crate::policy::{Policy, Rule, RuleHelper};
use crate::sections::basic_syntax_checks;
use crate::services::{
    AttributeMatcher, MacroExpander, ServiceStatus, Statistic, Statistics, StrengthJudge,
    WordlistService,
};
use crate::user::UserContext;
use crate::violation::{Violation, ViolationKind};

/// Validator behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// Stop once more than one violation has been collected.
    FailFast,
    /// Skip the directory-side policy check.
    BypassDirectoryCheck,
}

/// Collaborators used by the validator. Stages whose collaborator is absent
/// are skipped.
#[derive(Clone, Copy, Default)]
pub struct Services<'a> {
    pub macros: Option<&'a dyn MacroExpander>,
    /// Defaults to [`DefaultAttributeMatcher`].
    pub attribute_matcher: Option<&'a dyn AttributeMatcher>,
    pub strength: Option<&'a dyn StrengthJudge>,
    pub wordlist: Option<&'a dyn WordlistService>,
    pub shared_history: Option<&'a dyn WordlistService>,
    pub external_rules: Option<&'a ExternalRuleInvoker>,
    pub statistics: Option<&'a dyn Statistics>,
}

/// Validates candidate passwords against one policy.
#[derive(Clone, Copy)]
pub struct PasswordRuleValidator<'a> {
    policy: &'a Policy,
    services: Services<'a>,
    fail_fast: bool,
    bypass_directory: bool,
}

impl<'a> PasswordRuleValidator<'a> {
    pub fn new(policy: &'a Policy, services: Services<'a>) -> Self {
        PasswordRuleValidator {
            policy,
            services,
            fail_fast: false,
            bypass_directory: false,
        }
    }

    pub fn with_flags(mut self, flags: &[Flag]) -> Self {
        self.fail_fast = flags.contains(&Flag::FailFast);
        self.bypass_directory = flags.contains(&Flag::BypassDirectoryCheck);
        self
    }

    /// Validates `password` and, unless bypassed, asks the directory.
    ///
    /// Returns `Ok(())` when the password is acceptable. A rejection carries
    /// the first violation as the reason plus the full list.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::Rejected`] when any rule is violated
    /// - [`ValidationError::DirectoryUnavailable`] when the directory cannot be reached
    /// - [`ValidationError::ExternalRuleHalted`] / [`ValidationError::ExternalRuleFailed`]
    ///   when the external rule service call fails
    pub fn test_password(
        &self,
        password: Option<&SecretString>,
        old_password: Option<&SecretString>,
        user: Option<&UserContext>,
        directory: Option<&dyn DirectoryPolicy>,
    ) -> Result<(), ValidationError> {
        let mut violations = self.validate(password, old_password, user)?;
        if let Some(rejection) = ValidationError::rejected(violations.clone()) {
            return Err(rejection);
        }

        if let (Some(directory), Some(password)) = (directory, password)
            && !self.bypass_directory
        {
            violations.extend(self.directory_check(directory, password.expose_secret())?);
        }

        match ValidationError::rejected(violations) {
            Some(rejection) => Err(rejection),
            None => Ok(()),
        }
    }

    /// Runs the rule pipeline and the external rule service.
    ///
    /// Only fatal failures are returned as errors; rule violations come back
    /// as the `Ok` list.
    pub fn validate(
        &self,
        password: Option<&SecretString>,
        old_password: Option<&SecretString>,
        user: Option<&UserContext>,
    ) -> Result<Vec<Violation>, ValidationError> {
        let Some(password) = password else {
            return Ok(vec![null_password()]);
        };
        let password = password.expose_secret();

        let mut violations = self.internal_validate(
            Some(password),
            old_password.map(|old| old.expose_secret()),
            user,
        );

        if let Some(external) = self.services.external_rules {
            violations.extend(external.invoke(self.policy, password, user)?);
        }
        Ok(violations)
    }

    /// Runs the local rule stages only; no external calls are made.
    pub fn internal_validate(
        &self,
        password: Option<&str>,
        old_password: Option<&str>,
        user: Option<&UserContext>,
    ) -> Vec<Violation> {
        let Some(password) = password else {
            return vec![null_password()];
        };

        let rules = self.policy.rules();
        let mut violations = Vec::new();

        let stages: [(&str, &dyn Fn() -> Vec<Violation>); 10] = [
            ("old password", &|| {
                history::old_password_checks(password, old_password, &rules)
            }),
            ("basic syntax", &|| basic_syntax_checks(password, rules, user)),
            ("disallowed values", &|| {
                history::disallowed_value_checks(password, &rules, self.services.macros, user)
            }),
            ("disallowed attributes", &|| {
                let matcher = self
                    .services
                    .attribute_matcher
                    .unwrap_or(&DefaultAttributeMatcher);
                history::disallowed_attribute_checks(password, &rules, user, matcher)
            }),
            ("strength", &|| self.strength_check(password, &rules)),
            ("regex match", &|| self.regex_match_check(password, &rules, user)),
            ("regex no match", &|| self.regex_no_match_check(password, &rules, user)),
            ("char groups", &|| char_group_check(password, &rules)),
            ("wordlist", &|| self.wordlist_check(password, &rules)),
            ("shared history", &|| self.shared_history_check(password)),
        ];

        for (_stage, stage_fn) in stages {
            violations.extend(stage_fn());
            if self.fail_fast && violations.len() > 1 {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    "fail fast after {} stage with {} violations",
                    _stage,
                    violations.len()
                );
                return violations;
            }
        }

        violations
    }

    fn strength_check(&self, password: &str, rules: &RuleHelper<'_>) -> Vec<Violation> {
        let required = rules.read_int(Rule::MinimumStrength);
        let Some(judge) = self.services.strength.filter(|_| required > 0) else {
            return Vec::new();
        };
        let strength = judge.judge(password);
        if strength < required {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                "password rejected, password strength of {} is lower than policy requirement of {}",
                strength,
                required
            );
            return vec![Violation::new(ViolationKind::TooWeak)];
        }
        Vec::new()
    }

    fn regex_match_check(
        &self,
        password: &str,
        rules: &RuleHelper<'_>,
        user: Option<&UserContext>,
    ) -> Vec<Violation> {
        rules
            .regex_match(|pattern| self.expand(pattern, user))
            .iter()
            .filter(|pattern| !pattern.is_match(password))
            .map(|_pattern| {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    "password rejected, does not match configured regex pattern: {}",
                    _pattern
                );
                Violation::new(ViolationKind::InvalidChar)
            })
            .collect()
    }

    fn regex_no_match_check(
        &self,
        password: &str,
        rules: &RuleHelper<'_>,
        user: Option<&UserContext>,
    ) -> Vec<Violation> {
        rules
            .regex_no_match(|pattern| self.expand(pattern, user))
            .iter()
            .filter(|pattern| pattern.is_match(password))
            .map(|_pattern| {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    "password rejected, matches configured no-regex pattern: {}",
                    _pattern
                );
                Violation::new(ViolationKind::InvalidChar)
            })
            .collect()
    }

    fn wordlist_check(&self, password: &str, rules: &RuleHelper<'_>) -> Vec<Violation> {
        if !rules.read_bool(Rule::EnableWordlist) {
            return Vec::new();
        }
        lookup(self.services.wordlist, password)
    }

    fn shared_history_check(&self, password: &str) -> Vec<Violation> {
        lookup(self.services.shared_history, password)
    }

    fn directory_check(
        &self,
        directory: &dyn DirectoryPolicy,
        password: &str,
    ) -> Result<Option<Violation>, ValidationError> {
        #[cfg(feature = "tracing")]
        tracing::trace!("calling directory password validation checker");

        match directory.test_password_policy(password) {
            Ok(()) => Ok(None),
            Err(DirectoryError::Unsupported) => {
                #[cfg(feature = "tracing")]
                tracing::trace!("directory does not support password policy testing");
                Ok(None)
            }
            Err(DirectoryError::Unavailable(reason)) => {
                if let Some(statistics) = self.services.statistics {
                    statistics.increment(Statistic::DirectoryUnavailable);
                }
                #[cfg(feature = "tracing")]
                tracing::warn!("directory unavailable while validating password: {}", reason);
                Err(ValidationError::DirectoryUnavailable(reason))
            }
            Err(DirectoryError::PolicyViolation { code }) => {
                #[cfg(feature = "tracing")]
                tracing::trace!("directory rejected password: {:?}", code);
                let kind = code
                    .violation_kind()
                    .unwrap_or(ViolationKind::UnknownValidation);
                Ok(Some(Violation::new(kind)))
            }
        }
    }

    fn expand(&self, template: &str, user: Option<&UserContext>) -> String {
        match self.services.macros {
            Some(macros) => macros.expand(template, user),
            None => template.to_string(),
        }
    }

    /// Validates and delivers the outcome through `tx`.
    #[cfg(feature = "async")]
    pub async fn test_password_tx(
        &self,
        password: Option<&SecretString>,
        old_password: Option<&SecretString>,
        user: Option<&UserContext>,
        directory: Option<&dyn DirectoryPolicy>,
        tx: mpsc::Sender<Result<(), ValidationError>>,
    ) {
        let outcome = self.test_password(password, old_password, user, directory);

        if let Err(_e) = tx.send(outcome).await {
            #[cfg(feature = "tracing")]
            tracing::error!("Failed to send password validation result: {}", _e);
        }
    }
}

fn null_password() -> Violation {
    Violation::with_detail(ViolationKind::Internal, "empty (null) new password")
}

fn char_group_check(password: &str, rules: &RuleHelper<'_>) -> Vec<Violation> {
    let required = usize::try_from(rules.read_int(Rule::CharGroupsMinMatch)).unwrap_or(0);
    if required == 0 {
        return Vec::new();
    }
    let groups = rules.char_group_values();
    if groups.is_empty() {
        return Vec::new();
    }
    let matches = groups.iter().filter(|group| group.is_match(password)).count();
    if matches < required {
        return vec![Violation::new(ViolationKind::NotEnoughGroups)];
    }
    Vec::new()
}

/// Wordlist lookups run only against open services.
fn lookup(service: Option<&dyn WordlistService>, password: &str) -> Vec<Violation> {
    match service {
        Some(service) if service.status() == ServiceStatus::Open => {
            if service.contains_word(password) {
                return vec![Violation::new(ViolationKind::InWordlist)];
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DirectoryErrorCode;
    use crate::external::RuleServiceSettings;
    use crate::external::testing::MockTransport;
    use crate::macros::UserMacroExpander;
    use crate::services::StatisticsCounter;
    use crate::strength::StrengthMeter;
    use crate::wordlist::Wordlist;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    fn kinds(violations: &[Violation]) -> Vec<ViolationKind> {
        violations.iter().map(|v| v.kind).collect()
    }

    fn permissive() -> crate::policy::PolicyBuilder {
        Policy::builder()
            .set(Rule::MinimumLength, 0)
            .set(Rule::MaximumLength, 0)
    }

    struct FixedDirectory(fn() -> Result<(), DirectoryError>);

    impl DirectoryPolicy for FixedDirectory {
        fn test_password_policy(&self, _password: &str) -> Result<(), DirectoryError> {
            (self.0)()
        }
    }

    #[derive(Default)]
    struct CountingWordlist {
        calls: AtomicUsize,
    }

    impl WordlistService for CountingWordlist {
        fn status(&self) -> ServiceStatus {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ServiceStatus::Open
        }

        fn contains_word(&self, _word: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            false
        }
    }

    #[test]
    fn test_short_password_reports_only_length() {
        let policy = Policy::builder().set(Rule::MinimumLength, 8).build().unwrap();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        for pwd in ["a", "Ab1!", "Abcdef1"] {
            let violations = validator.validate(Some(&secret(pwd)), None, None).unwrap();
            assert_eq!(kinds(&violations), vec![ViolationKind::TooShort], "{pwd}");
        }
    }

    #[test]
    fn test_numeric_rules() {
        let policy = permissive().set(Rule::AllowNumeric, false).build().unwrap();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        let violations = validator.internal_validate(Some("abc1"), None, None);
        assert!(kinds(&violations).contains(&ViolationKind::TooManyNumeric));

        let policy = permissive()
            .set(Rule::AllowNumeric, true)
            .set(Rule::MinimumNumeric, 2)
            .build()
            .unwrap();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        let violations = validator.internal_validate(Some("abcdef1"), None, None);
        assert_eq!(kinds(&violations), vec![ViolationKind::NotEnoughNumeric]);
    }

    #[test]
    fn test_same_as_old_password() {
        let policy = permissive().set(Rule::DisallowCurrent, true).build().unwrap();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        let violations = validator
            .validate(Some(&secret("SUMMER2023")), Some(&secret("Summer2023")), None)
            .unwrap();
        assert_eq!(kinds(&violations), vec![ViolationKind::SameAsOld]);
    }

    #[test]
    fn test_fail_fast_waits_for_second_violation() {
        let policy = permissive()
            .set(Rule::MinimumLength, 20)
            .set(Rule::DisallowedValues, vec!["summer"])
            .build()
            .unwrap();
        let validator =
            PasswordRuleValidator::new(&policy, Services::default()).with_flags(&[Flag::FailFast]);

        // a single violation after the old password stage does not stop it
        let violations = validator.internal_validate(Some("winter"), Some("WINTER"), None);
        assert_eq!(
            kinds(&violations),
            vec![ViolationKind::SameAsOld, ViolationKind::TooShort]
        );

        // without fail fast the disallowed value stage runs as well
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        let violations = validator.internal_validate(Some("summer"), Some("SUMMER"), None);
        assert_eq!(
            kinds(&violations),
            vec![
                ViolationKind::SameAsOld,
                ViolationKind::TooShort,
                ViolationKind::UsingDisallowed,
            ]
        );

        // with fail fast it stops after basic syntax with exactly two
        let validator = validator.with_flags(&[Flag::FailFast]);
        let violations = validator.internal_validate(Some("summer"), Some("SUMMER"), None);
        assert_eq!(
            kinds(&violations),
            vec![ViolationKind::SameAsOld, ViolationKind::TooShort]
        );
    }

    #[test]
    fn test_fail_fast_single_violation_runs_everything() {
        let policy = permissive().set(Rule::DisallowedValues, vec!["acme"]).build().unwrap();
        let wordlist = CountingWordlist::default();
        let services = Services {
            wordlist: Some(&wordlist),
            ..Default::default()
        };
        let validator = PasswordRuleValidator::new(&policy, services).with_flags(&[Flag::FailFast]);
        let violations = validator.internal_validate(Some("acme-pass"), None, None);
        assert_eq!(kinds(&violations), vec![ViolationKind::UsingDisallowed]);
        // the wordlist stage near the end was still reached
        assert!(wordlist.calls.load(Ordering::SeqCst) > 0);
    }

    #[test]
    fn test_fail_fast_stops_before_later_stages() {
        let policy = permissive()
            .set(Rule::AllowNumeric, false)
            .set(Rule::AllowSpecial, false)
            .build()
            .unwrap();
        let wordlist = CountingWordlist::default();
        let services = Services {
            wordlist: Some(&wordlist),
            ..Default::default()
        };
        let validator = PasswordRuleValidator::new(&policy, services).with_flags(&[Flag::FailFast]);
        let violations = validator.internal_validate(Some("pass1!"), None, None);
        assert_eq!(
            kinds(&violations),
            vec![ViolationKind::TooManyNumeric, ViolationKind::TooManySpecial]
        );
        assert_eq!(wordlist.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_ad_complexity() {
        let policy = permissive()
            .set(Rule::ADComplexityLevel, "AD2003")
            .set(Rule::ADComplexityMaxViolations, 0)
            .build()
            .unwrap();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        assert!(validator.internal_validate(Some("Password1"), None, None).is_empty());
        assert_eq!(
            kinds(&validator.internal_validate(Some("password1"), None, None)),
            vec![ViolationKind::NotEnoughGroups]
        );
    }

    #[test]
    fn test_consecutive_characters() {
        let policy = permissive().set(Rule::MaximumConsecutive, 3).build().unwrap();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        assert_eq!(
            kinds(&validator.internal_validate(Some("abcd1234"), None, None)),
            vec![ViolationKind::TooManyConsecutive]
        );
        assert!(validator.internal_validate(Some("a1b2c3"), None, None).is_empty());
    }

    #[test]
    fn test_strength_stage() {
        let policy = permissive().set(Rule::MinimumStrength, 50).build().unwrap();
        let meter = StrengthMeter::new();
        let services = Services {
            strength: Some(&meter),
            ..Default::default()
        };
        let validator = PasswordRuleValidator::new(&policy, services);
        assert_eq!(
            kinds(&validator.internal_validate(Some("abc"), None, None)),
            vec![ViolationKind::TooWeak]
        );
        assert!(validator
            .internal_validate(Some("VeryStrongPassword123!@#"), None, None)
            .is_empty());

        // no judge, no check
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        assert!(validator.internal_validate(Some("abc"), None, None).is_empty());
    }

    #[test]
    fn test_regex_stages() {
        let policy = permissive()
            .set(Rule::RegExMatch, vec!["[A-Za-z0-9]+", ".{6,}"])
            .set(Rule::RegExNoMatch, vec![".*@User:ID@.*", "[0-9]+"])
            .build()
            .unwrap();
        let expander = UserMacroExpander;
        let services = Services {
            macros: Some(&expander),
            ..Default::default()
        };
        let user = UserContext::new().with_username("jdoe");
        let validator = PasswordRuleValidator::new(&policy, services);

        // fails both must-match patterns
        assert_eq!(
            kinds(&validator.internal_validate(Some("ab!"), None, Some(&user))),
            vec![ViolationKind::InvalidChar, ViolationKind::InvalidChar]
        );
        // matches a must-not-match pattern after macro expansion
        assert_eq!(
            kinds(&validator.internal_validate(Some("xxjdoexx"), None, Some(&user))),
            vec![ViolationKind::InvalidChar]
        );
        assert!(validator
            .internal_validate(Some("Abcdef12"), None, Some(&user))
            .is_empty());
    }

    #[test]
    fn test_char_groups() {
        let policy = permissive()
            .set(Rule::CharGroupsMinMatch, 3)
            .set(Rule::CharGroupsValues, vec!["[a-z]", "[A-Z]", "[0-9]", "[^a-zA-Z0-9]"])
            .build()
            .unwrap();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        assert_eq!(
            kinds(&validator.internal_validate(Some("password1"), None, None)),
            vec![ViolationKind::NotEnoughGroups]
        );
        assert!(validator.internal_validate(Some("Password1"), None, None).is_empty());
    }

    #[test]
    fn test_wordlist_and_shared_history() {
        let policy = permissive().build().unwrap();
        let wordlist = Wordlist::from_words(["letmein"]);
        let history = Wordlist::from_words(["Spring2024"]);
        let closed = Wordlist::new();
        let services = Services {
            wordlist: Some(&wordlist),
            shared_history: Some(&history),
            ..Default::default()
        };
        let validator = PasswordRuleValidator::new(&policy, services);
        assert_eq!(
            kinds(&validator.internal_validate(Some("LetMeIn"), None, None)),
            vec![ViolationKind::InWordlist]
        );
        assert_eq!(
            kinds(&validator.internal_validate(Some("spring2024"), None, None)),
            vec![ViolationKind::InWordlist]
        );

        // closed services are skipped silently
        let services = Services {
            wordlist: Some(&closed),
            shared_history: Some(&closed),
            ..Default::default()
        };
        let validator = PasswordRuleValidator::new(&policy, services);
        assert!(validator.internal_validate(Some("letmein"), None, None).is_empty());
    }

    #[test]
    fn test_wordlist_disabled_by_policy() {
        let policy = permissive().set(Rule::EnableWordlist, false).build().unwrap();
        let wordlist = Wordlist::from_words(["letmein"]);
        let services = Services {
            wordlist: Some(&wordlist),
            ..Default::default()
        };
        let validator = PasswordRuleValidator::new(&policy, services);
        assert!(validator.internal_validate(Some("letmein"), None, None).is_empty());
    }

    #[test]
    fn test_external_rule_violation() {
        let policy = permissive().build().unwrap();
        let transport =
            MockTransport::replying(r#"{"error": true, "errorMessage": "too common"}"#);
        let invoker = ExternalRuleInvoker::new(
            transport,
            RuleServiceSettings::new("http://rules.test/check"),
        );
        let services = Services {
            external_rules: Some(&invoker),
            ..Default::default()
        };
        let validator = PasswordRuleValidator::new(&policy, services);
        let violations = validator.validate(Some(&secret("hunter22")), None, None).unwrap();
        assert_eq!(
            violations,
            vec![Violation::with_detail(ViolationKind::CustomError, "too common")]
        );
    }

    #[test]
    fn test_external_rule_failure_aborts() {
        let policy = permissive().set(Rule::MinimumLength, 50).build().unwrap();
        for halt in [true, false] {
            let invoker = ExternalRuleInvoker::new(
                MockTransport::failing(),
                RuleServiceSettings::new("http://rules.test/check").halt_on_error(halt),
            );
            let services = Services {
                external_rules: Some(&invoker),
                ..Default::default()
            };
            let validator = PasswordRuleValidator::new(&policy, services);
            let err = validator
                .test_password(Some(&secret("short")), None, None, None)
                .unwrap_err();
            assert!(err.is_fatal());
            assert!(err.violations().is_empty());
        }
    }

    #[test]
    fn test_null_password_skips_collaborators() {
        let policy = permissive().build().unwrap();
        let transport = MockTransport::replying(r#"{"error": true}"#);
        let invoker =
            ExternalRuleInvoker::new(transport.clone(), RuleServiceSettings::new("http://x"));
        let wordlist = CountingWordlist::default();
        let services = Services {
            wordlist: Some(&wordlist),
            external_rules: Some(&invoker),
            ..Default::default()
        };
        let validator = PasswordRuleValidator::new(&policy, services);

        let violations = validator.validate(None, None, None).unwrap();
        assert_eq!(kinds(&violations), vec![ViolationKind::Internal]);
        assert_eq!(transport.calls(), 0);
        assert_eq!(wordlist.calls.load(Ordering::SeqCst), 0);

        let err = validator.test_password(None, None, None, None).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Rejected { ref first, .. } if first.kind == ViolationKind::Internal
        ));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let policy = permissive()
            .set(Rule::MinimumLength, 12)
            .set(Rule::DisallowedValues, vec!["acme", "corp", "secret"])
            .set(Rule::MinimumUpperCase, 2)
            .build()
            .unwrap();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        let user = UserContext::new().with_username("jdoe");
        let first = validator.internal_validate(Some("acmecorpsecret"), None, Some(&user));
        let second = validator.internal_validate(Some("acmecorpsecret"), None, Some(&user));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_test_password_accepts() {
        let policy = Policy::default();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        let directory = FixedDirectory(|| Ok(()));
        assert!(validator
            .test_password(Some(&secret("Tr0ub4dor&3")), None, None, Some(&directory))
            .is_ok());
    }

    #[test]
    fn test_rejection_reports_first_violation() {
        let policy = Policy::builder()
            .set(Rule::MinimumLength, 10)
            .set(Rule::MinimumNumeric, 1)
            .build()
            .unwrap();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        let err = validator
            .test_password(Some(&secret("short")), None, None, None)
            .unwrap_err();
        match err {
            ValidationError::Rejected { first, violations } => {
                assert_eq!(first.kind, ViolationKind::TooShort);
                assert_eq!(
                    kinds(&violations),
                    vec![ViolationKind::TooShort, ViolationKind::NotEnoughNumeric]
                );
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_rejection_is_mapped() {
        let policy = Policy::default();
        let validator = PasswordRuleValidator::new(&policy, Services::default());

        let directory = FixedDirectory(|| {
            Err(DirectoryError::PolicyViolation {
                code: DirectoryErrorCode::InWordlist,
            })
        });
        let err = validator
            .test_password(Some(&secret("Tr0ub4dor&3")), None, None, Some(&directory))
            .unwrap_err();
        assert_eq!(kinds(err.violations()), vec![ViolationKind::InWordlist]);

        let directory = FixedDirectory(|| {
            Err(DirectoryError::PolicyViolation {
                code: DirectoryErrorCode::HistoryFull,
            })
        });
        let err = validator
            .test_password(Some(&secret("Tr0ub4dor&3")), None, None, Some(&directory))
            .unwrap_err();
        assert_eq!(kinds(err.violations()), vec![ViolationKind::UnknownValidation]);
    }

    #[test]
    fn test_directory_unsupported_is_ignored() {
        let policy = Policy::default();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        let directory = FixedDirectory(|| Err(DirectoryError::Unsupported));
        assert!(validator
            .test_password(Some(&secret("Tr0ub4dor&3")), None, None, Some(&directory))
            .is_ok());
    }

    #[test]
    fn test_directory_unavailable_is_fatal_and_counted() {
        let policy = Policy::default();
        let statistics = StatisticsCounter::new();
        let services = Services {
            statistics: Some(&statistics),
            ..Default::default()
        };
        let validator = PasswordRuleValidator::new(&policy, services);
        let directory = FixedDirectory(|| Err(DirectoryError::Unavailable("timeout".to_string())));

        let err = validator
            .test_password(Some(&secret("Tr0ub4dor&3")), None, None, Some(&directory))
            .unwrap_err();
        assert!(matches!(err, ValidationError::DirectoryUnavailable(_)));
        assert!(err.is_fatal());
        assert_eq!(statistics.value(Statistic::DirectoryUnavailable), 1);
    }

    #[test]
    fn test_directory_bypass() {
        let policy = Policy::default();
        let validator = PasswordRuleValidator::new(&policy, Services::default())
            .with_flags(&[Flag::BypassDirectoryCheck]);
        let directory = FixedDirectory(|| Err(DirectoryError::Unavailable("down".to_string())));
        assert!(validator
            .test_password(Some(&secret("Tr0ub4dor&3")), None, None, Some(&directory))
            .is_ok());
    }

    #[test]
    fn test_directory_not_called_when_rules_fail() {
        let policy = Policy::builder().set(Rule::MinimumLength, 20).build().unwrap();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        let directory = FixedDirectory(|| Err(DirectoryError::Unavailable("down".to_string())));
        let err = validator
            .test_password(Some(&secret("short")), None, None, Some(&directory))
            .unwrap_err();
        assert!(!err.is_fatal());
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_test_password_tx() {
        let policy = Policy::builder().set(Rule::MinimumLength, 20).build().unwrap();
        let validator = PasswordRuleValidator::new(&policy, Services::default());
        let (tx, mut rx) = mpsc::channel(1);

        validator
            .test_password_tx(Some(&secret("short")), None, None, None, tx)
            .await;

        let outcome = rx.recv().await.expect("Should receive outcome");
        assert!(matches!(outcome, Err(ValidationError::Rejected { .. })));
    }
}
