//! Typed read access to policy values.

use regex::Regex;
use std::str::FromStr;

use super::{Policy, Rule, RuleValue};
use crate::error::PolicyError;

/// Active Directory complexity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdComplexity {
    #[default]
    None,
    Ad2003,
    Ad2008,
}

impl AdComplexity {
    pub fn is_enabled(self) -> bool {
        self != AdComplexity::None
    }
}

impl FromStr for AdComplexity {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "NONE" => Ok(AdComplexity::None),
            "AD2003" => Ok(AdComplexity::Ad2003),
            "AD2008" => Ok(AdComplexity::Ad2008),
            _ => Err(PolicyError::InvalidValue {
                rule: Rule::ADComplexityLevel.name(),
                value: s.to_string(),
            }),
        }
    }
}

/// A user attribute whose value the password must not contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisallowedAttribute {
    pub name: String,
    /// Minimum length of a matching fragment; 0 means the whole value.
    pub threshold: usize,
}

impl DisallowedAttribute {
    /// Parses `"attrName"` or `"attrName:threshold"`. A threshold that is not
    /// a number counts as 0.
    pub fn parse(config: &str) -> Self {
        let mut parts = config.split(':');
        let name = parts.next().unwrap_or_default().trim().to_string();
        let threshold = parts
            .next()
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(0);
        DisallowedAttribute { name, threshold }
    }
}

/// Read-only accessor over a [`Policy`].
#[derive(Debug, Clone, Copy)]
pub struct RuleHelper<'a> {
    policy: &'a Policy,
}

impl<'a> RuleHelper<'a> {
    pub fn new(policy: &'a Policy) -> Self {
        RuleHelper { policy }
    }

    pub fn policy(&self) -> &'a Policy {
        self.policy
    }

    /// Integer value of a rule, 0 when the rule is not an integer rule.
    pub fn read_int(&self, rule: Rule) -> i64 {
        match self.policy.value(rule) {
            RuleValue::Int(i) => i,
            _ => 0,
        }
    }

    pub fn read_bool(&self, rule: Rule) -> bool {
        matches!(self.policy.value(rule), RuleValue::Bool(true))
    }

    pub fn read_list(&self, rule: Rule) -> Vec<String> {
        match self.policy.value(rule) {
            RuleValue::List(items) => items,
            RuleValue::Text(text) if !text.is_empty() => vec![text],
            _ => Vec::new(),
        }
    }

    pub fn disallowed_values(&self) -> Vec<String> {
        self.read_list(Rule::DisallowedValues)
    }

    pub fn disallowed_attributes(&self) -> Vec<DisallowedAttribute> {
        self.read_list(Rule::DisallowedAttributes)
            .iter()
            .map(|config| DisallowedAttribute::parse(config))
            .filter(|attr| !attr.name.is_empty())
            .collect()
    }

    pub fn ad_complexity_level(&self) -> AdComplexity {
        self.policy.ad_complexity()
    }

    /// Patterns the whole password must match.
    ///
    /// `expand` is applied to each pattern first when macros are allowed in
    /// regex settings.
    pub fn regex_match(&self, expand: impl Fn(&str) -> String) -> Vec<Regex> {
        self.full_match_patterns(Rule::RegExMatch, expand)
    }

    /// Patterns the whole password must not match.
    pub fn regex_no_match(&self, expand: impl Fn(&str) -> String) -> Vec<Regex> {
        self.full_match_patterns(Rule::RegExNoMatch, expand)
    }

    /// Character group patterns, matched anywhere in the password.
    pub fn char_group_values(&self) -> Vec<Regex> {
        self.read_list(Rule::CharGroupsValues)
            .iter()
            .filter_map(|pattern| compile(Rule::CharGroupsValues, pattern))
            .collect()
    }

    fn full_match_patterns(&self, rule: Rule, expand: impl Fn(&str) -> String) -> Vec<Regex> {
        let allow_macros = self.read_bool(Rule::AllowMacroInRegExSetting);
        self.read_list(rule)
            .iter()
            .filter(|pattern| !pattern.is_empty())
            .filter_map(|pattern| {
                let pattern = if allow_macros {
                    expand(pattern)
                } else {
                    pattern.clone()
                };
                compile(rule, &format!("^(?:{pattern})$"))
            })
            .collect()
    }
}

fn compile(_rule: Rule, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("skipping invalid {} pattern {:?}: {}", _rule, pattern, _e);
            None
        }
    }
}
