//! Password policy: the rule catalogue and the immutable rule values.
//!
//! A [`Policy`] maps every [`Rule`] to a [`RuleValue`]. Rules that are not
//! configured take the catalogue default, so a policy always answers every
//! rule. Policies are built once and shared read-only between validations.
//!
//! # Example
//!
//! ```rust
//! use pwd_policy::{Policy, Rule};
//!
//! let policy = Policy::builder()
//!     .set(Rule::MinimumLength, 8)
//!     .set(Rule::AllowSpecial, false)
//!     .set(Rule::DisallowedValues, vec!["password".to_string()])
//!     .build()
//!     .expect("valid policy");
//!
//! assert_eq!(policy.rules().read_int(Rule::MinimumLength), 8);
//! ```

mod helper;

pub use helper::{AdComplexity, DisallowedAttribute, RuleHelper};

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::PolicyError;

/// Value type of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleType {
    Int,
    Bool,
    Text,
    List,
}

macro_rules! rule_catalogue {
    ($( $rule:ident => $kind:ident = $default:expr ),* $(,)?) => {
        /// Every rule a policy can configure, in catalogue order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Rule {
            $( $rule, )*
        }

        impl Rule {
            pub const ALL: &'static [Rule] = &[ $( Rule::$rule, )* ];

            pub fn name(self) -> &'static str {
                match self {
                    $( Rule::$rule => stringify!($rule), )*
                }
            }

            pub fn rule_type(self) -> RuleType {
                match self {
                    $( Rule::$rule => RuleType::$kind, )*
                }
            }

            pub fn default_value(self) -> RuleValue {
                match self {
                    $( Rule::$rule => RuleValue::from($default), )*
                }
            }
        }
    };
}

rule_catalogue! {
    PolicyEnabled => Bool = true,
    MinimumLength => Int = 2,
    MaximumLength => Int = 64,
    MinimumUpperCase => Int = 0,
    MaximumUpperCase => Int = 0,
    MinimumLowerCase => Int = 0,
    MaximumLowerCase => Int = 0,
    AllowNumeric => Bool = true,
    MinimumNumeric => Int = 0,
    MaximumNumeric => Int = 0,
    MinimumUnique => Int = 0,
    AllowFirstCharNumeric => Bool = true,
    AllowLastCharNumeric => Bool = true,
    AllowSpecial => Bool = true,
    MinimumSpecial => Int = 0,
    MaximumSpecial => Int = 0,
    AllowFirstCharSpecial => Bool = true,
    AllowLastCharSpecial => Bool = true,
    MaximumRepeat => Int = 0,
    MaximumSequentialRepeat => Int = 0,
    MaximumConsecutive => Int = 0,
    MinimumAlpha => Int = 0,
    MaximumAlpha => Int = 0,
    AllowNonAlpha => Bool = true,
    MinimumNonAlpha => Int = 0,
    MaximumNonAlpha => Int = 0,
    EnableWordlist => Bool = true,
    DisallowedValues => List = Vec::<String>::new(),
    DisallowedAttributes => List = Vec::<String>::new(),
    DisallowCurrent => Bool = true,
    MaximumOldChars => Int = 0,
    ADComplexityLevel => Text = "NONE",
    ADComplexityMaxViolations => Int = 0,
    ADComplexityMinTokenLength => Int = 3,
    RegExMatch => List = Vec::<String>::new(),
    RegExNoMatch => List = Vec::<String>::new(),
    AllowMacroInRegExSetting => Bool = true,
    CharGroupsMinMatch => Int = 0,
    CharGroupsValues => List = Vec::<String>::new(),
    MinimumStrength => Int = 0,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::ALL
            .iter()
            .copied()
            .find(|rule| rule.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PolicyError::UnknownRule(s.to_string()))
    }
}

/// A configured rule value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RuleValue {
    Int(i64),
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl RuleValue {
    fn rule_type(&self) -> RuleType {
        match self {
            RuleValue::Int(_) => RuleType::Int,
            RuleValue::Bool(_) => RuleType::Bool,
            RuleValue::Text(_) => RuleType::Text,
            RuleValue::List(_) => RuleType::List,
        }
    }

    /// Coerces the value into the type `rule` expects.
    ///
    /// Numbers and booleans may be supplied as strings, and a list may be
    /// supplied as newline separated text.
    fn coerce(self, rule: Rule) -> Result<RuleValue, PolicyError> {
        let expected = rule.rule_type();
        if self.rule_type() == expected {
            return Ok(self);
        }
        let invalid = |value: &RuleValue| PolicyError::InvalidValue {
            rule: rule.name(),
            value: format!("{value:?}"),
        };
        match (expected, &self) {
            (RuleType::Int, RuleValue::Text(s)) => {
                s.trim().parse().map(RuleValue::Int).map_err(|_| invalid(&self))
            }
            (RuleType::Bool, RuleValue::Text(s)) => {
                s.trim()
                    .to_ascii_lowercase()
                    .parse()
                    .map(RuleValue::Bool)
                    .map_err(|_| invalid(&self))
            }
            (RuleType::Text, RuleValue::Int(i)) => Ok(RuleValue::Text(i.to_string())),
            (RuleType::List, RuleValue::Text(s)) => Ok(RuleValue::List(
                s.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect(),
            )),
            _ => Err(invalid(&self)),
        }
    }

    fn from_json(rule: Rule, value: Value) -> Result<RuleValue, PolicyError> {
        let raw = match value {
            Value::Bool(b) => RuleValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RuleValue::Int(i),
                None => {
                    return Err(PolicyError::InvalidValue {
                        rule: rule.name(),
                        value: n.to_string(),
                    });
                }
            },
            Value::String(s) => RuleValue::Text(s),
            Value::Array(items) => RuleValue::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Value::Null => return Ok(rule.default_value()),
            other => {
                return Err(PolicyError::InvalidValue {
                    rule: rule.name(),
                    value: other.to_string(),
                });
            }
        };
        raw.coerce(rule)
    }
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        RuleValue::Int(value)
    }
}

impl From<i32> for RuleValue {
    fn from(value: i32) -> Self {
        RuleValue::Int(i64::from(value))
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        RuleValue::Bool(value)
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::Text(value.to_string())
    }
}

impl From<String> for RuleValue {
    fn from(value: String) -> Self {
        RuleValue::Text(value)
    }
}

impl From<Vec<String>> for RuleValue {
    fn from(value: Vec<String>) -> Self {
        RuleValue::List(value)
    }
}

impl From<Vec<&str>> for RuleValue {
    fn from(value: Vec<&str>) -> Self {
        RuleValue::List(value.into_iter().map(String::from).collect())
    }
}

/// Immutable set of rule values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    values: BTreeMap<Rule, RuleValue>,
    ad_complexity: AdComplexity,
}

impl Policy {
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// Builds a policy from a JSON object mapping rule names to values.
    ///
    /// ```rust
    /// let policy = pwd_policy::Policy::from_json(
    ///     r#"{"MinimumLength": 10, "AllowNumeric": "false", "RegExNoMatch": ["^[a-z]+$"]}"#,
    /// ).unwrap();
    /// assert_eq!(policy.rules().read_int(pwd_policy::Rule::MinimumLength), 10);
    /// ```
    pub fn from_json(json: &str) -> Result<Policy, PolicyError> {
        let map: BTreeMap<String, Value> = serde_json::from_str(json)?;
        let mut builder = Policy::builder();
        for (name, value) in map {
            let rule: Rule = name.parse()?;
            builder.values.insert(rule, RuleValue::from_json(rule, value)?);
        }
        builder.build()
    }

    /// Builds a policy from rule names paired with string values, the way
    /// policies are stored in configuration files.
    pub fn from_values<I, K, V>(values: I) -> Result<Policy, PolicyError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut builder = Policy::builder();
        for (name, value) in values {
            let rule: Rule = name.as_ref().parse()?;
            let value: String = value.into();
            builder = builder.set(rule, value);
        }
        builder.build()
    }

    /// Effective value of a rule.
    pub fn value(&self, rule: Rule) -> RuleValue {
        self.values
            .get(&rule)
            .cloned()
            .unwrap_or_else(|| rule.default_value())
    }

    pub fn rules(&self) -> RuleHelper<'_> {
        RuleHelper::new(self)
    }

    pub fn ad_complexity(&self) -> AdComplexity {
        self.ad_complexity
    }

    /// Every rule name mapped to its effective value, in catalogue order.
    pub fn to_rule_map(&self) -> serde_json::Map<String, Value> {
        Rule::ALL
            .iter()
            .map(|rule| {
                let value = serde_json::to_value(self.value(*rule)).unwrap_or(Value::Null);
                (rule.name().to_string(), value)
            })
            .collect()
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            values: BTreeMap::new(),
            ad_complexity: AdComplexity::None,
        }
    }
}

/// Collects rule values; type checking happens in [`PolicyBuilder::build`].
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    values: BTreeMap<Rule, RuleValue>,
}

impl PolicyBuilder {
    pub fn set(mut self, rule: Rule, value: impl Into<RuleValue>) -> Self {
        self.values.insert(rule, value.into());
        self
    }

    pub fn build(self) -> Result<Policy, PolicyError> {
        let mut values = BTreeMap::new();
        for (rule, value) in self.values {
            values.insert(rule, value.coerce(rule)?);
        }

        let ad_complexity = match values.get(&Rule::ADComplexityLevel) {
            Some(RuleValue::Text(level)) => level.parse()?,
            _ => AdComplexity::None,
        };

        Ok(Policy {
            values,
            ad_complexity,
        })
    }
}
