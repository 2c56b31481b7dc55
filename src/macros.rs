//! Token expansion for configured values.
//!
//! Supported tokens: `@User:ID@`, `@User:Email@`, `@User:DN@` and
//! `@LDAP:<attribute>@`. Tokens the user cannot answer expand to an empty
//! string; unknown tokens are left as they are.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::services::MacroExpander;
use crate::user::UserContext;

static MACRO_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"@(User:ID|User:Email|User:DN|LDAP:[^@:]+)@").ok());

/// [`MacroExpander`] answering tokens from the [`UserContext`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UserMacroExpander;

impl MacroExpander for UserMacroExpander {
    fn expand(&self, template: &str, user: Option<&UserContext>) -> String {
        let Some(pattern) = MACRO_PATTERN.as_ref() else {
            return template.to_string();
        };
        pattern
            .replace_all(template, |caps: &Captures<'_>| {
                let Some(user) = user else {
                    return String::new();
                };
                let value = match &caps[1] {
                    "User:ID" => user.username(),
                    "User:Email" => user.email(),
                    "User:DN" => user.identity().map(|i| i.user_dn.as_str()),
                    token => token
                        .strip_prefix("LDAP:")
                        .and_then(|attr| user.attribute(attr)),
                };
                value.unwrap_or_default().to_string()
            })
            .into_owned()
    }
}
