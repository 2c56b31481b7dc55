//! The user a password is being validated for.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Directory entry of the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_dn: String,
    pub profile: Option<String>,
}

/// Identity plus the cached directory attributes consulted by the
/// disallowed-attribute and AD complexity checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    identity: Option<UserIdentity>,
    username: Option<String>,
    email: Option<String>,
    attributes: HashMap<String, String>,
}

impl UserContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, user_dn: impl Into<String>, profile: Option<String>) -> Self {
        self.identity = Some(UserIdentity {
            user_dn: user_dn.into(),
            profile,
        });
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Cached attribute value; attribute names compare case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str).or_else(|| {
            self.attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }

    /// The fields that may leave the process, e.g. towards the external
    /// rule service.
    pub fn public_info(&self) -> PublicUserInfo<'_> {
        PublicUserInfo {
            user_dn: self.identity.as_ref().map(|i| i.user_dn.as_str()),
            ldap_profile: self.identity.as_ref().and_then(|i| i.profile.as_deref()),
            user_id: self.username.as_deref(),
            user_email_address: self.email.as_deref(),
            attributes: self
                .attributes
                .iter()
                .filter(|(name, _)| !is_secret_attribute(name))
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect(),
        }
    }
}

fn is_secret_attribute(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.contains("password") || name.contains("pwd")
}

/// Sanitized projection of a [`UserContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserInfo<'a> {
    #[serde(rename = "userDN", skip_serializing_if = "Option::is_none")]
    pub user_dn: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_profile: Option<&'a str>,
    #[serde(rename = "userID", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email_address: Option<&'a str>,
    pub attributes: BTreeMap<&'a str, &'a str>,
}
