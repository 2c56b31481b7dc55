//! External password rule service.
//!
//! The candidate password, the full rule set and the public user info are
//! posted as JSON to a configured endpoint. The service answers with
//! `{"error": bool|string, "errorMessage"?: string}`; a truthy `error` turns
//! into a single [`ViolationKind::CustomError`].
//!
//! A failed call always aborts the validation. `halt_on_error` only decides
//! which error is raised.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{RuleServiceError, ValidationError};
use crate::policy::Policy;
use crate::user::{PublicUserInfo, UserContext};
use crate::violation::{Violation, ViolationKind};

const RULE_SERVICE_URL_VAR: &str = "PWD_RULE_SERVICE_URL";
const RULE_HALT_ON_ERROR_VAR: &str = "PWD_RULE_HALT_ON_ERROR";

const RESPONSE_KEY_ERROR: &str = "error";
const RESPONSE_KEY_ERROR_MSG: &str = "errorMessage";

/// Sends a JSON body to the rule service and returns the response body.
pub trait RuleTransport: Send + Sync {
    fn post_json(&self, url: &str, body: &str) -> Result<String, RuleServiceError>;
}

/// Where the rule service lives and how call failures are raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleServiceSettings {
    pub url: Option<String>,
    pub halt_on_error: bool,
}

impl RuleServiceSettings {
    pub fn new(url: impl Into<String>) -> Self {
        RuleServiceSettings {
            url: Some(url.into()),
            halt_on_error: false,
        }
    }

    pub fn halt_on_error(mut self, halt: bool) -> Self {
        self.halt_on_error = halt;
        self
    }

    /// Reads `PWD_RULE_SERVICE_URL` and `PWD_RULE_HALT_ON_ERROR`.
    pub fn from_env() -> Self {
        let url = std::env::var(RULE_SERVICE_URL_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty());
        let halt_on_error = std::env::var(RULE_HALT_ON_ERROR_VAR)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        RuleServiceSettings { url, halt_on_error }
    }
}

#[derive(Serialize)]
struct RuleRequest<'a> {
    password: &'a str,
    policy: Map<String, Value>,
    #[serde(rename = "userInfo", skip_serializing_if = "Option::is_none")]
    user_info: Option<PublicUserInfo<'a>>,
}

/// Calls the external rule service.
pub struct ExternalRuleInvoker {
    transport: Box<dyn RuleTransport>,
    settings: RuleServiceSettings,
}

impl ExternalRuleInvoker {
    pub fn new(transport: impl RuleTransport + 'static, settings: RuleServiceSettings) -> Self {
        ExternalRuleInvoker {
            transport: Box::new(transport),
            settings,
        }
    }

    pub fn settings(&self) -> &RuleServiceSettings {
        &self.settings
    }

    /// Asks the service about `password`.
    ///
    /// Returns no violations when no endpoint is configured.
    pub fn invoke(
        &self,
        policy: &Policy,
        password: &str,
        user: Option<&UserContext>,
    ) -> Result<Vec<Violation>, ValidationError> {
        let Some(url) = self.settings.url.as_deref().filter(|url| !url.is_empty()) else {
            return Ok(Vec::new());
        };

        let request = RuleRequest {
            password,
            policy: policy.to_rule_map(),
            user_info: user.map(UserContext::public_info),
        };

        match self.call(url, &request) {
            Ok(response) => Ok(interpret_response(&response)),
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!("error executing external rule REST call: {}", e);
                if self.settings.halt_on_error {
                    Err(ValidationError::ExternalRuleHalted(e))
                } else {
                    Err(ValidationError::ExternalRuleFailed(e))
                }
            }
        }
    }

    fn call(&self, url: &str, request: &RuleRequest<'_>) -> Result<Map<String, Value>, RuleServiceError> {
        let body = serde_json::to_string(request)?;
        let response = self.transport.post_json(url, &body)?;
        Ok(serde_json::from_str(&response)?)
    }
}

fn interpret_response(response: &Map<String, Value>) -> Vec<Violation> {
    let rejected = match response.get(RESPONSE_KEY_ERROR) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag.trim().eq_ignore_ascii_case("true"),
        _ => false,
    };
    if !rejected {
        #[cfg(feature = "tracing")]
        tracing::trace!("external web service did not report an error");
        return Vec::new();
    }

    let message = match response.get(RESPONSE_KEY_ERROR_MSG) {
        None | Some(Value::Null) => None,
        Some(Value::String(message)) => Some(message.clone()),
        Some(other) => Some(other.to_string()),
    };
    match message {
        Some(message) => {
            #[cfg(feature = "tracing")]
            tracing::trace!("external web service reported error: {}", message);
            vec![Violation::with_detail(ViolationKind::CustomError, message)]
        }
        None => {
            #[cfg(feature = "tracing")]
            tracing::trace!("external web service reported error without specifying an errorMessage");
            vec![Violation::new(ViolationKind::CustomError)]
        }
    }
}
