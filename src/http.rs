//! Blocking HTTP transport for the external rule service.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::error::RuleServiceError;
use crate::external::RuleTransport;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// [`RuleTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpRuleTransport {
    client: Client,
}

impl HttpRuleTransport {
    pub fn new() -> Result<Self, RuleServiceError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RuleServiceError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl RuleTransport for HttpRuleTransport {
    fn post_json(&self, url: &str, body: &str) -> Result<String, RuleServiceError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .map_err(|e| RuleServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RuleServiceError::Status(status.as_u16()));
        }

        response
            .text()
            .map_err(|e| RuleServiceError::Transport(e.to_string()))
    }
}
