//! Video provider configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Default base URL for the provider's login/OAuth endpoints.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://webexapis.com/v1";

/// Default endpoint of the provider's XML meeting service.
pub const DEFAULT_XML_API_URL: &str = "https://api.webex.com/WBXService/XMLService";

/// Configuration for the video-conferencing provider.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoConfig {
    /// The provider site the meetings are scheduled on.
    pub site_name: String,
    /// OAuth integration client ID.
    pub client_id: String,
    /// OAuth integration client secret.
    pub client_secret: String,
    /// Redirect URI registered for the integration.
    pub redirect_uri: String,
    /// OAuth scopes requested during login.
    pub scope: String,
    /// Base URL for login/OAuth endpoints.
    #[serde(default = "default_auth_base_url")]
    pub auth_base_url: String,
    /// Endpoint of the XML meeting service.
    #[serde(default = "default_xml_api_url")]
    pub xml_api_url: String,
    /// Timeout for outbound calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_auth_base_url() -> String {
    DEFAULT_AUTH_BASE_URL.to_string()
}

fn default_xml_api_url() -> String {
    DEFAULT_XML_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl VideoConfig {
    /// Loads the configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("failed to read video config file: {}", e))?;
        Self::from_json(&content)
    }

    /// Parses the configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("failed to parse video config: {}", e))
    }

    /// Validates that the required fields are present.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.site_name.is_empty() {
            return Err("site_name is required");
        }
        if self.client_id.is_empty() {
            return Err("client_id is required");
        }
        if self.client_secret.is_empty() {
            return Err("client_secret is required");
        }
        if self.redirect_uri.is_empty() {
            return Err("redirect_uri is required");
        }
        Ok(())
    }

    /// Timeout for outbound calls.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
