//! Calendar provider configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Default base URL of the calendar provider's REST API.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com";

/// Configuration for the calendar/groupware provider.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// The directory tenant the application is registered in.
    pub tenant: String,
    /// OAuth application (client) ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Redirect URI registered for the application.
    pub redirect_uri: String,
    /// Delegated permission scopes requested during login.
    pub scope: String,
    /// Override for the login endpoint base; derived from the tenant when
    /// absent.
    #[serde(default)]
    pub login_base_url: Option<String>,
    /// Base URL of the REST API.
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,
    /// Timeout for outbound calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_graph_base_url() -> String {
    DEFAULT_GRAPH_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl CalendarConfig {
    /// Loads the configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("failed to read calendar config file: {}", e))?;
        Self::from_json(&content)
    }

    /// Parses the configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("failed to parse calendar config: {}", e))
    }

    /// Base URL of the tenant's OAuth endpoints.
    pub fn login_url(&self) -> String {
        match &self.login_base_url {
            Some(base) => base.clone(),
            None => format!(
                "https://login.microsoftonline.com/{}/oauth2/v2.0",
                self.tenant
            ),
        }
    }

    /// Validates that the required fields are present.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.tenant.is_empty() {
            return Err("tenant is required");
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
