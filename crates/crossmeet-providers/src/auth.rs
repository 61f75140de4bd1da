//! Authorization-code exchange for both providers.
//!
//! The OAuth redirect handshake itself happens in the web layer; this
//! module only turns the single-use authorization code from the callback
//! into a bearer credential, and builds the authorization URLs the web
//! layer redirects the user to.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::calendar::config::CalendarConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::video::config::VideoConfig;

/// Which provider a credential belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Video,
    Calendar,
}

impl Provider {
    /// Name used in error tags and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Calendar => "calendar",
        }
    }
}

/// A bearer credential for one provider.
///
/// Owned by the session for the duration of one user session; overwritten
/// on re-authentication, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub provider: Provider,
    pub token: String,
    pub obtained_at: DateTime<Utc>,
}

impl Credential {
    /// Creates a credential obtained now.
    pub fn new(provider: Provider, token: impl Into<String>) -> Self {
        Self {
            provider,
            token: token.into(),
            obtained_at: Utc::now(),
        }
    }
}

/// Response from a provider token endpoint.
#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OAuth client for both providers' token endpoints.
#[derive(Debug)]
pub struct AuthClient {
    http_client: reqwest::Client,
    video: VideoConfig,
    calendar: CalendarConfig,
}

impl AuthClient {
    /// Creates an auth client from both provider configurations.
    pub fn new(video: VideoConfig, calendar: CalendarConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(video.timeout())
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            video,
            calendar,
        })
    }

    /// Builds the authorization URL the web layer redirects the user to.
    pub fn authorization_url(&self, provider: Provider) -> String {
        let (base, client_id, redirect_uri, scope) = match provider {
            Provider::Video => (
                self.video.auth_base_url.clone(),
                &self.video.client_id,
                &self.video.redirect_uri,
                &self.video.scope,
            ),
            Provider::Calendar => (
                self.calendar.login_url(),
                &self.calendar.client_id,
                &self.calendar.redirect_uri,
                &self.calendar.scope,
            ),
        };

        format!(
            "{}/authorize?client_id={}&response_type=code&redirect_uri={}&response_mode=query&scope={}",
            base,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(scope),
        )
    }

    /// Exchanges an authorization code for a bearer credential.
    ///
    /// The code is single-use; a reused or expired code fails with
    /// `invalid_grant`. A failed exchange is fatal to the current flow and
    /// is never retried.
    pub async fn exchange_code(&self, provider: Provider, code: &str) -> ProviderResult<Credential> {
        let (token_url, params) = match provider {
            Provider::Video => (
                format!("{}/access_token", self.video.auth_base_url),
                vec![
                    ("client_id", self.video.client_id.as_str()),
                    ("client_secret", self.video.client_secret.as_str()),
                    ("code", code),
                    ("redirect_uri", self.video.redirect_uri.as_str()),
                    ("grant_type", "authorization_code"),
                ],
            ),
            Provider::Calendar => (
                format!("{}/token", self.calendar.login_url()),
                vec![
                    ("client_id", self.calendar.client_id.as_str()),
                    ("client_secret", self.calendar.client_secret.as_str()),
                    ("scope", self.calendar.scope.as_str()),
                    ("code", code),
                    ("redirect_uri", self.calendar.redirect_uri.as_str()),
                    ("grant_type", "authorization_code"),
                ],
            ),
        };

        let response = self
            .http_client
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                ProviderError::network(format!("token exchange request failed: {}", e))
                    .with_provider(provider.as_str())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read token response: {}", e))
                .with_provider(provider.as_str())
        })?;

        if !status.is_success() {
            return Err(ProviderError::invalid_grant(format!(
                "token exchange failed ({}): {}",
                status, body
            ))
            .with_provider(provider.as_str()));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::malformed_response(format!("invalid token response: {}", e))
                .with_provider(provider.as_str())
        })?;

        info!(provider = provider.as_str(), "obtained access token");
        Ok(Credential::new(provider, token.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_config() -> VideoConfig {
        VideoConfig::from_json(
            r#"{
                "site_name": "example",
                "client_id": "video-client",
                "client_secret": "video-secret",
                "redirect_uri": "https://app.example.com/videooauth",
                "scope": "spark:all"
            }"#,
        )
        .unwrap()
    }

    fn calendar_config() -> CalendarConfig {
        CalendarConfig::from_json(
            r#"{
                "tenant": "contoso.example",
                "client_id": "cal-client",
                "client_secret": "cal-secret",
                "redirect_uri": "https://app.example.com/caloauth",
                "scope": "Calendars.ReadWrite"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn video_authorization_url() {
        let auth = AuthClient::new(video_config(), calendar_config()).unwrap();
        let url = auth.authorization_url(Provider::Video);

        assert!(url.starts_with("https://webexapis.com/v1/authorize?"));
        assert!(url.contains("client_id=video-client"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("response_mode=query"));
        assert!(url.contains("scope=spark%3Aall"));
    }

    #[test]
    fn calendar_authorization_url_uses_tenant() {
        let auth = AuthClient::new(video_config(), calendar_config()).unwrap();
        let url = auth.authorization_url(Provider::Calendar);

        assert!(url.starts_with(
            "https://login.microsoftonline.com/contoso.example/oauth2/v2.0/authorize?"
        ));
        assert!(url.contains("client_id=cal-client"));
    }

    #[test]
    fn token_response_parsing() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "expires_in": 3600}"#).unwrap();
        assert_eq!(token.access_token, "abc");
    }

    #[test]
    fn credential_records_provider() {
        let credential = Credential::new(Provider::Video, "tok");
        assert_eq!(credential.provider, Provider::Video);
        assert_eq!(credential.token, "tok");
    }
}
