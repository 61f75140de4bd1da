//! Error types for provider operations.
//!
//! Every failure mode is terminal for the current scheduling flow; nothing
//! is retried. The error codes double as the machine-readable reason
//! strings surfaced at the boundary.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Authorization-code exchange was rejected (bad, expired, or reused code).
    InvalidGrant,
    /// The provider response lacked a field the flow depends on.
    MalformedResponse,
    /// The video provider rejected the meeting-creation request.
    MeetingCreationRejected,
    /// The meeting's calendar-interchange document could not be fetched or read.
    DescriptionFetchFailed,
    /// The calendar provider did not create the invite.
    InviteSubmissionFailed,
    /// Credentials are invalid or expired.
    AuthenticationFailed,
    /// The user lacks permission for the resource.
    AuthorizationFailed,
    /// Connection failure, timeout, DNS, and similar transport errors.
    NetworkError,
    /// The provider returned a 5xx status.
    ServerError,
    /// The response could not be parsed at all.
    InvalidResponse,
    /// Resource not found (404).
    NotFound,
    /// Missing or invalid configuration.
    ConfigurationError,
    /// Unexpected internal state.
    InternalError,
}

impl ProviderErrorCode {
    /// Returns the machine-readable reason string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidGrant => "invalid_grant",
            Self::MalformedResponse => "malformed_response",
            Self::MeetingCreationRejected => "meeting_creation_rejected",
            Self::DescriptionFetchFailed => "description_fetch_failed",
            Self::InviteSubmissionFailed => "invite_submission_failed",
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while talking to a provider.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// The provider that generated this error ("video", "calendar").
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    pub fn invalid_grant(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidGrant, message)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::MalformedResponse, message)
    }

    pub fn meeting_rejected(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::MeetingCreationRejected, message)
    }

    pub fn description_fetch(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::DescriptionFetchFailed, message)
    }

    pub fn invite_submission(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InviteSubmissionFailed, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthorizationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Sets the provider name for this error.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the machine-readable reason string.
    pub fn reason(&self) -> &'static str {
        self.code.as_str()
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the provider name, if set.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
