//! HTTP client for the video provider's XML meeting service.

use reqwest::StatusCode;
use tracing::{debug, trace, warn};

use crossmeet_core::MeetingRequest;

use crate::api::{BoxFuture, CreatedMeeting, SessionHandle, VideoMeetingApi};
use crate::auth::Credential;
use crate::error::{ProviderError, ProviderResult};

use super::config::VideoConfig;
use super::xml::{
    failure_reason, first_text, request_body, response_succeeded, texts_within, Operation,
    SecurityContext,
};

/// Client for the video provider's meeting-management API.
pub struct VideoClient {
    client: reqwest::Client,
    config: VideoConfig,
}

impl VideoClient {
    /// Creates a new video client with the given configuration.
    pub fn new(config: VideoConfig) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_provider("video")
            })?;

        Ok(Self { client, config })
    }

    /// Exchanges an access credential for a session ticket.
    pub async fn authenticate(
        &self,
        identity: &str,
        credential: &Credential,
    ) -> ProviderResult<SessionHandle> {
        let ctx = SecurityContext {
            identity: identity.to_string(),
            site_name: self.config.site_name.clone(),
            session_ticket: None,
        };
        let body = request_body(
            &ctx,
            &Operation::AuthenticateUser {
                access_token: &credential.token,
            },
        );

        let response = self.post_xml(body).await?;
        if !response_succeeded(&response) {
            let reason = failure_reason(&response).unwrap_or_else(|| "unknown".to_string());
            return Err(
                ProviderError::authentication(format!("session authentication failed: {}", reason))
                    .with_provider("video"),
            );
        }

        let ticket = first_text(&response, "sessionTicket").ok_or_else(|| {
            ProviderError::malformed_response("authentication response lacks a session ticket")
                .with_provider("video")
        })?;

        debug!(identity, "opened video provider session");
        Ok(SessionHandle {
            identity: identity.to_string(),
            ticket,
        })
    }

    /// Lists the identities the session user may schedule meetings for.
    pub async fn schedule_for_permissions(
        &self,
        session: &SessionHandle,
    ) -> ProviderResult<Vec<String>> {
        let body = request_body(
            &self.security_context(session),
            &Operation::GetUser {
                identity: &session.identity,
            },
        );

        let response = self.post_xml(body).await?;

        // The provider signals "no schedule-for entries" as a failure or a
        // missing field; both decode to an empty permission list.
        if !response_succeeded(&response) {
            debug!("get-user reported no schedule-for permissions");
            return Ok(Vec::new());
        }
        Ok(texts_within(&response, "scheduleFor", "webExID"))
    }

    /// Submits the meeting-creation request.
    pub async fn submit_meeting(
        &self,
        session: &SessionHandle,
        request: &MeetingRequest,
    ) -> ProviderResult<CreatedMeeting> {
        let body = request_body(
            &self.security_context(session),
            &Operation::CreateMeeting { request },
        );

        let response = self.post_xml(body).await?;
        parse_created_meeting(&response)
    }

    /// Fetches the calendar-interchange document a created meeting links to.
    pub async fn fetch_document(&self, url: &str) -> ProviderResult<String> {
        let response = self.client.get(url).send().await.map_err(|e| {
            ProviderError::description_fetch(format!("document request failed: {}", e))
                .with_provider("video")
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::description_fetch(format!(
                "document fetch returned {}",
                status
            ))
            .with_provider("video"));
        }

        response.text().await.map_err(|e| {
            ProviderError::description_fetch(format!("failed to read document: {}", e))
                .with_provider("video")
        })
    }

    /// Deletes a previously created meeting.
    pub async fn delete_meeting(
        &self,
        session: &SessionHandle,
        meeting_key: &str,
    ) -> ProviderResult<()> {
        let body = request_body(
            &self.security_context(session),
            &Operation::DelMeeting { meeting_key },
        );

        let response = self.post_xml(body).await?;
        if !response_succeeded(&response) {
            let reason = failure_reason(&response).unwrap_or_else(|| "unknown".to_string());
            return Err(
                ProviderError::server(format!("meeting deletion rejected: {}", reason))
                    .with_provider("video"),
            );
        }
        Ok(())
    }

    fn security_context(&self, session: &SessionHandle) -> SecurityContext {
        SecurityContext {
            identity: session.identity.clone(),
            site_name: self.config.site_name.clone(),
            session_ticket: Some(session.ticket.clone()),
        }
    }

    /// Posts an envelope to the XML service and returns the response body.
    async fn post_xml(&self, body: String) -> ProviderResult<String> {
        trace!(url = %self.config.xml_api_url, "posting XML request");

        let response = self
            .client
            .post(&self.config.xml_api_url)
            .header("Content-Type", "application/xml; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network("request timeout").with_provider("video")
                } else {
                    ProviderError::network(format!("request failed: {}", e)).with_provider("video")
                }
            })?;

        let status = response.status();
        match status {
            StatusCode::OK => response.text().await.map_err(|e| {
                ProviderError::network(format!("failed to read response: {}", e))
                    .with_provider("video")
            }),
            StatusCode::UNAUTHORIZED => Err(ProviderError::authentication(
                "XML service rejected the credentials",
            )
            .with_provider("video")),
            s if s.is_server_error() => {
                let body = response.text().await.unwrap_or_default();
                Err(ProviderError::server(format!("server error ({}): {}", s, body))
                    .with_provider("video"))
            }
            s => {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %s, "unexpected XML service status");
                Err(
                    ProviderError::invalid_response(format!("unexpected status {}: {}", s, body))
                        .with_provider("video"),
                )
            }
        }
    }
}

/// Decodes a create-meeting response into a [`CreatedMeeting`].
///
/// The response password is authoritative and supersedes the one sent in
/// the request.
fn parse_created_meeting(response: &str) -> ProviderResult<CreatedMeeting> {
    if !response_succeeded(response) {
        let reason = failure_reason(response).unwrap_or_else(|| "unknown".to_string());
        return Err(ProviderError::meeting_rejected(reason).with_provider("video"));
    }

    let password = first_text(response, "meetingPassword").ok_or_else(|| {
        ProviderError::malformed_response("create-meeting response lacks a password")
            .with_provider("video")
    })?;

    let ical_url = texts_within(response, "iCalendarURL", "host")
        .into_iter()
        .next()
        .ok_or_else(|| {
            ProviderError::malformed_response("create-meeting response lacks an iCalendar link")
                .with_provider("video")
        })?;

    Ok(CreatedMeeting {
        meeting_key: first_text(response, "meetingkey"),
        password,
        ical_url,
    })
}

impl VideoMeetingApi for VideoClient {
    fn open_session<'a>(
        &'a self,
        identity: &'a str,
        credential: &'a Credential,
    ) -> BoxFuture<'a, ProviderResult<SessionHandle>> {
        Box::pin(self.authenticate(identity, credential))
    }

    fn host_permissions<'a>(
        &'a self,
        session: &'a SessionHandle,
    ) -> BoxFuture<'a, ProviderResult<Vec<String>>> {
        Box::pin(self.schedule_for_permissions(session))
    }

    fn create_meeting<'a>(
        &'a self,
        session: &'a SessionHandle,
        request: &'a MeetingRequest,
    ) -> BoxFuture<'a, ProviderResult<CreatedMeeting>> {
        Box::pin(self.submit_meeting(session, request))
    }

    fn fetch_invite_document<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<String>> {
        Box::pin(self.fetch_document(url))
    }

    fn cancel_meeting<'a>(
        &'a self,
        session: &'a SessionHandle,
        meeting_key: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(self.delete_meeting(session, meeting_key))
    }
}
