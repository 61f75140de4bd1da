//! Provider trait seams used by the scheduling orchestrator.
//!
//! Both traits are object-safe via [`BoxFuture`] so the orchestrator can
//! hold `&dyn` references and tests can substitute recording fakes.

use std::future::Future;
use std::pin::Pin;

use crossmeet_core::{CalendarEvent, MeetingRequest};

use crate::auth::Credential;
use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Async functions in traits do not yet mix well with dynamic dispatch;
/// boxed futures keep the traits object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A short-lived session with the video provider's XML API.
///
/// Derived from a credential and an identity; required by every structured
/// call after authentication. Valid for the request lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub identity: String,
    pub ticket: String,
}

/// The provider-side result of a successful meeting creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedMeeting {
    /// Provider meeting key, when the response carries one.
    pub meeting_key: Option<String>,
    /// The authoritative meeting password issued by the provider.
    pub password: String,
    /// Link to the calendar-interchange document describing the meeting.
    pub ical_url: String,
}

/// A contact group offered as a recipient choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRef {
    pub id: String,
    pub mail: Option<String>,
}

/// A calendar visible to the user, with edit permission and owner address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableCalendar {
    pub id: String,
    pub can_edit: bool,
    pub owner_address: Option<String>,
}

/// A resolved member of a contact group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub address: String,
    pub display_name: String,
}

/// The video-conferencing provider's meeting-management surface.
pub trait VideoMeetingApi: Send + Sync {
    /// Exchanges an access credential for a session ticket.
    fn open_session<'a>(
        &'a self,
        identity: &'a str,
        credential: &'a Credential,
    ) -> BoxFuture<'a, ProviderResult<SessionHandle>>;

    /// Lists the identities the session user may schedule meetings for.
    ///
    /// A response without permission entries yields an empty list, not an
    /// error.
    fn host_permissions<'a>(
        &'a self,
        session: &'a SessionHandle,
    ) -> BoxFuture<'a, ProviderResult<Vec<String>>>;

    /// Submits a meeting-creation request.
    fn create_meeting<'a>(
        &'a self,
        session: &'a SessionHandle,
        request: &'a MeetingRequest,
    ) -> BoxFuture<'a, ProviderResult<CreatedMeeting>>;

    /// Fetches the calendar-interchange document a created meeting links to.
    fn fetch_invite_document<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<String>>;

    /// Deletes a previously created meeting.
    ///
    /// The orchestrator never compensates a failed invite with a delete;
    /// this exists for operator tooling and for tests asserting exactly
    /// that.
    fn cancel_meeting<'a>(
        &'a self,
        session: &'a SessionHandle,
        meeting_key: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>>;
}

/// The calendar provider's groupware surface.
pub trait CalendarApi: Send + Sync {
    /// Lists the user's contact groups.
    fn list_groups<'a>(
        &'a self,
        credential: &'a Credential,
    ) -> BoxFuture<'a, ProviderResult<Vec<GroupRef>>>;

    /// Lists the user's calendars with owner and edit-permission fields.
    fn list_calendars<'a>(
        &'a self,
        credential: &'a Credential,
    ) -> BoxFuture<'a, ProviderResult<Vec<EditableCalendar>>>;

    /// Expands a contact group into its individual members.
    fn list_group_members<'a>(
        &'a self,
        credential: &'a Credential,
        group_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Vec<GroupMember>>>;

    /// Creates a calendar event on the given calendar.
    fn create_event<'a>(
        &'a self,
        credential: &'a Credential,
        calendar_id: &'a str,
        event: &'a CalendarEvent,
    ) -> BoxFuture<'a, ProviderResult<()>>;
}
