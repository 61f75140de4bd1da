//! Per-session scheduling context.
//!
//! Established once after both providers have been authorized; holds the
//! video session ticket and the calendar inventory every scheduling
//! request reads from. One in-flight scheduling operation per session is
//! assumed, so nothing here is guarded against concurrent mutation.

use tracing::{debug, info};

use crossmeet_providers::{
    CalendarApi, Credential, EditableCalendar, GroupRef, ProviderResult, SessionHandle,
    VideoMeetingApi,
};

use crate::owner::resolve_owner_candidates;

/// Everything a scheduling request needs that outlives a single form
/// submission.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// The identity both providers were authorized as.
    pub identity: String,
    pub video_credential: Credential,
    pub calendar_credential: Credential,
    /// Session ticket for the video provider's XML API.
    pub session: SessionHandle,
    /// Contact groups offered as recipient choices.
    pub groups: Vec<GroupRef>,
    /// Calendars visible to the user.
    pub calendars: Vec<EditableCalendar>,
    /// Identities the user may schedule meetings for.
    pub owner_candidates: Vec<String>,
}

impl SessionContext {
    /// Opens a video session and loads groups, calendars, and owner
    /// candidates from both providers.
    pub async fn establish(
        video: &dyn VideoMeetingApi,
        calendar: &dyn CalendarApi,
        identity: &str,
        video_credential: Credential,
        calendar_credential: Credential,
    ) -> ProviderResult<Self> {
        let session = video.open_session(identity, &video_credential).await?;
        let host_permissions = video.host_permissions(&session).await?;
        debug!(
            identity,
            permissions = host_permissions.len(),
            "loaded host permissions"
        );

        let groups = calendar.list_groups(&calendar_credential).await?;
        let calendars = calendar.list_calendars(&calendar_credential).await?;

        let owner_candidates = resolve_owner_candidates(identity, &calendars, &host_permissions);
        info!(
            identity,
            groups = groups.len(),
            calendars = calendars.len(),
            owner_candidates = owner_candidates.len(),
            "session context established"
        );

        Ok(Self {
            identity: identity.to_string(),
            video_credential,
            calendar_credential,
            session,
            groups,
            calendars,
            owner_candidates,
        })
    }
}
