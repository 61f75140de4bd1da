//! The end-to-end scheduling flow.
//!
//! One form submission drives a strictly sequential chain of provider
//! calls: build and validate the request, create the video meeting, fetch
//! and annotate its invite description, resolve recipient groups, then
//! submit the calendar invite. Each step's input depends on the previous
//! step's output, so there is no internal parallelism and no retry.
//!
//! The flow is best-effort across the two providers: once the video
//! meeting exists, a failed invite submission is reported as a partial
//! success and the meeting is never deleted to compensate.

use tracing::{debug, info, warn};

use crossmeet_core::{
    Attendee, AttendeeRole, CalendarEvent, MeetingArtifact, MeetingRequest, ScheduleForm,
    INVITE_TIMEZONE, MEETING_LOCATION_LABEL,
};
use crossmeet_providers::{
    extract_join_url, meeting_description, CalendarApi, Credential, ProviderResult,
    VideoMeetingApi,
};

use crate::context::SessionContext;

/// Terminal state of one scheduling request.
///
/// `PartialSuccess` means the video meeting exists but no calendar invite
/// was created for it; operators reconcile those manually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Succeeded { artifact: MeetingArtifact },
    PartialSuccess { reason: String },
    Failed { reason: String },
}

impl ScheduleOutcome {
    /// True only for the fully successful terminal state.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Machine-readable reason for the non-successful states.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Succeeded { .. } => None,
            Self::PartialSuccess { reason } | Self::Failed { reason } => Some(reason),
        }
    }
}

/// Runs one scheduling request to its terminal state.
///
/// Never returns an `Err`: every provider failure maps onto a terminal
/// outcome with a machine-readable reason.
pub async fn schedule(
    ctx: &SessionContext,
    video: &dyn VideoMeetingApi,
    calendar: &dyn CalendarApi,
    form: &ScheduleForm,
) -> ScheduleOutcome {
    let request = match MeetingRequest::from_form(form, &ctx.owner_candidates) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "form validation failed");
            return ScheduleOutcome::Failed {
                reason: e.reason().to_string(),
            };
        }
    };

    let created = match video.create_meeting(&ctx.session, &request).await {
        Ok(created) => created,
        Err(e) => {
            warn!(error = %e, "meeting creation failed");
            return ScheduleOutcome::Failed {
                reason: e.reason().to_string(),
            };
        }
    };
    info!(
        meeting_key = created.meeting_key.as_deref().unwrap_or("-"),
        owner = %request.owner_identity,
        "video meeting created"
    );

    // The response password supersedes the client-generated one from here on.
    let description = match fetch_description(video, &created.ical_url, &created.password).await {
        Ok(description) => description,
        Err(e) => {
            warn!(error = %e, "invite description fetch failed");
            return ScheduleOutcome::Failed {
                reason: e.reason().to_string(),
            };
        }
    };

    let attendees = match resolve_attendees(calendar, &ctx.calendar_credential, form).await {
        Ok(attendees) => attendees,
        Err(e) => {
            warn!(error = %e, "attendee resolution failed after meeting creation");
            return ScheduleOutcome::PartialSuccess {
                reason: e.reason().to_string(),
            };
        }
    };
    debug!(attendees = attendees.len(), "resolved invitee list");

    let Some(target) = ctx
        .calendars
        .iter()
        .find(|c| c.can_edit && c.owner_address.as_deref() == Some(request.owner_identity.as_str()))
    else {
        warn!(owner = %request.owner_identity, "no editable calendar for the chosen owner");
        return ScheduleOutcome::PartialSuccess {
            reason: "target_calendar_not_found".to_string(),
        };
    };

    let event = CalendarEvent {
        subject: request.title.clone(),
        body_html: format!("{}\n{}", request.agenda, description),
        start: request.start,
        end: request.end(),
        timezone: INVITE_TIMEZONE.to_string(),
        location_label: MEETING_LOCATION_LABEL.to_string(),
        attendees,
        recurrence: request.recurrence.clone(),
    };

    // Sole determinant of full success. A failure here leaves the video
    // meeting in place: no compensating delete.
    match calendar
        .create_event(&ctx.calendar_credential, &target.id, &event)
        .await
    {
        Ok(()) => {
            info!(calendar_id = %target.id, "calendar invite submitted");
            ScheduleOutcome::Succeeded {
                artifact: MeetingArtifact {
                    join_url: extract_join_url(&description),
                    password: created.password,
                    description,
                },
            }
        }
        Err(e) => {
            warn!(error = %e, "invite submission failed, meeting left in place");
            ScheduleOutcome::PartialSuccess {
                reason: "invite_submission_failed".to_string(),
            }
        }
    }
}

/// Fetches the invite document and extracts its password-annotated
/// description.
async fn fetch_description(
    video: &dyn VideoMeetingApi,
    ical_url: &str,
    password: &str,
) -> ProviderResult<String> {
    let document = video.fetch_invite_document(ical_url).await?;
    meeting_description(&document, password)
}

/// Expands the selected recipient groups into attendees.
///
/// A group with zero resolvable members contributes nothing; an unset
/// group field is skipped entirely.
async fn resolve_attendees(
    calendar: &dyn CalendarApi,
    credential: &Credential,
    form: &ScheduleForm,
) -> ProviderResult<Vec<Attendee>> {
    let mut attendees = Vec::new();

    for (group_id, role) in [
        (form.required_group.as_deref(), AttendeeRole::Required),
        (form.cc_group.as_deref(), AttendeeRole::Optional),
    ] {
        let Some(group_id) = group_id else { continue };
        let members = calendar.list_group_members(credential, group_id).await?;
        attendees.extend(members.into_iter().map(|m| Attendee {
            address: m.address,
            display_name: m.display_name,
            role,
        }));
    }

    Ok(attendees)
}
