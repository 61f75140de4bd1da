//! Meeting requests, validation, and the calendar-invite model.
//!
//! [`MeetingRequest::from_form`] is the single entry point that turns raw
//! form input into a validated request; everything downstream (the video
//! provider call, the calendar invite) works from its output.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::form::ScheduleForm;
use crate::password::generate_password;
use crate::recurrence::{map_recurrence, RecurrencePattern, RepeatKind};

/// Location label marking an invite as hosted on the video provider.
pub const MEETING_LOCATION_LABEL: &str = "@webex";

/// Fixed timezone label used for calendar invites.
pub const INVITE_TIMEZONE: &str = "W. Europe Standard Time";

/// A user-input error detected while building a meeting request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),

    #[error("meeting end must be after its start on the same date")]
    InvalidTimeRange,

    #[error("owner {0:?} is not an eligible meeting host")]
    OwnerNotPermitted(String),

    #[error("unsupported recurrence pattern {0:?}")]
    UnsupportedRecurrence(String),
}

impl ValidationError {
    /// Machine-readable reason string for the boundary contract.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvalidTime(_) => "invalid_time",
            Self::InvalidTimeRange => "invalid_time_range",
            Self::OwnerNotPermitted(_) => "owner_not_permitted",
            Self::UnsupportedRecurrence(_) => "unsupported_recurrence",
        }
    }
}

/// A validated meeting-creation request for the video provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRequest {
    pub title: String,
    pub agenda: String,
    /// The identity hosting the meeting. Must be an owner candidate.
    pub owner_identity: String,
    /// Timezone-naive local start of the first occurrence.
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
    pub recurrence: Option<RecurrencePattern>,
    /// Client-generated password. The provider's response password is
    /// authoritative and supersedes this one.
    pub password: String,
}

impl MeetingRequest {
    /// Validates form input and builds a meeting request.
    ///
    /// Cross-midnight meetings are out of scope: start and end are on the
    /// same date and end must be strictly after start.
    pub fn from_form(
        form: &ScheduleForm,
        owner_candidates: &[String],
    ) -> Result<Self, ValidationError> {
        if form.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if form.agenda.trim().is_empty() {
            return Err(ValidationError::MissingField("agenda"));
        }

        let date = NaiveDate::parse_from_str(&form.date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(form.date.clone()))?;
        let start_time = parse_time(&form.start_time)?;
        let end_time = parse_time(&form.end_time)?;

        if end_time <= start_time {
            return Err(ValidationError::InvalidTimeRange);
        }
        let duration_minutes = (end_time - start_time).num_minutes() as u32;

        if !owner_candidates.iter().any(|c| c == &form.owner) {
            return Err(ValidationError::OwnerNotPermitted(form.owner.clone()));
        }

        let recurrence = match form.repeat.as_deref() {
            None => None,
            Some(value) => {
                let kind = RepeatKind::parse(value)
                    .ok_or_else(|| ValidationError::UnsupportedRecurrence(value.to_string()))?;
                map_recurrence(kind, date)
            }
        };

        Ok(Self {
            title: form.title.clone(),
            agenda: form.agenda.clone(),
            owner_identity: form.owner.clone(),
            start: date.and_time(start_time),
            duration_minutes,
            recurrence,
            password: generate_password(),
        })
    }

    /// End of the first occurrence.
    pub fn end(&self) -> NaiveDateTime {
        self.start + chrono::Duration::minutes(i64::from(self.duration_minutes))
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}

/// Join information produced by a successful meeting creation.
///
/// Read-only once built; scoped to a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingArtifact {
    /// Join link extracted from the invite description, when present.
    pub join_url: Option<String>,
    /// The provider-issued (authoritative) meeting password.
    pub password: String,
    /// The invite description with the password disclosed in place of the
    /// provider's placeholder text.
    pub description: String,
}

/// Whether an attendee is required or merely CC'd.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendeeRole {
    Required,
    Optional,
}

/// A single invitee on the calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendee {
    pub address: String,
    pub display_name: String,
    pub role: AttendeeRole,
}

/// The calendar invite assembled from the request, the meeting artifact,
/// and the resolved invitee groups. Submitted exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub subject: String,
    pub body_html: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub timezone: String,
    pub location_label: String,
    pub attendees: Vec<Attendee>,
    pub recurrence: Option<RecurrencePattern>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn form() -> ScheduleForm {
        ScheduleForm {
            title: "Planning".to_string(),
            agenda: "Quarter planning".to_string(),
            date: "2024-03-15".to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:30".to_string(),
            repeat: None,
            owner: "alice@example.com".to_string(),
            required_group: None,
            cc_group: None,
        }
    }

    fn owners() -> Vec<String> {
        vec!["alice@example.com".to_string(), "bob@example.com".to_string()]
    }

    #[test]
    fn builds_request_and_computes_duration() {
        let request = MeetingRequest::from_form(&form(), &owners()).unwrap();

        assert_eq!(request.duration_minutes, 90);
        assert_eq!(request.start.to_string(), "2024-03-15 09:00:00");
        assert_eq!(request.end().to_string(), "2024-03-15 10:30:00");
        assert!(request.recurrence.is_none());
        assert_eq!(request.password.len(), 8);
    }

    #[test]
    fn rejects_end_before_start() {
        let mut f = form();
        f.end_time = "08:00".to_string();
        let err = MeetingRequest::from_form(&f, &owners()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidTimeRange);
        assert_eq!(err.reason(), "invalid_time_range");
    }

    #[test]
    fn rejects_end_equal_to_start() {
        let mut f = form();
        f.end_time = "09:00".to_string();
        assert_eq!(
            MeetingRequest::from_form(&f, &owners()),
            Err(ValidationError::InvalidTimeRange)
        );
    }

    #[test]
    fn rejects_empty_title_and_agenda() {
        let mut f = form();
        f.title = "  ".to_string();
        assert_eq!(
            MeetingRequest::from_form(&f, &owners()),
            Err(ValidationError::MissingField("title"))
        );

        let mut f = form();
        f.agenda = String::new();
        assert_eq!(
            MeetingRequest::from_form(&f, &owners()),
            Err(ValidationError::MissingField("agenda"))
        );
    }

    #[test]
    fn rejects_owner_outside_candidate_set() {
        let mut f = form();
        f.owner = "mallory@example.com".to_string();
        let err = MeetingRequest::from_form(&f, &owners()).unwrap_err();
        assert_eq!(err.reason(), "owner_not_permitted");
    }

    #[test]
    fn rejects_malformed_date_and_time() {
        let mut f = form();
        f.date = "15.03.2024".to_string();
        assert_eq!(
            MeetingRequest::from_form(&f, &owners()).unwrap_err().reason(),
            "invalid_date"
        );

        let mut f = form();
        f.start_time = "9am".to_string();
        assert_eq!(
            MeetingRequest::from_form(&f, &owners()).unwrap_err().reason(),
            "invalid_time"
        );
    }

    #[test]
    fn derives_weekly_recurrence_from_date() {
        let mut f = form();
        f.repeat = Some("weekly".to_string());
        let request = MeetingRequest::from_form(&f, &owners()).unwrap();

        assert_eq!(
            request.recurrence,
            Some(RecurrencePattern::Weekly {
                interval: 1,
                day_of_week: Weekday::Fri,
            })
        );
    }

    #[test]
    fn repeat_none_means_no_recurrence() {
        let mut f = form();
        f.repeat = Some("none".to_string());
        let request = MeetingRequest::from_form(&f, &owners()).unwrap();
        assert!(request.recurrence.is_none());
    }

    #[test]
    fn rejects_unknown_repeat_kind() {
        let mut f = form();
        f.repeat = Some("fortnightly".to_string());
        let err = MeetingRequest::from_form(&f, &owners()).unwrap_err();
        assert_eq!(err.reason(), "unsupported_recurrence");
    }
}
