//! Core types: forms, recurrence, meeting requests, validation

pub mod form;
pub mod meeting;
pub mod password;
pub mod recurrence;
pub mod tracing;

pub use form::ScheduleForm;
pub use meeting::{
    Attendee, AttendeeRole, CalendarEvent, MeetingArtifact, MeetingRequest, ValidationError,
    INVITE_TIMEZONE, MEETING_LOCATION_LABEL,
};
pub use password::generate_password;
pub use recurrence::{map_recurrence, weekday_name, RecurrencePattern, RepeatKind};
pub use tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
