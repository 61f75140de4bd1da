//! Provider clients and abstractions for the two scheduling backends.
//!
//! This crate covers everything that talks to the outside world:
//!
//! - [`VideoMeetingApi`] / [`CalendarApi`] - The traits the scheduling flow
//!   is written against
//! - [`video::VideoClient`] - XML meeting service client (sessions, meeting
//!   creation and deletion, invite-document fetch)
//! - [`calendar::CalendarClient`] - REST groupware client (groups,
//!   calendars, event creation)
//! - [`AuthClient`] - OAuth authorization-code exchange for both providers
//! - [`ProviderError`] - Error types shared by all provider operations
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────────┐
//! │  XML Meeting API │    │  Groupware REST  │
//! └────────┬─────────┘    └────────┬─────────┘
//!          │                       │
//!          ▼                       ▼
//! ┌──────────────────┐    ┌──────────────────┐
//! │   VideoClient    │    │  CalendarClient  │
//! └────────┬─────────┘    └────────┬─────────┘
//!          │                       │
//!   VideoMeetingApi           CalendarApi
//!          │                       │
//!          └──────────┬────────────┘
//!                     ▼
//!              scheduling flow
//! ```

pub mod api;
pub mod auth;
pub mod calendar;
pub mod error;
pub mod invite_doc;
pub mod video;

// Re-export main types at crate root
pub use api::{
    BoxFuture, CalendarApi, CreatedMeeting, EditableCalendar, GroupMember, GroupRef,
    SessionHandle, VideoMeetingApi,
};
pub use auth::{AuthClient, Credential, Provider};
pub use calendar::{CalendarClient, CalendarConfig};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use invite_doc::{extract_join_url, meeting_description, PASSWORD_PLACEHOLDER};
pub use video::{VideoClient, VideoConfig};
