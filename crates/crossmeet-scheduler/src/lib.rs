//! Cross-provider scheduling orchestration.
//!
//! Binds a video-conferencing meeting and a calendar invite into one
//! user-facing scheduling action:
//!
//! - [`SessionContext`] - Per-session state: session ticket, groups,
//!   calendars, and the owner-candidate set
//! - [`resolve_owner_candidates`] - Who the user may schedule for
//! - [`schedule`] - Drives one form submission to a [`ScheduleOutcome`]
//!
//! The flow is written against the provider traits from
//! `crossmeet_providers`, so it never touches HTTP directly and tests run
//! against in-memory fakes.

pub mod context;
pub mod flow;
pub mod owner;

pub use context::SessionContext;
pub use flow::{schedule, ScheduleOutcome};
pub use owner::resolve_owner_candidates;
