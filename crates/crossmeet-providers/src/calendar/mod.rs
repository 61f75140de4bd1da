//! Calendar/groupware provider: groups, calendars, and event creation over
//! the provider's REST API.

pub mod client;
pub mod config;

pub use client::CalendarClient;
pub use config::CalendarConfig;
