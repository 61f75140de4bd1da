//! iCalendar (RFC 5545) invite-document handling.
//!
//! The video provider links every created meeting to an ICS document whose
//! first VEVENT carries the canonical meeting description. The description
//! ships with a password placeholder that must be replaced with the
//! provider-issued password before the text is forwarded to attendees.

use std::sync::LazyLock;

use icalendar::{Calendar, CalendarComponent, Component, Event};
use regex::Regex;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// Placeholder text the provider embeds where the meeting password belongs.
pub const PASSWORD_PLACEHOLDER: &str = "Please obtain your meeting password from your host.";

/// Extracts the meeting description from an ICS document and substitutes
/// the authoritative password for the placeholder.
///
/// The rich-text description (`X-ALT-DESC`) is preferred over the plain
/// `DESCRIPTION` property when both are present.
pub fn meeting_description(ics: &str, password: &str) -> ProviderResult<String> {
    let calendar: Calendar = ics.parse().map_err(|e: String| {
        ProviderError::description_fetch(format!("failed to parse invite document: {}", e))
            .with_provider("video")
    })?;

    let event = first_event(&calendar).ok_or_else(|| {
        ProviderError::description_fetch("invite document contains no event")
            .with_provider("video")
    })?;

    let description = event
        .property_value("X-ALT-DESC")
        .or_else(|| event.get_description())
        .ok_or_else(|| {
            ProviderError::description_fetch("invite event carries no description")
                .with_provider("video")
        })?;

    debug!(
        placeholder_present = description.contains(PASSWORD_PLACEHOLDER),
        "extracted meeting description"
    );
    Ok(description.replace(
        PASSWORD_PLACEHOLDER,
        &format!("Meeting password: {}", password),
    ))
}

/// Regex for extracting the join link from a description.
static JOIN_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https://[^\s<>"']+"#).expect("Invalid join URL regex"));

/// Finds the first https link in a description, which is the join link in
/// provider-issued invites.
pub fn extract_join_url(description: &str) -> Option<String> {
    JOIN_URL_REGEX
        .find(description)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ')', ';']).to_string())
}

fn first_event(calendar: &Calendar) -> Option<&Event> {
    calendar.iter().find_map(|component| match component {
        CalendarComponent::Event(event) => Some(event),
        _ => None,
    })
}
