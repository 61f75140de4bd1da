//! Meeting-owner eligibility.
//!
//! An identity may host a meeting when the caller can edit its calendar
//! and the video provider grants schedule-for permission for it. The
//! caller's own identity is always eligible.

use crossmeet_providers::EditableCalendar;

/// Computes the ordered set of identities the caller may schedule for.
///
/// Starts with the caller's identity, then adds each editable calendar's
/// owner that also appears in the host-permission list, preserving
/// first-seen order without duplicates.
pub fn resolve_owner_candidates(
    identity: &str,
    calendars: &[EditableCalendar],
    host_permissions: &[String],
) -> Vec<String> {
    let mut candidates = vec![identity.to_string()];

    for calendar in calendars.iter().filter(|c| c.can_edit) {
        let Some(owner) = calendar.owner_address.as_deref() else {
            continue;
        };
        if host_permissions.iter().any(|p| p == owner)
            && !candidates.iter().any(|c| c == owner)
        {
            candidates.push(owner.to_string());
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar(id: &str, owner: Option<&str>, can_edit: bool) -> EditableCalendar {
        EditableCalendar {
            id: id.to_string(),
            can_edit,
            owner_address: owner.map(str::to_string),
        }
    }

    #[test]
    fn intersection_of_editable_owners_and_host_permissions() {
        let calendars = vec![
            calendar("c1", Some("alice@example.com"), true),
            calendar("c2", Some("bob@example.com"), true),
        ];
        let hosts = vec!["bob@example.com".to_string(), "carol@example.com".to_string()];

        let candidates = resolve_owner_candidates("alice@example.com", &calendars, &hosts);
        assert_eq!(candidates, vec!["alice@example.com", "bob@example.com"]);
    }

    #[test]
    fn caller_is_always_eligible_even_without_permissions() {
        let candidates = resolve_owner_candidates("alice@example.com", &[], &[]);
        assert_eq!(candidates, vec!["alice@example.com"]);
    }

    #[test]
    fn non_editable_calendars_are_ignored() {
        let calendars = vec![calendar("c1", Some("bob@example.com"), false)];
        let hosts = vec!["bob@example.com".to_string()];

        let candidates = resolve_owner_candidates("alice@example.com", &calendars, &hosts);
        assert_eq!(candidates, vec!["alice@example.com"]);
    }

    #[test]
    fn duplicates_and_ownerless_calendars_are_skipped() {
        let calendars = vec![
            calendar("c1", Some("bob@example.com"), true),
            calendar("c2", Some("bob@example.com"), true),
            calendar("c3", None, true),
            calendar("c4", Some("alice@example.com"), true),
        ];
        let hosts = vec!["alice@example.com".to_string(), "bob@example.com".to_string()];

        let candidates = resolve_owner_candidates("alice@example.com", &calendars, &hosts);
        assert_eq!(candidates, vec!["alice@example.com", "bob@example.com"]);
    }
}
