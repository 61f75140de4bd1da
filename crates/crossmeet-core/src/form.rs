//! The flat field set handed over by the web layer on form submission.

use serde::Deserialize;

/// Raw scheduling input as submitted by the user.
///
/// All fields are strings in the formats the form produces: `date` is
/// `YYYY-MM-DD`, the time fields are `HH:MM`. Optional fields are absent
/// when the matching checkbox was not ticked.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleForm {
    pub title: String,
    pub agenda: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    /// Repeat kind ("daily", "weekly", ...) when the repeat box was ticked.
    pub repeat: Option<String>,
    /// The identity chosen as meeting owner/host.
    pub owner: String,
    /// Group address whose members become required attendees.
    pub required_group: Option<String>,
    /// Group address whose members become optional (CC) attendees.
    pub cc_group: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_form_json() {
        let json = r#"{
            "title": "Weekly sync",
            "agenda": "Status round",
            "date": "2024-03-15",
            "start_time": "09:00",
            "end_time": "10:30",
            "repeat": "weekly",
            "owner": "alice@example.com",
            "required_group": "team@example.com",
            "cc_group": null
        }"#;

        let form: ScheduleForm = serde_json::from_str(json).unwrap();
        assert_eq!(form.title, "Weekly sync");
        assert_eq!(form.repeat.as_deref(), Some("weekly"));
        assert!(form.cc_group.is_none());
    }

    #[test]
    fn optional_fields_default_to_none() {
        let json = r#"{
            "title": "One-off",
            "agenda": "Agenda",
            "date": "2024-03-15",
            "start_time": "09:00",
            "end_time": "09:30",
            "repeat": null,
            "owner": "alice@example.com",
            "required_group": null,
            "cc_group": null
        }"#;

        let form: ScheduleForm = serde_json::from_str(json).unwrap();
        assert!(form.repeat.is_none());
        assert!(form.required_group.is_none());
    }
}
