//! REST client for the calendar provider.
//!
//! Consumes four endpoints: list groups, list calendars, list group
//! members, create calendar event. Requests and responses are JSON with
//! camelCase field names.

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crossmeet_core::{AttendeeRole, CalendarEvent, RecurrencePattern};

use crate::api::{BoxFuture, CalendarApi, EditableCalendar, GroupMember, GroupRef};
use crate::auth::Credential;
use crate::error::{ProviderError, ProviderResult};

use super::config::CalendarConfig;

/// Client for the calendar provider's REST API.
pub struct CalendarClient {
    client: reqwest::Client,
    config: CalendarConfig,
}

impl CalendarClient {
    /// Creates a new calendar client with the given configuration.
    pub fn new(config: CalendarConfig) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_provider("calendar")
            })?;

        Ok(Self { client, config })
    }

    /// Lists the user's contact groups.
    pub async fn groups(&self, credential: &Credential) -> ProviderResult<Vec<GroupRef>> {
        let url = format!("{}/v1.0/groups", self.config.graph_base_url);
        let body = self.get_json(&url, credential).await?;

        let response: GroupListResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse group list: {}", e))
                .with_provider("calendar")
        })?;

        Ok(response
            .value
            .into_iter()
            .map(|g| GroupRef {
                id: g.id,
                mail: g.mail,
            })
            .collect())
    }

    /// Lists the user's calendars with owner and edit-permission fields.
    pub async fn calendars(&self, credential: &Credential) -> ProviderResult<Vec<EditableCalendar>> {
        let url = format!("{}/v1.0/me/calendars", self.config.graph_base_url);
        let body = self.get_json(&url, credential).await?;

        let response: CalendarListResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse calendar list: {}", e))
                .with_provider("calendar")
        })?;

        Ok(response
            .value
            .into_iter()
            .map(|c| EditableCalendar {
                id: c.id,
                can_edit: c.can_edit,
                owner_address: c.owner.and_then(|o| o.address),
            })
            .collect())
    }

    /// Expands a contact group into its individual members.
    ///
    /// Members without a mail address are skipped; a group with zero
    /// resolvable members yields an empty list.
    pub async fn group_members(
        &self,
        credential: &Credential,
        group_id: &str,
    ) -> ProviderResult<Vec<GroupMember>> {
        let url = format!(
            "{}/v1.0/groups/{}/members",
            self.config.graph_base_url,
            urlencoding::encode(group_id)
        );
        let body = self.get_json(&url, credential).await?;

        let response: MemberListResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse member list: {}", e))
                .with_provider("calendar")
        })?;

        Ok(response
            .value
            .into_iter()
            .filter_map(|m| {
                let address = m.mail?;
                let display_name = m.display_name.unwrap_or_else(|| address.clone());
                Some(GroupMember {
                    address,
                    display_name,
                })
            })
            .collect())
    }

    /// Creates a calendar event; anything but a created status is a
    /// submission failure.
    pub async fn submit_event(
        &self,
        credential: &Credential,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> ProviderResult<()> {
        let url = format!(
            "{}/v1.0/me/calendars/{}/events",
            self.config.graph_base_url,
            urlencoding::encode(calendar_id)
        );
        let payload = serde_json::to_string(&EventPayload::from_event(event)).map_err(|e| {
            ProviderError::internal(format!("failed to serialize event payload: {}", e))
                .with_provider("calendar")
        })?;

        let response = self
            .client
            .post(&url)
            .bearer_auth(&credential.token)
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                ProviderError::network(format!("event creation request failed: {}", e))
                    .with_provider("calendar")
            })?;

        let status = response.status();
        if status == StatusCode::CREATED {
            debug!(calendar_id, "calendar event created");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::invite_submission(format!(
            "event creation returned {}: {}",
            status, body
        ))
        .with_provider("calendar"))
    }

    /// Performs an authenticated GET and returns the response body.
    async fn get_json(&self, url: &str, credential: &Credential) -> ProviderResult<String> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&credential.token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network("request timeout").with_provider("calendar")
                } else {
                    ProviderError::network(format!("request failed: {}", e))
                        .with_provider("calendar")
                }
            })?;

        let status = response.status();
        match status {
            s if s.is_success() => response.text().await.map_err(|e| {
                ProviderError::network(format!("failed to read response: {}", e))
                    .with_provider("calendar")
            }),
            StatusCode::UNAUTHORIZED => Err(ProviderError::authentication(
                "access token expired or invalid",
            )
            .with_provider("calendar")),
            StatusCode::FORBIDDEN => {
                Err(ProviderError::authorization("access denied").with_provider("calendar"))
            }
            StatusCode::NOT_FOUND => {
                Err(ProviderError::not_found("resource not found").with_provider("calendar"))
            }
            s if s.is_server_error() => {
                let body = response.text().await.unwrap_or_default();
                Err(ProviderError::server(format!("API error ({}): {}", s, body))
                    .with_provider("calendar"))
            }
            s => {
                let body = response.text().await.unwrap_or_default();
                Err(
                    ProviderError::invalid_response(format!("unexpected status {}: {}", s, body))
                        .with_provider("calendar"),
                )
            }
        }
    }
}

impl CalendarApi for CalendarClient {
    fn list_groups<'a>(
        &'a self,
        credential: &'a Credential,
    ) -> BoxFuture<'a, ProviderResult<Vec<GroupRef>>> {
        Box::pin(self.groups(credential))
    }

    fn list_calendars<'a>(
        &'a self,
        credential: &'a Credential,
    ) -> BoxFuture<'a, ProviderResult<Vec<EditableCalendar>>> {
        Box::pin(self.calendars(credential))
    }

    fn list_group_members<'a>(
        &'a self,
        credential: &'a Credential,
        group_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Vec<GroupMember>>> {
        Box::pin(self.group_members(credential, group_id))
    }

    fn create_event<'a>(
        &'a self,
        credential: &'a Credential,
        calendar_id: &'a str,
        event: &'a CalendarEvent,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(self.submit_event(credential, calendar_id, event))
    }
}

/// Calendar event creation payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventPayload<'a> {
    subject: &'a str,
    body: BodyPayload<'a>,
    start: WireDateTime<'a>,
    end: WireDateTime<'a>,
    location: LocationPayload<'a>,
    attendees: Vec<AttendeePayload<'a>>,
    allow_new_time_proposals: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    recurrence: Option<RecurrencePayload>,
}

impl<'a> EventPayload<'a> {
    fn from_event(event: &'a CalendarEvent) -> Self {
        Self {
            subject: &event.subject,
            body: BodyPayload {
                content_type: "HTML",
                content: &event.body_html,
            },
            start: WireDateTime::new(event.start, &event.timezone),
            end: WireDateTime::new(event.end, &event.timezone),
            location: LocationPayload {
                display_name: &event.location_label,
            },
            attendees: event
                .attendees
                .iter()
                .map(|a| AttendeePayload {
                    email_address: EmailAddressPayload {
                        address: &a.address,
                        name: &a.display_name,
                    },
                    kind: match a.role {
                        AttendeeRole::Required => "required",
                        AttendeeRole::Optional => "optional",
                    },
                })
                .collect(),
            allow_new_time_proposals: true,
            recurrence: event
                .recurrence
                .as_ref()
                .map(|p| recurrence_payload(p, event.start.date())),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BodyPayload<'a> {
    content_type: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireDateTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

impl<'a> WireDateTime<'a> {
    fn new(value: NaiveDateTime, time_zone: &'a str) -> Self {
        Self {
            date_time: value.format("%Y-%m-%dT%H:%M:%S").to_string(),
            time_zone,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationPayload<'a> {
    display_name: &'a str,
}

#[derive(Debug, Serialize)]
struct AttendeePayload<'a> {
    #[serde(rename = "emailAddress")]
    email_address: EmailAddressPayload<'a>,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct EmailAddressPayload<'a> {
    address: &'a str,
    name: &'a str,
}

/// Recurrence block: a pattern plus an open-ended range.
#[derive(Debug, Serialize)]
struct RecurrencePayload {
    pattern: PatternPayload,
    range: RangePayload,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PatternPayload {
    #[serde(rename = "type")]
    kind: &'static str,
    interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    day_of_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    month: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RangePayload {
    #[serde(rename = "type")]
    kind: &'static str,
    start_date: String,
}

/// Re-expresses a recurrence pattern in the calendar provider's vocabulary.
///
/// Daily and weekly collapse to the same underlying `daily` type with
/// differing intervals; the derived weekday is dropped in that direction.
fn recurrence_payload(pattern: &RecurrencePattern, start_date: NaiveDate) -> RecurrencePayload {
    let pattern = match pattern {
        RecurrencePattern::Daily { interval } => PatternPayload {
            kind: "daily",
            interval: *interval,
            day_of_month: None,
            month: None,
        },
        RecurrencePattern::Weekly { .. } => PatternPayload {
            kind: "daily",
            interval: 7,
            day_of_month: None,
            month: None,
        },
        RecurrencePattern::Monthly {
            interval,
            day_of_month,
        } => PatternPayload {
            kind: "absoluteMonthly",
            interval: *interval,
            day_of_month: Some(*day_of_month),
            month: None,
        },
        RecurrencePattern::Yearly {
            month,
            day_of_month,
        } => PatternPayload {
            kind: "absoluteYearly",
            interval: 1,
            day_of_month: Some(*day_of_month),
            month: Some(*month),
        },
    };

    RecurrencePayload {
        pattern,
        range: RangePayload {
            kind: "noEnd",
            start_date: start_date.format("%Y-%m-%d").to_string(),
        },
    }
}

/// Response from the groups endpoint.
#[derive(Debug, Deserialize)]
struct GroupListResponse {
    #[serde(default)]
    value: Vec<ApiGroup>,
}

#[derive(Debug, Deserialize)]
struct ApiGroup {
    id: String,
    mail: Option<String>,
}

/// Response from the calendars endpoint.
#[derive(Debug, Deserialize)]
struct CalendarListResponse {
    #[serde(default)]
    value: Vec<ApiCalendar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCalendar {
    id: String,
    #[serde(default)]
    can_edit: bool,
    owner: Option<ApiOwner>,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    address: Option<String>,
}

/// Response from the group-members endpoint.
#[derive(Debug, Deserialize)]
struct MemberListResponse {
    #[serde(default)]
    value: Vec<ApiMember>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMember {
    mail: Option<String>,
    display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crossmeet_core::{Attendee, INVITE_TIMEZONE, MEETING_LOCATION_LABEL};

    fn event(recurrence: Option<RecurrencePattern>) -> CalendarEvent {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        CalendarEvent {
            subject: "Planning".to_string(),
            body_html: "Quarter planning\nJoin link inside".to_string(),
            start: date.and_hms_opt(9, 0, 0).unwrap(),
            end: date.and_hms_opt(10, 30, 0).unwrap(),
            timezone: INVITE_TIMEZONE.to_string(),
            location_label: MEETING_LOCATION_LABEL.to_string(),
            attendees: vec![
                Attendee {
                    address: "bob@example.com".to_string(),
                    display_name: "Bob".to_string(),
                    role: AttendeeRole::Required,
                },
                Attendee {
                    address: "carol@example.com".to_string(),
                    display_name: "Carol".to_string(),
                    role: AttendeeRole::Optional,
                },
            ],
            recurrence,
        }
    }

    #[test]
    fn event_payload_shape() {
        let event = event(None);
        let value = serde_json::to_value(EventPayload::from_event(&event)).unwrap();

        assert_eq!(value["subject"], "Planning");
        assert_eq!(value["body"]["contentType"], "HTML");
        assert_eq!(value["start"]["dateTime"], "2024-03-15T09:00:00");
        assert_eq!(value["start"]["timeZone"], "W. Europe Standard Time");
        assert_eq!(value["end"]["dateTime"], "2024-03-15T10:30:00");
        assert_eq!(value["location"]["displayName"], "@webex");
        assert_eq!(value["allowNewTimeProposals"], true);
        assert_eq!(value["attendees"][0]["emailAddress"]["address"], "bob@example.com");
        assert_eq!(value["attendees"][0]["type"], "required");
        assert_eq!(value["attendees"][1]["type"], "optional");
        assert!(value.get("recurrence").is_none());
    }

    #[test]
    fn daily_recurrence_payload() {
        let event = event(Some(RecurrencePattern::Daily { interval: 1 }));
        let value = serde_json::to_value(EventPayload::from_event(&event)).unwrap();

        assert_eq!(value["recurrence"]["pattern"]["type"], "daily");
        assert_eq!(value["recurrence"]["pattern"]["interval"], 1);
        assert_eq!(value["recurrence"]["range"]["type"], "noEnd");
        assert_eq!(value["recurrence"]["range"]["startDate"], "2024-03-15");
    }

    #[test]
    fn weekly_collapses_to_daily_with_interval_seven() {
        let event = event(Some(RecurrencePattern::Weekly {
            interval: 1,
            day_of_week: chrono::Weekday::Fri,
        }));
        let value = serde_json::to_value(EventPayload::from_event(&event)).unwrap();

        assert_eq!(value["recurrence"]["pattern"]["type"], "daily");
        assert_eq!(value["recurrence"]["pattern"]["interval"], 7);
        assert!(value["recurrence"]["pattern"].get("dayOfMonth").is_none());
    }

    #[test]
    fn monthly_and_yearly_payloads() {
        let event_m = event(Some(RecurrencePattern::Monthly {
            interval: 1,
            day_of_month: 15,
        }));
        let value = serde_json::to_value(EventPayload::from_event(&event_m)).unwrap();
        assert_eq!(value["recurrence"]["pattern"]["type"], "absoluteMonthly");
        assert_eq!(value["recurrence"]["pattern"]["dayOfMonth"], 15);

        let event_y = event(Some(RecurrencePattern::Yearly {
            month: 3,
            day_of_month: 15,
        }));
        let value = serde_json::to_value(EventPayload::from_event(&event_y)).unwrap();
        assert_eq!(value["recurrence"]["pattern"]["type"], "absoluteYearly");
        assert_eq!(value["recurrence"]["pattern"]["interval"], 1);
        assert_eq!(value["recurrence"]["pattern"]["month"], 3);
    }

    #[test]
    fn parse_group_list() {
        let json = r#"{
            "value": [
                {"id": "g1", "mail": "team@example.com"},
                {"id": "g2", "mail": null}
            ]
        }"#;

        let response: GroupListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.value.len(), 2);
        assert_eq!(response.value[0].mail.as_deref(), Some("team@example.com"));
        assert!(response.value[1].mail.is_none());
    }

    #[test]
    fn parse_calendar_list() {
        let json = r#"{
            "value": [
                {"id": "cal1", "canEdit": true, "owner": {"address": "alice@example.com", "name": "Alice"}},
                {"id": "cal2", "canEdit": false, "owner": {"address": "shared@example.com"}},
                {"id": "cal3"}
            ]
        }"#;

        let response: CalendarListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.value.len(), 3);
        assert!(response.value[0].can_edit);
        assert!(!response.value[1].can_edit);
        assert!(!response.value[2].can_edit);
        assert!(response.value[2].owner.is_none());
    }

    #[test]
    fn parse_member_list_skips_members_without_mail() {
        let json = r#"{
            "value": [
                {"mail": "bob@example.com", "displayName": "Bob"},
                {"mail": null, "displayName": "Room 12"},
                {"mail": "dave@example.com"}
            ]
        }"#;

        let response: MemberListResponse = serde_json::from_str(json).unwrap();
        let members: Vec<GroupMember> = response
            .value
            .into_iter()
            .filter_map(|m| {
                let address = m.mail?;
                let display_name = m.display_name.unwrap_or_else(|| address.clone());
                Some(GroupMember {
                    address,
                    display_name,
                })
            })
            .collect();

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].display_name, "Bob");
        assert_eq!(members[1].display_name, "dave@example.com");
    }

    #[test]
    fn client_creation() {
        let config = CalendarConfig::from_json(
            r#"{
                "tenant": "contoso.example",
                "client_id": "cid",
                "client_secret": "secret",
                "redirect_uri": "https://app.example.com/caloauth",
                "scope": "Calendars.ReadWrite"
            }"#,
        )
        .unwrap();
        assert!(CalendarClient::new(config).is_ok());
    }
}
