//! XML codec for the video provider's meeting service.
//!
//! Requests share a fixed envelope: a header carrying the security context
//! (identity, optional session ticket, site) and a body whose single
//! `bodyContent` element is typed by the operation. The five recurrence
//! shapes are one tagged union rendered by a typed builder; there are no
//! string templates.
//!
//! Response decoding always normalizes repeated elements to a `Vec`, so a
//! provider returning one item or many reads identically.

use std::io::Cursor;

use chrono::{Datelike, Timelike};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crossmeet_core::{weekday_name, MeetingRequest, RecurrencePattern};

const AUTHENTICATE_USER_TYPE: &str = "java:com.webex.service.binding.user.AuthenticateUser";
const GET_USER_TYPE: &str = "java:com.webex.service.binding.user.GetUser";
const CREATE_MEETING_TYPE: &str = "java:com.webex.service.binding.meeting.CreateMeeting";
const DEL_MEETING_TYPE: &str = "java:com.webex.service.binding.meeting.DelMeeting";

/// Security context rendered into every request header.
#[derive(Debug, Clone)]
pub struct SecurityContext {
    pub identity: String,
    pub site_name: String,
    /// Absent only for the initial AuthenticateUser call.
    pub session_ticket: Option<String>,
}

/// The operations this integration consumes.
#[derive(Debug)]
pub enum Operation<'a> {
    /// Exchange an access token for a session ticket.
    AuthenticateUser { access_token: &'a str },
    /// Read a user's profile, including schedule-for permissions.
    GetUser { identity: &'a str },
    /// Create a meeting.
    CreateMeeting { request: &'a MeetingRequest },
    /// Delete a meeting.
    DelMeeting { meeting_key: &'a str },
}

/// Renders a complete request document for an operation.
pub fn request_body(ctx: &SecurityContext, operation: &Operation<'_>) -> String {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .unwrap();

    let mut message = BytesStart::new("serv:message");
    message.push_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"));
    writer.write_event(Event::Start(message)).unwrap();

    // <header><securityContext>...</securityContext></header>
    start(&mut writer, "header");
    start(&mut writer, "securityContext");
    text_element(&mut writer, "webExID", &ctx.identity);
    if let Some(ticket) = &ctx.session_ticket {
        text_element(&mut writer, "sessionTicket", ticket);
    }
    text_element(&mut writer, "siteName", &ctx.site_name);
    end(&mut writer, "securityContext");
    end(&mut writer, "header");

    // <body><bodyContent xsi:type="...">...</bodyContent></body>
    start(&mut writer, "body");
    let mut body_content = BytesStart::new("bodyContent");
    body_content.push_attribute(("xsi:type", operation_type(operation)));
    writer.write_event(Event::Start(body_content)).unwrap();

    match operation {
        Operation::AuthenticateUser { access_token } => {
            text_element(&mut writer, "accessToken", access_token);
        }
        Operation::GetUser { identity } => {
            text_element(&mut writer, "webExId", identity);
        }
        Operation::CreateMeeting { request } => {
            write_create_meeting(&mut writer, request);
        }
        Operation::DelMeeting { meeting_key } => {
            text_element(&mut writer, "meetingKey", meeting_key);
        }
    }

    end(&mut writer, "bodyContent");
    end(&mut writer, "body");
    end(&mut writer, "serv:message");

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).unwrap()
}

fn operation_type(operation: &Operation<'_>) -> &'static str {
    match operation {
        Operation::AuthenticateUser { .. } => AUTHENTICATE_USER_TYPE,
        Operation::GetUser { .. } => GET_USER_TYPE,
        Operation::CreateMeeting { .. } => CREATE_MEETING_TYPE,
        Operation::DelMeeting { .. } => DEL_MEETING_TYPE,
    }
}

fn write_create_meeting(writer: &mut Writer<Cursor<Vec<u8>>>, request: &MeetingRequest) {
    start(writer, "accessControl");
    text_element(writer, "meetingPassword", &request.password);
    end(writer, "accessControl");

    start(writer, "metaData");
    text_element(writer, "confName", &request.title);
    text_element(writer, "meetingType", "3");
    text_element(writer, "agenda", &request.agenda);
    end(writer, "metaData");

    start(writer, "participants");
    text_element(writer, "maxUserNumber", "100");
    end(writer, "participants");

    start(writer, "enableOptions");
    text_element(writer, "chat", "true");
    text_element(writer, "poll", "true");
    text_element(writer, "audioVideo", "true");
    text_element(writer, "supportE2E", "false");
    text_element(writer, "autoRecord", "false");
    end(writer, "enableOptions");

    start(writer, "schedule");
    text_element(writer, "startDate", &wire_start_date(request));
    text_element(writer, "openTime", "900");
    text_element(writer, "joinTeleconfBeforeHost", "false");
    text_element(writer, "duration", &request.duration_minutes.to_string());
    text_element(writer, "timeZoneID", "22");
    text_element(writer, "hostWebExID", &request.owner_identity);
    end(writer, "schedule");

    if let Some(pattern) = &request.recurrence {
        write_repeat(writer, pattern);
    }
}

/// Renders the repeat block; its shape depends on the pattern.
fn write_repeat(writer: &mut Writer<Cursor<Vec<u8>>>, pattern: &RecurrencePattern) {
    start(writer, "repeat");
    match pattern {
        RecurrencePattern::Daily { interval } => {
            text_element(writer, "repeatType", "DAILY");
            text_element(writer, "interval", &interval.to_string());
        }
        RecurrencePattern::Weekly {
            interval,
            day_of_week,
        } => {
            text_element(writer, "repeatType", "WEEKLY");
            text_element(writer, "interval", &interval.to_string());
            start(writer, "dayInWeek");
            text_element(writer, "day", weekday_name(*day_of_week));
            end(writer, "dayInWeek");
        }
        RecurrencePattern::Monthly {
            interval,
            day_of_month,
        } => {
            text_element(writer, "repeatType", "MONTHLY");
            text_element(writer, "interval", &interval.to_string());
            text_element(writer, "dayInMonth", &day_of_month.to_string());
        }
        RecurrencePattern::Yearly {
            month,
            day_of_month,
        } => {
            text_element(writer, "repeatType", "YEARLY");
            text_element(writer, "monthInYear", &month.to_string());
            text_element(writer, "dayInMonth", &day_of_month.to_string());
        }
    }
    end(writer, "repeat");
}

/// The provider's start-date wire format: `M/D/YYYY HH:MM:00`, local time.
fn wire_start_date(request: &MeetingRequest) -> String {
    let start = request.start;
    format!(
        "{}/{}/{} {:02}:{:02}:00",
        start.month(),
        start.day(),
        start.year(),
        start.hour(),
        start.minute()
    )
}

fn start(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str) {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .unwrap();
}

fn end(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str) {
    writer.write_event(Event::End(BytesEnd::new(name))).unwrap();
}

fn text_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, value: &str) {
    start(writer, name);
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .unwrap();
    end(writer, name);
}

/// Extracts the local name from a potentially namespaced element name.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Returns true when the response envelope reports success.
pub fn response_succeeded(xml: &str) -> bool {
    first_text(xml, "result").as_deref() == Some("SUCCESS")
}

/// The provider's failure reason, when the response carries one.
pub fn failure_reason(xml: &str) -> Option<String> {
    first_text(xml, "reason")
}

/// Collects the text of every element with the given local name.
///
/// A single occurrence and a list of occurrences decode the same way.
pub fn element_texts(xml: &str, target: &str) -> Vec<String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut results = Vec::new();
    let mut in_target = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                in_target = local_name(&name) == target;
            }
            Ok(Event::End(_)) => {
                in_target = false;
            }
            Ok(Event::Text(e)) => {
                if in_target {
                    results.push(e.unescape().unwrap_or_default().to_string());
                }
            }
            Ok(Event::CData(e)) => {
                if in_target {
                    results.push(String::from_utf8_lossy(&e).to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    results
}

/// First occurrence of an element's text, if any.
pub fn first_text(xml: &str, target: &str) -> Option<String> {
    element_texts(xml, target).into_iter().next()
}

/// Collects the text of `target` elements nested under an `ancestor`
/// element, normalized to a sequence regardless of how many the provider
/// returned.
pub fn texts_within(xml: &str, ancestor: &str, target: &str) -> Vec<String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut results = Vec::new();
    let mut ancestor_depth = 0usize;
    let mut in_target = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let local = local_name(&name);
                if local == ancestor {
                    ancestor_depth += 1;
                } else if ancestor_depth > 0 && local == target {
                    in_target = true;
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let local = local_name(&name);
                if local == ancestor {
                    ancestor_depth = ancestor_depth.saturating_sub(1);
                } else if local == target {
                    in_target = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_target {
                    results.push(e.unescape().unwrap_or_default().to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};

    fn context() -> SecurityContext {
        SecurityContext {
            identity: "alice@example.com".to_string(),
            site_name: "example".to_string(),
            session_ticket: Some("ticket-123".to_string()),
        }
    }

    fn request(recurrence: Option<RecurrencePattern>) -> MeetingRequest {
        MeetingRequest {
            title: "Planning".to_string(),
            agenda: "Quarter planning".to_string(),
            owner_identity: "alice@example.com".to_string(),
            start: NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            duration_minutes: 90,
            recurrence,
            password: "xq2z8k1p".to_string(),
        }
    }

    #[test]
    fn authenticate_user_envelope() {
        let ctx = SecurityContext {
            session_ticket: None,
            ..context()
        };
        let body = request_body(
            &ctx,
            &Operation::AuthenticateUser {
                access_token: "bearer-token",
            },
        );

        assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(body.contains("<webExID>alice@example.com</webExID>"));
        assert!(body.contains("<siteName>example</siteName>"));
        assert!(body.contains(AUTHENTICATE_USER_TYPE));
        assert!(body.contains("<accessToken>bearer-token</accessToken>"));
        assert!(!body.contains("sessionTicket"));
    }

    #[test]
    fn get_user_envelope_carries_ticket() {
        let body = request_body(
            &context(),
            &Operation::GetUser {
                identity: "alice@example.com",
            },
        );

        assert!(body.contains("<sessionTicket>ticket-123</sessionTicket>"));
        assert!(body.contains(GET_USER_TYPE));
        assert!(body.contains("<webExId>alice@example.com</webExId>"));
    }

    #[test]
    fn create_meeting_fixed_parameters() {
        let body = request_body(
            &context(),
            &Operation::CreateMeeting {
                request: &request(None),
            },
        );

        assert!(body.contains("<meetingPassword>xq2z8k1p</meetingPassword>"));
        assert!(body.contains("<confName>Planning</confName>"));
        assert!(body.contains("<meetingType>3</meetingType>"));
        assert!(body.contains("<maxUserNumber>100</maxUserNumber>"));
        assert!(body.contains("<startDate>3/15/2024 09:00:00</startDate>"));
        assert!(body.contains("<duration>90</duration>"));
        assert!(body.contains("<timeZoneID>22</timeZoneID>"));
        assert!(body.contains("<hostWebExID>alice@example.com</hostWebExID>"));
        assert!(!body.contains("<repeat>"));
    }

    #[test]
    fn daily_repeat_has_interval_only() {
        let body = request_body(
            &context(),
            &Operation::CreateMeeting {
                request: &request(Some(RecurrencePattern::Daily { interval: 1 })),
            },
        );

        assert!(body.contains("<repeatType>DAILY</repeatType>"));
        assert!(body.contains("<interval>1</interval>"));
        assert!(!body.contains("dayInWeek"));
        assert!(!body.contains("dayInMonth"));
    }

    #[test]
    fn weekly_repeat_adds_day_of_week() {
        let body = request_body(
            &context(),
            &Operation::CreateMeeting {
                request: &request(Some(RecurrencePattern::Weekly {
                    interval: 1,
                    day_of_week: Weekday::Fri,
                })),
            },
        );

        assert!(body.contains("<repeatType>WEEKLY</repeatType>"));
        assert!(body.contains("<dayInWeek><day>FRIDAY</day></dayInWeek>"));
    }

    #[test]
    fn monthly_repeat_adds_day_of_month() {
        let body = request_body(
            &context(),
            &Operation::CreateMeeting {
                request: &request(Some(RecurrencePattern::Monthly {
                    interval: 1,
                    day_of_month: 15,
                })),
            },
        );

        assert!(body.contains("<repeatType>MONTHLY</repeatType>"));
        assert!(body.contains("<dayInMonth>15</dayInMonth>"));
    }

    #[test]
    fn yearly_repeat_has_month_and_day_without_interval() {
        let body = request_body(
            &context(),
            &Operation::CreateMeeting {
                request: &request(Some(RecurrencePattern::Yearly {
                    month: 3,
                    day_of_month: 15,
                })),
            },
        );

        assert!(body.contains("<repeatType>YEARLY</repeatType>"));
        assert!(body.contains("<monthInYear>3</monthInYear>"));
        assert!(body.contains("<dayInMonth>15</dayInMonth>"));
        assert!(!body.contains("<interval>"));
    }

    #[test]
    fn del_meeting_envelope() {
        let body = request_body(
            &context(),
            &Operation::DelMeeting {
                meeting_key: "98765",
            },
        );

        assert!(body.contains(DEL_MEETING_TYPE));
        assert!(body.contains("<meetingKey>98765</meetingKey>"));
    }

    #[test]
    fn success_and_failure_detection() {
        let success = r#"<serv:message><serv:header><serv:response>
            <serv:result>SUCCESS</serv:result>
        </serv:response></serv:header></serv:message>"#;
        let failure = r#"<serv:message><serv:header><serv:response>
            <serv:result>FAILURE</serv:result>
            <serv:reason>Corresponding Meeting not found</serv:reason>
        </serv:response></serv:header></serv:message>"#;

        assert!(response_succeeded(success));
        assert!(!response_succeeded(failure));
        assert_eq!(
            failure_reason(failure).as_deref(),
            Some("Corresponding Meeting not found")
        );
    }

    #[test]
    fn session_ticket_extraction() {
        let xml = r#"<serv:message><serv:body><serv:bodyContent>
            <use:sessionTicket>abc-ticket</use:sessionTicket>
        </serv:bodyContent></serv:body></serv:message>"#;

        assert_eq!(first_text(xml, "sessionTicket").as_deref(), Some("abc-ticket"));
    }

    #[test]
    fn schedule_for_single_value_normalizes_to_sequence() {
        let xml = r#"<serv:message><serv:body><serv:bodyContent>
            <use:scheduleFor><use:webExID>bob@example.com</use:webExID></use:scheduleFor>
        </serv:bodyContent></serv:body></serv:message>"#;

        assert_eq!(
            texts_within(xml, "scheduleFor", "webExID"),
            vec!["bob@example.com".to_string()]
        );
    }

    #[test]
    fn schedule_for_list_normalizes_to_sequence() {
        let xml = r#"<serv:message><serv:header><serv:securityContext>
            <serv:webExID>alice@example.com</serv:webExID>
        </serv:securityContext></serv:header><serv:body><serv:bodyContent>
            <use:scheduleFor>
                <use:webExID>bob@example.com</use:webExID>
                <use:webExID>carol@example.com</use:webExID>
            </use:scheduleFor>
        </serv:bodyContent></serv:body></serv:message>"#;

        // The header's webExID is outside scheduleFor and must not leak in.
        assert_eq!(
            texts_within(xml, "scheduleFor", "webExID"),
            vec!["bob@example.com".to_string(), "carol@example.com".to_string()]
        );
    }

    #[test]
    fn missing_schedule_for_yields_empty_sequence() {
        let xml = r#"<serv:message><serv:body><serv:bodyContent>
            <use:firstName>Alice</use:firstName>
        </serv:bodyContent></serv:body></serv:message>"#;

        assert!(texts_within(xml, "scheduleFor", "webExID").is_empty());
    }
}
