//! Normalization between API event records and the internal item model.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use dayview_core::color::{config_for, CalendarColorSignal, ColorResolver, EventColor};
use dayview_core::item::{Attendee, CalendarItem, ItemDetail, ItemTime, ResponseStatus};

use crate::types::{ApiCalendar, ApiEvent, ApiEventTime};

const UNTITLED_EVENT: &str = "Untitled Event";

/// Fields a caller supplies when creating or replacing an event.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: ItemTime,
    pub end: ItemTime,
    /// Semantic color request. Only names with a provider color id can be
    /// sent; others fall back to the calendar's own color.
    pub color: Option<EventColor>,
}

/// Color signal carried by a calendar-list entry.
pub fn calendar_signal(calendar: &ApiCalendar) -> CalendarColorSignal {
    CalendarColorSignal {
        color_id: calendar.color_id.clone(),
        background_color: calendar.background_color.clone(),
    }
}

fn parse_time(time: &ApiEventTime) -> Option<ItemTime> {
    if let Some(date_time) = &time.date_time {
        let parsed = DateTime::parse_from_rfc3339(date_time).ok()?;
        return Some(ItemTime::At(parsed.with_timezone(&Utc)));
    }
    if let Some(date) = &time.date {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        return Some(ItemTime::AllDay(parsed));
    }
    None
}

/// Normalize one API event into the unified item model.
///
/// Returns `None` for records that must not surface: cancelled events and
/// events with no parseable start or end.
pub fn normalize_event(
    event: &ApiEvent,
    calendar: Option<&CalendarColorSignal>,
    resolver: &dyn ColorResolver,
) -> Option<CalendarItem> {
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }

    let start = parse_time(event.start.as_ref()?)?;
    let end = event.end.as_ref().and_then(parse_time).unwrap_or(start);

    let title = event
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(UNTITLED_EVENT)
        .to_string();

    let resolved = resolver.resolve(event.color_id.as_deref(), calendar);

    let attendees = event
        .attendees
        .iter()
        .flatten()
        .filter_map(|a| {
            Some(Attendee {
                email: a.email.clone()?,
                display_name: a.display_name.clone(),
                response_status: a.response_status.as_deref().map(ResponseStatus::parse),
            })
        })
        .collect();

    Some(CalendarItem {
        id: event.id.clone(),
        title,
        description: event.description.clone(),
        location: event.location.clone(),
        start,
        end,
        is_all_day: matches!(start, ItemTime::AllDay(_)),
        color: resolved.name,
        display_color: resolved.hex,
        detail: ItemDetail::Event { html_link: event.html_link.clone(), attendees },
    })
}

fn time_body(time: ItemTime, tz: Tz) -> ApiEventTime {
    match time {
        ItemTime::At(dt) => ApiEventTime {
            date_time: Some(dt.with_timezone(&tz).to_rfc3339()),
            date: None,
            time_zone: Some(tz.name().to_string()),
        },
        ItemTime::AllDay(date) => ApiEventTime {
            date_time: None,
            date: Some(date.format("%Y-%m-%d").to_string()),
            time_zone: None,
        },
    }
}

/// Denormalize a draft into the request body for event creation/replacement.
///
/// Timed values are expressed in the configured timezone with an explicit
/// `timeZone` field; all-day values use the bare `date` shape.
pub fn event_body(draft: &EventDraft, tz: Tz) -> serde_json::Value {
    let mut body = serde_json::json!({
        "summary": draft.title,
        "description": draft.description,
        "location": draft.location,
        "start": time_body(draft.start, tz),
        "end": time_body(draft.end, tz),
    });
    if let Some(id) = draft.color.and_then(|c| config_for(c).google_color_id) {
        body["colorId"] = serde_json::Value::String(id.to_string());
    }
    body
}

/// Convert a local wall-clock time in `tz` to the UTC instant events carry.
pub fn local_to_instant(date: NaiveDate, hour: u32, minute: u32, tz: Tz) -> Option<ItemTime> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    let local = tz.from_local_datetime(&naive).earliest()?;
    Some(ItemTime::At(local.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::types::ApiAttendee;
    use dayview_core::color::{EventColor, SnapResolver};

    fn timed_event(id: &str) -> ApiEvent {
        ApiEvent {
            id: id.to_string(),
            summary: Some("Standup".to_string()),
            start: Some(ApiEventTime {
                date_time: Some("2026-03-10T09:00:00Z".to_string()),
                ..Default::default()
            }),
            end: Some(ApiEventTime {
                date_time: Some("2026-03-10T09:15:00Z".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_timed_event_normalizes() {
        let item = normalize_event(&timed_event("e1"), None, &SnapResolver).unwrap();
        assert_eq!(item.title, "Standup");
        assert!(!item.is_all_day);
        assert_eq!(item.start.sort_key().to_rfc3339(), "2026-03-10T09:00:00+00:00");
        assert_eq!(item.color, EventColor::Default);
    }

    #[test]
    fn test_all_day_event_normalizes() {
        let mut event = timed_event("e1");
        event.start = Some(ApiEventTime {
            date: Some("2026-03-10".to_string()),
            ..Default::default()
        });
        event.end = Some(ApiEventTime {
            date: Some("2026-03-11".to_string()),
            ..Default::default()
        });
        let item = normalize_event(&event, None, &SnapResolver).unwrap();
        assert!(item.is_all_day);
        assert_eq!(
            item.start,
            ItemTime::AllDay(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap())
        );
    }

    #[test]
    fn test_blank_summary_gets_placeholder() {
        let mut event = timed_event("e1");
        event.summary = Some("   ".to_string());
        let item = normalize_event(&event, None, &SnapResolver).unwrap();
        assert_eq!(item.title, "Untitled Event");

        event.summary = None;
        let item = normalize_event(&event, None, &SnapResolver).unwrap();
        assert_eq!(item.title, "Untitled Event");
    }

    #[test]
    fn test_cancelled_event_is_skipped() {
        let mut event = timed_event("e1");
        event.status = Some("cancelled".to_string());
        assert!(normalize_event(&event, None, &SnapResolver).is_none());
    }

    #[test]
    fn test_event_without_times_is_skipped() {
        let mut event = timed_event("e1");
        event.start = Some(ApiEventTime::default());
        assert!(normalize_event(&event, None, &SnapResolver).is_none());
        event.start = None;
        assert!(normalize_event(&event, None, &SnapResolver).is_none());
    }

    #[test]
    fn test_missing_end_falls_back_to_start() {
        let mut event = timed_event("e1");
        event.end = None;
        let item = normalize_event(&event, None, &SnapResolver).unwrap();
        assert_eq!(item.end, item.start);
    }

    #[test]
    fn test_event_color_id_beats_calendar_color() {
        let mut event = timed_event("e1");
        event.color_id = Some("11".to_string());
        let signal = CalendarColorSignal {
            color_id: None,
            background_color: Some("#16a765".to_string()),
        };
        let item = normalize_event(&event, Some(&signal), &SnapResolver).unwrap();
        assert_eq!(item.color, EventColor::Tomato);
        assert_eq!(item.display_color, "#d50000");
    }

    #[test]
    fn test_attendees_without_email_are_dropped() {
        let mut event = timed_event("e1");
        event.attendees = Some(vec![
            ApiAttendee {
                email: Some("alice@example.com".to_string()),
                display_name: Some("Alice".to_string()),
                response_status: Some("accepted".to_string()),
            },
            ApiAttendee { email: None, display_name: None, response_status: None },
        ]);
        let item = normalize_event(&event, None, &SnapResolver).unwrap();
        let ItemDetail::Event { attendees, .. } = &item.detail else {
            panic!("expected event detail");
        };
        assert_eq!(attendees.len(), 1);
        assert_eq!(attendees[0].response_status, Some(ResponseStatus::Accepted));
    }

    #[test]
    fn test_event_body_timed_carries_timezone() {
        let tz = chrono_tz::Tz::Europe__Stockholm;
        let start = local_to_instant(
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            9,
            0,
            tz,
        )
        .unwrap();
        let draft = EventDraft {
            title: "Planning".to_string(),
            description: None,
            location: None,
            start,
            end: start,
            color: None,
        };
        let body = event_body(&draft, tz);
        assert_eq!(body["summary"], "Planning");
        assert!(body.get("colorId").is_none());
        assert_eq!(body["start"]["timeZone"], "Europe/Stockholm");
        assert!(body["start"]["dateTime"]
            .as_str()
            .unwrap()
            .starts_with("2026-03-10T09:00:00"));
        assert!(body["start"].get("date").is_none());
    }

    #[test]
    fn test_event_body_all_day_uses_date_shape() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let draft = EventDraft {
            title: "Offsite".to_string(),
            description: Some("All hands".to_string()),
            location: Some("Berlin".to_string()),
            start: ItemTime::AllDay(date),
            end: ItemTime::AllDay(date.succ_opt().unwrap()),
            color: None,
        };
        let body = event_body(&draft, chrono_tz::Tz::UTC);
        assert_eq!(body["start"]["date"], "2026-03-10");
        assert_eq!(body["end"]["date"], "2026-03-11");
        assert!(body["start"].get("dateTime").is_none());
    }

    fn draft_from(item: &dayview_core::item::CalendarItem) -> EventDraft {
        EventDraft {
            title: item.title.clone(),
            description: item.description.clone(),
            location: item.location.clone(),
            start: item.start,
            end: item.end,
            color: None,
        }
    }

    #[test]
    fn test_all_day_event_round_trips_through_draft() {
        let mut event = timed_event("e1");
        event.summary = Some("Offsite".to_string());
        event.start = Some(ApiEventTime {
            date: Some("2026-03-10".to_string()),
            ..Default::default()
        });
        event.end = Some(ApiEventTime {
            date: Some("2026-03-11".to_string()),
            ..Default::default()
        });

        let item = normalize_event(&event, None, &SnapResolver).unwrap();
        let body = event_body(&draft_from(&item), chrono_tz::Tz::UTC);

        assert_eq!(body["summary"], "Offsite");
        assert_eq!(body["start"]["date"], "2026-03-10");
        assert_eq!(body["end"]["date"], "2026-03-11");
        assert!(body["start"].get("dateTime").is_none());
        assert!(body["end"].get("dateTime").is_none());
    }

    #[test]
    fn test_timed_event_round_trips_through_draft() {
        let item = normalize_event(&timed_event("e1"), None, &SnapResolver).unwrap();
        let body = event_body(&draft_from(&item), chrono_tz::Tz::UTC);

        assert_eq!(body["summary"], "Standup");
        let start = DateTime::parse_from_rfc3339(body["start"]["dateTime"].as_str().unwrap())
            .unwrap()
            .with_timezone(&Utc);
        let end = DateTime::parse_from_rfc3339(body["end"]["dateTime"].as_str().unwrap())
            .unwrap()
            .with_timezone(&Utc);
        // Same instants and same calendar day as the upstream record.
        assert_eq!(ItemTime::At(start), item.start);
        assert_eq!(ItemTime::At(end), item.end);
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert!(body["start"].get("date").is_none());
    }

    #[test]
    fn test_event_body_maps_semantic_color_to_provider_id() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let mut draft = EventDraft {
            title: "Deadline".to_string(),
            description: None,
            location: None,
            start: ItemTime::AllDay(date),
            end: ItemTime::AllDay(date),
            color: Some(EventColor::Tomato),
        };
        let body = event_body(&draft, chrono_tz::Tz::UTC);
        assert_eq!(body["colorId"], "11");

        // Names without a provider id send no colorId at all.
        draft.color = Some(EventColor::Pumpkin);
        let body = event_body(&draft, chrono_tz::Tz::UTC);
        assert!(body.get("colorId").is_none());
    }
}
