//! Wire types for the Calendar v3 API.
//!
//! These mirror the JSON shapes the API actually sends; normalization into
//! the internal item model happens in [`crate::normalize`].

use serde::{Deserialize, Serialize};

/// Event time as the API sends it: exactly one of `date_time` (RFC3339
/// instant) or `date` (all-day, `YYYY-MM-DD`) is populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAttendee {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub response_status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<ApiEventTime>,
    pub end: Option<ApiEventTime>,
    /// Provider event color id ("1".."11"), absent for calendar-colored events.
    pub color_id: Option<String>,
    pub html_link: Option<String>,
    pub attendees: Option<Vec<ApiAttendee>>,
    /// "confirmed", "tentative", or "cancelled".
    pub status: Option<String>,
}

/// Calendar-list entry. `selected` mirrors the user's visibility toggle in
/// the provider UI; unselected calendars are excluded from aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCalendar {
    pub id: String,
    pub summary: Option<String>,
    pub background_color: Option<String>,
    pub color_id: Option<String>,
    pub selected: Option<bool>,
    pub primary: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarListResponse {
    pub items: Option<Vec<ApiCalendar>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventListResponse {
    pub items: Option<Vec<ApiEvent>>,
}
