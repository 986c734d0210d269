//! Unified calendar item model.
//!
//! Events and tasks from the two upstream APIs normalize into one
//! [`CalendarItem`] shape so the agenda layer can merge, sort, and group them
//! without caring where they came from. Items are value objects: updates
//! replace the whole item, nothing is mutated in place.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::color::EventColor;

/// Which source system an item came from.
///
/// Ids are only unique within a source, so collection keys are always the
/// `(kind, id)` composite, never the bare id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Event,
    Task,
}

/// Composite collection key for a [`CalendarItem`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub kind: ItemKind,
    pub id: String,
}

/// Item time - a specific instant or a date-anchored all-day value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemTime {
    At(DateTime<Utc>),
    AllDay(NaiveDate),
}

impl ItemTime {
    /// Total-order key for merging: all-day values sort at UTC midnight.
    pub fn sort_key(&self) -> DateTime<Utc> {
        match self {
            ItemTime::At(dt) => *dt,
            ItemTime::AllDay(d) => d
                .and_hms_opt(0, 0, 0)
                .map(|t| t.and_utc())
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// Calendar day this time falls on (UTC day for instants).
    pub fn date_naive(&self) -> NaiveDate {
        match self {
            ItemTime::At(dt) => dt.date_naive(),
            ItemTime::AllDay(d) => *d,
        }
    }
}

/// Task completion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    NeedsAction,
    Completed,
}

/// Attendee response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    NeedsAction,
    Declined,
    Tentative,
    Accepted,
}

impl ResponseStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "accepted" => Self::Accepted,
            "declined" => Self::Declined,
            "tentative" => Self::Tentative,
            _ => Self::NeedsAction,
        }
    }
}

/// Event attendee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    pub display_name: Option<String>,
    pub response_status: Option<ResponseStatus>,
}

/// Source-specific payload of a [`CalendarItem`].
///
/// A task always carries its parent list id (required for mutation), so the
/// "task without a list" state is unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemDetail {
    Event {
        html_link: Option<String>,
        attendees: Vec<Attendee>,
    },
    Task {
        list_id: String,
        status: TaskStatus,
        completed_at: Option<DateTime<Utc>>,
    },
}

/// The unified internal entity produced by the normalizers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: ItemTime,
    pub end: ItemTime,
    /// True when the upstream record had no time-of-day; always true for tasks.
    pub is_all_day: bool,
    /// Best-effort semantic label; `display_color` is authoritative.
    pub color: EventColor,
    /// Exact hex used for rendering; never empty.
    pub display_color: String,
    pub detail: ItemDetail,
}

impl CalendarItem {
    pub fn kind(&self) -> ItemKind {
        match self.detail {
            ItemDetail::Event { .. } => ItemKind::Event,
            ItemDetail::Task { .. } => ItemKind::Task,
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey { kind: self.kind(), id: self.id.clone() }
    }

    pub fn is_task(&self) -> bool {
        matches!(self.detail, ItemDetail::Task { .. })
    }

    pub fn task_status(&self) -> Option<TaskStatus> {
        match &self.detail {
            ItemDetail::Task { status, .. } => Some(*status),
            ItemDetail::Event { .. } => None,
        }
    }

    pub fn task_list_id(&self) -> Option<&str> {
        match &self.detail {
            ItemDetail::Task { list_id, .. } => Some(list_id),
            ItemDetail::Event { .. } => None,
        }
    }

    pub fn task_completed_at(&self) -> Option<DateTime<Utc>> {
        match &self.detail {
            ItemDetail::Task { completed_at, .. } => *completed_at,
            ItemDetail::Event { .. } => None,
        }
    }
}

/// Stable ascending sort by start time. Ties keep their fetch order.
pub fn sort_by_start(items: &mut [CalendarItem]) {
    items.sort_by_key(|item| item.start.sort_key());
}
