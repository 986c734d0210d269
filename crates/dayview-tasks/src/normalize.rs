//! Normalization of API task records into the unified item model.
//!
//! The API reports `due` as an RFC3339 instant pinned to midnight UTC. The
//! calendar day is therefore taken from the UTC component directly; going
//! through a local timezone would shift the date for anyone west of
//! Greenwich.

use chrono::{DateTime, Utc};

use dayview_core::color::{config_for, EventColor};
use dayview_core::item::{CalendarItem, ItemDetail, ItemTime, TaskStatus};

use crate::types::ApiTask;

const UNTITLED_TASK: &str = "Untitled Task";

/// Normalize one API task into the unified item model.
///
/// Returns `None` for records that must not surface: deleted tasks and tasks
/// without a parseable due date.
pub fn normalize_task(task: &ApiTask, list_id: &str) -> Option<CalendarItem> {
    if task.deleted.unwrap_or(false) {
        return None;
    }

    let due = DateTime::parse_from_rfc3339(task.due.as_deref()?).ok()?;
    let day = ItemTime::AllDay(due.with_timezone(&Utc).date_naive());

    let title = task
        .title
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(UNTITLED_TASK)
        .to_string();

    let status = match task.status.as_deref() {
        Some("completed") => TaskStatus::Completed,
        _ => TaskStatus::NeedsAction,
    };

    let completed_at = task
        .completed
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    let default = config_for(EventColor::Default);
    Some(CalendarItem {
        id: task.id.clone(),
        title,
        description: task.notes.clone(),
        location: None,
        start: day,
        end: day,
        is_all_day: true,
        color: default.color,
        display_color: default.hex.to_string(),
        detail: ItemDetail::Task {
            list_id: list_id.to_string(),
            status,
            completed_at,
        },
    })
}
