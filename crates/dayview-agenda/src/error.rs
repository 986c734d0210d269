use thiserror::Error;

use dayview_calendar::CalendarError;
use dayview_core::item::ItemKey;
use dayview_tasks::TasksError;

#[derive(Error, Debug)]
pub enum AgendaError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    Tasks(#[from] TasksError),

    #[error("No item with key {0:?}")]
    UnknownItem(ItemKey),
}

impl AgendaError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Calendar(e) => e.user_message(),
            Self::Tasks(e) => e.user_message(),
            Self::UnknownItem(_) => "That item is no longer on the agenda.".to_string(),
        }
    }
}
