use thiserror::Error;

use dayview_auth::ApiClientError;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error(transparent)]
    Client(#[from] ApiClientError),

    /// The API returned an event record that cannot be normalized, e.g. a
    /// mutation response missing both start shapes.
    #[error("Invalid event record: {0}")]
    InvalidEvent(String),
}

impl CalendarError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(e) => e.user_message(),
            Self::InvalidEvent(_) => "The calendar returned an unexpected event.".to_string(),
        }
    }
}
