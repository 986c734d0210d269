use thiserror::Error;

use dayview_auth::ApiClientError;

#[derive(Error, Debug)]
pub enum TasksError {
    #[error(transparent)]
    Client(#[from] ApiClientError),

    /// Tasks only surface on the agenda when they carry a due date.
    #[error("Task {0} has no due date")]
    MissingDueDate(String),
}

impl TasksError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(e) => e.user_message(),
            Self::MissingDueDate(_) => "This task has no due date.".to_string(),
        }
    }
}
