//! Wire types for the Tasks v1 API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiTaskList {
    pub id: String,
    pub title: Option<String>,
}

/// Task record as the API sends it. `due` is RFC3339 but carries only date
/// information; the time component is always midnight UTC.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiTask {
    pub id: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    /// "needsAction" or "completed".
    pub status: Option<String>,
    pub due: Option<String>,
    pub completed: Option<String>,
    pub deleted: Option<bool>,
    pub hidden: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskListResponse {
    pub items: Option<Vec<ApiTaskList>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TasksResponse {
    pub items: Option<Vec<ApiTask>>,
}
