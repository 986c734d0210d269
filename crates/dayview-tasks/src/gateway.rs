//! Tasks API gateway.
//!
//! Reads fan out over every task list with bounded concurrency; completion
//! toggles patch a single task in place.

use std::sync::Arc;

use dayview_auth::AuthorizedClient;
use dayview_core::gather::bounded_gather;
use dayview_core::item::{sort_by_start, CalendarItem};
use dayview_core::range::DateRange;

use crate::error::TasksError;
use crate::normalize::normalize_task;
use crate::types::{ApiTask, ApiTaskList, TaskListResponse, TasksResponse};

const TASKS_API_BASE: &str = "https://tasks.googleapis.com/tasks/v1";

pub struct TasksGateway {
    client: Arc<AuthorizedClient>,
    base_url: String,
    fetch_concurrency: usize,
}

impl TasksGateway {
    pub fn new(client: Arc<AuthorizedClient>, fetch_concurrency: usize) -> Self {
        Self { client, base_url: TASKS_API_BASE.to_string(), fetch_concurrency }
    }

    #[cfg(test)]
    pub fn new_with_base_url(
        client: Arc<AuthorizedClient>,
        fetch_concurrency: usize,
        base_url: &str,
    ) -> Self {
        Self { client, base_url: base_url.to_string(), fetch_concurrency }
    }

    /// All task lists on the account.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn list_task_lists(&self) -> Result<Vec<ApiTaskList>, TasksError> {
        let url = format!("{}/users/@me/lists", self.base_url);
        let response: TaskListResponse = self.client.get_json(&url).await?;
        Ok(response.items.unwrap_or_default())
    }

    /// Tasks due within `range` from every list, normalized and sorted.
    ///
    /// Completed and hidden tasks are included; deleted tasks are not. A
    /// single failing list does not fail the whole listing.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn list_task_items(
        &self,
        range: &DateRange,
    ) -> Result<Vec<CalendarItem>, TasksError> {
        let lists = self.list_task_lists().await?;

        tracing::debug!("Fetching tasks from {} lists", lists.len());

        let batches = bounded_gather(self.fetch_concurrency, lists, |list| {
            self.tasks_for_list(list, range)
        })
        .await;

        let mut items = Vec::new();
        for (list_id, result) in batches {
            match result {
                Ok(tasks) => {
                    items.extend(tasks.iter().filter_map(|t| normalize_task(t, &list_id)));
                }
                Err(e) => {
                    tracing::warn!("Skipping task list that failed to list: {}", e);
                }
            }
        }

        sort_by_start(&mut items);
        Ok(items)
    }

    async fn tasks_for_list(
        &self,
        list: ApiTaskList,
        range: &DateRange,
    ) -> (String, Result<Vec<ApiTask>, TasksError>) {
        let url = format!(
            "{}/lists/{}/tasks?showCompleted=true&showHidden=true&showDeleted=false&dueMin={}&dueMax={}",
            self.base_url,
            urlencoding::encode(&list.id),
            urlencoding::encode(&range.time_min()),
            urlencoding::encode(&range.time_max()),
        );
        let result = self
            .client
            .get_json::<TasksResponse>(&url)
            .await
            .map(|r| r.items.unwrap_or_default())
            .map_err(TasksError::from);
        (list.id, result)
    }

    /// Set or clear a task's completion, returning the updated item.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn set_task_completion(
        &self,
        list_id: &str,
        task_id: &str,
        completed: bool,
    ) -> Result<CalendarItem, TasksError> {
        let url = format!(
            "{}/lists/{}/tasks/{}",
            self.base_url,
            urlencoding::encode(list_id),
            urlencoding::encode(task_id),
        );
        let body = if completed {
            serde_json::json!({
                "status": "completed",
                "completed": chrono::Utc::now().to_rfc3339(),
            })
        } else {
            serde_json::json!({
                "status": "needsAction",
                "completed": null,
            })
        };
        let task: ApiTask = self.client.patch_json(&url, &body).await?;
        normalize_task(&task, list_id)
            .ok_or_else(|| TasksError::MissingDueDate(task.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use dayview_auth::TokenProvider;
    use dayview_core::item::TaskStatus;

    struct StaticTokens;

    #[async_trait]
    impl TokenProvider for StaticTokens {
        async fn access_token(&self) -> Option<String> {
            Some("test_token".to_string())
        }

        async fn refresh_access_token(&self) -> Option<String> {
            None
        }
    }

    fn gateway(server: &MockServer) -> TasksGateway {
        let client = Arc::new(AuthorizedClient::new(Arc::new(StaticTokens)));
        TasksGateway::new_with_base_url(client, 4, &server.uri())
    }

    fn range() -> DateRange {
        let start = DateTime::parse_from_rfc3339("2026-01-30T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let end = DateTime::parse_from_rfc3339("2026-01-31T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        DateRange::new(start, end)
    }

    #[tokio::test]
    async fn test_list_task_items_spans_all_lists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/@me/lists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "inbox"}, {"id": "chores"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/lists/inbox/tasks"))
            .and(query_param("showCompleted", "true"))
            .and(query_param("showHidden", "true"))
            .and(query_param("showDeleted", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "t1", "title": "File taxes", "due": "2026-01-30T00:00:00Z"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/lists/chores/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"id": "t2", "title": "Vacuum", "due": "2026-01-30T00:00:00Z"},
                    {"id": "t3", "title": "No due date"},
                ]
            })))
            .mount(&server)
            .await;

        let items = gateway(&server).list_task_items(&range()).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.is_task()));
        // Each item carries its owning list id.
        assert_eq!(items[0].task_list_id(), Some("inbox"));
        assert_eq!(items[1].task_list_id(), Some("chores"));
    }

    #[tokio::test]
    async fn test_failing_list_is_skipped_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/@me/lists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "good"}, {"id": "bad"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/lists/good/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "t1", "title": "Kept", "due": "2026-01-30T00:00:00Z"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/lists/bad/tasks"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let items = gateway(&server).list_task_items(&range()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "t1");
    }

    #[tokio::test]
    async fn test_complete_task_patches_status_and_timestamp() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/lists/inbox/tasks/t1"))
            .and(body_partial_json(serde_json::json!({"status": "completed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t1",
                "title": "File taxes",
                "status": "completed",
                "due": "2026-01-30T00:00:00Z",
                "completed": "2026-01-29T18:30:00Z",
            })))
            .mount(&server)
            .await;

        let item = gateway(&server)
            .set_task_completion("inbox", "t1", true)
            .await
            .unwrap();
        assert_eq!(item.task_status(), Some(TaskStatus::Completed));
        assert!(item.task_completed_at().is_some());
    }

    #[tokio::test]
    async fn test_uncomplete_task_clears_completed_field() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/lists/inbox/tasks/t1"))
            .and(body_partial_json(serde_json::json!({
                "status": "needsAction",
                "completed": null,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t1",
                "title": "File taxes",
                "status": "needsAction",
                "due": "2026-01-30T00:00:00Z",
            })))
            .mount(&server)
            .await;

        let item = gateway(&server)
            .set_task_completion("inbox", "t1", false)
            .await
            .unwrap();
        assert_eq!(item.task_status(), Some(TaskStatus::NeedsAction));
        assert!(item.task_completed_at().is_none());
    }

    #[tokio::test]
    async fn test_patch_response_without_due_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/lists/inbox/tasks/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t1",
                "status": "completed",
            })))
            .mount(&server)
            .await;

        let result = gateway(&server).set_task_completion("inbox", "t1", true).await;
        assert!(matches!(result, Err(TasksError::MissingDueDate(_))));
    }
}
