//! Source ports the agenda aggregates over.
//!
//! The agenda is generic over these traits so tests can drive it with fakes;
//! the gateways are the production implementations.

use async_trait::async_trait;

use dayview_calendar::{CalendarError, CalendarGateway, EventDraft};
use dayview_core::item::CalendarItem;
use dayview_core::range::DateRange;
use dayview_tasks::{TasksError, TasksGateway};

#[async_trait]
pub trait EventOps: Send + Sync {
    async fn list_events(&self, range: &DateRange) -> Result<Vec<CalendarItem>, CalendarError>;
    async fn create_event(&self, draft: &EventDraft) -> Result<CalendarItem, CalendarError>;
    async fn update_event(
        &self,
        event_id: &str,
        draft: &EventDraft,
    ) -> Result<CalendarItem, CalendarError>;
    async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError>;
}

#[async_trait]
pub trait TaskOps: Send + Sync {
    async fn list_task_items(&self, range: &DateRange)
        -> Result<Vec<CalendarItem>, TasksError>;
    async fn set_task_completion(
        &self,
        list_id: &str,
        task_id: &str,
        completed: bool,
    ) -> Result<CalendarItem, TasksError>;
}

#[async_trait]
impl EventOps for CalendarGateway {
    async fn list_events(&self, range: &DateRange) -> Result<Vec<CalendarItem>, CalendarError> {
        CalendarGateway::list_events(self, range).await
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<CalendarItem, CalendarError> {
        CalendarGateway::create_event(self, draft).await
    }

    async fn update_event(
        &self,
        event_id: &str,
        draft: &EventDraft,
    ) -> Result<CalendarItem, CalendarError> {
        CalendarGateway::update_event(self, event_id, draft).await
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError> {
        CalendarGateway::delete_event(self, event_id).await
    }
}

#[async_trait]
impl TaskOps for TasksGateway {
    async fn list_task_items(
        &self,
        range: &DateRange,
    ) -> Result<Vec<CalendarItem>, TasksError> {
        TasksGateway::list_task_items(self, range).await
    }

    async fn set_task_completion(
        &self,
        list_id: &str,
        task_id: &str,
        completed: bool,
    ) -> Result<CalendarItem, TasksError> {
        TasksGateway::set_task_completion(self, list_id, task_id, completed).await
    }
}
