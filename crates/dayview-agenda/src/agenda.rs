//! The agenda: merged events and tasks with load tracking and optimistic
//! mutation.
//!
//! Generic over the source ports so the whole orchestration layer is
//! testable without a network. One instance owns its state; there are no
//! process-wide globals.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;

use dayview_calendar::EventDraft;
use dayview_core::item::{sort_by_start, CalendarItem, ItemDetail, ItemKey, ItemKind, TaskStatus};
use dayview_core::range::DateRange;

use crate::error::AgendaError;
use crate::optimistic::with_optimistic;
use crate::ports::{EventOps, TaskOps};
use crate::state::{AgendaState, LoadState};

pub struct Agenda<E: EventOps, T: TaskOps> {
    events: Arc<E>,
    tasks: Arc<T>,
    state: Mutex<AgendaState>,
}

impl<E: EventOps, T: TaskOps> Agenda<E, T> {
    pub fn new(events: Arc<E>, tasks: Arc<T>) -> Self {
        Self { events, tasks, state: Mutex::new(AgendaState::default()) }
    }

    /// Fetch events and tasks for `range` concurrently and commit the merged
    /// result.
    ///
    /// Events are the agenda's backbone: their failure fails the load. A
    /// tasks failure only logs; the agenda then shows events alone. If
    /// another load started while this one was in flight, the result is
    /// stale and is discarded without touching state.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn load_items(&self, range: &DateRange) -> Result<(), AgendaError> {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.load_state = LoadState::Loading;
            state.generation
        };

        let (events_result, tasks_result) =
            tokio::join!(self.events.list_events(range), self.tasks.list_task_items(range));

        let events = match events_result {
            Ok(events) => events,
            Err(e) => {
                let mut state = self.state.lock();
                if state.generation == generation {
                    state.load_state = LoadState::Failed(e.user_message());
                }
                return Err(e.into());
            }
        };

        let tasks = match tasks_result {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!("Tasks unavailable, showing events only: {}", e);
                Vec::new()
            }
        };

        let mut items = events;
        items.extend(tasks);
        sort_by_start(&mut items);

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!("Discarding stale fetch (generation {})", generation);
            return Ok(());
        }
        state.items = items;
        state.load_state = LoadState::Ready;
        Ok(())
    }

    /// Create an event and insert the server's record into the agenda.
    #[tracing::instrument(skip(self, draft), level = "info")]
    pub async fn add_event(&self, draft: &EventDraft) -> Result<CalendarItem, AgendaError> {
        let item = self.events.create_event(draft).await?;
        self.state.lock().replace(item.clone());
        Ok(item)
    }

    /// Replace an event and reconcile the agenda with the server's record.
    #[tracing::instrument(skip(self, draft), level = "info")]
    pub async fn update_event(
        &self,
        event_id: &str,
        draft: &EventDraft,
    ) -> Result<CalendarItem, AgendaError> {
        let item = self.events.update_event(event_id, draft).await?;
        self.state.lock().replace(item.clone());
        Ok(item)
    }

    /// Delete an event, removing it from the agenda once the server
    /// confirms.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn delete_event(&self, event_id: &str) -> Result<(), AgendaError> {
        self.events.delete_event(event_id).await?;
        let key = ItemKey { kind: ItemKind::Event, id: event_id.to_string() };
        self.state.lock().remove(&key);
        Ok(())
    }

    /// Flip a task's completion optimistically, reconciling with the
    /// server's record on success and rolling back on failure.
    ///
    /// Non-task keys and keys with a toggle already in flight are no-ops;
    /// the current item comes back unchanged.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn toggle_task_completion(
        &self,
        key: &ItemKey,
    ) -> Result<CalendarItem, AgendaError> {
        // Reservation and snapshot happen under one lock so two racing
        // toggles cannot both proceed.
        let (original, list_id, target) = {
            let mut state = self.state.lock();
            let Some(item) = state.find(key) else {
                return Err(AgendaError::UnknownItem(key.clone()));
            };
            let (Some(list_id), Some(status)) = (item.task_list_id(), item.task_status())
            else {
                return Ok(item.clone());
            };
            if state.toggling.contains(key) {
                tracing::debug!("Toggle already in flight for {:?}", key);
                return Ok(item.clone());
            }
            let snapshot = (item.clone(), list_id.to_string(), status != TaskStatus::Completed);
            state.toggling.insert(key.clone());
            snapshot
        };

        let flipped = flip_task(&original, target);
        let task_id = original.id.clone();
        let key_for_commit = key.clone();
        let key_for_rollback = key.clone();

        let result = with_optimistic(
            &self.state,
            |state| state.replace(flipped),
            self.tasks.set_task_completion(&list_id, &task_id, target),
            move |state, item: &CalendarItem| {
                state.replace(item.clone());
                state.toggling.remove(&key_for_commit);
            },
            move |state| {
                state.replace(original);
                state.toggling.remove(&key_for_rollback);
            },
        )
        .await;

        Ok(result?)
    }

    /// Current load state.
    pub fn load_state(&self) -> LoadState {
        self.state.lock().load_state.clone()
    }

    /// Snapshot of every item in agenda order.
    pub fn items(&self) -> Vec<CalendarItem> {
        self.state.lock().items.clone()
    }

    /// Snapshot of the items starting on `date`.
    pub fn items_on(&self, date: NaiveDate) -> Vec<CalendarItem> {
        self.state.lock().items_on(date)
    }

    /// Whether a completion toggle is in flight for `key`.
    pub fn is_toggling(&self, key: &ItemKey) -> bool {
        self.state.lock().toggling.contains(key)
    }
}

fn flip_task(item: &CalendarItem, completed: bool) -> CalendarItem {
    let mut flipped = item.clone();
    if let ItemDetail::Task { status, completed_at, .. } = &mut flipped.detail {
        *status = if completed { TaskStatus::Completed } else { TaskStatus::NeedsAction };
        *completed_at = completed.then(Utc::now);
    }
    flipped
}
