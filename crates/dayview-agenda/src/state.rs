//! Agenda state: the merged item collection plus load and toggle tracking.
//!
//! The state lives behind a `parking_lot::Mutex` owned by the agenda; the
//! lock is only ever held for short synchronous sections, never across an
//! await point.

use std::collections::HashSet;

use chrono::NaiveDate;

use dayview_core::item::{sort_by_start, CalendarItem, ItemKey};

/// Where the agenda is in its load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct AgendaState {
    pub items: Vec<CalendarItem>,
    pub load_state: LoadState,
    /// Keys with an in-flight completion toggle; used to refuse re-entry.
    pub toggling: HashSet<ItemKey>,
    /// Monotonic fetch generation. A finished fetch only commits if the
    /// generation still matches the one it started with.
    pub generation: u64,
}

impl AgendaState {
    pub fn find(&self, key: &ItemKey) -> Option<&CalendarItem> {
        self.items.iter().find(|i| &i.key() == key)
    }

    /// Replace the item with the same key, keeping sort order intact.
    pub fn replace(&mut self, item: CalendarItem) {
        let key = item.key();
        if let Some(slot) = self.items.iter_mut().find(|i| i.key() == key) {
            *slot = item;
        } else {
            self.items.push(item);
        }
        sort_by_start(&mut self.items);
    }

    pub fn remove(&mut self, key: &ItemKey) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.key() != key);
        self.items.len() != before
    }

    /// Items whose start falls on `date`, in agenda order.
    pub fn items_on(&self, date: NaiveDate) -> Vec<CalendarItem> {
        self.items
            .iter()
            .filter(|i| i.start.date_naive() == date)
            .cloned()
            .collect()
    }
}
