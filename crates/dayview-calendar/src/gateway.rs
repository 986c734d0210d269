//! Calendar API gateway.
//!
//! Aggregated reads span every selected calendar; mutations target the
//! primary calendar only. All requests go through the shared authorized
//! client, so the token refresh contract applies uniformly.

use std::sync::Arc;

use chrono_tz::Tz;

use dayview_auth::AuthorizedClient;
use dayview_core::color::{CalendarColorSignal, ColorPalette, ColorResolver, ColorStrategyKind};
use dayview_core::config::CalendarConfig;
use dayview_core::gather::bounded_gather;
use dayview_core::item::{sort_by_start, CalendarItem};
use dayview_core::range::DateRange;

use crate::error::CalendarError;
use crate::normalize::{calendar_signal, event_body, normalize_event, EventDraft};
use crate::types::{ApiCalendar, ApiEvent, CalendarListResponse, EventListResponse};

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const PRIMARY_CALENDAR: &str = "primary";

pub struct CalendarGateway {
    client: Arc<AuthorizedClient>,
    base_url: String,
    resolver: Arc<dyn ColorResolver>,
    fetch_concurrency: usize,
    tz: Tz,
}

impl CalendarGateway {
    pub fn new(
        client: Arc<AuthorizedClient>,
        resolver: Arc<dyn ColorResolver>,
        fetch_concurrency: usize,
        tz: Tz,
    ) -> Self {
        Self {
            client,
            base_url: CALENDAR_API_BASE.to_string(),
            resolver,
            fetch_concurrency,
            tz,
        }
    }

    #[cfg(test)]
    pub fn new_with_base_url(
        client: Arc<AuthorizedClient>,
        resolver: Arc<dyn ColorResolver>,
        fetch_concurrency: usize,
        base_url: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            resolver,
            fetch_concurrency,
            tz: chrono_tz::Tz::UTC,
        }
    }

    /// Build a gateway from configuration: concurrency limit, timezone, and
    /// the configured color strategy. The palette strategy fetches the
    /// account palette up front.
    pub async fn from_config(
        client: Arc<AuthorizedClient>,
        config: &CalendarConfig,
    ) -> Result<Self, CalendarError> {
        let gateway = Self::new(
            client,
            config.color_strategy.resolver(None),
            config.fetch_concurrency,
            config.tz(),
        );
        gateway.apply_strategy(config.color_strategy).await
    }

    #[cfg(test)]
    pub async fn from_config_with_base_url(
        client: Arc<AuthorizedClient>,
        config: &CalendarConfig,
        base_url: &str,
    ) -> Result<Self, CalendarError> {
        let gateway = Self::new_with_base_url(
            client,
            config.color_strategy.resolver(None),
            config.fetch_concurrency,
            base_url,
        );
        gateway.apply_strategy(config.color_strategy).await
    }

    async fn apply_strategy(mut self, strategy: ColorStrategyKind) -> Result<Self, CalendarError> {
        if strategy == ColorStrategyKind::Palette {
            let palette = self.color_palette().await?;
            self.resolver = strategy.resolver(Some(palette));
        }
        Ok(self)
    }

    /// All calendars on the account, selected or not.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn list_calendars(&self) -> Result<Vec<ApiCalendar>, CalendarError> {
        let url = format!("{}/users/me/calendarList", self.base_url);
        let response: CalendarListResponse = self.client.get_json(&url).await?;
        Ok(response.items.unwrap_or_default())
    }

    /// Events from every selected calendar within `range`, normalized,
    /// merged, and sorted by start time.
    ///
    /// A single failing calendar does not fail the whole listing; its events
    /// are simply absent from the result.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn list_events(&self, range: &DateRange) -> Result<Vec<CalendarItem>, CalendarError> {
        let calendars: Vec<ApiCalendar> = self
            .list_calendars()
            .await?
            .into_iter()
            .filter(|c| c.selected.unwrap_or(false))
            .collect();

        tracing::debug!("Fetching events from {} selected calendars", calendars.len());

        let batches = bounded_gather(self.fetch_concurrency, calendars, |calendar| {
            self.events_for_calendar(calendar, range)
        })
        .await;

        let mut items = Vec::new();
        for (signal, result) in batches {
            match result {
                Ok(events) => {
                    items.extend(
                        events
                            .iter()
                            .filter_map(|e| {
                                normalize_event(e, Some(&signal), self.resolver.as_ref())
                            }),
                    );
                }
                Err(e) => {
                    tracing::warn!("Skipping calendar that failed to list: {}", e);
                }
            }
        }

        sort_by_start(&mut items);
        Ok(items)
    }

    async fn events_for_calendar(
        &self,
        calendar: ApiCalendar,
        range: &DateRange,
    ) -> (CalendarColorSignal, Result<Vec<ApiEvent>, CalendarError>) {
        let signal = calendar_signal(&calendar);
        let url = format!(
            "{}/calendars/{}/events?timeMin={}&timeMax={}&singleEvents=true&orderBy=startTime",
            self.base_url,
            urlencoding::encode(&calendar.id),
            urlencoding::encode(&range.time_min()),
            urlencoding::encode(&range.time_max()),
        );
        let result = self
            .client
            .get_json::<EventListResponse>(&url)
            .await
            .map(|r| r.items.unwrap_or_default())
            .map_err(CalendarError::from);
        (signal, result)
    }

    /// One event from the primary calendar.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn get_event(&self, event_id: &str) -> Result<CalendarItem, CalendarError> {
        let url = self.primary_event_url(event_id);
        let event: ApiEvent = self.client.get_json(&url).await?;
        self.normalize_mutation_result(event).await
    }

    /// Create an event on the primary calendar.
    #[tracing::instrument(skip(self, draft), level = "info")]
    pub async fn create_event(&self, draft: &EventDraft) -> Result<CalendarItem, CalendarError> {
        let url = format!("{}/calendars/{}/events", self.base_url, PRIMARY_CALENDAR);
        let body = event_body(draft, self.tz);
        let event: ApiEvent = self.client.post_json(&url, &body).await?;
        self.normalize_mutation_result(event).await
    }

    /// Replace an event on the primary calendar.
    #[tracing::instrument(skip(self, draft), level = "info")]
    pub async fn update_event(
        &self,
        event_id: &str,
        draft: &EventDraft,
    ) -> Result<CalendarItem, CalendarError> {
        let url = self.primary_event_url(event_id);
        let body = event_body(draft, self.tz);
        let event: ApiEvent = self.client.put_json(&url, &body).await?;
        self.normalize_mutation_result(event).await
    }

    /// Delete an event from the primary calendar.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError> {
        let url = self.primary_event_url(event_id);
        Ok(self.client.delete(&url).await?)
    }

    /// The account's color palette from the colors endpoint.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn color_palette(&self) -> Result<ColorPalette, CalendarError> {
        let url = format!("{}/colors", self.base_url);
        Ok(self.client.get_json(&url).await?)
    }

    fn primary_event_url(&self, event_id: &str) -> String {
        format!(
            "{}/calendars/{}/events/{}",
            self.base_url,
            PRIMARY_CALENDAR,
            urlencoding::encode(event_id)
        )
    }

    /// Mutation responses carry no calendar context, so the primary
    /// calendar's color signal is fetched for resolution. A failed signal
    /// fetch degrades to default colors rather than failing the mutation.
    async fn normalize_mutation_result(
        &self,
        event: ApiEvent,
    ) -> Result<CalendarItem, CalendarError> {
        let signal = self.primary_color_signal().await;
        normalize_event(&event, signal.as_ref(), self.resolver.as_ref())
            .ok_or_else(|| CalendarError::InvalidEvent(format!("event {} has no times", event.id)))
    }

    async fn primary_color_signal(&self) -> Option<CalendarColorSignal> {
        let url = format!("{}/users/me/calendarList/{}", self.base_url, PRIMARY_CALENDAR);
        match self.client.get_json::<ApiCalendar>(&url).await {
            Ok(calendar) => Some(calendar_signal(&calendar)),
            Err(e) => {
                tracing::warn!("Could not fetch primary calendar colors: {}", e);
                None
            }
        }
    }
}
