//! Google Calendar gateway: wire types, event normalization, and the
//! authenticated API surface for listing and mutating events.

pub mod error;
pub mod gateway;
pub mod normalize;
pub mod types;

pub use error::CalendarError;
pub use gateway::CalendarGateway;
pub use normalize::{calendar_signal, event_body, local_to_instant, normalize_event, EventDraft};
pub use types::{ApiAttendee, ApiCalendar, ApiEvent, ApiEventTime};
