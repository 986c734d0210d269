//! Agenda aggregation: merges calendar events and tasks into one ordered
//! collection, tracks load lifecycle, and mutates optimistically.

pub mod agenda;
pub mod error;
pub mod optimistic;
pub mod ports;
pub mod state;

pub use agenda::Agenda;
pub use error::AgendaError;
pub use optimistic::with_optimistic;
pub use ports::{EventOps, TaskOps};
pub use state::{AgendaState, LoadState};
