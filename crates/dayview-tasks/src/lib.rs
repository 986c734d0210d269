//! Google Tasks gateway: wire types, task normalization, and the
//! authenticated API surface for listing tasks and toggling completion.

pub mod error;
pub mod gateway;
pub mod normalize;
pub mod types;

pub use error::TasksError;
pub use gateway::TasksGateway;
pub use normalize::normalize_task;
pub use types::{ApiTask, ApiTaskList};
