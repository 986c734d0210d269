//! Shared foundation for Dayview: configuration, error types, the unified
//! calendar item model, color resolution, and small async helpers.

pub mod color;
pub mod config;
pub mod error;
pub mod gather;
pub mod item;
pub mod kv;
pub mod range;
pub mod theme;

pub use color::{
    by_google_color_id, config_for, nearest_canonical, CalendarColorSignal, ColorPalette,
    ColorResolver, ColorStrategyKind, EventColor, EventColorConfig, PaletteEntry,
    PaletteResolver, PassthroughResolver, ResolvedColor, SnapResolver, EVENT_COLORS,
};
pub use config::Config;
pub use error::{AppError, ConfigError, StorageError};
pub use gather::bounded_gather;
pub use item::{
    sort_by_start, Attendee, CalendarItem, ItemDetail, ItemKey, ItemKind, ItemTime,
    ResponseStatus, TaskStatus,
};
pub use kv::KvStore;
pub use range::DateRange;
pub use theme::ThemeMode;

/// Initialize tracing with an env-filter (RUST_LOG), defaulting to `info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
