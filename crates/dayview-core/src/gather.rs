//! Concurrency-limited gather for per-resource fan-out.
//!
//! Gateways issue one listing request per calendar or task list. Account
//! sizes are small, but the fan-out is still bounded so a pathological
//! account cannot open an unbounded number of in-flight requests. The limit
//! comes from configuration, not a hardcoded constant.

use std::future::Future;

use futures::stream::{self, StreamExt};

/// Run `f` over `items` with at most `limit` futures in flight.
///
/// Results come back in input order. A limit of zero is treated as one.
pub async fn bounded_gather<I, T, F, Fut, O>(limit: usize, items: I, f: F) -> Vec<O>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = O>,
{
    stream::iter(items.into_iter())
        .map(f)
        .buffered(limit.max(1))
        .collect()
        .await
}
