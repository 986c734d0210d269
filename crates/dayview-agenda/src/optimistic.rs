//! Reusable optimistic-mutation primitive.
//!
//! Pattern: apply the expected outcome to local state immediately, run the
//! remote operation, then either reconcile with the server's answer or roll
//! the local change back. The state lock is released before the operation
//! is awaited.

use std::future::Future;

use parking_lot::Mutex;

/// Run `op` with an optimistic local update.
///
/// `apply` runs under the lock before `op` starts. On success `commit` runs
/// under the lock with the operation's output; on failure `rollback` runs
/// instead. The operation's result is returned either way.
pub async fn with_optimistic<S, T, E, Fut>(
    state: &Mutex<S>,
    apply: impl FnOnce(&mut S),
    op: Fut,
    commit: impl FnOnce(&mut S, &T),
    rollback: impl FnOnce(&mut S),
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    apply(&mut state.lock());

    let result = op.await;

    match &result {
        Ok(value) => commit(&mut state.lock(), value),
        Err(_) => rollback(&mut state.lock()),
    }
    result
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[tokio::test]
    async fn test_success_applies_then_commits() {
        let state = Mutex::new(vec!["applied-pending".to_string(); 0]);
        let result: Result<i32, ()> = with_optimistic(
            &state,
            |s| s.push("optimistic".to_string()),
            async { Ok(42) },
            |s, value| s.push(format!("server:{value}")),
            |s| s.clear(),
        )
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(*state.lock(), vec!["optimistic".to_string(), "server:42".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_rolls_back() {
        let state = Mutex::new(vec![]);
        let result: Result<i32, &str> = with_optimistic(
            &state,
            |s: &mut Vec<String>| s.push("optimistic".to_string()),
            async { Err("boom") },
            |s, _| s.push("server".to_string()),
            |s| s.clear(),
        )
        .await;
        assert_eq!(result, Err("boom"));
        assert!(state.lock().is_empty());
    }

    #[tokio::test]
    async fn test_lock_is_free_while_op_runs() {
        let state = Mutex::new(0u32);
        let result: Result<(), ()> = with_optimistic(
            &state,
            |s| *s += 1,
            async {
                // A concurrent reader must not deadlock against the op.
                assert_eq!(*state.lock(), 1);
                Ok(())
            },
            |_, _| {},
            |_| {},
        )
        .await;
        assert!(result.is_ok());
    }
}
