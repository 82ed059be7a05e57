//! Shared list/mutate discipline for admin screens.
//!
//! Every screen keeps its rows in a [`CrudScreen`]. Mutations go through
//! [`CrudScreen::mutate`], which
//!
//! - rejects a second mutation on a row that already has one in flight,
//! - turns a backend failure into a blocking alert (the backend `detail` when
//!   present, else the action's fallback message),
//! - leaves refetching to the caller, which reloads only on success.
//!
//! Deletes go through [`CrudScreen::delete`], which asks [`Confirm`] first.

use std::collections::HashSet;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use catalogue_client::ApiError;

use crate::confirm::Confirm;
use crate::error::CrudError;

/// Rows, in-flight row keys and the current alert of one screen.
#[derive(Debug)]
pub struct CrudScreen<K, T> {
    rows: Mutex<Vec<T>>,
    pending: Mutex<HashSet<K>>,
    alert: Mutex<Option<String>>,
}

impl<K, T> Default for CrudScreen<K, T> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            pending: Mutex::new(HashSet::new()),
            alert: Mutex::new(None),
        }
    }
}

impl<K, T> CrudScreen<K, T>
where
    K: Eq + Hash + Copy + Display,
    T: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Snapshot of the rows.
    #[must_use]
    pub fn rows(&self) -> Vec<T> {
        lock(&self.rows).clone()
    }

    /// Replace the rows after a fetch.
    pub fn set_rows(&self, rows: Vec<T>) {
        *lock(&self.rows) = rows;
    }

    /// First row matching `predicate`.
    #[must_use]
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        lock(&self.rows).iter().find(|row| predicate(row)).cloned()
    }

    // =========================================================================
    // Alerts
    // =========================================================================

    /// The alert raised by the last failed mutation, until dismissed.
    #[must_use]
    pub fn alert(&self) -> Option<String> {
        lock(&self.alert).clone()
    }

    pub fn dismiss_alert(&self) {
        lock(&self.alert).take();
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Whether `key` has a mutation in flight.
    #[must_use]
    pub fn is_pending(&self, key: K) -> bool {
        lock(&self.pending).contains(&key)
    }

    /// Run `op` as the only mutation of row `key`.
    ///
    /// # Errors
    ///
    /// Returns `CrudError::Busy` without running `op` when the row already has
    /// a mutation in flight, and `CrudError::Rejected` when `op` fails.
    pub async fn mutate<R, Fut>(&self, key: K, fallback: &str, op: Fut) -> Result<R, CrudError>
    where
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let _row = self.claim(key)?;
        match op.await {
            Ok(value) => Ok(value),
            Err(e) => {
                let err = CrudError::rejected(e, fallback);
                tracing::warn!(row = %key, error = %err, "Admin mutation failed");
                *lock(&self.alert) = err.alert().map(str::to_string);
                Err(err)
            }
        }
    }

    /// Ask `confirm` with `prompt`, then run `op` like [`mutate`](Self::mutate).
    ///
    /// # Errors
    ///
    /// Returns `CrudError::Cancelled` if the operator declines, otherwise as
    /// [`mutate`](Self::mutate).
    pub async fn delete<R, Fut>(
        &self,
        key: K,
        confirm: &dyn Confirm,
        prompt: &str,
        fallback: &str,
        op: Fut,
    ) -> Result<R, CrudError>
    where
        Fut: Future<Output = Result<R, ApiError>>,
    {
        if !confirm.confirm(prompt) {
            return Err(CrudError::Cancelled);
        }
        self.mutate(key, fallback, op).await
    }

    fn claim(&self, key: K) -> Result<PendingRow<'_, K>, CrudError> {
        if !lock(&self.pending).insert(key) {
            return Err(CrudError::Busy(key.to_string()));
        }
        Ok(PendingRow {
            pending: &self.pending,
            key,
        })
    }
}

/// Marks a row busy until dropped.
struct PendingRow<'a, K: Eq + Hash> {
    pending: &'a Mutex<HashSet<K>>,
    key: K,
}

impl<K: Eq + Hash> Drop for PendingRow<'_, K> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.key);
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use catalogue_client::StatusCode;
    use tokio::sync::oneshot;

    use super::*;
    use crate::confirm::AutoConfirm;

    fn failure() -> ApiError {
        ApiError::from_status(StatusCode::BAD_REQUEST, br#"{"detail":"Slug already exists"}"#)
    }

    #[tokio::test]
    async fn test_second_mutation_on_busy_row_is_rejected() {
        let screen: CrudScreen<i64, ()> = CrudScreen::new();
        let (release, held) = oneshot::channel::<()>();

        let first = screen.mutate(1, "Failed", async move {
            held.await.ok();
            Ok::<_, ApiError>("first")
        });
        let second = async {
            assert!(screen.is_pending(1));
            let result = screen
                .mutate(1, "Failed", async { Ok::<_, ApiError>("second") })
                .await;
            release.send(()).ok();
            result
        };

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first.unwrap(), "first");
        assert!(matches!(second, Err(CrudError::Busy(row)) if row == "1"));
        assert!(!screen.is_pending(1));
    }

    #[tokio::test]
    async fn test_other_rows_are_not_blocked() {
        let screen: CrudScreen<i64, ()> = CrudScreen::new();
        let (release, held) = oneshot::channel::<()>();

        let first = screen.mutate(1, "Failed", async move {
            held.await.ok();
            Ok::<_, ApiError>(())
        });
        let second = async {
            let result = screen.mutate(2, "Failed", async { Ok::<_, ApiError>(()) }).await;
            release.send(()).ok();
            result
        };

        let (first, second) = tokio::join!(first, second);
        assert!(first.is_ok());
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_failure_raises_alert_and_releases_row() {
        let screen: CrudScreen<i64, ()> = CrudScreen::new();
        let err = screen
            .mutate(1, "Failed to save category", async { Err::<(), _>(failure()) })
            .await
            .unwrap_err();

        assert_eq!(err.alert(), Some("Slug already exists"));
        assert_eq!(screen.alert().as_deref(), Some("Slug already exists"));
        assert!(!screen.is_pending(1));

        screen.dismiss_alert();
        assert!(screen.alert().is_none());
    }

    #[tokio::test]
    async fn test_declined_delete_never_runs() {
        let screen: CrudScreen<i64, ()> = CrudScreen::new();
        let ran = AtomicBool::new(false);
        let result = screen
            .delete(1, &AutoConfirm(false), "Sure?", "Failed", async {
                ran.store(true, Ordering::SeqCst);
                Ok::<(), ApiError>(())
            })
            .await;
        assert!(matches!(result, Err(CrudError::Cancelled)));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_confirm_sees_prompt() {
        let screen: CrudScreen<i64, ()> = CrudScreen::new();
        let confirm = |message: &str| message == "Delete row 1?";
        let result = screen
            .delete(1, &confirm, "Delete row 1?", "Failed", async { Ok::<_, ApiError>(7) })
            .await;
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn test_rows() {
        let screen: CrudScreen<i64, (i64, &str)> = CrudScreen::new();
        screen.set_rows(vec![(1, "Men"), (2, "Women")]);
        assert_eq!(screen.rows().len(), 2);
        assert_eq!(screen.find(|row| row.0 == 2).unwrap().1, "Women");
    }
}
