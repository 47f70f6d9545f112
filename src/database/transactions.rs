// ABOUTME: Rollback-on-drop transaction guard and bounded retry for SQLite lock contention
// ABOUTME: One recipe write is one guarded transaction; only lock/busy failures are retried
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Transaction management for the recipe write path
//!
//! A write opens a [`SqliteTransactionGuard`], runs every statement through
//! [`TransactionGuard::executor`], and calls [`TransactionGuard::commit`] as
//! its last step. Returning early with `?` drops the guard, and `SQLx` rolls
//! the transaction back.
//!
//! ```text
//! retry_transaction(|| async {
//!     let mut guard = database.begin().await?;
//!     recipes::insert(guard.executor()?, &new_recipe).await?;
//!     relations::delete_steps(guard.executor()?, id).await?;
//!     guard.commit().await
//! }, 3).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use sqlx::{Database, Transaction};
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::errors::{AppError, AppResult, ErrorCode};

/// Run `f` again when it fails with a transient lock error
///
/// `max_retries` bounds the total number of attempts. Backoff doubles from
/// 20ms. Validation, not-found, and constraint failures return immediately.
///
/// # Errors
///
/// Returns the last error once attempts are exhausted, or the first
/// non-retryable error.
pub async fn retry_transaction<F, Fut, T>(mut f: F, max_retries: u32) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempts: u32 = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempts += 1;
                if !is_transient(&e) {
                    return Err(e);
                }
                if attempts >= max_retries.max(1) {
                    error!(
                        attempts,
                        max_retries,
                        error = %e,
                        "Transaction failed after max retries"
                    );
                    return Err(e);
                }

                let backoff_ms = 10_u64 << attempts.min(6);
                warn!(
                    attempt = attempts,
                    backoff_ms,
                    error = %e,
                    "Transaction hit lock contention, retrying after backoff"
                );
                sleep(Duration::from_millis(backoff_ms)).await;
            }
        }
    }
}

/// Lock contention and busy timeouts are the only failures worth repeating
fn is_transient(error: &AppError) -> bool {
    if error.code != ErrorCode::DatabaseError {
        return false;
    }
    let message = error.message.to_lowercase();
    if message.contains("constraint") {
        return false;
    }
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("busy")
        || message.contains("timed out")
}

/// Guard that rolls back its transaction unless [`commit`](Self::commit) is called
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Wrap a freshly begun transaction
    #[must_use]
    pub const fn new(transaction: Transaction<'c, DB>) -> Self {
        Self {
            transaction: Some(transaction),
        }
    }

    /// Commit and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails
    pub async fn commit(mut self) -> AppResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot commit"))?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Transaction commit failed: {e}")))?;
        debug!("Transaction committed");
        Ok(())
    }

    /// Connection to run statements on inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the guard has already been committed
    pub fn executor(&mut self) -> AppResult<&mut <DB as Database>::Connection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit")
        })
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            warn!("Transaction dropped without commit, rolling back");
        }
    }
}

/// `SQLite` transaction guard
pub type SqliteTransactionGuard<'c> = TransactionGuard<'c, sqlx::Sqlite>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retries_lock_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result = retry_transaction(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(AppError::database("database is locked"))
                    } else {
                        Ok(n)
                    }
                }
            },
            3,
        )
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_validation_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: AppResult<()> = retry_transaction(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::invalid_input("bad step number")) }
            },
            5,
        )
        .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::InvalidInput);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: AppResult<()> = retry_transaction(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::database("database is locked")) }
            },
            2,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
