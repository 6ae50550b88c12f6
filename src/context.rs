//! Request-scoped cancellation and deadlines.
//!
//! Every store call receives a [`RequestContext`]. Work bound to the context is
//! abandoned as soon as the request is cancelled (the client went away) or the
//! deadline passes, whichever comes first.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::db::StoreError;

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context with no deadline. Only explicit cancellation stops it.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    ///
    /// A timeout too large to represent leaves the context without a deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns a guard that cancels this context when dropped.
    ///
    /// Handlers hold the guard for their whole lifetime, so a handler future
    /// dropped by the server on client disconnect cancels in-flight queries.
    pub fn drop_guard(&self) -> DropGuard {
        self.cancel.clone().drop_guard()
    }

    /// Drive a database future under this context.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        if self.cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }

        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(StoreError::Cancelled),
                res = fut => res.map_err(StoreError::from),
            }
        };

        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .map_err(|_| StoreError::DeadlineExceeded)?,
            None => guarded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_passes_through_result() {
        let ctx = RequestContext::new();
        let value = ctx.run(async { Ok::<_, sqlx::Error>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_run_maps_driver_errors() {
        let ctx = RequestContext::new();
        let err = ctx
            .run(async { Err::<(), _>(sqlx::Error::PoolTimedOut) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[tokio::test]
    async fn test_cancelled_context_short_circuits() {
        let ctx = RequestContext::new();
        ctx.cancel();
        let err = ctx
            .run(async { Ok::<_, sqlx::Error>(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_work() {
        let ctx = RequestContext::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let err = ctx
            .run(std::future::pending::<Result<(), sqlx::Error>>())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(50));
        let err = ctx
            .run(std::future::pending::<Result<(), sqlx::Error>>())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_unrepresentable_timeout_does_not_expire() {
        let ctx = RequestContext::with_timeout(Duration::MAX);
        let value = ctx.run(async { Ok::<_, sqlx::Error>("done") }).await.unwrap();
        assert_eq!(value, "done");
    }

    #[tokio::test]
    async fn test_drop_guard_cancels() {
        let ctx = RequestContext::new();
        {
            let _guard = ctx.drop_guard();
            assert!(!ctx.is_cancelled());
        }
        assert!(ctx.is_cancelled());
    }
}
