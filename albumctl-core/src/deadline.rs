//! A single deadline shared by every step of a run.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{AlbumError, Result};

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Start the clock now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Run `fut` to completion unless the deadline passes first.
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout_at(self.at, fut).await {
            Ok(result) => result,
            Err(_) => Err(AlbumError::timeout(operation)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn completes_before_deadline() {
        let deadline = Deadline::after(Duration::from_secs(1));
        let value = deadline
            .run("quick", async { Ok::<_, AlbumError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_operation_times_out() {
        let deadline = Deadline::after(Duration::from_millis(50));
        let err = deadline
            .run("row count", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, AlbumError>(())
            })
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Timed out during row count");
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_is_shared_across_steps() {
        let deadline = Deadline::after(Duration::from_secs(1));

        deadline
            .run("first", async {
                tokio::time::sleep(Duration::from_millis(700)).await;
                Ok::<_, AlbumError>(())
            })
            .await
            .unwrap();
        assert!(deadline.remaining() <= Duration::from_millis(300));

        let err = deadline
            .run("second", async {
                tokio::time::sleep(Duration::from_millis(700)).await;
                Ok::<_, AlbumError>(())
            })
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(deadline.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn inner_errors_pass_through() {
        let deadline = Deadline::after(Duration::from_secs(1));
        let err = deadline
            .run("config", async { Err::<(), _>(AlbumError::config("boom")) })
            .await
            .unwrap_err();
        assert!(matches!(err, AlbumError::Config { .. }));
    }
}
