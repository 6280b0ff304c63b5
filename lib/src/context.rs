use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::Error;

/// Cancellation and deadline carried into a send.
///
/// A background context never fires. Work run under a context is dropped as
/// soon as the token is cancelled or the deadline passes, which aborts any
/// request still in flight.
#[derive(Clone, Debug, Default)]
pub struct Context {
    deadline: Option<Instant>,
    token: Option<CancellationToken>,
}

impl Context {
    pub fn background() -> Self {
        Default::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self::background().deadline(deadline)
    }

    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self::background().cancellation(token)
    }

    /// Set a deadline. If one is already set, the earlier of the two is kept.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        self.deadline(Instant::now() + timeout)
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn get_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.as_ref().map_or(false, |t| t.is_cancelled())
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.map_or(false, |d| d <= Instant::now())
    }

    /// Drive `work` to completion unless the context fires first.
    ///
    /// Cancellation is checked before the deadline, and both before `work`,
    /// so an already-dead context never polls `work` at all.
    pub async fn run<F, T>(&self, work: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        let cancelled = async {
            match self.token {
                Some(ref token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(Error::Cancelled),
            _ = expired => Err(Error::DeadlineExceeded),
            res = work => res,
        }
    }
}
