use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
/// Per-call cancellation and deadline.
///
/// A call bound to a context fails with [`SignalAdsError::Transport`] as soon as
/// the token is cancelled or the deadline passes, aborting the in-flight request.
/// Dropping the call's future aborts it as well.
///
/// [`SignalAdsError::Transport`]: crate::SignalAdsError::Transport
pub struct CallContext {
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
/// Why a [`CallContext`] stopped a call.
pub enum ContextError {
    #[error("context canceled")]
    Canceled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

impl CallContext {
    /// A context that never cancels and has no deadline; only the client timeout applies.
    pub fn background() -> Self {
        Self::default()
    }

    /// Context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self::background().deadline(deadline)
    }

    /// Context cancelled together with `token`.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self::background().cancellation(token)
    }

    /// Set or tighten the deadline. An earlier existing deadline is kept.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn deadline_at(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline, `None` without one. Zero once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_canceled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Fail fast when the context is already done.
    pub(crate) fn check(&self) -> Result<(), ContextError> {
        if self.is_canceled() {
            return Err(ContextError::Canceled);
        }
        if self.remaining().is_some_and(|left| left.is_zero()) {
            return Err(ContextError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Resolves once the token is cancelled or the deadline passes.
    pub(crate) async fn done(&self) -> ContextError {
        let canceled = async {
            match &self.cancellation {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = canceled => ContextError::Canceled,
            () = expired => ContextError::DeadlineExceeded,
        }
    }
}
