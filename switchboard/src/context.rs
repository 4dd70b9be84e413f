//! Request-scoped cancellation.
//!
//! Every [`Request`](crate::Request) carries a [`RequestContext`]. Transports
//! race their work against [`RequestContext::done`] so that a caller who gives
//! up (explicit cancellation or an elapsed deadline) observes an
//! [`Interruption`] instead of waiting for the response.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a [`RequestContext`] finished before the work it scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    /// The context was cancelled explicitly.
    Cancelled,
    /// The context's deadline elapsed.
    DeadlineExceeded,
}

/// Cancellation scope for a single request.
///
/// Cloning is cheap and clones share the same cancellation state.
///
/// ## Examples
///
/// ```rust
/// use std::time::Duration;
/// use switchboard::RequestContext;
///
/// let ctx = RequestContext::background().with_timeout(Duration::from_secs(5));
/// assert!(ctx.deadline().is_some());
/// assert!(!ctx.is_done());
///
/// ctx.cancel();
/// assert!(ctx.is_done());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context with no deadline that is only done when cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a context whose deadline is `timeout` from now, or the
    /// existing deadline if that is sooner.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns a context with the given deadline, or the existing deadline
    /// if that is sooner.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        });
        self
    }

    /// A context that is cancelled when `self` is, but whose own
    /// cancellation does not propagate back to `self`.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns the interruption if the context is already done.
    pub fn interruption(&self) -> Option<Interruption> {
        if self.token.is_cancelled() {
            Some(Interruption::Cancelled)
        } else if self.deadline.is_some_and(|d| d <= Instant::now()) {
            Some(Interruption::DeadlineExceeded)
        } else {
            None
        }
    }

    pub fn is_done(&self) -> bool {
        self.interruption().is_some()
    }

    /// Resolves once the context is cancelled or its deadline elapses.
    pub async fn done(&self) -> Interruption {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => Interruption::Cancelled,
                _ = tokio::time::sleep_until(deadline) => Interruption::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                Interruption::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_is_not_done() {
        let ctx = RequestContext::background();
        assert_eq!(ctx.interruption(), None);
        assert_eq!(ctx.deadline(), None);
    }

    #[tokio::test]
    async fn test_cancel_resolves_done() {
        let ctx = RequestContext::background();
        let waiter = ctx.clone();
        let handle = tokio::spawn(async move { waiter.done().await });

        ctx.cancel();
        assert_eq!(handle.await.unwrap(), Interruption::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_resolves_done() {
        let ctx = RequestContext::background().with_timeout(Duration::from_millis(50));
        assert_eq!(ctx.done().await, Interruption::DeadlineExceeded);
        assert_eq!(ctx.interruption(), Some(Interruption::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_earlier_deadline_wins() {
        let ctx = RequestContext::background()
            .with_timeout(Duration::from_secs(1))
            .with_timeout(Duration::from_secs(60));
        let remaining = ctx.deadline().unwrap() - Instant::now();
        assert!(remaining <= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_child_cancellation_is_one_way() {
        let parent = RequestContext::background();
        let child = parent.child();

        child.cancel();
        assert!(child.is_done());
        assert!(!parent.is_done());

        let other_child = parent.child();
        parent.cancel();
        assert!(other_child.is_done());
    }
}
