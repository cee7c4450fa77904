//! Request-scoped context with cancellation and deadline support
//!
//! Pass this as part of every request so long-running API calls can observe
//! cancellation across async boundaries.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time;

#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    deadline: Option<Instant>,
    done: watch::Receiver<bool>,
    done_tx: watch::Sender<bool>,
}

impl Context {
    pub fn new() -> Self {
        let (done_tx, done_rx) = watch::channel(false);

        Self {
            inner: Arc::new(ContextInner {
                deadline: None,
                done: done_rx,
                done_tx,
            }),
        }
    }

    /// Derive a context that cancels itself once the timeout elapses
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        let (done_tx, done_rx) = watch::channel(false);

        let timeout_tx = done_tx.clone();
        tokio::spawn(async move {
            time::sleep_until(deadline.into()).await;
            let _ = timeout_tx.send(true);
        });

        Self {
            inner: Arc::new(ContextInner {
                deadline: Some(deadline),
                done: done_rx,
                done_tx,
            }),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.done.borrow()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Returns a channel that flips to true when work done on behalf of this
    /// context should stop
    pub fn done(&self) -> watch::Receiver<bool> {
        self.inner.done.clone()
    }

    pub fn cancel(&self) {
        let _ = self.inner.done_tx.send(true);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn context_timeout_cancels() {
        let ctx = Context::new().with_timeout(Duration::from_millis(100));

        assert!(!ctx.is_cancelled());

        sleep(Duration::from_millis(150)).await;

        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn context_manual_cancel() {
        let ctx = Context::new();

        assert!(!ctx.is_cancelled());

        ctx.cancel();

        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn context_deadline() {
        let ctx = Context::new();
        assert!(ctx.deadline().is_none());

        let ctx_with_timeout = ctx.with_timeout(Duration::from_secs(1));
        assert!(ctx_with_timeout.deadline().is_some());
    }

    #[tokio::test]
    async fn cloned_context_observes_cancellation() {
        let ctx = Context::new();
        let clone = ctx.clone();

        ctx.cancel();

        assert!(clone.is_cancelled());
    }
}
