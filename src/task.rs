//! Spawned Continuations
//!
//! Event handlers and navigations return immediately; any asynchronous work
//! they start (fetch, upload, create) runs as a spawned task. The handles are
//! collected in a `Pending` so that callers who care (tests, the CLI) can wait
//! for the work to settle. Hosts are free to drop it.

use futures_util::future::BoxFuture;
use tokio::task::JoinHandle;

/// Asynchronous continuations started by a dispatch or a navigation
#[derive(Debug, Default)]
#[must_use = "drop explicitly to fire and forget, or await `settled()`"]
pub struct Pending {
    handles: Vec<JoinHandle<()>>,
}

impl Pending {
    /// Nothing was started
    pub fn none() -> Self {
        Self::default()
    }

    /// Spawn a continuation on the current runtime
    pub fn spawn(future: BoxFuture<'static, ()>) -> Self {
        let mut pending = Self::none();
        pending.push(future);
        pending
    }

    /// Spawn another continuation into this set.
    ///
    /// Without a runtime the continuation cannot run; it is dropped and
    /// logged rather than panicking inside an event handler.
    pub fn push(&mut self, future: BoxFuture<'static, ()>) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => self.handles.push(handle.spawn(future)),
            Err(_) => {
                tracing::error!("No async runtime available, dropping continuation");
            }
        }
    }

    /// Merge another set of continuations into this one
    pub fn extend(&mut self, other: Pending) {
        self.handles.extend(other.handles);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every continuation to finish
    pub async fn settled(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Continuation panicked or was cancelled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_settled_waits_for_all() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut pending = Pending::none();

        for _ in 0..3 {
            let counter = counter.clone();
            pending.push(
                async move {
                    tokio::task::yield_now().await;
                    counter.fetch_add(1, Ordering::SeqCst);
                }
                .boxed(),
            );
        }

        assert_eq!(pending.len(), 3);
        pending.settled().await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_without_runtime_drops_continuation() {
        let pending = Pending::spawn(async {}.boxed());
        assert!(pending.is_empty());
    }
}
