//! Observable store state.

use brandkit_core::ClientError;
use std::future::Future;
use tokio::sync::watch;

/// What a store exposes to observers at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

/// Holds a store's data together with its `loading` and `error` flags.
///
/// Every update is a single `send_modify`, so observers never see a torn
/// state and concurrent operations are last-writer-wins per update.
#[derive(Debug)]
pub(crate) struct StoreState<T> {
    tx: watch::Sender<StoreSnapshot<T>>,
}

impl<T: Clone> StoreState<T> {
    pub(crate) fn new(data: T) -> Self {
        let (tx, _) = watch::channel(StoreSnapshot {
            data,
            loading: false,
            error: None,
        });
        Self { tx }
    }

    pub(crate) fn snapshot(&self) -> StoreSnapshot<T> {
        self.tx.borrow().clone()
    }

    pub(crate) fn data(&self) -> T {
        self.tx.borrow().data.clone()
    }

    pub(crate) fn loading(&self) -> bool {
        self.tx.borrow().loading
    }

    pub(crate) fn error(&self) -> Option<String> {
        self.tx.borrow().error.clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<StoreSnapshot<T>> {
        self.tx.subscribe()
    }

    /// Mutate the data in one atomic update.
    pub(crate) fn modify(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(|snapshot| f(&mut snapshot.data));
    }

    /// Record a failure message. The data is left as it was.
    pub(crate) fn fail(&self, message: String) {
        self.tx.send_modify(|snapshot| snapshot.error = Some(message));
    }

    /// Mark an operation as started: `loading` is set and the previous error
    /// cleared. `loading` is reset when the returned guard drops, whichever
    /// way the operation ends.
    pub(crate) fn begin(&self) -> LoadingGuard<'_, T> {
        self.tx.send_modify(|snapshot| {
            snapshot.loading = true;
            snapshot.error = None;
        });
        LoadingGuard { state: self }
    }

    /// Run `operation` between [`begin`](Self::begin) and the guard drop,
    /// recording its error message on failure.
    pub(crate) async fn run<R, Fut>(&self, operation: Fut) -> Result<R, ClientError>
    where
        Fut: Future<Output = Result<R, ClientError>>,
    {
        let _guard = self.begin();
        let result = operation.await;
        if let Err(error) = &result {
            self.fail(error.to_string());
        }
        result
    }
}

/// Resets `loading` on drop.
pub(crate) struct LoadingGuard<'a, T> {
    state: &'a StoreState<T>,
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        self.state.tx.send_modify(|snapshot| snapshot.loading = false);
    }
}
