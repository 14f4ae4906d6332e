//! View-level data lifecycle
//!
//! [`Resource`] is the fetch-on-mount / refetch-after-mutation state machine
//! every view is built on. It is parameterized by a fetch function and a
//! scoping key, exposes `{data, loading, error}` snapshots, and re-fetches
//! the whole collection after every mutation: no differential updates.
//!
//! Overlapping fetches are ordered by generation. Only the most recently
//! issued fetch may write state; older ones are aborted, and their late
//! responses dropped. `unmount` aborts everything in flight and discards
//! the resource so nothing writes to it afterwards.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{AbortHandle, Abortable, BoxFuture, FutureExt};
use tokio::sync::watch;
use tracing::debug;

use crate::error::ClientError;

type FetchFn<K, T> = Arc<dyn Fn(K) -> BoxFuture<'static, Result<T, ClientError>> + Send + Sync>;

/// Snapshot of one resource for one render
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState<T> {
    pub data: Option<T>,
    pub loading: bool,
    /// Last load failure; cleared when the next fetch starts
    pub error: Option<String>,
    /// Last failed user action; cleared when the next action starts
    pub action_error: Option<String>,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            action_error: None,
        }
    }
}

impl<T> LoadState<T> {
    /// The message a view shows inline, action failures first
    pub fn notice(&self) -> Option<&str> {
        self.action_error.as_deref().or(self.error.as_deref())
    }

    /// Still waiting for the first successful load
    pub fn is_initial_load(&self) -> bool {
        self.loading && self.data.is_none()
    }
}

struct Control<K> {
    key: Option<K>,
    generation: u64,
    in_flight: Vec<(u64, AbortHandle)>,
    discarded: bool,
}

struct Inner<K, T> {
    label: &'static str,
    fetch: FetchFn<K, T>,
    state: watch::Sender<LoadState<T>>,
    control: Mutex<Control<K>>,
}

pub struct Resource<K, T> {
    inner: Arc<Inner<K, T>>,
}

impl<K, T> Clone for Resource<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, T> Resource<K, T>
where
    K: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// `label` names the data in load-failure messages ("Failed to load {label}")
    pub fn new<F, Fut>(label: &'static str, fetch: F) -> Self
    where
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let (state, _) = watch::channel(LoadState::default());
        Self {
            inner: Arc::new(Inner {
                label,
                fetch: Arc::new(move |key| fetch(key).boxed()),
                state,
                control: Mutex::new(Control {
                    key: None,
                    generation: 0,
                    in_flight: Vec::new(),
                    discarded: false,
                }),
            }),
        }
    }

    fn control(&self) -> MutexGuard<'_, Control<K>> {
        self.inner.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> LoadState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.inner.state.subscribe()
    }

    pub fn key(&self) -> Option<K> {
        self.control().key.clone()
    }

    pub fn is_discarded(&self) -> bool {
        self.control().discarded
    }

    /// First load for `key`
    pub async fn mount(&self, key: K) -> LoadState<T> {
        self.control().key = Some(key);
        self.reload().await
    }

    /// Refetch only when the scoping key actually changed
    pub async fn set_key(&self, key: K) -> LoadState<T> {
        {
            let mut control = self.control();
            if control.key.as_ref() == Some(&key) {
                drop(control);
                return self.snapshot();
            }
            control.key = Some(key);
        }
        // Data scoped to the previous key must not be shown for the new one
        self.inner.state.send_modify(|state| state.data = None);
        self.reload().await
    }

    /// Fetch again with the current key
    pub async fn reload(&self) -> LoadState<T> {
        let (generation, key, registration) = {
            let mut control = self.control();
            if control.discarded {
                drop(control);
                return self.snapshot();
            }
            let Some(key) = control.key.clone() else {
                drop(control);
                return self.snapshot();
            };

            // Superseded fetches could only write stale data
            for (_, handle) in control.in_flight.drain(..) {
                handle.abort();
            }

            control.generation += 1;
            let (handle, registration) = AbortHandle::new_pair();
            let generation = control.generation;
            control.in_flight.push((generation, handle));
            (generation, key, registration)
        };

        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let outcome = Abortable::new((self.inner.fetch)(key), registration).await;

        let is_current = {
            let mut control = self.control();
            control.in_flight.retain(|(g, _)| *g != generation);
            !control.discarded && control.generation == generation
        };

        match outcome {
            Err(_aborted) => {
                debug!("{} fetch #{} aborted", self.inner.label, generation);
            }
            Ok(_) if !is_current => {
                debug!("dropping stale {} response #{}", self.inner.label, generation);
            }
            Ok(Ok(data)) => {
                self.inner.state.send_modify(|state| {
                    state.data = Some(data);
                    state.loading = false;
                    state.error = None;
                });
            }
            Ok(Err(e)) => {
                debug!("{} fetch #{} failed: {}", self.inner.label, generation, e);
                let message = format!("Failed to load {}: {}", self.inner.label, e);
                // Previous data stays visible next to the error
                self.inner.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(message);
                });
            }
        }

        self.snapshot()
    }

    /// Run a user action and record its failure, without reloading
    pub async fn act<R, Fut>(&self, action: &str, mutation: Fut) -> Result<R, ClientError>
    where
        Fut: Future<Output = Result<R, ClientError>>,
    {
        if !self.is_discarded() {
            self.inner.state.send_modify(|state| state.action_error = None);
        }

        let result = mutation.await;

        if let Err(e) = &result {
            if !self.is_discarded() {
                let message = format!("{}: {}", action, e);
                self.inner.state.send_modify(|state| state.action_error = Some(message));
            }
        }
        result
    }

    /// Run a mutation, then re-fetch the collection whatever the outcome
    ///
    /// The reload is issued only after the mutation completes. Validation
    /// failures never reached the service, so they skip the reload.
    pub async fn mutate<R, Fut>(&self, action: &str, mutation: Fut) -> Result<R, ClientError>
    where
        Fut: Future<Output = Result<R, ClientError>>,
    {
        let result = self.act(action, mutation).await;
        if !matches!(result, Err(ClientError::Validation { .. })) {
            self.reload().await;
        }
        result
    }

    /// Tear down: abort in-flight fetches and ignore anything that arrives later
    pub fn unmount(&self) {
        let mut control = self.control();
        control.discarded = true;
        for (_, handle) in control.in_flight.drain(..) {
            handle.abort();
        }
    }
}
