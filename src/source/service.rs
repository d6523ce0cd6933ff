//! Olympic data service: the single owner of the cached snapshot.
//!
//! # Responsibilities
//! - Load the payload once at start-up and on explicit reloads
//! - De-duplicate before publishing
//! - Broadcast `{snapshot, is_loading}` to every subscriber
//! - Resolve lookups by country name
//!
//! # Design Decisions
//! - One writer (`watch::Sender`), any number of readers
//! - State is replaced as a whole, so readers never see half a load
//! - Failures publish an empty snapshot; subscribers never see an error
//! - Loads are serialized; a reload waits for the one in flight

use std::sync::Arc;
use std::time::Instant;

use futures_util::stream::{self, Stream};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::config::SourceConfig;
use crate::models::{dedupe, CountryRecord};
use crate::observability::metrics;
use crate::source::fetch::{Fetcher, LoadError};

/// Shared, immutable country collection.
pub type Snapshot = Arc<[CountryRecord]>;

/// Combined view of the cached data and the loading flag.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub snapshot: Snapshot,
    pub is_loading: bool,
    /// Number of completed load attempts, successful or not.
    pub generation: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            snapshot: Arc::from(Vec::new()),
            is_loading: false,
            generation: 0,
        }
    }
}

impl DashboardState {
    /// True once at least one load finished and none is running.
    pub fn is_settled(&self) -> bool {
        !self.is_loading && self.generation > 0
    }

    pub fn country(&self, name: &str) -> Option<&CountryRecord> {
        self.snapshot.iter().find(|record| record.country == name)
    }
}

type Projection<T> = Box<dyn Fn(&DashboardState) -> T + Send + Sync>;

/// A continuously-updated projection of the service state.
///
/// Dropping the view stops observation.
pub struct StateView<T> {
    rx: watch::Receiver<DashboardState>,
    project: Projection<T>,
}

impl<T> StateView<T> {
    fn new(rx: watch::Receiver<DashboardState>, project: Projection<T>) -> Self {
        Self { rx, project }
    }

    /// Value for the latest published state.
    pub fn current(&mut self) -> T {
        let state = self.rx.borrow_and_update();
        (self.project)(&state)
    }

    /// Wait for the next state replacement. `None` once the service is gone.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }

    /// Stream yielding the current value first, then every replacement.
    pub fn into_stream(self) -> impl Stream<Item = T> + Send + 'static
    where
        T: Send + 'static,
    {
        stream::unfold((self, true), |(mut view, first)| async move {
            let value = if first {
                view.current()
            } else {
                view.changed().await?
            };
            Some((value, (view, false)))
        })
    }
}

/// Handle for a callback registered with [`OlympicService::subscribe`].
///
/// Delivery stops when the handle is cancelled or dropped.
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An in-flight load that still owes subscribers a settled state.
///
/// Dropped without [`PendingLoad::complete`], it publishes an empty
/// snapshot so `is_loading` never stays stuck.
struct PendingLoad<'a> {
    state_tx: &'a watch::Sender<DashboardState>,
    started: Instant,
    done: bool,
}

impl PendingLoad<'_> {
    fn complete(mut self, snapshot: Snapshot) {
        publish(self.state_tx, snapshot);
        self.done = true;
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        tracing::warn!(
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Load cancelled before completion, publishing empty snapshot"
        );
        metrics::record_load("cancelled", self.started);
        publish(self.state_tx, Arc::from(Vec::new()));
    }
}

fn publish(state_tx: &watch::Sender<DashboardState>, snapshot: Snapshot) {
    metrics::record_snapshot_size(snapshot.len());
    state_tx.send_modify(|state| {
        state.snapshot = snapshot;
        state.is_loading = false;
        state.generation += 1;
    });
}

/// Loads, caches and broadcasts the Olympic country collection.
pub struct OlympicService {
    fetcher: Fetcher,
    state_tx: watch::Sender<DashboardState>,
    load_lock: Mutex<()>,
}

impl OlympicService {
    pub fn new(fetcher: Fetcher) -> Self {
        let (state_tx, _) = watch::channel(DashboardState::default());
        Self {
            fetcher,
            state_tx,
            load_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, LoadError> {
        Ok(Self::new(Fetcher::from_config(config)?))
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Fetch the payload and publish it as the new snapshot.
    ///
    /// Any failure is logged and published as an empty snapshot. The loading
    /// flag is always cleared, even if the returned future is dropped
    /// before the fetch completes.
    pub async fn load_initial_data(&self) -> Snapshot {
        let _lock = self.load_lock.lock().await;
        self.state_tx.send_modify(|state| state.is_loading = true);

        let started = Instant::now();
        let pending = PendingLoad {
            state_tx: &self.state_tx,
            started,
            done: false,
        };
        tracing::info!(source = %self.fetcher.source(), "Loading Olympic data");

        let snapshot: Snapshot = match self.fetcher.fetch().await {
            Ok(records) => {
                let cleaned = dedupe(records);
                tracing::info!(
                    countries = cleaned.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Olympic data loaded"
                );
                metrics::record_load("success", started);
                cleaned.into()
            }
            Err(e) => {
                tracing::error!(
                    source = %self.fetcher.source(),
                    error = %e,
                    "loadInitialData failed, publishing empty snapshot"
                );
                metrics::record_load(e.kind(), started);
                Arc::from(Vec::new())
            }
        };

        pending.complete(snapshot.clone());
        snapshot
    }

    /// Explicit reload; an independent attempt with the same semantics as the initial load.
    pub async fn reload(&self) -> Snapshot {
        tracing::info!("Reload requested");
        self.load_initial_data().await
    }

    /// Current combined state.
    pub fn state(&self) -> DashboardState {
        self.state_tx.borrow().clone()
    }

    /// Raw receiver over the combined state.
    pub fn watch_state(&self) -> watch::Receiver<DashboardState> {
        self.state_tx.subscribe()
    }

    /// Continuously-updated projection of the combined state.
    pub fn watch<T, F>(&self, project: F) -> StateView<T>
    where
        F: Fn(&DashboardState) -> T + Send + Sync + 'static,
    {
        StateView::new(self.state_tx.subscribe(), Box::new(project))
    }

    /// The cached snapshot, empty until the first load completes.
    pub fn get_olympics(&self) -> StateView<Snapshot> {
        self.watch(|state| state.snapshot.clone())
    }

    pub fn get_loading_state(&self) -> StateView<bool> {
        self.watch(|state| state.is_loading)
    }

    /// The record named `name` in whatever snapshot is current.
    pub fn get_country_by_name(&self, name: impl Into<String>) -> StateView<Option<CountryRecord>> {
        let name = name.into();
        self.watch(move |state| state.country(&name).cloned())
    }

    /// Look a country up once loading has settled.
    ///
    /// Waits for the first load to finish, so a miss really means the
    /// country is not in the data.
    pub async fn find_country(&self, name: &str) -> Option<CountryRecord> {
        let mut rx = self.state_tx.subscribe();
        let state = match rx.wait_for(DashboardState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => return None,
        };

        let found = state.country(name).cloned();
        if found.is_none() {
            tracing::debug!(country = %name, "Country not found in snapshot");
        }
        found
    }

    /// Register a callback invoked with the current state and every replacement.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn subscribe<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(&DashboardState) + Send + 'static,
    {
        let mut rx = self.state_tx.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                let state = rx.borrow_and_update().clone();
                callback(&state);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
        Subscription { handle }
    }

    /// Number of live receivers, including views and subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state_tx.receiver_count()
    }
}
