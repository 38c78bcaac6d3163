//! Recompute passes: selection in, dashboard view out.
//!
//! [`DashboardSession`] runs a pass synchronously and remembers the last
//! valid view. [`Recomputer`] runs passes on the blocking pool and drops any
//! result that a newer submission has superseded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::analyzers::{DashboardView, aggregate};
use crate::dataset::RecordStore;
use crate::error::{RecomputeError, ValidationError};
use crate::filter::{FilterCriteria, RawSelection, apply};

/// Filters `store` by `criteria` and aggregates the result.
#[tracing::instrument(skip_all, fields(records = store.len(), top_routes = top_routes))]
pub fn recompute(store: &RecordStore, criteria: &FilterCriteria, top_routes: usize) -> DashboardView {
    let subset = apply(store, criteria);
    let view = aggregate(&subset, top_routes);
    debug!(matched = subset.len(), "Recompute finished");
    view
}

/// Resolves a raw selection, defaulting an untouched date picker to the data span.
pub fn resolve(store: &RecordStore, raw: &RawSelection) -> Result<FilterCriteria, ValidationError> {
    let raw = raw.clone().with_default_dates(store);
    FilterCriteria::resolve(store, &raw)
}

/// One interactive session over a loaded dataset.
#[derive(Debug)]
pub struct DashboardSession {
    store: Arc<RecordStore>,
    top_routes: usize,
    current: Option<Arc<DashboardView>>,
}

impl DashboardSession {
    pub fn new(store: Arc<RecordStore>, top_routes: usize) -> Self {
        Self {
            store,
            top_routes,
            current: None,
        }
    }

    /// Recomputes the view for `raw`.
    ///
    /// On a validation error the previous view stays current.
    pub fn refresh(&mut self, raw: &RawSelection) -> Result<Arc<DashboardView>, ValidationError> {
        let criteria = resolve(&self.store, raw).inspect_err(|e| {
            warn!(error = %e, "Selection rejected, keeping previous view");
        })?;

        let view = Arc::new(recompute(&self.store, &criteria, self.top_routes));
        self.current = Some(view.clone());
        Ok(view)
    }

    pub fn current(&self) -> Option<Arc<DashboardView>> {
        self.current.clone()
    }

}

/// A view together with the submission that produced it.
#[derive(Debug, Clone)]
pub struct Published {
    pub generation: u64,
    pub view: Arc<DashboardView>,
}

/// Background recomputation that only ever publishes the newest submission.
pub struct Recomputer {
    store: Arc<RecordStore>,
    requests: mpsc::UnboundedSender<(u64, FilterCriteria)>,
    generation: Arc<AtomicU64>,
    discarded: Arc<AtomicU64>,
    results: watch::Receiver<Option<Published>>,
    worker: JoinHandle<()>,
}

impl Recomputer {
    /// Starts the worker task. Must be called inside a tokio runtime.
    pub fn spawn(store: Arc<RecordStore>, top_routes: usize) -> Self {
        let (requests, rx) = mpsc::unbounded_channel();
        let (tx, results) = watch::channel(None);
        let generation = Arc::new(AtomicU64::new(0));
        let discarded = Arc::new(AtomicU64::new(0));

        let worker = tokio::spawn(run(
            store.clone(),
            top_routes,
            rx,
            tx,
            generation.clone(),
            discarded.clone(),
        ));

        Self {
            store,
            requests,
            generation,
            discarded,
            results,
            worker,
        }
    }

    /// Validates `raw` and queues it, superseding every earlier submission.
    ///
    /// Returns the generation assigned to this submission, or
    /// [`RecomputeError::WorkerStopped`] when nothing will ever publish it.
    pub fn submit(&self, raw: &RawSelection) -> Result<u64, RecomputeError> {
        let criteria = resolve(&self.store, raw)?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.requests.send((generation, criteria)).map_err(|_| {
            error!(generation, "Recompute worker has stopped");
            RecomputeError::WorkerStopped
        })?;
        Ok(generation)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Published>> {
        self.results.clone()
    }

    pub fn latest(&self) -> Option<Published> {
        self.results.borrow().clone()
    }

    /// Number of submissions whose result was dropped as stale.
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::SeqCst)
    }

    /// Stops accepting work and waits for the worker to drain.
    pub async fn shutdown(self) {
        drop(self.requests);
        if let Err(e) = self.worker.await {
            error!(error = %e, "Recompute worker panicked");
        }
    }
}

async fn run(
    store: Arc<RecordStore>,
    top_routes: usize,
    mut rx: mpsc::UnboundedReceiver<(u64, FilterCriteria)>,
    tx: watch::Sender<Option<Published>>,
    latest: Arc<AtomicU64>,
    discarded: Arc<AtomicU64>,
) {
    let is_current = |generation: u64| latest.load(Ordering::SeqCst) == generation;

    while let Some((generation, criteria)) = rx.recv().await {
        if !is_current(generation) {
            discarded.fetch_add(1, Ordering::SeqCst);
            debug!(generation, "Skipping superseded selection");
            continue;
        }

        let store = store.clone();
        let latest_gen = latest.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let subset = apply(&store, &criteria);
            if latest_gen.load(Ordering::SeqCst) != generation {
                return None;
            }
            Some(aggregate(&subset, top_routes))
        })
        .await;

        match outcome {
            Ok(Some(view)) if is_current(generation) => {
                info!(generation, journeys = view.kpis.total_journeys, "Publishing view");
                tx.send_replace(Some(Published {
                    generation,
                    view: Arc::new(view),
                }));
            }
            Ok(_) => {
                discarded.fetch_add(1, Ordering::SeqCst);
                debug!(generation, "Discarded stale recompute result");
            }
            Err(e) => error!(generation, error = %e, "Recompute task failed"),
        }
    }
}
