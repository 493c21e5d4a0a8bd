//! Sequential batch job controller with live progress and cooperative stop.
//!
//! A [`BatchJob`] runs one list of [`WorkItem`]s at a time. Items are
//! processed strictly in input order; after each item (except the last) the
//! loop waits a fixed throttle so the upstream provider's rate limit is
//! respected. Item failures are recorded in the progress state and never
//! abort the run.
//!
//! The controller is an owned value (typically behind an `Arc` in the HTTP
//! application state). Progress readers get an owned [`BatchProgress`]
//! snapshot; the run loop is the only writer.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use serde::Serialize;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::error::CoreError;
use crate::types::DbId;

/// Default pause between two consecutive items.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(4000);

/// Message carried by the conflict error when a run is already active.
pub const RUN_IN_PROGRESS: &str = "A batch run is already in progress";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One unit of work in a run.
#[derive(Debug, Clone)]
pub struct WorkItem<P> {
    pub id: DbId,
    /// Human-readable identifier shown in progress snapshots.
    pub label: String,
    pub payload: P,
}

/// A failed item, recorded in run order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub item_id: DbId,
    pub label: String,
    pub error: String,
}

/// Snapshot of the controller state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    /// 1-based index of the item currently (or most recently) attempted.
    pub current: usize,
    pub total: usize,
    /// Empty while idle.
    pub current_item_label: String,
    pub completed: usize,
    pub failed: usize,
    pub failures: Vec<BatchFailure>,
    pub is_running: bool,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every item was attempted.
    Finished,
    /// A stop request was observed at an item boundary.
    Stopped,
}

/// Final counters of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub attempted: usize,
    pub completed: usize,
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

/// The per-item operation (e.g. generate and upload an image).
///
/// Returning `Err` marks the item failed with the given message. A panic
/// inside `execute` is caught and treated the same way.
#[async_trait]
pub trait ItemOperation: Send + Sync {
    type Payload: Send + Sync + 'static;
    type Output: Send + 'static;

    async fn execute(&self, item: &WorkItem<Self::Payload>) -> Result<Self::Output, String>;
}

/// Receives each successful result, e.g. to persist it on the owning record.
///
/// Called exactly once per successful item, before the item counts as
/// completed. An `Err` turns the item into a failure.
#[async_trait]
pub trait ItemSink: Send + Sync {
    type Output: Send + 'static;

    async fn record(&self, item_id: DbId, output: Self::Output) -> Result<(), String>;
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Runs one batch at a time and exposes its progress.
#[derive(Debug)]
pub struct BatchJob {
    state: Mutex<BatchProgress>,
    stop_requested: AtomicBool,
    stop_notify: Notify,
    throttle: Duration,
}

impl Default for BatchJob {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE)
    }
}

impl BatchJob {
    /// Create an idle controller with the given inter-item throttle.
    pub fn new(throttle: Duration) -> Self {
        Self {
            state: Mutex::new(BatchProgress::default()),
            stop_requested: AtomicBool::new(false),
            stop_notify: Notify::new(),
            throttle,
        }
    }

    pub fn throttle(&self) -> Duration {
        self.throttle
    }

    /// Owned copy of the current state.
    pub fn progress(&self) -> BatchProgress {
        self.with_state(|state| state.clone())
    }

    pub fn is_running(&self) -> bool {
        self.with_state(|state| state.is_running)
    }

    /// Ask the active run to stop at the next item boundary.
    ///
    /// Idempotent and non-blocking. The flag stays set until the next run
    /// starts. Returns whether a run was active when the request was made.
    pub fn request_stop(&self) -> bool {
        self.stop_requested.store(true, Ordering::SeqCst);
        self.stop_notify.notify_waiters();
        self.is_running()
    }

    /// Run `items` to completion (or stop) on the current task.
    ///
    /// Fails with [`CoreError::Conflict`] if another run is active and with
    /// [`CoreError::Validation`] if `items` is empty. Item failures are not
    /// errors; they are reported through [`BatchJob::progress`] and the
    /// returned [`RunSummary`].
    pub async fn run<Op, Sink>(
        &self,
        items: Vec<WorkItem<Op::Payload>>,
        operation: &Op,
        sink: &Sink,
    ) -> Result<RunSummary, CoreError>
    where
        Op: ItemOperation,
        Sink: ItemSink<Output = Op::Output>,
    {
        self.claim(items.len())?;
        Ok(self.process(items, operation, sink).await)
    }

    /// Claim the controller and drive the run on a detached tokio task.
    ///
    /// The conflict check happens before this returns, so callers can report
    /// it synchronously; the returned handle may be dropped.
    pub fn spawn_run<Op, Sink>(
        self: &Arc<Self>,
        items: Vec<WorkItem<Op::Payload>>,
        operation: Op,
        sink: Sink,
    ) -> Result<JoinHandle<RunSummary>, CoreError>
    where
        Op: ItemOperation + 'static,
        Sink: ItemSink<Output = Op::Output> + 'static,
    {
        self.claim(items.len())?;
        let job = Arc::clone(self);
        Ok(tokio::spawn(async move {
            job.process(items, &operation, &sink).await
        }))
    }

    // ---- private helpers ----

    fn with_state<R>(&self, f: impl FnOnce(&mut BatchProgress) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Reset state for a new run of `total` items, or fail if one is active.
    fn claim(&self, total: usize) -> Result<(), CoreError> {
        if total == 0 {
            return Err(CoreError::Validation(
                "A batch run needs at least one item".to_string(),
            ));
        }
        self.with_state(|state| {
            if state.is_running {
                return Err(CoreError::Conflict(RUN_IN_PROGRESS.to_string()));
            }
            *state = BatchProgress {
                total,
                is_running: true,
                ..BatchProgress::default()
            };
            self.stop_requested.store(false, Ordering::SeqCst);
            Ok(())
        })
    }

    async fn process<Op, Sink>(
        &self,
        items: Vec<WorkItem<Op::Payload>>,
        operation: &Op,
        sink: &Sink,
    ) -> RunSummary
    where
        Op: ItemOperation,
        Sink: ItemSink<Output = Op::Output>,
    {
        let total = items.len();
        let mut outcome = RunOutcome::Finished;
        tracing::info!(total, throttle_ms = self.throttle.as_millis() as u64, "Batch run started");

        for (index, item) in items.into_iter().enumerate() {
            if self.stop_requested() {
                tracing::info!(processed = index, total, "Batch run stopped");
                outcome = RunOutcome::Stopped;
                break;
            }

            // Index and label change together so readers never see a mix.
            self.with_state(|state| {
                state.current = index + 1;
                state.current_item_label = item.label.clone();
            });

            let result = attempt(&item, operation, sink).await;

            self.with_state(|state| match result {
                Ok(()) => state.completed += 1,
                Err(error) => {
                    tracing::warn!(item_id = item.id, label = %item.label, %error, "Batch item failed");
                    state.failed += 1;
                    state.failures.push(BatchFailure {
                        item_id: item.id,
                        label: item.label.clone(),
                        error,
                    });
                }
            });

            if index + 1 < total {
                self.pause().await;
            }
        }

        let summary = self.with_state(|state| {
            state.is_running = false;
            state.current_item_label.clear();
            RunSummary {
                outcome,
                attempted: state.current,
                completed: state.completed,
                failed: state.failed,
            }
        });
        tracing::info!(
            attempted = summary.attempted,
            completed = summary.completed,
            failed = summary.failed,
            stopped = summary.outcome == RunOutcome::Stopped,
            "Batch run finished"
        );
        summary
    }

    /// Sleep for the throttle, returning early when a stop is requested.
    async fn pause(&self) {
        let notified = self.stop_notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.stop_requested() {
            return;
        }
        tokio::select! {
            () = tokio::time::sleep(self.throttle) => {}
            () = notified => {}
        }
    }
}

/// Execute one item and hand its output to the sink, folding panics into
/// ordinary failures.
async fn attempt<Op, Sink>(
    item: &WorkItem<Op::Payload>,
    operation: &Op,
    sink: &Sink,
) -> Result<(), String>
where
    Op: ItemOperation,
    Sink: ItemSink<Output = Op::Output>,
{
    let work = async {
        let output = operation.execute(item).await?;
        sink.record(item.id, output).await
    };
    match AssertUnwindSafe(work).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(panic_message(panic.as_ref())),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("Unexpected error: {msg}")
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("Unexpected error: {msg}")
    } else {
        "Unexpected error".to_string()
    }
}
