//! Per-well survey store
//!
//! All survey computation in this crate is synchronous; the concurrency
//! concern lives here at the boundary. One actor task per well owns the
//! `SurveyChain` and the current `WellPlan`:
//! - mutations arrive on a bounded command channel and run one at a time,
//!   so index assignment and cascading recompute never interleave - a
//!   telemetry append arriving mid-batch queues behind the whole batch
//! - after every committed mutation the actor publishes an immutable
//!   `ChainSnapshot` through `ArcSwap`; reads are lock-free and always
//!   observe a fully cascaded chain
//! - a rejected mutation publishes nothing: cancellation is simply
//!   "do not commit"

pub mod registry;

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::analytics;
use crate::chain::{SurveyChain, SurveyError};
use crate::projector;
use crate::quality;
use crate::types::{
    AggregateStats, BatchReport, ProjectionResult, QualityVerdict, RawSurvey, Survey, WellPlan,
};

/// Errors surfaced by [`WellHandle`] calls.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The chain rejected the mutation; the underlying reason passes
    /// through untouched so callers see the offending field and value.
    #[error(transparent)]
    Survey(#[from] SurveyError),

    #[error("well store for {well_id} is closed")]
    Closed { well_id: String },
}

// ============================================================================
// Snapshot
// ============================================================================

/// Immutable view of one well's chain state, published after every
/// committed mutation.
///
/// `revision` increments once per committed command - a whole batch import
/// is one revision, and a rejected mutation does not advance it. Derived
/// analytics are computed from the snapshot on demand, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub well_id: String,
    pub plan: WellPlan,
    pub surveys: Vec<Survey>,
    pub revision: u64,
    pub taken_at: DateTime<Utc>,
}

impl ChainSnapshot {
    pub fn len(&self) -> usize {
        self.surveys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surveys.is_empty()
    }

    pub fn last(&self) -> Option<&Survey> {
        self.surveys.last()
    }

    /// Trend projection over this snapshot's tail.
    pub fn project(&self, horizon_ft: f64) -> ProjectionResult {
        projector::project(&self.surveys, horizon_ft)
    }

    /// Quality verdict for the most recent station, or `None` on an
    /// empty chain.
    pub fn classify_latest(&self) -> Option<QualityVerdict> {
        let last = self.surveys.last()?;
        let previous = self
            .surveys
            .len()
            .checked_sub(2)
            .map(|i| &self.surveys[i]);
        Some(quality::classify(last, previous))
    }

    /// Whole-chain statistics under this snapshot's plan.
    pub fn aggregate(&self) -> AggregateStats {
        analytics::aggregate(&self.surveys, &self.plan)
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Commands for a [`WellActor`].
#[derive(Debug)]
pub enum WellCommand {
    /// Commit a station at the chain tail
    Append {
        raw: RawSurvey,
        response_tx: oneshot::Sender<Result<Survey, SurveyError>>,
    },
    /// Commit a station at its MD-ordered slot
    Insert {
        raw: RawSurvey,
        response_tx: oneshot::Sender<Result<Survey, SurveyError>>,
    },
    /// Replace the measured channels at a 1-based sequence index
    Update {
        sequence_index: usize,
        raw: RawSurvey,
        response_tx: oneshot::Sender<Result<Survey, SurveyError>>,
    },
    /// Remove the station at a 1-based sequence index
    Delete {
        sequence_index: usize,
        response_tx: oneshot::Sender<Result<Survey, SurveyError>>,
    },
    /// Insert a whole batch as one serialized unit of work
    ImportBatch {
        rows: Vec<RawSurvey>,
        response_tx: oneshot::Sender<BatchReport>,
    },
    /// Swap the well plan and recompute the whole chain under it
    SetPlan {
        plan: WellPlan,
        response_tx: oneshot::Sender<()>,
    },
}

// ============================================================================
// Actor Handle
// ============================================================================

/// Handle to interact with a [`WellActor`].
///
/// Cloneable; every clone funnels into the same per-well command queue,
/// which is what serializes concurrent producers (manual entry, batch
/// import, live telemetry). `snapshot()` never touches the queue.
#[derive(Clone)]
pub struct WellHandle {
    well_id: String,
    tx: mpsc::Sender<WellCommand>,
    snapshot: Arc<ArcSwap<ChainSnapshot>>,
}

impl WellHandle {
    pub fn well_id(&self) -> &str {
        &self.well_id
    }

    /// The latest published snapshot. Lock-free; always a fully cascaded
    /// view, never a chain mid-recompute.
    pub fn snapshot(&self) -> Arc<ChainSnapshot> {
        self.snapshot.load_full()
    }

    pub async fn append(&self, raw: RawSurvey) -> Result<Survey, StoreError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(WellCommand::Append { raw, response_tx }).await?;
        Ok(self.recv(response_rx).await??)
    }

    pub async fn insert(&self, raw: RawSurvey) -> Result<Survey, StoreError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(WellCommand::Insert { raw, response_tx }).await?;
        Ok(self.recv(response_rx).await??)
    }

    pub async fn update(&self, sequence_index: usize, raw: RawSurvey) -> Result<Survey, StoreError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(WellCommand::Update {
            sequence_index,
            raw,
            response_tx,
        })
        .await?;
        Ok(self.recv(response_rx).await??)
    }

    pub async fn delete(&self, sequence_index: usize) -> Result<Survey, StoreError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(WellCommand::Delete {
            sequence_index,
            response_tx,
        })
        .await?;
        Ok(self.recv(response_rx).await??)
    }

    pub async fn import_batch(&self, rows: Vec<RawSurvey>) -> Result<BatchReport, StoreError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(WellCommand::ImportBatch { rows, response_tx })
            .await?;
        self.recv(response_rx).await
    }

    pub async fn set_plan(&self, plan: WellPlan) -> Result<(), StoreError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(WellCommand::SetPlan { plan, response_tx }).await?;
        self.recv(response_rx).await
    }

    async fn send(&self, cmd: WellCommand) -> Result<(), StoreError> {
        self.tx.send(cmd).await.map_err(|_| self.closed())
    }

    async fn recv<T>(&self, response_rx: oneshot::Receiver<T>) -> Result<T, StoreError> {
        response_rx.await.map_err(|_| self.closed())
    }

    fn closed(&self) -> StoreError {
        StoreError::Closed {
            well_id: self.well_id.clone(),
        }
    }
}

// ============================================================================
// Well Actor
// ============================================================================

/// Owns one well's chain and plan; processes commands one at a time.
pub struct WellActor {
    chain: SurveyChain,
    plan: WellPlan,
    rx: mpsc::Receiver<WellCommand>,
    snapshot: Arc<ArcSwap<ChainSnapshot>>,
    revision: u64,
}

impl WellActor {
    /// Create a new actor and its handle. The actor does nothing until
    /// [`run`](Self::run) is driven, typically via [`spawn`].
    pub fn new(well_id: impl Into<String>, plan: WellPlan) -> (Self, WellHandle) {
        let well_id = well_id.into();
        let (tx, rx) = mpsc::channel(100);

        let initial = ChainSnapshot {
            well_id: well_id.clone(),
            plan: plan.clone(),
            surveys: Vec::new(),
            revision: 0,
            taken_at: Utc::now(),
        };
        let snapshot = Arc::new(ArcSwap::from_pointee(initial));

        let actor = Self {
            chain: SurveyChain::new(well_id.clone()),
            plan,
            rx,
            snapshot: Arc::clone(&snapshot),
            revision: 0,
        };
        let handle = WellHandle {
            well_id,
            tx,
            snapshot,
        };

        (actor, handle)
    }

    /// Run the actor loop until every handle clone is dropped.
    pub async fn run(mut self) {
        info!(well_id = %self.chain.well_id(), "well actor starting");

        while let Some(cmd) = self.rx.recv().await {
            match cmd {
                WellCommand::Append { raw, response_tx } => {
                    let result = self.chain.append(raw, &self.plan);
                    self.commit("append", &result);
                    let _ = response_tx.send(result);
                }
                WellCommand::Insert { raw, response_tx } => {
                    let result = self.chain.insert(raw, &self.plan);
                    self.commit("insert", &result);
                    let _ = response_tx.send(result);
                }
                WellCommand::Update {
                    sequence_index,
                    raw,
                    response_tx,
                } => {
                    let result = self.chain.update(sequence_index, raw, &self.plan);
                    self.commit("update", &result);
                    let _ = response_tx.send(result);
                }
                WellCommand::Delete {
                    sequence_index,
                    response_tx,
                } => {
                    let result = self.chain.delete(sequence_index, &self.plan);
                    self.commit("delete", &result);
                    let _ = response_tx.send(result);
                }
                WellCommand::ImportBatch { rows, response_tx } => {
                    let report = self.chain.import_batch(rows, &self.plan);
                    // One revision for the whole batch; nothing is visible
                    // until every row has been placed and cascaded
                    if report.accepted > 0 {
                        self.publish();
                    }
                    if !report.rejected.is_empty() {
                        warn!(
                            well_id = %self.chain.well_id(),
                            rejected = report.rejected.len(),
                            accepted = report.accepted,
                            "batch import rejected rows"
                        );
                    }
                    let _ = response_tx.send(report);
                }
                WellCommand::SetPlan { plan, response_tx } => {
                    self.plan = plan;
                    self.chain.recompute_all(&self.plan);
                    self.publish();
                    info!(
                        well_id = %self.chain.well_id(),
                        proposed_direction = self.plan.proposed_direction,
                        "well plan swapped, chain recomputed"
                    );
                    let _ = response_tx.send(());
                }
            }
        }

        info!(well_id = %self.chain.well_id(), "well actor stopped");
    }

    fn commit(&mut self, op: &'static str, result: &Result<Survey, SurveyError>) {
        match result {
            Ok(_) => self.publish(),
            Err(err) => warn!(
                well_id = %self.chain.well_id(),
                op,
                %err,
                "survey mutation rejected"
            ),
        }
    }

    fn publish(&mut self) {
        self.revision += 1;
        let snapshot = ChainSnapshot {
            well_id: self.chain.well_id().to_string(),
            plan: self.plan.clone(),
            surveys: self.chain.surveys().to_vec(),
            revision: self.revision,
            taken_at: Utc::now(),
        };
        self.snapshot.store(Arc::new(snapshot));
    }
}

/// Spawn a well actor on the current tokio runtime and return its handle.
pub fn spawn(well_id: impl Into<String>, plan: WellPlan) -> WellHandle {
    let (actor, handle) = WellActor::new(well_id, plan);
    tokio::spawn(actor.run());
    handle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_publishes_snapshot() {
        let handle = spawn("WELL-A", WellPlan::default());
        assert_eq!(handle.snapshot().revision, 0);

        let committed = handle
            .append(RawSurvey::new(1000.0, 1.25, 175.82))
            .await
            .unwrap();
        assert_eq!(committed.sequence_index, 1);
        assert_eq!(committed.dogleg_severity, 0.0);

        let snap = handle.snapshot();
        assert_eq!(snap.revision, 1);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.last().unwrap().md, 1000.0);
    }

    #[tokio::test]
    async fn test_rejected_append_publishes_nothing() {
        let handle = spawn("WELL-A", WellPlan::default());
        handle
            .append(RawSurvey::new(1000.0, 1.25, 175.82))
            .await
            .unwrap();
        let revision = handle.snapshot().revision;

        let err = handle
            .append(RawSurvey::new(900.0, 1.0, 175.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Survey(SurveyError::OutOfOrder { .. })
        ));
        assert_eq!(handle.snapshot().revision, revision);
        assert_eq!(handle.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_store_reports_well_id() {
        let (actor, handle) = WellActor::new("WELL-GONE", WellPlan::default());
        drop(actor);

        let err = handle
            .append(RawSurvey::new(1000.0, 1.0, 10.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Closed { well_id } if well_id == "WELL-GONE"));
    }

    #[tokio::test]
    async fn test_snapshot_conveniences_match_direct_calls() {
        let handle = spawn("WELL-A", WellPlan::default());
        for (md, inc, azi) in [
            (1000.0, 1.25, 175.82),
            (1100.0, 2.18, 176.13),
            (1200.0, 3.85, 176.90),
        ] {
            handle.append(RawSurvey::new(md, inc, azi)).await.unwrap();
        }

        let snap = handle.snapshot();
        let projection = snap.project(100.0);
        assert!((projection.build_rate - 1.30).abs() < 1e-9);

        let verdict = snap.classify_latest().unwrap();
        assert_eq!(
            verdict,
            quality::classify(&snap.surveys[2], Some(&snap.surveys[1]))
        );

        let stats = snap.aggregate();
        assert_eq!(stats.dls_violation_count, 0);
    }
}
