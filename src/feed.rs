//! Survey source abstraction and ingestion loop.
//!
//! Provides a unified trait for streaming raw survey stations from different
//! origins (pre-loaded replay vectors, CSV exports) into a well store, plus
//! [`run_feed`] which drives a source until EOF or cancellation.

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::store::{StoreError, WellHandle};
use crate::types::RawSurvey;

/// Events produced by a survey source.
pub enum FeedEvent {
    /// A raw survey station was read.
    Survey(RawSurvey),
    /// Source reached end of data.
    Eof,
}

/// Trait abstracting where raw survey stations come from.
///
/// Implementations handle parsing and pacing internally. The ingestion loop
/// calls [`next_survey`](SurveySource::next_survey) in a select! with
/// cancellation.
#[async_trait]
pub trait SurveySource: Send + 'static {
    /// Read the next station from the source.
    ///
    /// Returns `FeedEvent::Eof` when no more data is available.
    /// Returns `Err` on unrecoverable source errors.
    async fn next_survey(&mut self) -> Result<FeedEvent>;

    /// Human-readable name for logging (e.g. "replay", "CSV").
    fn source_name(&self) -> &str;
}

// ============================================================================
// Replay Source (pre-loaded stations, optional pacing)
// ============================================================================

/// Replays pre-loaded survey stations with optional inter-station delay.
pub struct ReplaySource {
    rows: std::vec::IntoIter<RawSurvey>,
    delay_ms: u64,
    yielded_first: bool,
}

impl ReplaySource {
    pub fn new(rows: Vec<RawSurvey>, delay_ms: u64) -> Self {
        Self {
            rows: rows.into_iter(),
            delay_ms,
            yielded_first: false,
        }
    }
}

#[async_trait]
impl SurveySource for ReplaySource {
    async fn next_survey(&mut self) -> Result<FeedEvent> {
        // Delay between stations (skip the delay before the first one so a
        // zero-length lead-in does not stall the feed).
        if self.yielded_first && self.delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.delay_ms)).await;
        }
        match self.rows.next() {
            Some(row) => {
                self.yielded_first = true;
                Ok(FeedEvent::Survey(row))
            }
            None => Ok(FeedEvent::Eof),
        }
    }

    fn source_name(&self) -> &str {
        "replay"
    }
}

// ============================================================================
// Ingestion Loop
// ============================================================================

/// Final statistics from a completed feed run.
///
/// Every station pulled from the source is either accepted into the chain or
/// rejected, so `processed == accepted + rejected` when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Stations pulled from the source.
    pub processed: u64,
    /// Stations appended to the chain.
    pub accepted: u64,
    /// Stations rejected by validation or lost to a closed store.
    pub rejected: u64,
}

/// Feed stations from `source` into the well behind `handle` until the source
/// is exhausted or `cancel` fires.
///
/// Each station is appended in order; rejections are logged with the specific
/// reason and counted, never fatal. A closed store stops the feed.
pub async fn run_feed<S: SurveySource>(
    source: &mut S,
    handle: &WellHandle,
    cancel: CancellationToken,
) -> FeedStats {
    let mut stats = FeedStats::default();

    info!(
        well_id = %handle.well_id(),
        "[SurveyFeed] Processing stations from {}",
        source.source_name()
    );

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                info!("[SurveyFeed] Shutdown signal received");
                break;
            }
            result = source.next_survey() => {
                match result {
                    Ok(ev) => ev,
                    Err(e) => {
                        warn!("[SurveyFeed] Source error: {}", e);
                        break;
                    }
                }
            }
        };

        let raw = match event {
            FeedEvent::Survey(r) => r,
            FeedEvent::Eof => {
                info!(
                    "[SurveyFeed] Source reached end ({} stations processed)",
                    stats.processed
                );
                break;
            }
        };

        stats.processed += 1;
        let md = raw.md;

        match handle.append(raw).await {
            Ok(survey) => {
                stats.accepted += 1;
                debug!(
                    well_id = %handle.well_id(),
                    md = survey.md,
                    tvd = survey.tvd,
                    "[SurveyFeed] Station accepted"
                );
            }
            Err(StoreError::Survey(e)) => {
                stats.rejected += 1;
                warn!(
                    well_id = %handle.well_id(),
                    md,
                    reason = %e,
                    "[SurveyFeed] Station rejected"
                );
            }
            Err(StoreError::Closed { well_id }) => {
                stats.rejected += 1;
                warn!("[SurveyFeed] Well store {} closed mid-feed, stopping", well_id);
                break;
            }
        }
    }

    info!(
        well_id = %handle.well_id(),
        processed = stats.processed,
        accepted = stats.accepted,
        rejected = stats.rejected,
        "[SurveyFeed] Feed finished"
    );

    stats
}
