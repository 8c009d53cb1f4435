//! wellpath: Directional Survey Intelligence
//!
//! Incremental wellbore position computation from MWD survey stations.
//!
//! ## Architecture
//!
//! - **Solver**: Per-station position math (TVD, N/S-E/W displacement, vertical section, dogleg)
//! - **Chain**: MD-ordered survey arena with cascading recompute on any mutation
//! - **Store**: Per-well actor serializing mutations behind lock-free snapshots
//! - **Projector / Quality / Analytics**: Read-side trend projection, verdicts, and trajectory statistics

// Survey computation modules
pub mod analytics;
pub mod angles;
pub mod chain;
pub mod config;
pub mod feed;
pub mod projector;
pub mod quality;
pub mod solver;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use types::{
    AggregateStats, BatchReport, ProjectionResult, QualityVerdict, RawSurvey, RejectedRow, Survey,
    SurveyStatus, WellPlan,
};

// Re-export the survey chain
pub use chain::{SurveyChain, SurveyError};

// Re-export the well store
pub use store::registry::WellRegistry;
pub use store::{spawn, ChainSnapshot, StoreError, WellActor, WellHandle};

// Re-export the ingestion loop
pub use feed::{run_feed, FeedEvent, FeedStats, ReplaySource, SurveySource};

// Re-export plan configuration and rule groups
pub use analytics::scoring_rules;
pub use config::ConfigError;
pub use quality::quality_rules;
