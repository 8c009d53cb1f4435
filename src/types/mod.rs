//! Shared data structures for the directional-survey computation chain
//!
//! This module defines the core types flowing through the pipeline:
//! - `RawSurvey`: measured tuple from an acquisition source
//! - `Survey`: committed station with chained position state
//! - `WellPlan`: planned trajectory parameters, passed explicitly everywhere
//! - `QualityVerdict` / `ProjectionResult` / `AggregateStats`: derived
//!   analytics, recomputed on demand and never cached as stale state

mod plan;
mod projection;
mod stats;
mod survey;
mod verdict;

pub use plan::*;
pub use projection::*;
pub use stats::*;
pub use survey::*;
pub use verdict::*;
