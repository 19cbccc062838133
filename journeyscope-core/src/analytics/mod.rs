//! Analytics module for journeyscope
//!
//! Aggregate statistics over segmented journeys:
//! - How many sessions got stuck in loops or triggered duplicate events
//! - Which loop patterns are the most common

pub mod summary;

pub use summary::{JourneyStats, LoopPatternStats, TOP_LOOP_LIMIT};
