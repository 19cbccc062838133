//! # journeyscope-core
//!
//! Core library for journeyscope - user journey analysis for web analytics.
//!
//! This library provides:
//! - Domain types for journeys, steps and display segments
//! - Loop and duplicate detection over session paths
//! - Journey filtering and re-aggregation
//! - A client for the journeys query API
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust
//! use journeyscope_core::journey::{aggregate, segment, AggregateOptions};
//! use journeyscope_core::{GroupedSegment, Journey};
//!
//! let journeys = vec![
//!     Journey::new(["Søk: tekst: skatt||scrollPercent: 40", "Klikk: tekst: Skattekort"], 2),
//!     Journey::new(["Søk: tekst: skatt", "Klikk: tekst: Skattekort"], 5),
//! ];
//!
//! let merged = aggregate(&journeys, &AggregateOptions::default());
//! assert_eq!(merged.len(), 1);
//! assert_eq!(merged[0].count, 7);
//!
//! let segments = segment(&merged[0].path);
//! assert!(matches!(segments[0], GroupedSegment::Single { original_index: 0, .. }));
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod journey;
pub mod logging;
pub mod types;
