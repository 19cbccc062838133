//! User journey analysis
//!
//! Turns raw journeys from the query API into display segments:
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ Vec<Journey> │──▶│ aggregate() │──▶│ Vec<Journey> │──▶│ segment(path)    │
//! │ (raw paths)  │   │ exclude,    │   │ (merged,     │   │ single / loop /  │
//! │              │   │ drop keys,  │   │  sorted)     │   │ duplicate        │
//! └──────────────┘   │ merge       │   └──────────────┘   └──────────────────┘
//!                    └─────────────┘
//! ```
//!
//! Every function here is pure and never fails; malformed steps degrade to
//! empty fields, which only affects how well steps group.
//!
//! ## Usage
//!
//! ```rust
//! use journeyscope_core::journey::{aggregate, segment_journeys, AggregateOptions};
//! use journeyscope_core::{GroupedSegment, Journey};
//!
//! let journeys = vec![Journey::new(["A: tekst: 1", "A: tekst: 1", "B: tekst: 2"], 3)];
//! let merged = aggregate(&journeys, &AggregateOptions::default());
//! let segmented = segment_journeys(&merged);
//!
//! assert!(matches!(segmented[0].segments[0], GroupedSegment::Loop { count: 2, .. }));
//! ```

pub mod aggregate;
pub mod grouping;
pub mod opposing;
pub mod segment;
pub mod step;
pub mod variation;

pub use aggregate::{aggregate, filter_journey, AggregateOptions};
pub use grouping::{grouping_key, subtitle};
pub use opposing::are_opposing;
pub use segment::{segment, MAX_PATTERN_LEN};
pub use step::{decode, encode};
pub use variation::{detect_variation, Variation};

use crate::types::{Journey, SegmentedJourney};

/// Segment every journey's path, keeping journey order.
pub fn segment_journeys(journeys: &[Journey]) -> Vec<SegmentedJourney> {
    journeys
        .iter()
        .map(|journey| SegmentedJourney {
            path: journey.path.clone(),
            count: journey.count,
            segments: segment(&journey.path),
        })
        .collect()
}
