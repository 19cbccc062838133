//! Journey filtering and re-aggregation
//!
//! Removing excluded events and noisy detail keys can make journeys that
//! differed upstream identical. Those are merged here so each distinct
//! filtered path appears once, carrying the summed session count.

use super::step::{decode, encode};
use crate::types::{Journey, RawStep};
use std::collections::{HashMap, HashSet};

/// What to strip from journeys before merging them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Steps with one of these event names are removed from paths
    pub excluded_events: HashSet<String>,
    /// Detail keys removed from every remaining step
    pub dropped_detail_keys: Vec<String>,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            excluded_events: HashSet::new(),
            dropped_detail_keys: vec!["scrollPercent".to_string()],
        }
    }
}

impl AggregateOptions {
    /// Default options with the given events excluded.
    pub fn excluding<I, S>(events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded_events: events.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Filter a single step. Returns `None` if its event is excluded.
///
/// The raw string is only rebuilt when a detail was actually dropped, so
/// untouched steps keep their exact upstream form.
fn filter_step(raw: &str, options: &AggregateOptions) -> Option<RawStep> {
    let mut step = decode(raw);
    if options.excluded_events.contains(&step.event_name) {
        return None;
    }

    let before = step.details.len();
    step.details
        .retain(|d| !options.dropped_detail_keys.iter().any(|key| *key == d.key));

    if step.details.len() == before {
        Some(raw.to_string())
    } else {
        Some(encode(&step))
    }
}

/// Apply exclusions to one journey. Returns `None` if nothing is left of its path.
pub fn filter_journey(journey: &Journey, options: &AggregateOptions) -> Option<Journey> {
    let path: Vec<RawStep> = journey
        .path
        .iter()
        .filter_map(|raw| filter_step(raw, options))
        .collect();

    if path.is_empty() {
        return None;
    }

    Some(Journey {
        path,
        count: journey.count,
    })
}

/// Filter journeys, merge the ones whose filtered paths are identical, and
/// sort by count (descending).
///
/// Equal counts are ordered by path, compared step by step, so the output
/// does not depend on input order.
pub fn aggregate(journeys: &[Journey], options: &AggregateOptions) -> Vec<Journey> {
    let mut merged: HashMap<Vec<RawStep>, u64> = HashMap::new();
    let mut dropped = 0usize;

    for journey in journeys {
        match filter_journey(journey, options) {
            Some(filtered) => {
                *merged.entry(filtered.path).or_insert(0) += filtered.count;
            }
            None => dropped += 1,
        }
    }

    let mut result: Vec<Journey> = merged
        .into_iter()
        .map(|(path, count)| Journey { path, count })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.path.cmp(&b.path)));

    tracing::debug!(
        input = journeys.len(),
        output = result.len(),
        dropped,
        excluded_events = options.excluded_events.len(),
        "Aggregated journeys"
    );

    result
}
