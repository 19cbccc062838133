//! Summary statistics over segmented journeys.

use crate::types::{GroupedSegment, RawStep, SegmentedJourney};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// How many loop patterns [`JourneyStats::top_loops`] keeps.
pub const TOP_LOOP_LIMIT: usize = 10;

/// A loop pattern and how often it shows up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoopPatternStats {
    /// The repeated steps
    pub pattern: Vec<RawStep>,
    /// Sessions whose journey contains this loop
    pub sessions: u64,
    /// Distinct journeys containing this loop
    pub journeys: usize,
}

/// Totals for a set of segmented journeys.
///
/// Session counts are weighted by each journey's `count`, segment counts are not.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JourneyStats {
    /// Number of distinct journeys
    pub journey_count: usize,
    /// Sessions across all journeys
    pub session_count: u64,
    /// Steps across all distinct journeys
    pub step_count: usize,
    /// Loop segments across all distinct journeys
    pub loop_segments: usize,
    /// Duplicate segments across all distinct journeys
    pub duplicate_segments: usize,
    /// Sessions whose journey contains at least one loop
    pub sessions_with_loops: u64,
    /// Sessions whose journey contains at least one duplicate run
    pub sessions_with_duplicates: u64,
    /// Most common loop patterns, by sessions (descending)
    pub top_loops: Vec<LoopPatternStats>,
}

impl JourneyStats {
    /// Compute statistics from segmented journeys.
    pub fn from_segmented(journeys: &[SegmentedJourney]) -> Self {
        let mut stats = JourneyStats {
            journey_count: journeys.len(),
            ..Default::default()
        };
        let mut patterns: HashMap<&[RawStep], (u64, usize)> = HashMap::new();

        for journey in journeys {
            stats.session_count += journey.count;
            stats.step_count += journey.path.len();

            // A pattern looping twice in one journey still counts that journey once
            let mut journey_patterns: HashSet<&[RawStep]> = HashSet::new();
            let mut has_duplicate = false;

            for segment in &journey.segments {
                match segment {
                    GroupedSegment::Loop { pattern, .. } => {
                        stats.loop_segments += 1;
                        journey_patterns.insert(pattern.as_slice());
                    }
                    GroupedSegment::Duplicate { .. } => {
                        stats.duplicate_segments += 1;
                        has_duplicate = true;
                    }
                    GroupedSegment::Single { .. } => {}
                }
            }

            if !journey_patterns.is_empty() {
                stats.sessions_with_loops += journey.count;
            }
            for pattern in journey_patterns {
                let entry = patterns.entry(pattern).or_insert((0, 0));
                entry.0 += journey.count;
                entry.1 += 1;
            }
            if has_duplicate {
                stats.sessions_with_duplicates += journey.count;
            }
        }

        let mut top_loops: Vec<LoopPatternStats> = patterns
            .into_iter()
            .map(|(pattern, (sessions, journeys))| LoopPatternStats {
                pattern: pattern.to_vec(),
                sessions,
                journeys,
            })
            .collect();
        top_loops.sort_by(|a, b| {
            b.sessions
                .cmp(&a.sessions)
                .then_with(|| a.pattern.cmp(&b.pattern))
        });
        top_loops.truncate(TOP_LOOP_LIMIT);
        stats.top_loops = top_loops;

        stats
    }

    /// Share of sessions (0.0-1.0) that contain a loop.
    pub fn loop_share(&self) -> f64 {
        Self::share(self.sessions_with_loops, self.session_count)
    }

    /// Share of sessions (0.0-1.0) that contain a duplicate run.
    pub fn duplicate_share(&self) -> f64 {
        Self::share(self.sessions_with_duplicates, self.session_count)
    }

    fn share(part: u64, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        part as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::segment_journeys;
    use crate::types::Journey;

    fn sample() -> Vec<SegmentedJourney> {
        segment_journeys(&[
            Journey::new(["A", "A", "B"], 6),
            Journey::new(["Klikk: tekst: X", "Navigere: tekst: X"], 3),
            Journey::new(["C", "A", "A"], 1),
        ])
    }

    #[test]
    fn test_empty() {
        let stats = JourneyStats::from_segmented(&[]);
        assert_eq!(stats.journey_count, 0);
        assert_eq!(stats.loop_share(), 0.0);
        assert!(stats.top_loops.is_empty());
    }

    #[test]
    fn test_counts() {
        let stats = JourneyStats::from_segmented(&sample());

        assert_eq!(stats.journey_count, 3);
        assert_eq!(stats.session_count, 10);
        assert_eq!(stats.step_count, 8);
        assert_eq!(stats.loop_segments, 2);
        assert_eq!(stats.duplicate_segments, 1);
        assert_eq!(stats.sessions_with_loops, 7);
        assert_eq!(stats.sessions_with_duplicates, 3);
        assert!((stats.loop_share() - 0.7).abs() < 0.001);
        assert!((stats.duplicate_share() - 0.3).abs() < 0.001);
    }

    #[test]
    fn test_top_loops() {
        let stats = JourneyStats::from_segmented(&sample());

        assert_eq!(
            stats.top_loops,
            vec![LoopPatternStats {
                pattern: vec!["A".to_string()],
                sessions: 7,
                journeys: 2,
            }]
        );
    }

    #[test]
    fn test_repeated_loop_counts_journey_once() {
        let segmented = segment_journeys(&[Journey::new(["A", "A", "B", "A", "A"], 5)]);
        let stats = JourneyStats::from_segmented(&segmented);

        assert_eq!(stats.loop_segments, 2);
        assert_eq!(stats.sessions_with_loops, 5);
        assert_eq!(
            stats.top_loops,
            vec![LoopPatternStats {
                pattern: vec!["A".to_string()],
                sessions: 5,
                journeys: 1,
            }]
        );
        assert!(stats
            .top_loops
            .iter()
            .all(|top| top.sessions <= stats.session_count));
    }
}
