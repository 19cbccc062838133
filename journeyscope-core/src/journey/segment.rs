//! Loop and duplicate segmentation
//!
//! Walks a journey's path once, left to right, and groups it into
//! [`GroupedSegment`]s:
//!
//! 1. **Loop**: a pattern of 1-3 steps repeated back to back at least twice,
//!    compared by [`grouping_key`]. Among the pattern lengths the one covering
//!    the most steps wins; on equal coverage the shorter length wins.
//! 2. **Duplicate**: adjacent steps sharing a non-empty [`subtitle`] but
//!    registered under different event names (and not an open/close toggle).
//! 3. **Single**: anything else.
//!
//! Loops are tried before duplicates at every position. The scan is greedy and
//! never revisits a position once a segment has been emitted.
//!
//! ## Example
//!
//! ```text
//! A  B  A  B  C          →  Loop [A B] ×2 @0, Single C @4
//! Åpne: X  Vis: X        →  Duplicate [Åpne, Vis] @0
//! ```

use super::grouping::{grouping_key, subtitle};
use super::opposing::are_opposing;
use super::step::decode;
use super::variation::detect_variation;
use crate::types::{DecodedStep, GroupedSegment, RawStep};

/// Longest pattern considered when looking for loops.
pub const MAX_PATTERN_LEN: usize = 3;

/// A loop candidate found at some position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PatternMatch {
    len: usize,
    count: usize,
}

impl PatternMatch {
    fn coverage(&self) -> usize {
        self.len * self.count
    }
}

/// A path with each step decoded and keyed exactly once.
struct KeyedPath<'a> {
    raw: &'a [RawStep],
    decoded: Vec<DecodedStep>,
    keys: Vec<String>,
}

impl<'a> KeyedPath<'a> {
    fn new(raw: &'a [RawStep]) -> Self {
        let decoded: Vec<DecodedStep> = raw.iter().map(|step| decode(step)).collect();
        let keys = decoded.iter().map(grouping_key).collect();
        Self { raw, decoded, keys }
    }

    fn len(&self) -> usize {
        self.raw.len()
    }

    /// Best repeating pattern starting at `start`, if any repeats at least twice.
    fn best_pattern(&self, start: usize) -> Option<PatternMatch> {
        let mut best: Option<PatternMatch> = None;

        for len in 1..=MAX_PATTERN_LEN {
            if start + len * 2 > self.len() {
                continue;
            }

            let pattern = &self.keys[start..start + len];
            let mut count = 1;
            let mut next = start + len;
            while next + len <= self.len() && self.keys[next..next + len] == *pattern {
                count += 1;
                next += len;
            }

            if count < 2 {
                continue;
            }

            let candidate = PatternMatch { len, count };
            // Strictly greater: equal coverage keeps the shorter pattern
            if best.map_or(true, |b| candidate.coverage() > b.coverage()) {
                best = Some(candidate);
            }
        }

        best
    }

    /// Whether steps `a` and `b` look like one action registered twice.
    fn is_duplicate_pair(&self, a: usize, b: usize) -> bool {
        let first = &self.decoded[a];
        let second = &self.decoded[b];
        let title = subtitle(first);

        !title.is_empty()
            && title == subtitle(second)
            && first.event_name != second.event_name
            && !are_opposing(&first.event_name, &second.event_name)
    }

    /// Length of the duplicate run starting at `start`, if there is one.
    fn duplicate_run(&self, start: usize) -> Option<usize> {
        if start + 1 >= self.len() || !self.is_duplicate_pair(start, start + 1) {
            return None;
        }

        let title = subtitle(&self.decoded[start]);
        let mut end = start + 2;
        while end < self.len() {
            let prev = &self.decoded[end - 1];
            let step = &self.decoded[end];
            if subtitle(step) != title
                || step.event_name == prev.event_name
                || are_opposing(&prev.event_name, &step.event_name)
            {
                break;
            }
            end += 1;
        }

        Some(end - start)
    }

    fn loop_segment(&self, start: usize, found: PatternMatch) -> GroupedSegment {
        let end = start + found.coverage();
        let variation = detect_variation(&self.decoded[start..end]);
        let has_duplicate_in_pattern =
            (start..start + found.len - 1).any(|k| self.is_duplicate_pair(k, k + 1));

        GroupedSegment::Loop {
            pattern: self.raw[start..start + found.len].to_vec(),
            count: found.count,
            start_index: start,
            has_variation: variation.has_variation,
            has_exit: variation.has_exit,
            all_steps: self.raw[start..end].to_vec(),
            has_duplicate_in_pattern,
        }
    }
}

/// Group a path into single steps, loops and duplicate runs.
///
/// Total and deterministic. The returned segments partition `path` in order.
pub fn segment(path: &[RawStep]) -> Vec<GroupedSegment> {
    let keyed = KeyedPath::new(path);
    let mut segments = Vec::new();
    let mut i = 0;

    while i < keyed.len() {
        if let Some(found) = keyed.best_pattern(i) {
            segments.push(keyed.loop_segment(i, found));
            i += found.coverage();
            continue;
        }

        if let Some(run) = keyed.duplicate_run(i) {
            segments.push(GroupedSegment::Duplicate {
                steps: path[i..i + run].to_vec(),
                start_index: i,
            });
            i += run;
            continue;
        }

        segments.push(GroupedSegment::Single {
            step: path[i].clone(),
            original_index: i,
        });
        i += 1;
    }

    tracing::trace!(
        steps = path.len(),
        segments = segments.len(),
        "Segmented journey path"
    );

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(steps: &[&str]) -> Vec<RawStep> {
        steps.iter().map(|s| s.to_string()).collect()
    }

    fn flatten(segments: &[GroupedSegment]) -> Vec<RawStep> {
        segments
            .iter()
            .flat_map(|s| s.covered_steps().iter().cloned())
            .collect()
    }

    fn assert_partition(p: &[RawStep]) {
        let segments = segment(p);
        assert_eq!(flatten(&segments), p, "segments must rebuild the path");

        let mut expected_start = 0;
        for s in &segments {
            assert_eq!(s.start_index(), expected_start);
            expected_start += s.len();
        }
    }

    #[test]
    fn test_empty_path() {
        assert!(segment(&[]).is_empty());
    }

    #[test]
    fn test_simple_loop_then_single() {
        let p = path(&[
            "A: tekst: 1",
            "B: tekst: 2",
            "A: tekst: 1",
            "B: tekst: 2",
            "C: tekst: 3",
        ]);
        let segments = segment(&p);

        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[0],
            GroupedSegment::Loop {
                pattern: path(&["A: tekst: 1", "B: tekst: 2"]),
                count: 2,
                start_index: 0,
                has_variation: false,
                has_exit: false,
                all_steps: p[..4].to_vec(),
                has_duplicate_in_pattern: false,
            }
        );
        assert_eq!(
            segments[1],
            GroupedSegment::Single {
                step: "C: tekst: 3".to_string(),
                original_index: 4,
            }
        );
    }

    #[test]
    fn test_duplicate_pair() {
        let p = path(&["Åpne: tekst: X", "Vis detaljer: tekst: X"]);
        assert_eq!(
            segment(&p),
            vec![GroupedSegment::Duplicate {
                steps: p.clone(),
                start_index: 0,
            }]
        );
    }

    #[test]
    fn test_no_pattern() {
        let p = path(&["A: tekst: 1", "B: tekst: 2", "C: tekst: 3"]);
        let segments = segment(&p);

        assert_eq!(segments.len(), 3);
        for (idx, s) in segments.iter().enumerate() {
            assert_eq!(
                *s,
                GroupedSegment::Single {
                    step: p[idx].clone(),
                    original_index: idx,
                }
            );
        }
    }

    #[test]
    fn test_opposing_pair_is_not_duplicate() {
        let p = path(&["Åpne meny: tekst: Meny", "Lukke meny: tekst: Meny"]);
        let segments = segment(&p);

        assert_eq!(segments.len(), 2);
        assert!(segments
            .iter()
            .all(|s| matches!(s, GroupedSegment::Single { .. })));
    }

    #[test]
    fn test_loop_stops_at_partial_chunk() {
        let p = path(&["A", "B", "A", "B", "A"]);
        let segments = segment(&p);

        match &segments[0] {
            GroupedSegment::Loop { pattern, count, .. } => {
                assert_eq!(pattern, &path(&["A", "B"]));
                assert_eq!(*count, 2);
            }
            other => panic!("expected loop, got {:?}", other),
        }
        assert_eq!(
            segments[1],
            GroupedSegment::Single {
                step: "A".to_string(),
                original_index: 4,
            }
        );
    }

    #[test]
    fn test_loop_run_is_maximal() {
        let p = path(&["X", "A", "A", "A", "A", "B"]);
        let segments = segment(&p);

        assert_eq!(segments.len(), 3);
        match &segments[1] {
            GroupedSegment::Loop {
                pattern,
                count,
                start_index,
                ..
            } => {
                assert_eq!(pattern, &path(&["A"]));
                assert_eq!(*count, 4);
                assert_eq!(*start_index, 1);
            }
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_equal_coverage_prefers_shortest_pattern() {
        // Lengths 1, 2 and 3 all cover six steps
        let p = path(&["A"; 6]);
        match &segment(&p)[0] {
            GroupedSegment::Loop { pattern, count, .. } => {
                assert_eq!(pattern.len(), 1);
                assert_eq!(*count, 6);
            }
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_greater_coverage_wins() {
        // Length 1 covers [A A], length 3 covers all six steps
        let p = path(&["A", "A", "B", "A", "A", "B"]);
        let segments = segment(&p);

        assert_eq!(segments.len(), 1);
        match &segments[0] {
            GroupedSegment::Loop { pattern, count, .. } => {
                assert_eq!(pattern, &path(&["A", "A", "B"]));
                assert_eq!(*count, 2);
            }
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_loop_groups_across_destinations() {
        let p = path(&[
            "Klikk: lenketekst: Se mer||destinasjon: /a",
            "Klikk: lenketekst: Se mer||destinasjon: /b",
        ]);
        match &segment(&p)[0] {
            GroupedSegment::Loop {
                count,
                has_variation,
                has_exit,
                ..
            } => {
                assert_eq!(*count, 2);
                assert!(*has_variation);
                assert!(*has_exit);
            }
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_loop_preferred_over_duplicate() {
        let p = path(&[
            "Åpne: tekst: X",
            "Vis: tekst: X",
            "Åpne: tekst: X",
            "Vis: tekst: X",
        ]);
        let segments = segment(&p);

        assert_eq!(segments.len(), 1);
        match &segments[0] {
            GroupedSegment::Loop {
                count,
                has_duplicate_in_pattern,
                ..
            } => {
                assert_eq!(*count, 2);
                assert!(*has_duplicate_in_pattern);
            }
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_toggle_loop_has_no_duplicate_in_pattern() {
        let p = path(&[
            "Åpne meny: tekst: Meny",
            "Lukke meny: tekst: Meny",
            "Åpne meny: tekst: Meny",
            "Lukke meny: tekst: Meny",
        ]);
        match &segment(&p)[0] {
            GroupedSegment::Loop {
                count,
                has_duplicate_in_pattern,
                ..
            } => {
                assert_eq!(*count, 2);
                assert!(!*has_duplicate_in_pattern);
            }
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_run_extends() {
        let p = path(&[
            "Klikk: tekst: X",
            "Navigere: tekst: X",
            "Klikk: tekst: X",
        ]);
        assert_eq!(
            segment(&p),
            vec![GroupedSegment::Duplicate {
                steps: p.clone(),
                start_index: 0,
            }]
        );
    }

    #[test]
    fn test_duplicate_run_stops_on_repeated_event_name() {
        let p = path(&["A: tekst: X", "B: tekst: X", "B: tekst: X"]);
        let segments = segment(&p);

        assert_eq!(
            segments,
            vec![
                GroupedSegment::Duplicate {
                    steps: p[..2].to_vec(),
                    start_index: 0,
                },
                GroupedSegment::Single {
                    step: p[2].clone(),
                    original_index: 2,
                },
            ]
        );
    }

    #[test]
    fn test_empty_subtitle_never_duplicates() {
        let p = path(&["A: seksjon: Topp", "B: seksjon: Topp"]);
        assert!(segment(&p)
            .iter()
            .all(|s| matches!(s, GroupedSegment::Single { .. })));
    }

    #[test]
    fn test_segments_partition_path() {
        let cases = vec![
            path(&["A"]),
            path(&["A", "A"]),
            path(&["A", "B", "C", "A", "B", "C", "A", "B"]),
            path(&["X: tekst: 1", "Y: tekst: 1", "Z: tekst: 1", "Z: tekst: 1"]),
            path(&[
                "Åpne meny: tekst: Meny",
                "Lukke meny: tekst: Meny",
                "Søk: tekst: skatt",
                "Søk: tekst: skatt",
                "Klikk: lenketekst: Skattekort||destinasjon: /skattekort",
                "Navigere: destinasjon: /skattekort",
            ]),
        ];

        for p in &cases {
            assert_partition(p);
        }
    }

    #[test]
    fn test_loop_and_duplicate_minimums() {
        let p = path(&[
            "A: tekst: 1",
            "A: tekst: 1",
            "B: tekst: 2",
            "C: tekst: 2",
            "D: tekst: 3",
        ]);
        for s in segment(&p) {
            match s {
                GroupedSegment::Loop { count, .. } => assert!(count >= 2),
                GroupedSegment::Duplicate { steps, .. } => assert!(steps.len() >= 2),
                GroupedSegment::Single { .. } => {}
            }
        }
    }
}
