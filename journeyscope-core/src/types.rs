//! Core domain types for journeyscope
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Step** | One tracked event in a session, encoded as a raw string |
//! | **Detail** | A key/value pair attached to a step (link text, section, destination) |
//! | **Journey** | An ordered path of steps shared by `count` sessions |
//! | **Segment** | A run of a journey's path grouped for display: single, loop or duplicate |
//! | **Subtitle** | The most descriptive detail value of a step, used to spot duplicates |
//!
//! Raw steps use the wire format produced by the query backend:
//!
//! ```text
//! <EventName>: <key1>: <val1>||<key2>: <val2>||...
//! ```

use serde::{Deserialize, Serialize};

/// A step in wire format, as returned by the query API.
pub type RawStep = String;

// ============================================
// Steps
// ============================================

/// A single key/value pair from a step's detail blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDetail {
    pub key: String,
    pub value: String,
}

impl StepDetail {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A step split into its event name and ordered details.
///
/// Derived from a [`RawStep`] with [`crate::journey::decode`]. Detail order is
/// exactly the order found in the raw string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedStep {
    pub event_name: String,
    pub details: Vec<StepDetail>,
}

impl DecodedStep {
    /// Look up a detail value. If a key repeats, the last occurrence wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .rev()
            .find(|d| d.key == key)
            .map(|d| d.value.as_str())
    }

    /// Same as [`get`](Self::get), with missing keys read as `""`.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }
}

// ============================================
// Journeys
// ============================================

/// An ordered path of steps and the number of sessions that followed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journey {
    pub path: Vec<RawStep>,
    pub count: u64,
}

impl Journey {
    pub fn new<I, S>(path: I, count: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            count,
        }
    }
}

/// Response envelope of the journeys endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JourneysResponse {
    #[serde(default)]
    pub journeys: Vec<Journey>,
}

/// Journeys as found in a JSON document: either a bare array or the API envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JourneyPayload {
    List(Vec<Journey>),
    Envelope(JourneysResponse),
}

impl JourneyPayload {
    pub fn into_journeys(self) -> Vec<Journey> {
        match self {
            JourneyPayload::List(journeys) => journeys,
            JourneyPayload::Envelope(response) => response.journeys,
        }
    }
}

// ============================================
// Segments
// ============================================

/// A contiguous run of a journey's path, grouped for display.
///
/// A sequence of segments produced by [`crate::journey::segment`] partitions the
/// input path: concatenating every segment's [`covered_steps`](Self::covered_steps)
/// gives back the path, in order, with nothing missing or repeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum GroupedSegment {
    /// A step that is neither part of a loop nor of a duplicate run
    Single { step: RawStep, original_index: usize },

    /// A pattern of 1-3 steps repeated `count` times back to back
    Loop {
        pattern: Vec<RawStep>,
        count: usize,
        start_index: usize,
        has_variation: bool,
        has_exit: bool,
        all_steps: Vec<RawStep>,
        has_duplicate_in_pattern: bool,
    },

    /// Adjacent steps with the same subtitle but different event names
    Duplicate { steps: Vec<RawStep>, start_index: usize },
}

impl GroupedSegment {
    /// Path position of the first step this segment covers.
    pub fn start_index(&self) -> usize {
        match self {
            GroupedSegment::Single { original_index, .. } => *original_index,
            GroupedSegment::Loop { start_index, .. } => *start_index,
            GroupedSegment::Duplicate { start_index, .. } => *start_index,
        }
    }

    /// The steps of the original path this segment stands for.
    pub fn covered_steps(&self) -> &[RawStep] {
        match self {
            GroupedSegment::Single { step, .. } => std::slice::from_ref(step),
            GroupedSegment::Loop { all_steps, .. } => all_steps,
            GroupedSegment::Duplicate { steps, .. } => steps,
        }
    }

    /// Number of path positions covered.
    pub fn len(&self) -> usize {
        self.covered_steps().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A journey together with its segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedJourney {
    pub path: Vec<RawStep>,
    pub count: u64,
    pub segments: Vec<GroupedSegment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_lookup_last_write_wins() {
        let step = DecodedStep {
            event_name: "Klikk".to_string(),
            details: vec![
                StepDetail::new("tekst", "Første"),
                StepDetail::new("seksjon", "Topp"),
                StepDetail::new("tekst", "Andre"),
            ],
        };
        assert_eq!(step.get("tekst"), Some("Andre"));
        assert_eq!(step.get("seksjon"), Some("Topp"));
        assert_eq!(step.get("destinasjon"), None);
        assert_eq!(step.get_or_empty("destinasjon"), "");
    }

    #[test]
    fn test_payload_accepts_list_and_envelope() {
        let list = r#"[{"path": ["A"], "count": 2}]"#;
        let envelope = r#"{"journeys": [{"path": ["A"], "count": 2}]}"#;

        let from_list: JourneyPayload = serde_json::from_str(list).unwrap();
        let from_envelope: JourneyPayload = serde_json::from_str(envelope).unwrap();

        assert_eq!(from_list.into_journeys(), vec![Journey::new(["A"], 2)]);
        assert_eq!(from_envelope.into_journeys(), vec![Journey::new(["A"], 2)]);
    }

    #[test]
    fn test_segment_json_shape() {
        let segment = GroupedSegment::Single {
            step: "A".to_string(),
            original_index: 3,
        };
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["type"], "single");
        assert_eq!(json["originalIndex"], 3);

        let segment = GroupedSegment::Duplicate {
            steps: vec!["A".to_string(), "B".to_string()],
            start_index: 0,
        };
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["type"], "duplicate");
        assert_eq!(json["startIndex"], 0);
    }

    #[test]
    fn test_covered_steps() {
        let segment = GroupedSegment::Loop {
            pattern: vec!["A".to_string()],
            count: 3,
            start_index: 1,
            has_variation: false,
            has_exit: false,
            all_steps: vec!["A".to_string(); 3],
            has_duplicate_in_pattern: false,
        };
        assert_eq!(segment.len(), 3);
        assert_eq!(segment.start_index(), 1);
    }
}
