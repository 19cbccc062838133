//! Step codec
//!
//! Converts between the raw wire format and [`DecodedStep`]:
//!
//! ```text
//! Klikk: lenketekst: Se mer||destinasjon: /foo
//! ^^^^^  ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
//! event  details, separated by "||", each split on the first ": "
//! ```
//!
//! Decoding is permissive. The detail blob is free text, so segments that do
//! not look like `key: value` are dropped instead of reported.

use crate::types::{DecodedStep, StepDetail};

/// Separator between event name and details, and between key and value.
pub const KEY_VALUE_SEPARATOR: &str = ": ";

/// Separator between detail entries.
pub const DETAIL_SEPARATOR: &str = "||";

/// Decode a raw step into its event name and ordered details.
pub fn decode(raw: &str) -> DecodedStep {
    let Some((event_name, rest)) = raw.split_once(KEY_VALUE_SEPARATOR) else {
        return DecodedStep {
            event_name: raw.to_string(),
            details: Vec::new(),
        };
    };

    let details = rest
        .split(DETAIL_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| segment.split_once(KEY_VALUE_SEPARATOR))
        .map(|(key, value)| StepDetail::new(key, value))
        .collect();

    DecodedStep {
        event_name: event_name.to_string(),
        details,
    }
}

/// Encode a decoded step back into wire format.
///
/// A step without details encodes to the bare event name.
pub fn encode(step: &DecodedStep) -> String {
    if step.details.is_empty() {
        return step.event_name.clone();
    }

    let details = step
        .details
        .iter()
        .map(|d| format!("{}{}{}", d.key, KEY_VALUE_SEPARATOR, d.value))
        .collect::<Vec<_>>()
        .join(DETAIL_SEPARATOR);

    format!("{}{}{}", step.event_name, KEY_VALUE_SEPARATOR, details)
}
