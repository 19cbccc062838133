//! Grouping keys and subtitles
//!
//! A grouping key decides whether two steps are "the same action" when
//! looking for loops. It deliberately leaves out the destination, so two
//! clicks on the same link that land in different places still group.

use crate::types::DecodedStep;

/// Separator between the parts of a grouping key.
pub const GROUPING_KEY_SEPARATOR: &str = "::";

/// Detail keys that, together with the event name, identify an action.
/// The identifier (`lenketekst`, falling back to `tekst`) comes first.
const GROUPING_FIELDS: &[&str] = &["seksjon", "lenkegruppe", "innholdstype", "malgruppe"];

/// Detail keys tried in order when picking a step's subtitle.
const SUBTITLE_FIELDS: &[&str] = &[
    "destinasjon",
    "lenketekst",
    "tekst",
    "Tekst",
    "tittel",
    "label",
    "url",
];

/// Build the grouping key of a step.
///
/// Missing fields contribute an empty part, so steps that never set a field
/// still group with each other.
pub fn grouping_key(step: &DecodedStep) -> String {
    let identifier = step
        .get("lenketekst")
        .or_else(|| step.get("tekst"))
        .unwrap_or("");

    let mut parts = Vec::with_capacity(2 + GROUPING_FIELDS.len());
    parts.push(step.event_name.as_str());
    parts.push(identifier);
    parts.extend(GROUPING_FIELDS.iter().map(|field| step.get_or_empty(field)));

    parts.join(GROUPING_KEY_SEPARATOR)
}

/// The most descriptive detail value of a step, or `""` if it has none.
///
/// Empty values are skipped, so `destinasjon: ` does not hide a `lenketekst`.
pub fn subtitle(step: &DecodedStep) -> &str {
    SUBTITLE_FIELDS
        .iter()
        .filter_map(|field| step.get(field))
        .find(|value| !value.is_empty())
        .unwrap_or("")
}
