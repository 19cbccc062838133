//! Open/close toggle detection.
//!
//! "Åpne meny" followed by "Lukke meny" share a subtitle but are a toggle,
//! not an accidental double registration.

const OPEN_TERMS: &[&str] = &["åpne", "open", "expand", "show", "vis"];
const CLOSE_TERMS: &[&str] = &["lukke", "close", "collapse", "hide", "skjul"];

fn contains_any(name: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| name.contains(term))
}

/// Whether two event names form an open/close pair, in either order.
///
/// Matching is case-insensitive substring containment.
pub fn are_opposing(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    (contains_any(&a, OPEN_TERMS) && contains_any(&b, CLOSE_TERMS))
        || (contains_any(&a, CLOSE_TERMS) && contains_any(&b, OPEN_TERMS))
}
