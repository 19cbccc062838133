//! Destination variation across the repetitions of a loop.

use crate::types::DecodedStep;
use std::collections::HashSet;

/// Whether the steps of a loop lead to different destinations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Variation {
    pub has_variation: bool,
    pub has_exit: bool,
}

/// Check whether `steps` differ in `destinasjon`.
///
/// Other fields may differ freely; only the destination counts. A missing
/// destination reads as `""`, so it differs from any set one.
pub fn detect_variation<'a, I>(steps: I) -> Variation
where
    I: IntoIterator<Item = &'a DecodedStep>,
{
    let mut seen = 0usize;
    let destinations: HashSet<&str> = steps
        .into_iter()
        .inspect(|_| seen += 1)
        .map(|step| step.get_or_empty("destinasjon"))
        .collect();

    if seen < 2 || destinations.len() <= 1 {
        return Variation::default();
    }

    Variation {
        has_variation: true,
        has_exit: true,
    }
}
