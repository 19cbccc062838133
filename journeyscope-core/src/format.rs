//! Formatting helpers for terminal output.
//!
//! Step numbers are one-based, as shown to users.

use crate::journey::{decode, subtitle};
use crate::types::{GroupedSegment, SegmentedJourney};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Format a count with thousands separators (e.g., "12,345").
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a 0.0-1.0 share as a percentage (e.g., "25.6%").
pub fn format_share(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

/// One-line label for a raw step: event name and subtitle.
pub fn step_label(raw: &str) -> String {
    let step = decode(raw);
    let title = subtitle(&step);
    if title.is_empty() {
        step.event_name.clone()
    } else {
        format!("{} · {}", step.event_name, title)
    }
}

fn push_step(out: &mut String, depth: usize, index: usize, raw: &str) {
    let _ = writeln!(
        out,
        "{}#{} {}",
        INDENT.repeat(depth),
        index + 1,
        step_label(raw)
    );
}

/// Render one segment as step cards with loop/duplicate badges.
pub fn render_segment(segment: &GroupedSegment) -> String {
    let mut out = String::new();

    match segment {
        GroupedSegment::Single {
            step,
            original_index,
        } => push_step(&mut out, 1, *original_index, step),
        GroupedSegment::Loop {
            pattern,
            count,
            start_index,
            has_variation,
            has_duplicate_in_pattern,
            ..
        } => {
            let mut badges = vec![format!("↻ ×{}", count)];
            if *has_variation {
                badges.push("[variation]".to_string());
            }
            if *has_duplicate_in_pattern {
                badges.push("[duplicate]".to_string());
            }
            let _ = writeln!(out, "{}{}", INDENT, badges.join(" "));
            for (offset, step) in pattern.iter().enumerate() {
                push_step(&mut out, 2, start_index + offset, step);
            }
        }
        GroupedSegment::Duplicate { steps, start_index } => {
            let _ = writeln!(out, "{}≈ duplicate ×{}", INDENT, steps.len());
            for (offset, step) in steps.iter().enumerate() {
                push_step(&mut out, 2, start_index + offset, step);
            }
        }
    }

    out
}

/// Render a segmented journey with a session-count header.
pub fn render_journey(journey: &SegmentedJourney) -> String {
    let mut out = format!(
        "{} session{} · {} step{}\n",
        format_count(journey.count),
        if journey.count == 1 { "" } else { "s" },
        journey.path.len(),
        if journey.path.len() == 1 { "" } else { "s" },
    );
    for segment in &journey.segments {
        out.push_str(&render_segment(segment));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::segment_journeys;
    use crate::types::Journey;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(0.0), "0.0%");
        assert_eq!(format_share(0.256), "25.6%");
        assert_eq!(format_share(1.0), "100.0%");
    }

    #[test]
    fn test_step_label() {
        assert_eq!(step_label("Klikk: lenketekst: Se mer"), "Klikk · Se mer");
        assert_eq!(step_label("pageview"), "pageview");
    }

    #[test]
    fn test_render_journey() {
        let journeys = segment_journeys(&[Journey::new(
            [
                "Klikk: tekst: A||destinasjon: /a",
                "Klikk: tekst: A||destinasjon: /b",
                "Åpne: tekst: X",
                "Vis: tekst: X",
            ],
            1200,
        )]);

        let rendered = render_journey(&journeys[0]);
        let expected = "\
1,200 sessions · 4 steps
  ↻ ×2 [variation]
    #1 Klikk · /a
  ≈ duplicate ×2
    #3 Åpne · X
    #4 Vis · X
";
        assert_eq!(rendered, expected);
    }
}
