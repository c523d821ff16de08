//! Text and bar formatting helpers for control rows.

/// Title-case a label: uppercase the first letter of each word.
///
/// Labels arrive lowercased from the topic convention ("living room",
/// "coffee maker"); headers render them as "Living Room".
pub fn title_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut at_word_start = true;
    for ch in label.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Render a slider position as filled and empty bar segments.
///
/// Returns `(filled, empty)` strings of `█` and `░` characters that
/// together span `width` character positions. Caller applies styling per
/// segment.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::as_conversions
)]
pub fn fmt_level_bar(value: i64, min: i64, max: i64, width: u16) -> (String, String) {
    let span = (max - min).max(1) as f64;
    let fraction = ((value - min) as f64 / span).clamp(0.0, 1.0);
    let filled_count = (fraction * f64::from(width)).round() as u16;
    let empty_count = width.saturating_sub(filled_count);
    (
        "█".repeat(usize::from(filled_count)),
        "░".repeat(usize::from(empty_count)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("living room"), "Living Room");
        assert_eq!(title_case("oven"), "Oven");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn level_bar_spans_the_requested_width() {
        let (filled, empty) = fmt_level_bar(50, 0, 100, 10);
        assert_eq!(filled.chars().count(), 5);
        assert_eq!(empty.chars().count(), 5);

        let (filled, empty) = fmt_level_bar(0, 0, 100, 10);
        assert_eq!(filled, "");
        assert_eq!(empty.chars().count(), 10);

        let (filled, empty) = fmt_level_bar(100, 0, 100, 10);
        assert_eq!(filled.chars().count(), 10);
        assert_eq!(empty, "");
    }

    #[test]
    fn level_bar_handles_offset_bounds() {
        // Kelvin-style bounds: 2500..9000, midpoint fills half the bar.
        let (filled, _) = fmt_level_bar(5750, 2500, 9000, 10);
        assert_eq!(filled.chars().count(), 5);
    }
}
