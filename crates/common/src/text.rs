//! Small text helpers for outbound message bodies.

/// Escape the three characters the bot API's HTML parse mode treats as markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Keep at most `max_chars` characters (Unicode scalar values) of `text`.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Format an amount as euros with exactly two decimals.
///
/// Non-finite amounts render as `€0.00`.
#[must_use]
pub fn format_eur(amount: f64) -> String {
    let amount = if amount.is_finite() {
        amount
    } else {
        0.0
    };
    format!("€{amount:.2}")
}
