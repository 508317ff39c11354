//! View Renderer
//!
//! Pure functions from data snapshots to HTML fragments. Every value that
//! came from the network or the dataset is escaped before interpolation.

pub mod admin;
pub mod chat;
pub mod layout;
pub mod location;
pub mod parties;
pub mod representatives;

pub use admin::{render_chat_log, render_overview, render_ranked_list, Overview};
pub use chat::render_messages;
pub use location::{render_location_summary, LocationSummary};
pub use parties::{
    render_criteria, render_hemicycle, render_party_cards, render_state_detail, toggle_label,
};
pub use representatives::{
    render_party_symbol, render_representative_detail, render_representatives,
    resolve_party_symbol, EMPTY_GRID_MESSAGE,
};

/// Escape text for an HTML text node
pub fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Escape text for a double-quoted attribute value
pub fn escape_attr(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// Escaped optional text, empty when absent
pub(crate) fn text(value: &Option<String>) -> String {
    value.as_deref().map(escape).unwrap_or_default()
}

/// Shortest decimal form of a number: `12`, `12.5`
pub fn fmt_number(value: f64) -> String {
    if value == 0.0 {
        // avoids "-0"
        return "0".to_string();
    }
    value.to_string()
}

/// The number, or `fallback` when it is absent, zero or NaN
pub(crate) fn number_or(value: Option<f64>, fallback: &str) -> String {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => fmt_number(v),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<script>a & b</script>"), "&lt;script&gt;a &amp; b&lt;/script&gt;");
        assert!(!escape_attr(r#"a" onerror="x"#).contains('"'));
    }

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(12.0), "12");
        assert_eq!(fmt_number(12.5), "12.5");
        assert_eq!(fmt_number(-0.0), "0");
    }

    #[test]
    fn test_number_or() {
        assert_eq!(number_or(None, "-"), "-");
        assert_eq!(number_or(Some(0.0), "-"), "-");
        assert_eq!(number_or(Some(f64::NAN), "0"), "0");
        assert_eq!(number_or(Some(91.5), "0"), "91.5");
    }
}
