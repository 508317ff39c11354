//! Admin dashboard fragments

use chrono::{DateTime, Local, NaiveDateTime};

use super::{escape, fmt_number, text};
use crate::client::{ChatLogEntry, RankedCount, StatsSnapshot};

/// Colour of the top-actions counts
pub const TOP_ACTIONS_COLOUR: &str = "#6C63FF";

/// Colour of the drop-off counts
pub const DROP_OFFS_COLOUR: &str = "#FF6584";

const RESPONSE_PREVIEW_CHARS: usize = 100;

/// Headline counters
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub users: String,
    pub duration: String,
}

pub fn render_overview(stats: &StatsSnapshot) -> Overview {
    let show = |value: Option<f64>| value.map(fmt_number).unwrap_or_else(|| "-".to_string());

    Overview {
        users: show(stats.new_users),
        duration: format!("{}s", show(stats.avg_duration)),
    }
}

/// `label count` rows with the count in `colour`
pub fn render_ranked_list(items: &[RankedCount], colour: &str) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                r#"<div class="list-item"><span>{}</span> <span style="color:{}; font-weight:bold;">{}</span></div>"#,
                text(&item.event_type),
                colour,
                item.count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rows of the recent-chats table
pub fn render_chat_log(entries: &[ChatLogEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let response: String = entry
                .ai_response
                .as_deref()
                .unwrap_or("")
                .chars()
                .take(RESPONSE_PREVIEW_CHARS)
                .collect();

            let rating = if entry.rating > 0 {
                "⭐".repeat(entry.rating.min(5) as usize)
            } else {
                "-".to_string()
            };

            format!(
                r#"<tr style="border-bottom: 1px solid rgba(255,255,255,0.1);"><td style="padding: 1rem; font-size: 0.9em; color: #aaa;">{}</td><td style="padding: 1rem;">{}</td><td style="padding: 1rem; color: #ccc;">{}...</td><td style="padding: 1rem;">{}</td></tr>"#,
                escape(&format_timestamp(entry.timestamp.as_deref())),
                text(&entry.user_query),
                escape(&response),
                rating
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Timestamp in local time.
///
/// RFC 3339 values are converted to the local zone; naive values are shown
/// as stored. Anything else is shown verbatim.
pub fn format_timestamp(raw: Option<&str>) -> String {
    const DISPLAY: &str = "%d/%m/%Y, %H:%M:%S";

    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return "-".to_string();
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Local).format(DISPLAY).to_string();
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.format(DISPLAY).to_string())
        .unwrap_or_else(|| raw.to_string())
}
