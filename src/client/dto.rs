//! Data Transfer Objects
//!
//! Request and response types for the `/api/*` endpoints.
//! Scalar fields on response records are decoded leniently: a value of the
//! wrong JSON type is treated as absent instead of rejecting the payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder shown when an achievements list cannot be decoded
pub const ACHIEVEMENT_PLACEHOLDER: &str = "Data unavailable";

// ============================================
// REPRESENTATIVES
// ============================================

/// An elected representative as returned by `GET /api/representatives`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Representative {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub party: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub constituency: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub years_in_office: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub funds_spent_crores: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub funds_total_crores: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub attendance_percentage: Option<f64>,
    /// JSON-encoded list of strings
    #[serde(default)]
    pub achievements: Option<Value>,
    /// JSON-encoded list of `{headline, date}`
    #[serde(default)]
    pub news: Option<Value>,
    /// JSON-encoded list of strings
    #[serde(default)]
    pub sources: Option<Value>,
}

/// A news entry attached to a representative
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct NewsItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub headline: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
}

impl Representative {
    /// Decoded achievements.
    ///
    /// An absent field is an empty list; an undecodable one yields a single
    /// placeholder entry.
    pub fn achievements(&self) -> Vec<String> {
        decode_encoded::<Value>(&self.achievements)
            .map(|items| items.iter().map(display_value).collect())
            .unwrap_or_else(|| vec![ACHIEVEMENT_PLACEHOLDER.to_string()])
    }

    /// Decoded news items; empty when absent or undecodable
    pub fn news(&self) -> Vec<NewsItem> {
        decode_encoded::<NewsItem>(&self.news).unwrap_or_default()
    }

    /// Decoded verification sources; empty when absent or undecodable
    pub fn sources(&self) -> Vec<String> {
        decode_encoded::<Value>(&self.sources)
            .map(|items| items.iter().map(display_value).collect())
            .unwrap_or_default()
    }
}

/// Decode a list that may arrive as a JSON-encoded string or a plain array.
///
/// Returns `None` when the value is present but cannot be decoded.
fn decode_encoded<T: DeserializeOwned>(raw: &Option<Value>) -> Option<Vec<T>> {
    match raw {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::String(s)) if s.trim().is_empty() => Some(Vec::new()),
        Some(Value::String(s)) => serde_json::from_str(s).ok(),
        Some(value @ Value::Array(_)) => serde_json::from_value(value.clone()).ok(),
        Some(_) => None,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================
// LOCATION
// ============================================

#[derive(Debug, Clone, Serialize)]
pub struct LocationRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// Reply of `POST /api/detect-location`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct LocationReply {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default)]
    pub mp: Option<MpSummary>,
    #[serde(default)]
    pub local_reps: Option<LocalReps>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

impl LocationReply {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct MpSummary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub constituency: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub party: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct LocalReps {
    #[serde(default, deserialize_with = "lenient_string")]
    pub mla_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mla_party: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub councillor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub councillor_party: Option<String>,
}

// ============================================
// CHAT
// ============================================

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub query: String,
}

/// Reply of `POST /api/chat`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ChatReply {
    #[serde(default)]
    pub response: String,
    /// Server-side id used for feedback; `0` when the answer was not stored
    #[serde(default, deserialize_with = "lenient_id")]
    pub chat_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest {
    pub chat_id: i64,
    pub rating: u8,
}

// ============================================
// ANALYTICS
// ============================================

#[derive(Debug, Clone, Serialize)]
pub struct HeartbeatRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventRequest {
    pub session_id: String,
    pub event_type: String,
    pub details: String,
}

// ============================================
// ADMIN
// ============================================

/// Reply of `GET /api/admin/stats`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct StatsSnapshot {
    #[serde(default, deserialize_with = "lenient_number")]
    pub new_users: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub avg_duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub top_actions: Vec<RankedCount>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub drop_offs: Vec<RankedCount>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub traffic_by_hour: Vec<HourBucket>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub top_locations: Vec<LocationCount>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub recent_chats: Vec<ChatLogEntry>,
}

/// `{event_type, count}` row of the ranked lists
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RankedCount {
    #[serde(default, deserialize_with = "lenient_string")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
}

/// Events seen in one hour of the day
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct HourBucket {
    /// Two-digit hour ("00".."23")
    #[serde(default, deserialize_with = "lenient_string")]
    pub hour: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
}

/// Visits grouped by resolved location
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct LocationCount {
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
}

impl LocationCount {
    /// Both coordinates, when present and finite
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// A stored chat exchange shown in the admin transcript table
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ChatLogEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_query: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ai_response: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub rating: u64,
}

// ============================================
// LENIENT DECODING
// ============================================

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(lenient_number(deserializer)?
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n as u64)
        .unwrap_or(0))
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A list whose malformed entries are dropped instead of failing the payload
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Decode a representatives payload, dropping entries that are not objects
pub fn decode_representatives(body: &str) -> Result<Vec<Representative>, serde_json::Error> {
    let items: Vec<Value> = serde_json::from_str(body)?;
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_representative_tolerates_wrong_types() {
        let rep: Representative = serde_json::from_value(json!({
            "name": "Asha Verma",
            "party": null,
            "years_in_office": "7",
            "attendance_percentage": {"oops": true},
            "funds_spent_crores": 12.5
        }))
        .unwrap();

        assert_eq!(rep.name.as_deref(), Some("Asha Verma"));
        assert_eq!(rep.party, None);
        assert_eq!(rep.years_in_office, Some(7.0));
        assert_eq!(rep.attendance_percentage, None);
        assert_eq!(rep.funds_spent_crores, Some(12.5));
    }

    #[test]
    fn test_achievements_encoded_string() {
        let rep = Representative {
            achievements: Some(json!("[\"Built 40 schools\", \"Rural roads\"]")),
            ..Default::default()
        };
        assert_eq!(rep.achievements(), vec!["Built 40 schools", "Rural roads"]);
    }

    #[test]
    fn test_achievements_invalid_json_yields_placeholder() {
        let rep = Representative {
            achievements: Some(json!("[not json")),
            ..Default::default()
        };
        assert_eq!(rep.achievements(), vec![ACHIEVEMENT_PLACEHOLDER]);
    }

    #[test]
    fn test_achievements_absent_is_empty() {
        assert!(Representative::default().achievements().is_empty());
        let blank = Representative {
            achievements: Some(json!("")),
            ..Default::default()
        };
        assert!(blank.achievements().is_empty());
    }

    #[test]
    fn test_news_and_sources_degrade_to_empty() {
        let rep = Representative {
            news: Some(json!("{broken")),
            sources: Some(json!(42)),
            ..Default::default()
        };
        assert!(rep.news().is_empty());
        assert!(rep.sources().is_empty());
    }

    #[test]
    fn test_news_accepts_plain_array() {
        let rep = Representative {
            news: Some(json!([{"headline": "Bridge opened", "date": "2024-03-01"}])),
            ..Default::default()
        };
        let news = rep.news();
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].headline.as_deref(), Some("Bridge opened"));
    }

    #[test]
    fn test_decode_representatives_skips_non_objects() {
        let reps = decode_representatives(r#"[{"name": "A"}, 7, {"name": "B"}]"#).unwrap();
        assert_eq!(reps.len(), 2);
        assert!(decode_representatives(r#"{"name": "A"}"#).is_err());
    }

    #[test]
    fn test_stats_snapshot_drops_malformed_rows() {
        let stats: StatsSnapshot = serde_json::from_value(json!({
            "new_users": 12,
            "avg_duration": 84.5,
            "top_actions": [{"event_type": "search", "count": 9}, "garbage"],
            "traffic_by_hour": [{"hour": "03", "count": "4"}],
            "top_locations": null
        }))
        .unwrap();

        assert_eq!(stats.new_users, Some(12.0));
        assert_eq!(stats.top_actions.len(), 1);
        assert_eq!(stats.traffic_by_hour[0].count, 4);
        assert!(stats.top_locations.is_empty());
        assert!(stats.recent_chats.is_empty());
    }

    #[test]
    fn test_chat_reply_id() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response": "Hello", "chat_id": 7}"#).unwrap();
        assert_eq!(reply.chat_id, Some(7));

        let reply: ChatReply = serde_json::from_str(r#"{"response": "Hi"}"#).unwrap();
        assert_eq!(reply.chat_id, None);
    }

    #[test]
    fn test_location_coordinates() {
        let loc = LocationCount {
            location: Some("Pune".into()),
            latitude: Some(18.5),
            longitude: None,
            count: 3,
        };
        assert_eq!(loc.coordinates(), None);
    }
}
