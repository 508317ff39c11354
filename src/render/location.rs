//! Location detection report

use crate::client::LocationReply;

/// Shown when the detection call itself fails
pub const LOCATION_FAILED_MESSAGE: &str = "Location check failed.";

/// What the page tells the user after a location lookup
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSummary {
    /// Multi-line report, plain text
    pub report: String,
    /// Assistant message to post in the chat, on success only
    pub greeting: Option<String>,
}

pub fn render_location_summary(reply: &LocationReply) -> LocationSummary {
    if !reply.is_success() {
        return LocationSummary {
            report: format!(
                "Could not detect MP: {}",
                reply.message.as_deref().unwrap_or("unknown error")
            ),
            greeting: None,
        };
    }

    let location = reply.location.as_deref().unwrap_or("an unknown location");
    let mut report = format!("You are in {}.\n", location);

    if let Some(mp) = &reply.mp {
        report.push_str(&format!(
            "MP: {} ({})\n",
            mp.name.as_deref().unwrap_or("Unknown"),
            mp.party.as_deref().unwrap_or("")
        ));
    }

    if let Some(local) = &reply.local_reps {
        report.push_str(&format!(
            "MLA: {} ({})\n",
            local.mla_name.as_deref().unwrap_or("Unknown"),
            local.mla_party.as_deref().unwrap_or("")
        ));
        report.push_str(&format!(
            "Councillor: {} ({})",
            local.councillor_name.as_deref().unwrap_or("Unknown"),
            local.councillor_party.as_deref().unwrap_or("")
        ));
    }

    let mp_name = reply
        .mp
        .as_ref()
        .and_then(|mp| mp.name.as_deref())
        .unwrap_or("unknown");

    LocationSummary {
        report,
        greeting: Some(format!(
            "I see you are in {}. Your MP is {}. How can I help you regarding them?",
            location, mp_name
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(json: &str) -> LocationReply {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_success_with_local_reps() {
        let summary = render_location_summary(&reply(
            r#"{"status": "success", "location": "Pune",
                "mp": {"name": "Asha Verma", "party": "INC"},
                "local_reps": {"mla_name": "R. Kale", "mla_party": "BJP"}}"#,
        ));

        assert_eq!(
            summary.report,
            "You are in Pune.\nMP: Asha Verma (INC)\nMLA: R. Kale (BJP)\nCouncillor: Unknown ()"
        );
        assert_eq!(
            summary.greeting.as_deref(),
            Some("I see you are in Pune. Your MP is Asha Verma. How can I help you regarding them?")
        );
    }

    #[test]
    fn test_success_without_mp() {
        let summary = render_location_summary(&reply(r#"{"status": "success", "location": "Goa"}"#));
        assert_eq!(summary.report, "You are in Goa.\n");
        assert!(summary.greeting.unwrap().contains("Your MP is unknown."));
    }

    #[test]
    fn test_failure_message() {
        let summary = render_location_summary(&reply(
            r#"{"status": "error", "message": "Outside India"}"#,
        ));
        assert_eq!(summary.report, "Could not detect MP: Outside India");
        assert!(summary.greeting.is_none());
    }
}
