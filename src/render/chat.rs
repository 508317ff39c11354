//! Chat bubbles

use super::escape;
use crate::chat::{ChatMessage, Role};

/// Message list of the chat widget
pub fn render_messages(messages: &[ChatMessage]) -> String {
    messages.iter().map(render_message).collect::<Vec<_>>().join("\n")
}

fn render_message(message: &ChatMessage) -> String {
    // innerText semantics: line breaks are kept
    let mut html = escape(&message.text).replace('\n', "<br>");

    if message.is_rateable() {
        html.push_str(&render_rating(message));
    }
    if message.role == Role::Assistant && !message.chips.is_empty() {
        html.push_str(&render_chips(message));
    }

    format!(
        r#"<div class="msg {}" data-msg-id="{}">{}</div>"#,
        message.role.css_class(),
        message.id,
        html
    )
}

fn render_rating(message: &ChatMessage) -> String {
    let current = message.rating.unwrap_or(0);
    let stars: String = (1..=5u8)
        .map(|n| {
            let class = if n <= current { "star active" } else { "star" };
            format!(
                r#"<span class="{class}" data-msg-id="{}" data-rating="{n}">★</span>"#,
                message.id
            )
        })
        .collect();

    format!(r#"<div class="rating">Rate: {stars}</div>"#)
}

fn render_chips(message: &ChatMessage) -> String {
    let chips: String = message
        .chips
        .iter()
        .enumerate()
        .map(|(i, chip)| {
            format!(
                r#"<button class="chip" data-msg-id="{}" data-chip="{i}">{}</button>"#,
                message.id,
                escape(chip)
            )
        })
        .collect();

    format!(r#"<div class="suggestion-chips">{chips}</div>"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant(id: u64, text: &str, chat_id: Option<i64>, chips: &[&str]) -> ChatMessage {
        ChatMessage {
            id,
            role: Role::Assistant,
            text: text.to_string(),
            chips: chips.iter().map(|c| c.to_string()).collect(),
            chat_id,
            rating: None,
        }
    }

    #[test]
    fn test_user_bubble_is_escaped() {
        let message = ChatMessage {
            id: 1,
            role: Role::User,
            text: "<b>hi</b>".to_string(),
            chips: vec![],
            chat_id: None,
            rating: None,
        };
        assert_eq!(
            render_messages(&[message]),
            r#"<div class="msg user" data-msg-id="1">&lt;b&gt;hi&lt;/b&gt;</div>"#
        );
    }

    #[test]
    fn test_rating_stars_only_with_chat_id() {
        let html = render_messages(&[assistant(2, "Hi", None, &[])]);
        assert!(!html.contains("rating"));

        let mut rated = assistant(3, "Hi", Some(7), &[]);
        rated.rating = Some(2);
        let html = render_messages(&[rated]);
        assert_eq!(html.matches(r#"class="star active""#).count(), 2);
        assert_eq!(html.matches(r#"class="star""#).count(), 3);

        let mut user = assistant(5, "Hi", Some(7), &[]);
        user.role = Role::User;
        assert!(!render_messages(&[user]).contains("rating"));
    }

    #[test]
    fn test_chips_and_line_breaks() {
        let html = render_messages(&[assistant(4, "Line one\nLine two", None, &["a", "b"])]);
        assert!(html.contains("Line one<br>Line two"));
        assert!(html.contains(r#"<button class="chip" data-msg-id="4" data-chip="1">b</button>"#));
    }
}
