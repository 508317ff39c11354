//! Chat Session Controller
//!
//! Ordered message list plus the send protocol: user message, telemetry,
//! a `Thinking...` placeholder, the API call, then the reply (or an apology)
//! in place of the placeholder. Assistant replies may carry suggestion
//! chips after a `SUGGESTIONS:` sentinel.

use thiserror::Error;

use crate::client::ApiClient;
use crate::telemetry::{EventKind, TelemetryEmitter};

/// Separates the answer text from its JSON array of suggestions
pub const SUGGESTIONS_SENTINEL: &str = "SUGGESTIONS:";

/// Placeholder shown while waiting for the assistant
pub const THINKING_TEXT: &str = "Thinking...";

/// Shown when the chat call fails
pub const FAILURE_TEXT: &str = "Sorry, something went wrong.";

/// Opening message with starter chips
pub const GREETING: &str = "Hello! I am your Citizen Assistant. I can help you find your MP or understand government schemes.\nSUGGESTIONS: [\"Who is the MP of New Delhi?\", \"How are MPLADS funds used?\", \"What are my civic rights?\"]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// CSS class of the bubble
    pub fn css_class(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "ai",
        }
    }
}

/// One bubble in the conversation
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Client-side id, unique within the session
    pub id: u64,
    pub role: Role,
    pub text: String,
    pub chips: Vec<String>,
    /// Server id for feedback; never `Some(0)`
    pub chat_id: Option<i64>,
    pub rating: Option<u8>,
}

impl ChatMessage {
    pub fn is_rateable(&self) -> bool {
        self.role == Role::Assistant && self.chat_id.is_some()
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RatingError {
    #[error("Rating must be between 1 and 5, got {0}")]
    OutOfRange(u8),

    #[error("Message {0} not found")]
    UnknownMessage(u64),

    #[error("Message {0} has no server id")]
    NotRateable(u64),
}

/// Split a raw assistant reply into display text and suggestion chips.
///
/// Text before the sentinel is trimmed. Chips that do not parse as a JSON
/// string array are dropped.
pub fn parse_reply(raw: &str) -> (String, Vec<String>) {
    let Some((text, suggestions)) = raw.split_once(SUGGESTIONS_SENTINEL) else {
        return (raw.to_string(), Vec::new());
    };

    let chips = serde_json::from_str::<Vec<String>>(suggestions.trim()).unwrap_or_else(|e| {
        tracing::debug!("Could not parse suggestions: {}", e);
        Vec::new()
    });

    (text.trim().to_string(), chips)
}

/// A turn whose question is on screen but whose answer is still out
#[derive(Debug)]
pub struct PendingTurn {
    query: String,
    placeholder: u64,
}

impl PendingTurn {
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Client id of the `Thinking...` bubble
    pub fn placeholder(&self) -> u64 {
        self.placeholder
    }
}

/// Conversation state of the chat widget
pub struct ChatSession {
    client: ApiClient,
    telemetry: TelemetryEmitter,
    messages: Vec<ChatMessage>,
    next_id: u64,
    open: bool,
    show_chips: bool,
}

impl ChatSession {
    pub fn new(client: ApiClient, telemetry: TelemetryEmitter) -> Self {
        Self {
            client,
            telemetry,
            messages: Vec::new(),
            next_id: 1,
            open: false,
            show_chips: true,
        }
    }

    /// Whether assistant suggestions are offered as chips
    pub fn with_suggestion_chips(mut self, enabled: bool) -> Self {
        self.show_chips = enabled;
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn message(&self, id: u64) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Flip widget visibility, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Post the opening message
    pub fn greet(&mut self) -> u64 {
        self.push_assistant(GREETING, None)
    }

    pub fn push_user(&mut self, text: &str) -> u64 {
        self.push(ChatMessage {
            id: 0,
            role: Role::User,
            text: text.to_string(),
            chips: Vec::new(),
            chat_id: None,
            rating: None,
        })
    }

    /// Append an assistant message, splitting off any suggestions
    pub fn push_assistant(&mut self, raw: &str, chat_id: Option<i64>) -> u64 {
        let (text, mut chips) = parse_reply(raw);
        if !self.show_chips {
            chips.clear();
        }

        self.push(ChatMessage {
            id: 0,
            role: Role::Assistant,
            text,
            chips,
            chat_id: chat_id.filter(|id| *id != 0),
            rating: None,
        })
    }

    fn push(&mut self, mut message: ChatMessage) -> u64 {
        message.id = self.next_id;
        self.next_id += 1;
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Remove a message by client id
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }

    /// Start a user turn without waiting on the network.
    ///
    /// Blank input is ignored and returns `None`. Otherwise the user message
    /// and the `Thinking...` placeholder are already in the list when this
    /// returns, so callers can render before awaiting [`complete`].
    ///
    /// [`complete`]: ChatSession::complete
    pub fn begin(&mut self, input: &str) -> Option<PendingTurn> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.push_user(text);
        drop(self.telemetry.fire(EventKind::ChatQuery, text));

        let placeholder = self.push_assistant(THINKING_TEXT, None);
        Some(PendingTurn {
            query: text.to_string(),
            placeholder,
        })
    }

    /// Start a turn from the text of a suggestion chip
    pub fn begin_chip(&mut self, message_id: u64, chip: usize) -> Option<PendingTurn> {
        let text = self.message(message_id)?.chips.get(chip)?.clone();
        self.begin(&text)
    }

    /// Ask the assistant and swap the placeholder for its reply (or the
    /// apology). Returns the id of the new assistant message.
    pub async fn complete(&mut self, turn: PendingTurn) -> u64 {
        let reply = self.client.chat(&turn.query).await;
        self.remove(turn.placeholder);

        match reply {
            Ok(reply) => self.push_assistant(&reply.response, reply.chat_id),
            Err(e) => {
                tracing::warn!("Chat request failed: {}", e);
                self.push_assistant(FAILURE_TEXT, None)
            }
        }
    }

    /// Run one user turn end to end
    pub async fn send(&mut self, input: &str) -> Option<u64> {
        let turn = self.begin(input)?;
        Some(self.complete(turn).await)
    }

    /// Send the text of a suggestion chip as a new user turn
    pub async fn click_chip(&mut self, message_id: u64, chip: usize) -> Option<u64> {
        let turn = self.begin_chip(message_id, chip)?;
        Some(self.complete(turn).await)
    }

    /// Rate an answer with 1 to 5 stars.
    ///
    /// The rating is shown immediately; the feedback call's outcome is
    /// ignored.
    pub async fn rate(&mut self, message_id: u64, rating: u8) -> Result<(), RatingError> {
        if !(1..=5).contains(&rating) {
            return Err(RatingError::OutOfRange(rating));
        }

        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or(RatingError::UnknownMessage(message_id))?;

        let chat_id = match message.chat_id {
            Some(id) if message.is_rateable() => id,
            _ => return Err(RatingError::NotRateable(message_id)),
        };

        message.rating = Some(rating);

        if let Err(e) = self.client.feedback(chat_id, rating).await {
            tracing::debug!(chat_id, "Feedback not recorded: {}", e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::ScriptedTransport;
    use crate::client::Method;
    use serde_json::json;
    use std::sync::Arc;

    fn session(transport: &Arc<ScriptedTransport>) -> ChatSession {
        let client = ApiClient::new(transport.clone());
        let telemetry = TelemetryEmitter::new(client.clone(), "sess_chat00001");
        ChatSession::new(client, telemetry)
    }

    #[test]
    fn test_parse_reply_with_suggestions() {
        let (text, chips) = parse_reply("X SUGGESTIONS: [\"a\",\"b\"]");
        assert_eq!(text, "X");
        assert_eq!(chips, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_reply_bad_suggestions() {
        let (text, chips) = parse_reply("Answer\nSUGGESTIONS: not json");
        assert_eq!(text, "Answer");
        assert!(chips.is_empty());

        let (text, chips) = parse_reply("  plain  ");
        assert_eq!(text, "  plain  ");
        assert!(chips.is_empty());
    }

    #[tokio::test]
    async fn test_send_protocol() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            Method::Post,
            "/api/chat",
            200,
            r#"{"response": "X SUGGESTIONS: [\"a\",\"b\"]", "chat_id": 7}"#,
        );
        let mut chat = session(&transport);

        let reply_id = chat.send("Who is the MP of Delhi?").await.unwrap();

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].text, "Who is the MP of Delhi?");
        assert_eq!(messages[1].id, reply_id);
        assert_eq!(messages[1].text, "X");
        assert_eq!(messages[1].chips, vec!["a", "b"]);
        assert_eq!(messages[1].chat_id, Some(7));
        assert!(messages.iter().all(|m| m.text != THINKING_TEXT));

        assert_eq!(
            transport.requests_to("/api/chat")[0].body,
            Some(json!({"query": "Who is the MP of Delhi?"}))
        );
    }

    #[tokio::test]
    async fn test_begin_shows_question_and_placeholder() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(Method::Post, "/api/chat", 200, r#"{"response": "Hi", "chat_id": 3}"#);
        let mut chat = session(&transport);

        let turn = chat.begin("  Who is my MP?  ").unwrap();
        assert_eq!(turn.query(), "Who is my MP?");

        let texts: Vec<_> = chat.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Who is my MP?", THINKING_TEXT]);
        assert_eq!(chat.messages()[1].id, turn.placeholder());
        assert!(!chat.messages()[1].is_rateable());
        assert!(transport.requests_to("/api/chat").is_empty());

        let reply_id = chat.complete(turn).await;
        let texts: Vec<_> = chat.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Who is my MP?", "Hi"]);
        assert!(chat.message(reply_id).unwrap().is_rateable());
    }

    #[tokio::test]
    async fn test_send_fires_chat_query_event() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = ApiClient::new(transport.clone());
        let telemetry = TelemetryEmitter::new(client.clone(), "sess_chat00001");
        let mut chat = ChatSession::new(client, telemetry.clone());

        chat.send("Who is my MP?").await.unwrap();
        assert!(telemetry.flush(std::time::Duration::from_secs(1)).await);

        let events = transport.requests_to("/api/analytics/event");
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].body,
            Some(json!({
                "session_id": "sess_chat00001",
                "event_type": "chat_query",
                "details": "Who is my MP?"
            }))
        );
    }

    #[tokio::test]
    async fn test_chip_reenters_protocol() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            Method::Post,
            "/api/chat",
            200,
            r#"{"response": "X SUGGESTIONS: [\"a\",\"b\"]", "chat_id": 7}"#,
        );
        let mut chat = session(&transport);

        let reply_id = chat.send("Who is the MP of Delhi?").await.unwrap();
        chat.click_chip(reply_id, 0).await.unwrap();

        let messages = chat.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].role, Role::User);
        assert_eq!(messages[2].text, "a");
        assert_eq!(
            transport.requests_to("/api/chat")[1].body,
            Some(json!({"query": "a"}))
        );
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut chat = session(&transport);

        assert_eq!(chat.send("   ").await, None);
        assert!(chat.messages().is_empty());
        assert!(transport.requests_to("/api/chat").is_empty());
    }

    #[tokio::test]
    async fn test_failure_replaces_placeholder_with_apology() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(Method::Post, "/api/chat");
        let mut chat = session(&transport);

        chat.send("hello").await.unwrap();

        let texts: Vec<_> = chat.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", FAILURE_TEXT]);
    }

    #[tokio::test]
    async fn test_rating() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(Method::Post, "/api/chat", 200, r#"{"response": "Hi", "chat_id": 9}"#);
        transport.fail(Method::Post, "/api/feedback");
        let mut chat = session(&transport);

        let reply_id = chat.send("hello").await.unwrap();
        assert_eq!(chat.rate(reply_id, 0).await, Err(RatingError::OutOfRange(0)));
        assert_eq!(chat.rate(reply_id, 6).await, Err(RatingError::OutOfRange(6)));

        chat.rate(reply_id, 4).await.unwrap();
        assert_eq!(chat.message(reply_id).unwrap().rating, Some(4));
        assert_eq!(
            transport.requests_to("/api/feedback")[0].body,
            Some(json!({"chat_id": 9, "rating": 4}))
        );
    }

    #[tokio::test]
    async fn test_zero_chat_id_is_not_rateable() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(Method::Post, "/api/chat", 200, r#"{"response": "Hi", "chat_id": 0}"#);
        let mut chat = session(&transport);

        let reply_id = chat.send("hello").await.unwrap();
        assert_eq!(chat.rate(reply_id, 3).await, Err(RatingError::NotRateable(reply_id)));
        assert_eq!(chat.rate(999, 3).await, Err(RatingError::UnknownMessage(999)));
    }

    #[test]
    fn test_greeting_and_toggle() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut chat = session(&transport).with_suggestion_chips(false);

        let id = chat.greet();
        let greeting = chat.message(id).unwrap();
        assert!(greeting.text.starts_with("Hello! I am your Citizen Assistant."));
        assert!(greeting.chips.is_empty());

        assert!(chat.toggle());
        assert!(!chat.toggle());
    }
}
