//! Citizen lookup page: representative grid, detail modal, location
//! detection and the assistant chat.

use crate::chat::{ChatSession, PendingTurn, RatingError};
use crate::client::{ApiClient, ClientResult, Representative};
use crate::config::PageFlags;
use crate::dom::Document;
use crate::modal::{Modal, ModalController};
use crate::render::location::LOCATION_FAILED_MESSAGE;
use crate::render::{self, LocationSummary};
use crate::telemetry::{EventKind, TelemetryEmitter};

use super::PageContext;

pub const GRID: &str = "repsGrid";
pub const CHAT_WIDGET: &str = "chatWidget";
pub const CHAT_MESSAGES: &str = "chatMessages";
pub const LOCATION_REPORT: &str = "locationReport";
pub const REP_MODAL: Modal = Modal::new("repModal", "repModalBody");

pub struct CitizenPage {
    client: ApiClient,
    telemetry: TelemetryEmitter,
    flags: PageFlags,
    document: Document,
    modals: ModalController,
    chat: ChatSession,
    representatives: Vec<Representative>,
}

impl CitizenPage {
    pub fn new(ctx: &PageContext) -> Self {
        let chat = ChatSession::new(ctx.client.clone(), ctx.telemetry.clone())
            .with_suggestion_chips(ctx.flags.suggestion_chips);

        let mut page = Self {
            client: ctx.client.clone(),
            telemetry: ctx.telemetry.clone(),
            flags: ctx.flags.clone(),
            document: Document::new(),
            modals: ModalController::new([REP_MODAL]),
            chat,
            representatives: Vec::new(),
        };

        if page.flags.chat_greeting {
            page.chat.greet();
        }
        page.render_chat();
        page
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn representatives(&self) -> &[Representative] {
        &self.representatives
    }

    /// Full page markup
    pub fn to_html(&self) -> String {
        render::layout::citizen_page(&self.document)
    }

    /// Initial load: every representative plus a `page_view` event
    pub async fn load(&mut self) -> ClientResult<()> {
        drop(self.telemetry.fire(EventKind::PageView, "home"));
        self.fetch(None).await
    }

    /// Filter the grid. Blank queries are ignored and return `Ok(false)`.
    pub async fn search(&mut self, query: &str) -> ClientResult<bool> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(false);
        }

        drop(self.telemetry.fire(EventKind::Search, query));
        self.fetch(Some(query)).await?;
        Ok(true)
    }

    /// On failure the grid keeps its previous content
    async fn fetch(&mut self, query: Option<&str>) -> ClientResult<()> {
        match self.client.representatives(query).await {
            Ok(reps) => {
                tracing::debug!(count = reps.len(), "Rendering representatives");
                self.document
                    .set_inner_html(GRID, render::render_representatives(&reps));
                self.representatives = reps;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to fetch representatives: {}", e);
                Err(e)
            }
        }
    }

    /// Show the detail modal for the card at `index`
    pub fn open_representative(&mut self, index: usize) -> bool {
        let Some(rep) = self.representatives.get(index) else {
            return false;
        };

        let body = render::render_representative_detail(rep, self.flags.rich_detail_modal);
        self.modals.open(&mut self.document, REP_MODAL.id, body)
    }

    pub fn close_representative(&mut self) {
        self.modals.close(&mut self.document, REP_MODAL.id);
    }

    pub fn is_modal_open(&self) -> bool {
        self.modals.is_open(&self.document, REP_MODAL.id)
    }

    /// A click anywhere on the page; closes the modal when its overlay is hit
    pub fn click(&mut self, target: &str) -> bool {
        self.modals.handle_click(&mut self.document, target).is_some()
    }

    /// Report the representatives for a position and greet in the chat
    pub async fn detect_location(&mut self, latitude: f64, longitude: f64) -> LocationSummary {
        drop(self.telemetry.fire(
            EventKind::LocationDetect,
            &format!("{},{}", latitude, longitude),
        ));

        let summary = match self.client.detect_location(latitude, longitude).await {
            Ok(reply) => render::render_location_summary(&reply),
            Err(e) => {
                tracing::warn!("Location check failed: {}", e);
                LocationSummary {
                    report: LOCATION_FAILED_MESSAGE.to_string(),
                    greeting: None,
                }
            }
        };

        self.document.set_text(LOCATION_REPORT, &summary.report);

        if let Some(greeting) = &summary.greeting {
            self.set_chat_open(true);
            self.chat.push_assistant(greeting, None);
            self.render_chat();
        }

        summary
    }

    pub fn toggle_chat(&mut self) -> bool {
        let open = !self.chat.is_open();
        self.set_chat_open(open);
        open
    }

    fn set_chat_open(&mut self, open: bool) {
        self.chat.set_open(open);
        if open {
            self.document.add_class(CHAT_WIDGET, "open");
        } else {
            self.document.remove_class(CHAT_WIDGET, "open");
        }
    }

    /// Post the question and its `Thinking...` bubble, rendered at once
    pub fn begin_chat(&mut self, text: &str) -> Option<PendingTurn> {
        let turn = self.chat.begin(text)?;
        self.render_chat();
        Some(turn)
    }

    pub fn begin_suggestion(&mut self, message_id: u64, chip: usize) -> Option<PendingTurn> {
        let turn = self.chat.begin_chip(message_id, chip)?;
        self.render_chat();
        Some(turn)
    }

    /// Wait for the answer and render it in place of the placeholder
    pub async fn finish_chat(&mut self, turn: PendingTurn) -> u64 {
        let id = self.chat.complete(turn).await;
        self.render_chat();
        id
    }

    pub async fn send_chat(&mut self, text: &str) -> Option<u64> {
        let turn = self.begin_chat(text)?;
        Some(self.finish_chat(turn).await)
    }

    pub async fn click_suggestion(&mut self, message_id: u64, chip: usize) -> Option<u64> {
        let turn = self.begin_suggestion(message_id, chip)?;
        Some(self.finish_chat(turn).await)
    }

    pub async fn rate(&mut self, message_id: u64, stars: u8) -> Result<(), RatingError> {
        let result = self.chat.rate(message_id, stars).await;
        self.render_chat();
        result
    }

    fn render_chat(&mut self) {
        self.document
            .set_inner_html(CHAT_MESSAGES, render::render_messages(self.chat.messages()));
    }
}
