//! Modal/Dialog Controller
//!
//! Each registered modal is either closed or open. Opening writes the body
//! before the overlay becomes visible; a click lands on the overlay itself
//! only when it misses the dialog, so such a click closes that modal alone.

use crate::dom::{Display, Document};

/// CSS class marking an open modal
pub const OPEN_CLASS: &str = "open";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open,
}

/// A modal overlay and the element holding its body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modal {
    pub id: &'static str,
    pub body_id: &'static str,
}

impl Modal {
    pub const fn new(id: &'static str, body_id: &'static str) -> Self {
        Self { id, body_id }
    }
}

/// Drives the modals of one page
#[derive(Debug, Clone)]
pub struct ModalController {
    modals: Vec<Modal>,
}

impl ModalController {
    pub fn new(modals: impl IntoIterator<Item = Modal>) -> Self {
        Self {
            modals: modals.into_iter().collect(),
        }
    }

    fn find(&self, id: &str) -> Option<&Modal> {
        self.modals.iter().find(|m| m.id == id)
    }

    pub fn state(&self, document: &Document, id: &str) -> ModalState {
        if self.find(id).is_some() && document.has_class(id, OPEN_CLASS) {
            ModalState::Open
        } else {
            ModalState::Closed
        }
    }

    pub fn is_open(&self, document: &Document, id: &str) -> bool {
        self.state(document, id) == ModalState::Open
    }

    /// Write `body` and show the modal. Unknown ids are ignored.
    pub fn open(&self, document: &mut Document, id: &str, body: impl Into<String>) -> bool {
        let Some(modal) = self.find(id) else {
            tracing::debug!(modal = %id, "Open requested for unknown modal");
            return false;
        };

        document.set_inner_html(modal.body_id, body);
        document.add_class(modal.id, OPEN_CLASS);
        document.set_display(modal.id, Display::Flex);
        true
    }

    /// Hide the modal; its body is left as is
    pub fn close(&self, document: &mut Document, id: &str) -> bool {
        let Some(modal) = self.find(id) else {
            return false;
        };

        document.remove_class(modal.id, OPEN_CLASS);
        document.set_display(modal.id, Display::None);
        true
    }

    /// Close the modal whose overlay is the click target, if any
    pub fn handle_click(&self, document: &mut Document, target: &str) -> Option<&'static str> {
        let modal = *self.find(target)?;
        if !self.is_open(document, modal.id) {
            return None;
        }

        self.close(document, modal.id);
        Some(modal.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REP: Modal = Modal::new("repModal", "repModalBody");
    const STATE: Modal = Modal::new("stateModal", "stateModalBody");

    #[test]
    fn test_open_writes_body_and_shows() {
        let modals = ModalController::new([REP]);
        let mut doc = Document::new();

        assert!(modals.open(&mut doc, "repModal", "<h2>A</h2>"));
        assert_eq!(doc.inner_html("repModalBody"), "<h2>A</h2>");
        assert!(modals.is_open(&doc, "repModal"));
        assert_eq!(doc.element("repModal").unwrap().display, Display::Flex);

        assert!(modals.close(&mut doc, "repModal"));
        assert_eq!(modals.state(&doc, "repModal"), ModalState::Closed);
        assert!(doc.is_hidden("repModal"));
    }

    #[test]
    fn test_click_closes_only_target_overlay() {
        let modals = ModalController::new([REP, STATE]);
        let mut doc = Document::new();
        modals.open(&mut doc, "repModal", "a");
        modals.open(&mut doc, "stateModal", "b");

        assert_eq!(modals.handle_click(&mut doc, "repModalBody"), None);
        assert!(modals.is_open(&doc, "repModal"));

        assert_eq!(modals.handle_click(&mut doc, "stateModal"), Some("stateModal"));
        assert!(!modals.is_open(&doc, "stateModal"));
        assert!(modals.is_open(&doc, "repModal"));
    }

    #[test]
    fn test_unknown_modal_is_ignored() {
        let modals = ModalController::new([REP]);
        let mut doc = Document::new();
        assert!(!modals.open(&mut doc, "nope", "x"));
        assert_eq!(modals.handle_click(&mut doc, "repModal"), None);
    }
}
