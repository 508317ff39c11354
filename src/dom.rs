//! Page document model
//!
//! A page is a set of addressable elements (by id). Renderers replace an
//! element's inner HTML wholesale; controllers toggle classes and
//! visibility. This is the state a browser would hold in the DOM.

use std::collections::{BTreeMap, BTreeSet};

/// CSS `display` of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Default,
    None,
    Block,
    Flex,
    InlineBlock,
}

impl Display {
    pub fn as_css(&self) -> Option<&'static str> {
        match self {
            Display::Default => None,
            Display::None => Some("none"),
            Display::Block => Some("block"),
            Display::Flex => Some("flex"),
            Display::InlineBlock => Some("inline-block"),
        }
    }
}

/// One addressable element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub inner_html: String,
    pub classes: BTreeSet<String>,
    pub display: Display,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn is_hidden(&self) -> bool {
        self.display == Display::None
    }

    /// `class` attribute value, classes in sorted order
    pub fn class_attr(&self) -> String {
        self.classes.iter().cloned().collect::<Vec<_>>().join(" ")
    }

    /// `style` attribute value, if any
    pub fn style_attr(&self) -> Option<String> {
        self.display.as_css().map(|d| format!("display:{};", d))
    }
}

/// All elements of a page keyed by id
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: BTreeMap<String, Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element by id, if it was ever touched
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    fn element_mut(&mut self, id: &str) -> &mut Element {
        self.elements.entry(id.to_string()).or_default()
    }

    /// Inner HTML of an element (empty when never rendered)
    pub fn inner_html(&self, id: &str) -> &str {
        self.elements
            .get(id)
            .map(|e| e.inner_html.as_str())
            .unwrap_or("")
    }

    /// Replace the element's content
    pub fn set_inner_html(&mut self, id: &str, html: impl Into<String>) {
        self.element_mut(id).inner_html = html.into();
    }

    /// Replace the element's content with escaped text
    pub fn set_text(&mut self, id: &str, text: &str) {
        self.set_inner_html(id, crate::render::escape(text));
    }

    pub fn add_class(&mut self, id: &str, class: &str) {
        self.element_mut(id).classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, id: &str, class: &str) {
        self.element_mut(id).classes.remove(class);
    }

    /// Flip a class, returning whether it is now present
    pub fn toggle_class(&mut self, id: &str, class: &str) -> bool {
        let element = self.element_mut(id);
        if element.classes.remove(class) {
            false
        } else {
            element.classes.insert(class.to_string());
            true
        }
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .map(|e| e.has_class(class))
            .unwrap_or(false)
    }

    pub fn set_display(&mut self, id: &str, display: Display) {
        self.element_mut(id).display = display;
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.elements.get(id).map(Element::is_hidden).unwrap_or(false)
    }

    /// Opening tag carrying the element's id, classes and style
    pub fn open_tag(&self, tag: &str, id: &str, base_class: &str) -> String {
        let element = self.elements.get(id);

        let mut classes = base_class.to_string();
        let extra = element.map(Element::class_attr).unwrap_or_default();
        if !extra.is_empty() {
            if !classes.is_empty() {
                classes.push(' ');
            }
            classes.push_str(&extra);
        }

        let mut attrs = format!(r#" id="{}""#, id);
        if !classes.is_empty() {
            attrs.push_str(&format!(r#" class="{}""#, classes));
        }
        if let Some(style) = element.and_then(Element::style_attr) {
            attrs.push_str(&format!(r#" style="{}""#, style));
        }

        format!("<{tag}{attrs}>")
    }

    /// Wrap an element's state as markup: `<tag id=.. class=.. style=..>inner</tag>`
    pub fn outer_html(&self, tag: &str, id: &str, base_class: &str) -> String {
        format!(
            "{}{}</{tag}>",
            self.open_tag(tag, id, base_class),
            self.inner_html(id)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_inner_html_replaces() {
        let mut doc = Document::new();
        doc.set_inner_html("grid", "<p>old</p>");
        doc.set_inner_html("grid", "<p>new</p>");
        assert_eq!(doc.inner_html("grid"), "<p>new</p>");
        assert_eq!(doc.inner_html("missing"), "");
    }

    #[test]
    fn test_set_text_escapes() {
        let mut doc = Document::new();
        doc.set_text("errorMsg", "<b>bad</b>");
        assert_eq!(doc.inner_html("errorMsg"), "&lt;b&gt;bad&lt;/b&gt;");
    }

    #[test]
    fn test_toggle_class() {
        let mut doc = Document::new();
        assert!(doc.toggle_class("chatWidget", "open"));
        assert!(doc.has_class("chatWidget", "open"));
        assert!(!doc.toggle_class("chatWidget", "open"));
        assert!(!doc.has_class("chatWidget", "open"));
    }

    #[test]
    fn test_outer_html() {
        let mut doc = Document::new();
        doc.add_class("repModal", "open");
        doc.set_display("repModal", Display::Flex);
        doc.set_inner_html("repModal", "body");

        assert_eq!(
            doc.outer_html("div", "repModal", "modal"),
            r#"<div id="repModal" class="modal open" style="display:flex;">body</div>"#
        );
        assert_eq!(doc.outer_html("div", "empty", ""), r#"<div id="empty"></div>"#);
    }
}
