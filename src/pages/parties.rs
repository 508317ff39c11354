//! 2024 election results viewer. Everything comes from the bundled
//! dataset; no API calls.

use crate::charts::{render_region_map, RegionMap};
use crate::config::PageFlags;
use crate::dom::{Display, Document};
use crate::electoral;
use crate::modal::{Modal, ModalController};
use crate::render;

pub const PARTIES_LIST: &str = "partiesList";
pub const SHOW_MORE_BTN: &str = "showMoreBtn";
pub const PARLIAMENT_CHART: &str = "parliamentChart";
pub const REGIONS: &str = "regions_div";
pub const STATE_MODAL: Modal = Modal::new("stateModal", "stateModalBody");
pub const CRITERIA_MODAL: Modal = Modal::new("criteriaModal", "criteriaModalBody");

const DEFAULT_CHART_WIDTH: f64 = 600.0;

pub struct PartiesPage {
    document: Document,
    modals: ModalController,
    show_all: bool,
    preview_limit: usize,
    chart_width: f64,
    region_map: RegionMap,
}

impl PartiesPage {
    pub fn new(flags: &PageFlags) -> Self {
        let mut page = Self {
            document: Document::new(),
            modals: ModalController::new([STATE_MODAL, CRITERIA_MODAL]),
            show_all: false,
            preview_limit: flags.party_preview_limit,
            chart_width: DEFAULT_CHART_WIDTH,
            region_map: render_region_map(electoral::states()),
        };
        page.render();
        page
    }

    /// Width of the hemicycle container; non-positive widths use the default
    pub fn with_chart_width(mut self, width: f64) -> Self {
        self.chart_width = if width > 0.0 { width } else { DEFAULT_CHART_WIDTH };
        self.render();
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn region_map(&self) -> &RegionMap {
        &self.region_map
    }

    pub fn is_expanded(&self) -> bool {
        self.show_all
    }

    /// Full page markup, region map script included
    pub fn to_html(&self) -> String {
        render::layout::parties_page(
            &self.document,
            self.show_all,
            &self.region_map.script(REGIONS),
        )
    }

    /// Draw the party grid and the hemicycle
    pub fn render(&mut self) {
        self.render_parties();
        self.document.set_inner_html(
            PARLIAMENT_CHART,
            render::render_hemicycle(electoral::national_standings(), self.chart_width),
        );
    }

    fn render_parties(&mut self) {
        let parties = electoral::national_standings();
        self.document.set_inner_html(
            PARTIES_LIST,
            render::render_party_cards(parties, self.show_all, self.preview_limit),
        );

        match render::toggle_label(self.show_all, parties.len(), self.preview_limit) {
            Some(label) => {
                self.document.set_text(SHOW_MORE_BTN, label);
                self.document.set_display(SHOW_MORE_BTN, Display::InlineBlock);
            }
            None => self.document.set_display(SHOW_MORE_BTN, Display::None),
        }
    }

    /// Expand or collapse the party grid, returning the new state
    pub fn toggle_parties(&mut self) -> bool {
        self.show_all = !self.show_all;
        self.render_parties();
        self.show_all
    }

    /// Open the seat breakdown of a state by ISO code
    pub fn open_state(&mut self, code: &str) {
        self.modals.open(
            &mut self.document,
            STATE_MODAL.id,
            render::render_state_detail(code),
        );
    }

    pub fn close_state(&mut self) {
        self.modals.close(&mut self.document, STATE_MODAL.id);
    }

    pub fn open_criteria(&mut self) {
        self.modals
            .open(&mut self.document, CRITERIA_MODAL.id, render::render_criteria());
    }

    pub fn close_criteria(&mut self) {
        self.modals.close(&mut self.document, CRITERIA_MODAL.id);
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        self.modals.is_open(&self.document, modal.id)
    }

    pub fn click(&mut self, target: &str) -> bool {
        self.modals.handle_click(&mut self.document, target).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PartiesPage {
        PartiesPage::new(&PageFlags::default())
    }

    #[test]
    fn test_initial_render() {
        let parties = page();
        let doc = parties.document();
        assert_eq!(doc.inner_html(PARTIES_LIST).matches(r#"class="party-card""#).count(), 3);
        assert_eq!(doc.inner_html(SHOW_MORE_BTN), "View All Parties");
        assert!(doc.inner_html(PARLIAMENT_CHART).starts_with("<svg"));
    }

    #[test]
    fn test_toggle_parties() {
        let mut parties = page();
        assert!(parties.toggle_parties());
        assert_eq!(
            parties.document().inner_html(PARTIES_LIST).matches(r#"class="party-card""#).count(),
            electoral::national_standings().len()
        );
        assert_eq!(parties.document().inner_html(SHOW_MORE_BTN), "Show Less");

        assert!(!parties.toggle_parties());
        assert_eq!(parties.document().inner_html(SHOW_MORE_BTN), "View All Parties");
    }

    #[test]
    fn test_limit_covering_all_hides_toggle() {
        let flags = PageFlags {
            party_preview_limit: 50,
            ..PageFlags::default()
        };
        let parties = PartiesPage::new(&flags);
        assert!(parties.document().is_hidden(SHOW_MORE_BTN));
    }

    #[test]
    fn test_state_modal() {
        let mut parties = page();
        parties.open_state("IN-KL");
        assert!(parties.is_open(STATE_MODAL));
        assert!(parties.document().inner_html(STATE_MODAL.body_id).contains("Kerala"));

        parties.open_criteria();
        assert!(parties.click(STATE_MODAL.id));
        assert!(!parties.is_open(STATE_MODAL));
        assert!(parties.is_open(CRITERIA_MODAL));
    }

    #[test]
    fn test_close_buttons() {
        let mut parties = page();
        parties.open_state("IN-KL");
        parties.close_state();
        assert!(!parties.is_open(STATE_MODAL));

        parties.open_criteria();
        assert!(parties.is_open(CRITERIA_MODAL));
        parties.close_criteria();
        assert!(!parties.is_open(CRITERIA_MODAL));
    }

    #[test]
    fn test_region_map_covers_every_state() {
        let parties = page();
        let rows = &parties.region_map().rows;
        assert_eq!(rows.len(), electoral::states().len());

        let bucket = |code: &str| rows.iter().find(|r| r.code == code).map(|r| r.bucket);
        assert_eq!(bucket("IN-WB"), Some(3));
        assert_eq!(bucket("IN-UP"), Some(4));
    }

    #[test]
    fn test_unknown_state() {
        let mut parties = page();
        parties.open_state("IN-XX");
        assert!(parties
            .document()
            .inner_html(STATE_MODAL.body_id)
            .contains("Detailed data coming soon."));
    }

    #[test]
    fn test_to_html_includes_region_script() {
        let html = page().with_chart_width(800.0).to_html();
        assert!(html.contains("GeoChart"));
        assert!(html.contains(r#"<svg width="800""#));
    }
}
