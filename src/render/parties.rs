//! Parties viewer fragments

use std::f64::consts::PI;

use super::{escape, escape_attr, fmt_number};
use crate::electoral::{self, PartyStanding, StateResult, TOTAL_SEATS};

const HEMICYCLE_HEIGHT: f64 = 300.0;
const HEMICYCLE_ROWS: u32 = 12;
const SEAT_SPACING: f64 = 12.0;
const OTHER_SEAT_COLOUR: &str = "#666";

/// Party cards, the first `limit` unless `show_all`
pub fn render_party_cards(parties: &[PartyStanding], show_all: bool, limit: usize) -> String {
    let visible = if show_all { parties.len() } else { limit.min(parties.len()) };

    parties[..visible]
        .iter()
        .map(|party| {
            format!(
                r#"<div class="party-card">
    <div class="party-header">
        <img src="{symbol}" alt="{abbr_attr}" class="party-logo">
        <div><h3>{name}</h3><span style="color:var(--text-muted); font-size:0.9rem;">{abbr}</span></div>
    </div>
    <p style="margin:1rem 0; font-size:0.9rem; color:#aaa; line-height:1.5;">{description}</p>
    <div class="party-stats">
        <div><span class="party-seats">{seats}</span><span class="party-stat-label">Seats Won</span></div>
        <div style="text-align:right;"><span class="party-share">{share}%</span><span class="party-stat-label">Vote Share</span></div>
    </div>
</div>"#,
                symbol = escape_attr(party.symbol_url),
                abbr_attr = escape_attr(party.abbr),
                name = escape(party.name),
                abbr = escape(party.abbr),
                description = escape(party.description),
                seats = party.seats,
                share = fmt_number(party.seat_share),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Label of the expand/collapse button; `None` hides it
pub fn toggle_label(show_all: bool, party_count: usize, limit: usize) -> Option<&'static str> {
    if party_count <= limit {
        None
    } else if show_all {
        Some("Show Less")
    } else {
        Some("View All Parties")
    }
}

/// Seat colours in house order, padded with "Other" seats
fn seat_colours(parties: &[PartyStanding]) -> Vec<(&'static str, &'static str)> {
    let mut seats: Vec<(&'static str, &'static str)> = parties
        .iter()
        .flat_map(|p| std::iter::repeat((electoral::party_colour(p.abbr), p.abbr)).take(p.seats as usize))
        .collect();
    seats.resize(seats.len().max(TOTAL_SEATS), (OTHER_SEAT_COLOUR, "Other"));
    seats
}

/// Semicircle seat chart, `width` pixels wide, filled from the inner row
pub fn render_hemicycle(parties: &[PartyStanding], width: f64) -> String {
    let height = HEMICYCLE_HEIGHT;
    let cx = width / 2.0;
    let cy = height;
    let radius = (width / 2.0).min(height) - 20.0;
    let colours = seat_colours(parties);

    let mut svg = format!(
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = fmt_number(width),
        h = fmt_number(height)
    );

    let mut placed = 0usize;
    for row in 1..=HEMICYCLE_ROWS {
        let row_radius = (radius / f64::from(HEMICYCLE_ROWS)) * f64::from(row) + 20.0;
        let dots = (PI * row_radius / SEAT_SPACING).floor() as usize;

        for i in 0..dots {
            if placed >= TOTAL_SEATS {
                break;
            }
            let angle = if dots > 1 { PI * (i as f64 / (dots - 1) as f64) } else { 0.0 };
            let x = cx - row_radius * angle.cos();
            let y = cy - row_radius * angle.sin();
            let (colour, name) = colours[placed];

            svg.push_str(&format!(
                r#"<circle cx="{x:.2}" cy="{y:.2}" r="4" fill="{colour}"><title>{}</title></circle>"#,
                escape(name)
            ));
            placed += 1;
        }
    }

    svg.push_str(&format!(
        r##"<text x="{cx}" y="{top}" text-anchor="middle" fill="white" font-size="24" font-weight="bold" font-family="Inter">{TOTAL_SEATS}</text><text x="{cx}" y="{bottom}" text-anchor="middle" fill="#aaa" font-size="12" font-family="Inter">Seats</text></svg>"##,
        cx = fmt_number(cx),
        top = fmt_number(cy - 20.0),
        bottom = fmt_number(cy - 5.0),
    ));

    svg
}

/// Body of the state modal
pub fn render_state_detail(code: &str) -> String {
    let Some(state) = electoral::state_result(code) else {
        return format!("<h2>{}</h2><p>Detailed data coming soon.</p>", escape(code));
    };

    let bars: String = state
        .results
        .iter()
        .map(|row| {
            format!(
                r#"<div style="margin-bottom: 1rem;"><div style="display:flex; justify-content:space-between; margin-bottom:0.3rem;"><strong>{}</strong><span>{} Seats</span></div><div class="bar-track"><div style="width: {}%; background: {}; height: 100%;"></div></div></div>"#,
                escape(row.party),
                row.seats,
                fmt_number(state.share_of(row)),
                row.colour
            )
        })
        .collect();

    format!(
        r#"<h2 style="margin-bottom:0.5rem;">{}</h2><p style="color:var(--text-muted); margin-bottom:1.5rem;">Total Seats: {}</p><div class="bar-panel">{}</div>"#,
        escape(state.name),
        state.total,
        bars
    )
}

/// Hover card of a state on the region map
pub fn render_region_tooltip(state: &StateResult) -> String {
    let rows: String = state
        .results
        .iter()
        .map(|row| {
            format!(
                r#"<div style="display:flex; justify-content:space-between; margin-bottom:4px;"><span style="color: {}; font-weight:600;">{}</span><span style="margin-left:12px; font-weight:bold;">{}</span></div>"#,
                row.colour,
                escape(row.party),
                row.seats
            )
        })
        .collect();

    format!(
        r#"<div style="padding: 12px; min-width: 150px;"><h4 style="margin:0 0 8px 0; font-size:14px; color:#333;">{}</h4><div style="font-size:12px; color:#444;">{}</div><div style="margin-top:6px; font-size:11px; color:#666; text-align:right;">Total: {}</div></div>"#,
        escape(state.name),
        rows,
        state.total
    )
}

/// Body of the classification criteria modal
pub fn render_criteria() -> String {
    r#"<h2>How states are coloured</h2>
<p>Each state takes the colour of the party that won the most of its seats in 2024. When two parties tie, the one listed last wins.</p>
<ul class="criteria-legend">
    <li><span class="swatch" style="background:#ff9933;"></span>BJP lead</li>
    <li><span class="swatch" style="background:#00BFFF;"></span>INC lead</li>
    <li><span class="swatch" style="background:#22c55e;"></span>Regional party lead (SP, TMC, DMK, TDP, BJD, AAP, JMM, JKNC)</li>
    <li><span class="swatch" style="background:#a855f7;"></span>Other or mixed</li>
</ul>"#
        .to_string()
}
