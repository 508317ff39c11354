//! Representative grid and detail modal

use super::{escape, escape_attr, number_or, text};
use crate::client::Representative;

/// Shown instead of cards when a lookup matches nobody
pub const EMPTY_GRID_MESSAGE: &str = "No representatives found.";

const CARD_AVATAR_PLACEHOLDER: &str = "https://via.placeholder.com/60?text=MP";
const MODAL_AVATAR_PLACEHOLDER: &str = "https://via.placeholder.com/100?text=MP";

/// Party symbols, matched in this order when the name is not an exact key
const PARTY_SYMBOLS: [(&str, &str); 8] = [
    ("BJP", "https://upload.wikimedia.org/wikipedia/commons/thumb/1/1e/Bharatiya_Janata_Party_logo.svg/240px-Bharatiya_Janata_Party_logo.svg.png"),
    ("INC", "https://upload.wikimedia.org/wikipedia/commons/thumb/6/6c/Indian_National_Congress_hand_logo.svg/240px-Indian_National_Congress_hand_logo.svg.png"),
    ("AAP", "https://upload.wikimedia.org/wikipedia/commons/thumb/3/30/Aam_Aadmi_Party_logo_%28English%29.svg/240px-Aam_Aadmi_Party_logo_%28English%29.svg.png"),
    ("TMC", "https://upload.wikimedia.org/wikipedia/commons/thumb/c/c0/All_India_Trinamool_Congress_symbol.svg/240px-All_India_Trinamool_Congress_symbol.svg.png"),
    ("DMK", "https://upload.wikimedia.org/wikipedia/commons/thumb/8/82/Rising_Sun_Symbol.svg/240px-Rising_Sun_Symbol.svg.png"),
    ("CPI(M)", "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a2/Cpi_m_logo.svg/240px-Cpi_m_logo.svg.png"),
    ("SP", "https://upload.wikimedia.org/wikipedia/commons/thumb/d/d2/Bicycle_Symbol.svg/240px-Bicycle_Symbol.svg.png"),
    ("YSRCP", "https://upload.wikimedia.org/wikipedia/commons/thumb/8/8f/Ceiling_Fan_Symbol.svg/240px-Ceiling_Fan_Symbol.svg.png"),
];

/// Symbol image URL for a party name.
///
/// The trimmed name is looked up exactly first, then the first table key
/// it contains wins.
pub fn resolve_party_symbol(party: &str) -> Option<&'static str> {
    let party = party.trim();
    if party.is_empty() {
        return None;
    }

    PARTY_SYMBOLS
        .iter()
        .find(|(key, _)| *key == party)
        .or_else(|| PARTY_SYMBOLS.iter().find(|(key, _)| party.contains(key)))
        .map(|(_, url)| *url)
}

/// `<img class="party-symbol">` for a party, or nothing
pub fn render_party_symbol(party: Option<&str>) -> String {
    let Some(party) = party else {
        return String::new();
    };

    match resolve_party_symbol(party) {
        Some(url) => {
            let label = escape_attr(party.trim());
            format!(
                r#"<img src="{}" alt="{label}" class="party-symbol" title="{label}">"#,
                escape_attr(url)
            )
        }
        None => String::new(),
    }
}

/// Grid of representative cards, in the order given
pub fn render_representatives(reps: &[Representative]) -> String {
    if reps.is_empty() {
        return format!(
            r#"<p class="empty-state" style="color:var(--text-muted);">{}</p>"#,
            EMPTY_GRID_MESSAGE
        );
    }

    reps.iter()
        .enumerate()
        .map(|(index, rep)| render_card(index, rep))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_card(index: usize, rep: &Representative) -> String {
    let achievement = rep
        .achievements()
        .into_iter()
        .next()
        .map(|a| escape(&a))
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        r#"<div class="card" data-rep-index="{index}">
    <div class="card-header">
        <img src="{avatar}" alt="{alt}" class="avatar">
        <div class="info">
            <h3>{name}</h3>
            <span style="display:flex; align-items:center;">{role} • {party} {symbol}</span>
        </div>
    </div>
    <p style="color:var(--text-muted); font-size: 0.9rem; margin-bottom:1rem;">{constituency}, {state}</p>
    <p class="bio">{bio}</p>
    <div class="stats">
        <div class="stat-item"><span class="stat-val">{years} Yrs</span><span class="stat-label">Term</span></div>
        <div class="stat-item"><span class="stat-val">₹{spent}Cr</span><span class="stat-label">Spent</span></div>
        <div class="stat-item"><span class="stat-val">{attendance}%</span><span class="stat-label">Attend</span></div>
    </div>
    <div style="margin-top:1rem;">
        <span class="stat-label">Key Achievement:</span>
        <p style="font-size:0.9rem;">✨ {achievement}</p>
    </div>
</div>"#,
        avatar = avatar(rep, CARD_AVATAR_PLACEHOLDER),
        alt = escape_attr(rep.name.as_deref().unwrap_or("")),
        name = text(&rep.name),
        role = text(&rep.role),
        party = text(&rep.party),
        symbol = render_party_symbol(rep.party.as_deref()),
        constituency = text(&rep.constituency),
        state = text(&rep.state),
        bio = text(&rep.bio),
        years = number_or(rep.years_in_office, "-"),
        spent = number_or(rep.funds_spent_crores, "0"),
        attendance = number_or(rep.attendance_percentage, "0"),
    )
}

fn avatar(rep: &Representative, placeholder: &str) -> String {
    let url = rep
        .image_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .unwrap_or(placeholder);
    escape_attr(url)
}

/// Body of the representative detail modal.
///
/// With `rich` unset only the header, bio and statistics are shown.
pub fn render_representative_detail(rep: &Representative, rich: bool) -> String {
    let header = format!(
        r#"<div class="modal-header-content">
    <img src="{avatar}" alt="{alt}" class="modal-avatar">
    <div>
        <h2 style="font-size:2rem; margin-bottom:0.5rem;">{name}</h2>
        <p style="font-size:1.1rem; color: #a5b4fc; display:flex; align-items:center;">{role} • {party} {symbol}</p>
        <p style="color:var(--text-muted)">{constituency}, {state}</p>
    </div>
</div>
<div style="margin-bottom: 2rem;"><p style="font-size: 1.05rem; line-height: 1.6;">{bio}</p></div>"#,
        avatar = avatar(rep, MODAL_AVATAR_PLACEHOLDER),
        alt = escape_attr(rep.name.as_deref().unwrap_or("")),
        name = text(&rep.name),
        role = text(&rep.role),
        party = text(&rep.party),
        symbol = render_party_symbol(rep.party.as_deref()),
        constituency = text(&rep.constituency),
        state = text(&rep.state),
        bio = text(&rep.bio),
    );

    let statistics = format!(
        r#"<h3 class="section-title">Statistics</h3>
<div class="detail-stats">
    <div><span class="stat-label">Term Length</span><p class="stat-big">{years} Years</p></div>
    <div><span class="stat-label">Attendance</span><p class="stat-big">{attendance}%</p></div>
    <div><span class="stat-label">Funds Used</span><p class="stat-big">₹{spent}Cr / ₹{total}Cr</p></div>
</div>"#,
        years = number_or(rep.years_in_office, "0"),
        attendance = number_or(rep.attendance_percentage, "0"),
        spent = number_or(rep.funds_spent_crores, "0"),
        total = number_or(rep.funds_total_crores, "0"),
    );

    if !rich {
        return format!("{header}\n<div>{statistics}</div>");
    }

    let achievements = rep.achievements();
    let achievements_html = if achievements.is_empty() {
        r#"<p style="color:var(--text-muted)">No specific data available.</p>"#.to_string()
    } else {
        let items: String = achievements
            .iter()
            .map(|a| format!(r#"<li style="margin-bottom:0.5rem;">{}</li>"#, escape(a)))
            .collect();
        format!("<ul>{items}</ul>")
    };

    let news = rep.news();
    let news_html = if news.is_empty() {
        r#"<p style="color:var(--text-muted)">No recent news.</p>"#.to_string()
    } else {
        news.iter()
            .map(|n| {
                format!(
                    r#"<div class="news-item"><h5 style="margin-bottom:0.3rem">{}</h5><small style="color:var(--text-muted)">{}</small></div>"#,
                    text(&n.headline),
                    text(&n.date)
                )
            })
            .collect()
    };

    let sources = rep.sources();
    let sources_html = if sources.is_empty() {
        "<span>N/A</span>".to_string()
    } else {
        sources
            .iter()
            .map(|s| format!(r#"<span class="source-tag">{}</span>"#, escape(s)))
            .collect()
    };

    format!(
        r#"{header}
<div class="detail-columns">
    <div><h3 class="section-title">Achievements</h3>{achievements_html}</div>
    <div>{statistics}</div>
</div>
<div><h3 class="section-title">Recent News &amp; Updates</h3>{news_html}</div>
<div style="margin-top: 2rem;"><p class="stat-label" style="margin-bottom:0.5rem;">Verified Sources:</p>{sources_html}</div>"#
    )
}
