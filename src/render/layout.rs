//! Full-page shells around a page's document

use crate::dom::Document;

const STYLE: &str = r#"
:root { --primary: #6C63FF; --text-muted: #9ca3af; --glass-border: rgba(255,255,255,0.1); }
body { font-family: 'Inter', sans-serif; background: #0f172a; color: #f1f5f9; margin: 0; }
header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; }
header a { color: #cbd5f5; margin-left: 1rem; text-decoration: none; }
main { padding: 1rem 2rem; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 1.5rem; }
.card, .party-card, .panel { background: rgba(255,255,255,0.05); border: 1px solid var(--glass-border); border-radius: 16px; padding: 1.5rem; }
.card-header, .party-header { display: flex; gap: 1rem; align-items: center; }
.avatar { width: 60px; height: 60px; border-radius: 50%; }
.party-symbol { height: 20px; margin-left: 6px; }
.party-logo { width: 48px; height: 48px; object-fit: contain; }
.stats, .party-stats { display: flex; justify-content: space-between; margin-top: 1rem; }
.stat-val, .party-seats, .party-share { display: block; font-weight: bold; }
.stat-label, .party-stat-label { display: block; font-size: 0.8rem; color: var(--text-muted); }
.modal { display: none; position: fixed; inset: 0; background: rgba(0,0,0,0.6); align-items: center; justify-content: center; }
.modal.open { display: flex; }
.modal-content { background: #1e293b; border-radius: 16px; padding: 2rem; max-width: 800px; max-height: 85vh; overflow-y: auto; }
.modal-avatar { width: 100px; height: 100px; border-radius: 50%; }
.chat-widget { position: fixed; right: 2rem; bottom: 2rem; width: 360px; display: none; background: #1e293b; border-radius: 16px; padding: 1rem; }
.chat-widget.open { display: block; }
.msg { padding: 0.6rem 0.9rem; border-radius: 12px; margin: 0.4rem 0; }
.msg.user { background: var(--primary); margin-left: 3rem; }
.msg.ai { background: rgba(255,255,255,0.08); margin-right: 3rem; }
.star { cursor: pointer; color: #555; }
.star.active { color: #facc15; }
.chip { margin: 0.3rem 0.3rem 0 0; border-radius: 999px; border: 1px solid var(--primary); background: none; color: inherit; }
.list-item { display: flex; justify-content: space-between; padding: 0.5rem 0; }
.source-tag { display: inline-block; margin-right: 0.5rem; padding: 0.2rem 0.6rem; border-radius: 8px; background: rgba(255,255,255,0.1); }
.bar-track { background: rgba(255,255,255,0.1); height: 10px; border-radius: 5px; overflow: hidden; }
.location-report { white-space: pre-line; }
"#;

fn shell(title: &str, head: &str, body: &str, script: &str) -> String {
    let script = if script.is_empty() {
        String::new()
    } else {
        format!("<script>\n{}\n</script>", script)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Civitas</title>
    <style>{STYLE}</style>
    {head}
</head>
<body>
    <header>
        <h1>Civitas</h1>
        <nav><a href="/">Representatives</a><a href="/parties">Parties</a><a href="/admin">Admin</a></nav>
    </header>
    <main>
{body}
    </main>
    {script}
</body>
</html>"#
    )
}

/// Modal overlay with its body element inside
fn modal(document: &Document, id: &str, body_id: &str) -> String {
    format!(
        r#"{open}<div class="modal-content">{body}</div></div>"#,
        open = document.open_tag("div", id, "modal"),
        body = document.outer_html("div", body_id, ""),
    )
}

pub fn citizen_page(document: &Document) -> String {
    let body = format!(
        r#"<form class="search" method="get" action="/">
    <input id="searchInput" name="search" placeholder="Search by name, constituency or state">
    <button type="submit">Search</button>
</form>
{report}
{grid}
{rep_modal}
{chat}"#,
        report = document.outer_html("pre", "locationReport", "location-report"),
        grid = document.outer_html("div", "repsGrid", "grid"),
        rep_modal = modal(document, "repModal", "repModalBody"),
        chat = format!(
            r#"{}{}</div>"#,
            document.open_tag("div", "chatWidget", "chat-widget"),
            document.outer_html("div", "chatMessages", "chat-messages"),
        ),
    );

    shell("Find your representative", "", &body, "")
}

pub fn admin_page(document: &Document, script: &str) -> String {
    let head = r#"<script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>"#;

    let login = format!(
        r#"{open}<div class="panel">
    <h2>Admin login</h2>
    <p>Sign in with your admin credentials when the browser asks for them.</p>
    {error}
</div></section>"#,
        open = document.open_tag("section", "loginSection", ""),
        error = document.outer_html("p", "errorMsg", "error"),
    );

    let dashboard = format!(
        r#"{open}<div class="grid">
    <div class="panel"><span class="stat-label">New users</span>{users}</div>
    <div class="panel"><span class="stat-label">Avg. session</span>{duration}</div>
    <div class="panel"><h3>Top actions</h3>{actions}</div>
    <div class="panel"><h3>Drop-offs</h3>{drop_offs}</div>
    <div class="panel"><h3>Traffic by hour</h3><canvas id="trafficChart"></canvas></div>
    <div class="panel"><h3>Locations</h3><canvas id="locationChart"></canvas></div>
</div>
<div class="panel"><h3>Visitor map</h3><div id="worldMap" style="height:400px;"></div></div>
<div class="panel"><h3>Recent chats</h3><table><thead><tr><th>Time</th><th>Query</th><th>Response</th><th>Rating</th></tr></thead>{log}</table></div>
</section>"#,
        open = document.open_tag("section", "dashboardSection", ""),
        users = document.outer_html("h2", "statUsers", ""),
        duration = document.outer_html("h2", "statDuration", ""),
        actions = document.outer_html("div", "topActionsList", ""),
        drop_offs = document.outer_html("div", "dropOffList", ""),
        log = document.outer_html("tbody", "chatLogBody", ""),
    );

    shell("Admin dashboard", head, &format!("{login}\n{dashboard}"), script)
}

/// `expanded` selects where the party toggle link leads
pub fn parties_page(document: &Document, expanded: bool, script: &str) -> String {
    let head = r#"<script src="https://www.gstatic.com/charts/loader.js"></script>"#;

    let body = format!(
        r#"<section>
    <h2>Lok Sabha 2024</h2>
    {chart}
</section>
<section>
    <h2>National parties</h2>
    {list}
    <a id="showMoreLink" href="{toggle_href}">{button}</a>
</section>
<section>
    <h2>Results by state <a href="/parties?criteria=true">(how are states coloured?)</a></h2>
    <div id="regions_div"></div>
</section>
{state_modal}
{criteria_modal}
<script>function openStateModal(code) {{ window.location = '/parties?state=' + encodeURIComponent(code); }}</script>"#,
        chart = document.outer_html("div", "parliamentChart", ""),
        list = document.outer_html("div", "partiesList", "grid"),
        toggle_href = if expanded { "/parties" } else { "/parties?all=true" },
        button = document.outer_html("span", "showMoreBtn", "btn"),
        state_modal = modal(document, "stateModal", "stateModalBody"),
        criteria_modal = modal(document, "criteriaModal", "criteriaModalBody"),
    );

    shell("Election results", head, &body, script)
}
