//! Admin analytics dashboard behind the auth gate

use std::time::Duration;

use crate::auth::{AuthError, AuthGate, AuthState};
use crate::charts::{ChartAdapter, ChartSurface, LeafletMap, MapSurface, ScriptCanvas};
use crate::client::StatsSnapshot;
use crate::dom::{Display, Document};
use crate::render::admin::{DROP_OFFS_COLOUR, TOP_ACTIONS_COLOUR};
use crate::render::{self, escape};

use super::PageContext;

pub const LOGIN_SECTION: &str = "loginSection";
pub const DASHBOARD_SECTION: &str = "dashboardSection";
pub const ERROR_MSG: &str = "errorMsg";
pub const STAT_USERS: &str = "statUsers";
pub const STAT_DURATION: &str = "statDuration";
pub const TOP_ACTIONS: &str = "topActionsList";
pub const DROP_OFFS: &str = "dropOffList";
pub const CHAT_LOG: &str = "chatLogBody";

pub struct AdminDashboard<C = ScriptCanvas, M = LeafletMap>
where
    C: ChartSurface,
    M: MapSurface,
{
    auth: AuthGate,
    document: Document,
    charts: ChartAdapter<C, M>,
    stats: Option<StatsSnapshot>,
}

impl AdminDashboard<ScriptCanvas, LeafletMap> {
    pub fn new(ctx: &PageContext) -> Self {
        Self::with_surfaces(ctx, ScriptCanvas::new(), LeafletMap::new())
    }

    /// Full page markup, charts and map included
    pub fn to_html(&self) -> String {
        let script = [self.charts.charts().script(), self.charts.map().script()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        render::layout::admin_page(&self.document, &script)
    }
}

impl<C: ChartSurface, M: MapSurface> AdminDashboard<C, M> {
    pub fn with_surfaces(ctx: &PageContext, charts: C, map: M) -> Self {
        let mut dashboard = Self {
            auth: AuthGate::new(ctx.client.clone(), ctx.store.clone()),
            document: Document::new(),
            charts: ChartAdapter::new(charts, map),
            stats: None,
        };
        dashboard.show_login();
        dashboard
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn charts(&self) -> &ChartAdapter<C, M> {
        &self.charts
    }

    pub fn stats(&self) -> Option<&StatsSnapshot> {
        self.stats.as_ref()
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth.state()
    }

    /// Resume a stored session and load the stats, or show the login form
    pub async fn start(&mut self) -> AuthState {
        if self.auth.restore() == AuthState::Authenticated {
            self.show_dashboard();
            if let Err(e) = self.load_stats().await {
                tracing::warn!("Initial stats load failed: {}", e);
            }
        }
        self.auth.state()
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        if let Err(e) = self.auth.login(username, password).await {
            if let Some(message) = self.auth.last_error() {
                let message = message.to_string();
                self.document.set_text(ERROR_MSG, &message);
                self.document.set_display(ERROR_MSG, Display::Block);
            }
            return Err(e);
        }

        self.document.set_display(ERROR_MSG, Display::None);
        self.show_dashboard();

        // Credentials were accepted; a stats outage is logged by load_stats and
        // the next refresh retries. Only a rejected session undoes the login.
        match self.load_stats().await {
            Err(AuthError::NotAuthenticated) => Err(AuthError::NotAuthenticated),
            _ => Ok(()),
        }
    }

    pub fn logout(&mut self) {
        self.auth.logout();
        self.show_login();
    }

    fn show_login(&mut self) {
        self.stats = None;
        self.document.set_display(LOGIN_SECTION, Display::Block);
        self.document.set_display(DASHBOARD_SECTION, Display::None);
    }

    fn show_dashboard(&mut self) {
        self.document.set_display(LOGIN_SECTION, Display::None);
        self.document.set_display(DASHBOARD_SECTION, Display::Block);
    }

    /// Fetch and render a fresh snapshot.
    ///
    /// Losing authentication returns to the login form; other failures
    /// leave the previous snapshot on screen.
    pub async fn load_stats(&mut self) -> Result<(), AuthError> {
        match self.auth.fetch_stats().await {
            Ok(stats) => {
                self.render_stats(&stats);
                self.stats = Some(stats);
                Ok(())
            }
            Err(AuthError::NotAuthenticated) => {
                self.show_login();
                Err(AuthError::NotAuthenticated)
            }
            Err(e) => {
                tracing::warn!("Stats API error: {}", e);
                Err(e)
            }
        }
    }

    fn render_stats(&mut self, stats: &StatsSnapshot) {
        let overview = render::render_overview(stats);
        self.document.set_inner_html(STAT_USERS, escape(&overview.users));
        self.document.set_inner_html(STAT_DURATION, escape(&overview.duration));

        self.document.set_inner_html(
            TOP_ACTIONS,
            render::render_ranked_list(&stats.top_actions, TOP_ACTIONS_COLOUR),
        );
        self.document.set_inner_html(
            DROP_OFFS,
            render::render_ranked_list(&stats.drop_offs, DROP_OFFS_COLOUR),
        );

        self.charts.render_traffic_chart(&stats.traffic_by_hour);
        self.charts.render_location_chart(&stats.top_locations);
        self.charts.render_map(&stats.top_locations);

        self.document
            .set_inner_html(CHAT_LOG, render::render_chat_log(&stats.recent_chats));
    }

    /// Refresh the stats every `interval` until authentication is lost.
    ///
    /// The first refresh happens immediately. Returns the number of
    /// successful refreshes.
    pub async fn poll(&mut self, interval: Duration) -> usize {
        let mut ticker = tokio::time::interval(interval);
        let mut refreshed = 0;

        loop {
            ticker.tick().await;

            match self.load_stats().await {
                Ok(()) => refreshed += 1,
                Err(AuthError::NotAuthenticated) => {
                    tracing::info!(refreshed, "Stopped polling: admin logged out");
                    return refreshed;
                }
                Err(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::ScriptedTransport;
    use crate::client::Method;
    use crate::config::PageFlags;
    use crate::pages::testing::context;
    use crate::session::{KeyValueStore, ADMIN_CREDENTIALS_KEY};
    use std::sync::Arc;

    const STATS: &str = r#"{
        "new_users": 12, "avg_duration": 40,
        "top_actions": [{"event_type": "search", "count": 9}],
        "drop_offs": [{"event_type": "page_view", "count": 2}],
        "traffic_by_hour": [{"hour": "09", "count": 3}],
        "top_locations": [{"location": "Pune", "latitude": 18.5, "longitude": 73.8, "count": 4}],
        "recent_chats": [{"timestamp": "2024-06-01 10:30:00", "user_query": "hi", "ai_response": "hello", "rating": 2}]
    }"#;

    #[tokio::test]
    async fn test_login_renders_dashboard() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(Method::Get, "/api/admin/stats", 200, STATS);
        let mut admin = AdminDashboard::new(&context(&transport, PageFlags::default()));
        assert!(admin.document().is_hidden(DASHBOARD_SECTION));

        admin.login("admin", "secret").await.unwrap();

        let doc = admin.document();
        assert!(doc.is_hidden(LOGIN_SECTION));
        assert!(!doc.is_hidden(DASHBOARD_SECTION));
        assert_eq!(doc.inner_html(STAT_USERS), "12");
        assert_eq!(doc.inner_html(STAT_DURATION), "40s");
        assert!(doc.inner_html(TOP_ACTIONS).contains("search"));
        assert!(doc.inner_html(CHAT_LOG).contains("⭐⭐"));
        assert_eq!(admin.charts().map().markers().len(), 1);
        assert_eq!(admin.charts().charts().live(), 2);
        assert!(admin.to_html().contains("new Chart("));
    }

    #[tokio::test]
    async fn test_rejected_login_shows_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(Method::Post, "/api/admin/login", 401, "");
        let mut admin = AdminDashboard::new(&context(&transport, PageFlags::default()));

        assert!(admin.login("admin", "bad").await.is_err());
        assert_eq!(admin.document().inner_html(ERROR_MSG), "Invalid credentials");
        assert_eq!(
            admin.document().element(ERROR_MSG).unwrap().display,
            Display::Block
        );
        assert!(admin.document().is_hidden(DASHBOARD_SECTION));
    }

    #[tokio::test]
    async fn test_start_restores_session() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(Method::Get, "/api/admin/stats", 200, STATS);
        let ctx = context(&transport, PageFlags::default());
        ctx.store.set(ADMIN_CREDENTIALS_KEY, "YWRtaW46c2VjcmV0").unwrap();

        let mut admin = AdminDashboard::new(&ctx);
        assert_eq!(admin.start().await, AuthState::Authenticated);
        assert!(admin.stats().is_some());
    }

    #[tokio::test]
    async fn test_start_without_session_makes_no_call() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut admin = AdminDashboard::new(&context(&transport, PageFlags::default()));

        assert_eq!(admin.start().await, AuthState::Unauthenticated);
        assert!(transport.requests_to("/api/admin/stats").is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_forces_logout() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(Method::Get, "/api/admin/stats", 200, STATS);
        let ctx = context(&transport, PageFlags::default());
        let mut admin = AdminDashboard::new(&ctx);
        admin.login("admin", "secret").await.unwrap();

        transport.respond(Method::Get, "/api/admin/stats", 401, "");
        assert!(matches!(admin.load_stats().await, Err(AuthError::NotAuthenticated)));
        assert_eq!(ctx.store.get(ADMIN_CREDENTIALS_KEY), None);
        assert!(!admin.document().is_hidden(LOGIN_SECTION));
        assert!(admin.stats().is_none());
    }

    #[tokio::test]
    async fn test_server_error_keeps_stale_view() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(Method::Get, "/api/admin/stats", 200, STATS);
        let mut admin = AdminDashboard::new(&context(&transport, PageFlags::default()));
        admin.login("admin", "secret").await.unwrap();

        transport.respond(Method::Get, "/api/admin/stats", 500, "down");
        assert!(admin.load_stats().await.is_err());
        assert_eq!(admin.document().inner_html(STAT_USERS), "12");
        assert!(admin.stats().is_some());
    }

    #[tokio::test]
    async fn test_login_survives_stats_outage() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(Method::Get, "/api/admin/stats", 500, "down");
        let ctx = context(&transport, PageFlags::default());
        let mut admin = AdminDashboard::new(&ctx);

        admin.login("admin", "secret").await.unwrap();

        assert_eq!(admin.auth_state(), AuthState::Authenticated);
        assert_eq!(ctx.store.get(ADMIN_CREDENTIALS_KEY).as_deref(), Some("YWRtaW46c2VjcmV0"));
        assert!(!admin.document().is_hidden(DASHBOARD_SECTION));
        assert!(admin.stats().is_none());
    }

    #[tokio::test]
    async fn test_poll_stops_after_logout() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(Method::Get, "/api/admin/stats", 401, "");
        let ctx = context(&transport, PageFlags::default());
        ctx.store.set(ADMIN_CREDENTIALS_KEY, "YWRtaW46c2VjcmV0").unwrap();
        let mut admin = AdminDashboard::new(&ctx);

        let refreshed = admin.poll(Duration::from_millis(5)).await;
        assert_eq!(refreshed, 0);
        assert_eq!(admin.auth_state(), AuthState::Unauthenticated);
    }
}
