//! Event Telemetry Emitter
//!
//! Fire-and-forget analytics beacons. Every method returns the client
//! result so the caller decides, visibly, to drop it. Nothing here may
//! delay or fail a user-facing action.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::client::{ApiClient, ClientResult};

/// Kinds of analytics events sent to `/api/analytics/event`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PageView,
    Search,
    ChatQuery,
    LocationDetect,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PageView => "page_view",
            EventKind::Search => "search",
            EventKind::ChatQuery => "chat_query",
            EventKind::LocationDetect => "location_detect",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sends heartbeats and events tagged with the session id
#[derive(Clone)]
pub struct TelemetryEmitter {
    client: ApiClient,
    session_id: Arc<str>,
    enabled: bool,
    /// Fired events not yet answered, shared by all clones
    in_flight: Arc<AtomicUsize>,
}

impl TelemetryEmitter {
    pub fn new(client: ApiClient, session_id: impl Into<String>) -> Self {
        Self {
            client,
            session_id: Arc::from(session_id.into()),
            enabled: true,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// An emitter that never touches the network
    pub fn disabled(client: ApiClient) -> Self {
        Self {
            client,
            session_id: Arc::from(""),
            enabled: false,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn send_heartbeat(&self) -> ClientResult<()> {
        if !self.enabled {
            return Ok(());
        }
        self.client.heartbeat(&self.session_id).await
    }

    pub async fn record_event(&self, kind: EventKind, detail: &str) -> ClientResult<()> {
        if !self.enabled {
            return Ok(());
        }
        self.client
            .event(&self.session_id, kind.as_str(), detail)
            .await
    }

    /// Send an event on a background task.
    ///
    /// The returned handle may be dropped; the task keeps running.
    pub fn fire(&self, kind: EventKind, detail: &str) -> JoinHandle<ClientResult<()>> {
        let emitter = self.clone();
        let detail = detail.to_string();
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            let result = emitter.record_event(kind, &detail).await;
            emitter.in_flight.fetch_sub(1, Ordering::SeqCst);
            if let Err(e) = &result {
                tracing::debug!(kind = %kind, "Telemetry event dropped: {}", e);
            }
            result
        })
    }

    /// Number of fired events still waiting on the network
    pub fn pending(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wait up to `grace` for fired events to land.
    ///
    /// Short-lived processes call this before exiting so their beacons are
    /// not cut off with the runtime. Returns `false` if some were still out.
    pub async fn flush(&self, grace: Duration) -> bool {
        let deadline = Instant::now() + grace;

        while self.pending() > 0 {
            if Instant::now() >= deadline {
                tracing::debug!(pending = self.pending(), "Telemetry flush timed out");
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        true
    }

    /// Send a heartbeat now and then every `interval`, forever.
    ///
    /// Failures are logged and the timer keeps going with no backoff.
    pub fn start_heartbeat(&self, interval: Duration) -> JoinHandle<()> {
        let emitter = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;

                if let Err(e) = emitter.send_heartbeat().await {
                    tracing::debug!("Heartbeat failed: {}", e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::ScriptedTransport;
    use crate::client::Method;
    use serde_json::json;

    fn emitter(transport: &Arc<ScriptedTransport>) -> TelemetryEmitter {
        TelemetryEmitter::new(ApiClient::new(transport.clone()), "sess_test00001")
    }

    #[tokio::test]
    async fn test_heartbeat_attaches_session() {
        let transport = Arc::new(ScriptedTransport::new());
        emitter(&transport).send_heartbeat().await.unwrap();

        let requests = transport.requests_to("/api/analytics/heartbeat");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body, Some(json!({"session_id": "sess_test00001"})));
    }

    #[tokio::test]
    async fn test_fire_reports_failure_without_panicking() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(Method::Post, "/api/analytics/event");

        let result = emitter(&transport).fire(EventKind::Search, "Pune").await.unwrap();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_flush_waits_for_fired_events() {
        let transport = Arc::new(ScriptedTransport::new());
        let telemetry = emitter(&transport);

        drop(telemetry.fire(EventKind::Search, "Pune"));
        drop(telemetry.fire(EventKind::PageView, "home"));
        assert!(telemetry.flush(Duration::from_secs(1)).await);

        assert_eq!(telemetry.pending(), 0);
        let events = transport.requests_to("/api/analytics/event");
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].body,
            Some(json!({"session_id": "sess_test00001", "event_type": "search", "details": "Pune"}))
        );
    }

    #[tokio::test]
    async fn test_flush_gives_up_after_grace() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.stall(Method::Post, "/api/analytics/event");
        let telemetry = emitter(&transport);

        drop(telemetry.fire(EventKind::Search, "Pune"));
        assert!(!telemetry.flush(Duration::from_millis(50)).await);
        assert_eq!(telemetry.pending(), 1);
    }

    #[tokio::test]
    async fn test_disabled_emitter_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        let telemetry = TelemetryEmitter::disabled(ApiClient::new(transport.clone()));

        telemetry.send_heartbeat().await.unwrap();
        telemetry.record_event(EventKind::PageView, "home").await.unwrap();
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_heartbeat_keeps_running_after_failures() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(Method::Post, "/api/analytics/heartbeat");

        let handle = emitter(&transport).start_heartbeat(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(transport.requests_to("/api/analytics/heartbeat").len() >= 2);
    }

    #[test]
    fn test_event_kind_names() {
        assert_eq!(EventKind::PageView.as_str(), "page_view");
        assert_eq!(EventKind::ChatQuery.to_string(), "chat_query");
    }
}
