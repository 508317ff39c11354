//! Page controllers
//!
//! Each page owns a [`Document`](crate::dom::Document) and the components
//! it drives. Variants of a page differ only in [`PageFlags`].

pub mod admin;
pub mod citizen;
pub mod parties;

pub use admin::AdminDashboard;
pub use citizen::CitizenPage;
pub use parties::PartiesPage;

use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::PageFlags;
use crate::session::{KeyValueStore, SessionStore};
use crate::telemetry::TelemetryEmitter;

/// Handles shared by the pages of one process
#[derive(Clone)]
pub struct PageContext {
    pub client: ApiClient,
    pub store: Arc<dyn KeyValueStore>,
    pub telemetry: TelemetryEmitter,
    pub flags: PageFlags,
}

impl PageContext {
    /// Build the context, creating the analytics session id if needed
    pub fn new(
        client: ApiClient,
        store: Arc<dyn KeyValueStore>,
        flags: PageFlags,
        telemetry_enabled: bool,
    ) -> Self {
        let telemetry = if telemetry_enabled {
            let session_id = SessionStore::new(store.clone()).get_or_create_session_id();
            TelemetryEmitter::new(client.clone(), session_id)
        } else {
            TelemetryEmitter::disabled(client.clone())
        };

        Self {
            client,
            store,
            telemetry,
            flags,
        }
    }
}
