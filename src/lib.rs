//! # Civitas
//!
//! Rendering and state-sync layer for a civic information service: a
//! citizen representative lookup, an admin analytics dashboard and a 2024
//! Lok Sabha results viewer.
//!
//! ## Modules
//!
//! - [`client`]: one-shot JSON calls against the civic API
//! - [`session`]: persisted key-value state and the analytics session id
//! - [`telemetry`]: heartbeat and event beacons
//! - [`render`]: pure snapshot to HTML functions
//! - [`charts`]: chart and map surfaces with destroy-and-recreate semantics
//! - [`modal`]: overlay open/closed state
//! - [`chat`]: assistant conversation and its send protocol
//! - [`auth`]: admin credential gate
//! - [`electoral`]: bundled party standings and state results
//! - [`pages`]: the three page controllers
//! - [`preview`]: axum server rendering the pages on request
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use civitas::client::ApiClient;
//! use civitas::config::Config;
//! use civitas::pages::{CitizenPage, PageContext};
//! use civitas::session::FileStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = ApiClient::http(&config.api)?;
//!     let store = Arc::new(FileStore::open(config.storage.store_path())?);
//!
//!     let ctx = PageContext::new(client, store, config.pages.clone(), config.telemetry.enabled);
//!     let mut page = CitizenPage::new(&ctx);
//!     page.search("Pune").await?;
//!
//!     println!("{} representatives", page.representatives().len());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod charts;
pub mod chat;
pub mod client;
pub mod config;
pub mod dom;
pub mod electoral;
pub mod modal;
pub mod pages;
pub mod preview;
pub mod render;
pub mod session;
pub mod telemetry;

pub use client::{ApiClient, ClientError, ClientResult};
pub use config::Config;
pub use pages::{AdminDashboard, CitizenPage, PageContext, PartiesPage};
