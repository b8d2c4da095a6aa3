//! # webpanel-server
//!
//! HTTP transport for webpanel control panels.
//!
//! Enable features based on target platform:
//! - `tokio-runtime` (default) - axum server for Linux/desktop
//!
//! The transport serves the page shell on `GET /` and runs one request
//! cycle per `POST /`. Cycles are serialized behind a single lock, which is
//! also taken by server-side application logic through [`PanelHandle`].

pub mod config;

#[cfg(feature = "tokio-runtime")]
pub mod server;

pub use config::ServerConfig;
#[cfg(feature = "tokio-runtime")]
pub use server::{router, PanelHandle, PanelServer, PanelState, ServerError};
pub use webpanel_core::{Page, Revision, RevisionClock};
