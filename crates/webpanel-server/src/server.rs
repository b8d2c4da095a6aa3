//! Axum transport for a panel page.
//!
//! This module provides:
//! - `GET /`: the full page shell
//! - `POST /`: one request cycle (apply client value, send deltas, advance)
//! - [`PanelHandle`] for server-side application logic

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use webpanel_core::{BufferDriver, ContentKind, Page, Revision, RevisionClock};
use webpanel_protocol::PollRequest;

use crate::config::ServerConfig;

/// Errors that can stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or serving the socket failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a request cycle touches.
pub struct PanelState {
    pub page: Page,
    pub clock: RevisionClock,
}

/// Shared access to the panel.
///
/// All request cycles and all application updates go through the same
/// lock, so a cycle's apply → respond → advance span is never interleaved
/// with another mutation.
#[derive(Clone)]
pub struct PanelHandle {
    state: Arc<Mutex<PanelState>>,
}

impl PanelHandle {
    pub fn new(page: Page) -> Self {
        Self {
            state: Arc::new(Mutex::new(PanelState {
                page,
                clock: RevisionClock::new(),
            })),
        }
    }

    /// Run `f` against the page with the clock to stamp changes with.
    pub async fn update<R>(&self, f: impl FnOnce(&mut Page, &RevisionClock) -> R) -> R {
        let mut state = self.state.lock().await;
        let PanelState { page, clock } = &mut *state;
        f(page, clock)
    }

    /// The working revision.
    pub async fn revision(&self) -> Revision {
        self.state.lock().await.clock.current()
    }

    /// Render the full page.
    pub async fn render_page(&self) -> (Option<ContentKind>, String) {
        let mut state = self.state.lock().await;
        let PanelState { page, clock } = &mut *state;
        let mut driver = BufferDriver::new(clock);
        page.render(&mut driver);
        driver.into_response()
    }

    /// Run one request cycle.
    pub async fn sync(&self, request: PollRequest) -> (Option<ContentKind>, String) {
        let mut state = self.state.lock().await;
        let PanelState { page, clock } = &mut *state;
        let mut driver = BufferDriver::with_args(clock, request.into_args());
        let report = page.handle_request(&mut driver);

        if !report.target.is_empty() && !report.applied {
            warn!("Ignoring update for unknown element '{}'", report.target);
        }
        debug!(
            client_revision = %report.client_revision,
            revision = %report.revision,
            target = %report.target,
            has_updates = report.has_updates,
            "Request cycle complete"
        );
        driver.into_response()
    }
}

/// The panel HTTP server.
pub struct PanelServer {
    config: ServerConfig,
    handle: PanelHandle,
}

impl PanelServer {
    /// Create a server for `page`.
    pub fn new(config: ServerConfig, page: Page) -> Self {
        Self {
            config,
            handle: PanelHandle::new(page),
        }
    }

    /// Handle for application logic.
    pub fn handle(&self) -> PanelHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The axum router serving the panel.
    pub fn router(&self) -> Router {
        router(self.handle.clone())
    }

    /// Bind to the configured address and serve forever.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let addr: SocketAddr = listener.local_addr()?;
        info!("{} listening on http://{}", self.config.name, addr);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Build the router for a panel handle.
pub fn router(handle: PanelHandle) -> Router {
    Router::new()
        .route("/", get(page_handler).post(sync_handler))
        .with_state(handle)
}

async fn page_handler(State(handle): State<PanelHandle>) -> Response {
    let (kind, body) = handle.render_page().await;
    into_http(kind, body)
}

async fn sync_handler(State(handle): State<PanelHandle>, Form(request): Form<PollRequest>) -> Response {
    let (kind, body) = handle.sync(request).await;
    into_http(kind, body)
}

/// Turn a buffered driver response into an HTTP response.
fn into_http(kind: Option<ContentKind>, body: String) -> Response {
    let Some(kind) = kind else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "no response produced").into_response();
    };
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, kind.mime_type()),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
        .into_response()
}
