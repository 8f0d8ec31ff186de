//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Build the shared application state from config
//! - Bind server to listener and stop on the shutdown signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::aggregate::Aggregator;
use crate::config::AppConfig;
use crate::content::paths;
use crate::http::request::{propagate_request_id_layer, request_id_of, set_request_id_layer};
use crate::http::response::{error_response, page_response, sitemap_xml_response};
use crate::pages::{PageLoader, TermsKind};
use crate::settings::SettingsCache;
use crate::sitemap::SitemapBuilder;
use crate::upstream::{ClientError, Upstream, UpstreamClient, UpstreamRequest};

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("upstream client: {0}")]
    Client(#[from] ClientError),

    #[error("invalid sitemap.site_url: {0}")]
    SiteUrl(#[from] url::ParseError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub sitemap: SitemapBuilder,
    pub pages: PageLoader,
    pub settings: SettingsCache,
    /// How long the footer endpoint waits for the first settings value.
    pub settings_wait: Duration,
}

impl AppState {
    /// Wire every subsystem to a single upstream.
    pub fn from_config(config: &AppConfig, upstream: Arc<dyn Upstream>) -> Result<Self, url::ParseError> {
        let aggregator = Aggregator::new(upstream.clone());
        let settings_request = UpstreamRequest::new(paths::FOOTER_SETTINGS)
            .with_deadline(Duration::from_millis(config.settings.fetch_budget_ms));

        Ok(Self {
            sitemap: SitemapBuilder::from_config(aggregator.clone(), &config.sitemap)?,
            pages: PageLoader::from_config(aggregator, &config.pages),
            settings: SettingsCache::new(upstream, settings_request),
            settings_wait: Duration::from_millis(config.settings.wait_ms),
        })
    }
}

/// HTTP server for the content aggregator.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server backed by the real content API client.
    pub fn new(config: AppConfig) -> Result<Self, StartupError> {
        let client = UpstreamClient::new(&config.upstream)?;
        let state = AppState::from_config(&config, Arc::new(client))?;
        Ok(Self::with_state(config, state))
    }

    /// Create a server around prebuilt state.
    pub fn with_state(config: AppConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/sitemap.xml", get(sitemap_xml))
            .route("/sitemap.json", get(sitemap_json))
            .route("/api/pages/about", get(about_page))
            .route("/api/pages/interview-questions", get(interview_questions_page))
            .route("/api/pages/terms/{kind}", get(terms_page))
            .route("/api/footer-settings", get(footer_settings))
            .route("/healthz", get(healthz))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id_of(request.headers()),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// The router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            site_url = %self.config.sitemap.site_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn sitemap_xml(State(state): State<AppState>) -> Response {
    let entries = state.sitemap.build().await;
    sitemap_xml_response(&entries)
}

async fn sitemap_json(State(state): State<AppState>) -> Response {
    Json(state.sitemap.build().await).into_response()
}

async fn about_page(State(state): State<AppState>) -> Response {
    page_response(state.pages.load_about().await)
}

async fn interview_questions_page(State(state): State<AppState>) -> Response {
    page_response(state.pages.load_interview_questions().await)
}

async fn terms_page(State(state): State<AppState>, headers: HeaderMap, Path(kind): Path<String>) -> Response {
    match TermsKind::from_slug(&kind) {
        Some(kind) => page_response(state.pages.load_terms(kind).await),
        None => {
            tracing::debug!(request_id = %request_id_of(&headers), kind = %kind, "Unknown terms page");
            error_response(StatusCode::NOT_FOUND, "unknown terms page")
        }
    }
}

/// Cached settings, or up to `settings_wait` for the first fetch; 204 if
/// nothing is available yet.
async fn footer_settings(State(state): State<AppState>) -> Response {
    if let Some(settings) = state.settings.current() {
        return Json(settings).into_response();
    }
    match state.settings.wait_for_value(state.settings_wait).await {
        Some(settings) => Json(settings).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn healthz() -> Response {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}
