//! Wires the controller, the query pool and the HTTP handler together.

mod handler;
mod negotiate;

pub use handler::{AppState, router};
pub use negotiate::negotiate;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::index::Controller;
use crate::store::{Connector, Mode, QueryPool};

/// Read connections kept alive for request handling.
const POOL_SIZE: usize = 10;

/// Default page fragments wrapped around the streamed HTML index.
const INDEX_HTML_HEADER: &str = "<!DOCTYPE html>\n<html><head>\
<meta charset=\"utf-8\"><title>Ontologies</title></head><body>\n<h1>Ontologies</h1>\n";
const INDEX_HTML_FOOTER: &str = "</body></html>\n";
const INDEX_TXT_HEADER: &str = "# Ontologies\n\n";
const INDEX_TXT_FOOTER: &str = "";

/// Everything the daemon needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database file; in-memory shared-cache store when absent.
    pub database: Option<String>,
    /// Paths to index (and possibly watch).
    pub paths: Vec<PathBuf>,
    pub host: String,
    pub port: u16,
    /// Domain assumed for IRI dereferencing instead of the request host.
    pub public_domain: Option<String>,
    pub ontology_route: String,
    pub insecure_skip_routes: bool,
    pub watch: bool,
    /// Language preferences for HTML literal rendering.
    pub languages: Vec<String>,
    pub debug: bool,
    pub index_html_header: Option<String>,
    pub index_html_footer: Option<String>,
    pub index_txt_header: Option<String>,
    pub index_txt_footer: Option<String>,
}

/// Run the daemon until interrupted.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    if config.watch && config.paths.is_empty() {
        anyhow::bail!("--watch given, but no paths to watch provided");
    }

    let (server_connector, index_connector) = match &config.database {
        Some(database) => (
            Connector::new(database.clone(), Mode::ReadOnly),
            Connector::new(database.clone(), Mode::ReadWriteCreate),
        ),
        None => {
            let shared = Connector::new("ontod", Mode::MemorySharedCache);
            (shared.clone(), shared)
        }
    };

    // index first so the read-only side has something to open
    let mut controller = None;
    if !config.paths.is_empty() {
        tracing::info!(url = %index_connector.connect_url(), "opening database");
        let conn = index_connector
            .connect()
            .context("opening the writer connection")?;
        let owned = Arc::new(Controller::new(
            conn,
            config.paths.clone(),
            config.languages.clone(),
        ));

        let indexing = Arc::clone(&owned);
        tokio::task::spawn_blocking(move || indexing.index_and_commit())
            .await?
            .context("initial indexing run")?;

        controller = Some(owned);
    }

    // the watcher lives as long as this function runs
    let _watcher = match (&controller, config.watch) {
        (Some(controller), true) => Some(Arc::clone(controller).start_watching()?),
        _ => None,
    };

    let state = Arc::new(AppState {
        pool: QueryPool::new(POOL_SIZE, server_connector),
        ontology_route: config.ontology_route.clone(),
        public_domain: config.public_domain.clone(),
        insecure_skip_routes: config.insecure_skip_routes,
        debug: config.debug,
        index_html_header: config
            .index_html_header
            .unwrap_or_else(|| INDEX_HTML_HEADER.to_string()),
        index_html_footer: config
            .index_html_footer
            .unwrap_or_else(|| INDEX_HTML_FOOTER.to_string()),
        index_txt_header: config
            .index_txt_header
            .unwrap_or_else(|| INDEX_TXT_HEADER.to_string()),
        index_txt_footer: config
            .index_txt_footer
            .unwrap_or_else(|| INDEX_TXT_FOOTER.to_string()),
    });

    if config.insecure_skip_routes {
        tracing::warn!("skipping routes blocked for safety, use with caution");
    }

    let app = router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("binding {}:{}", config.host, config.port))?;
    tracing::info!("starting server at {}:{}", config.host, config.port);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    state.pool.teardown();
    served.context("serving HTTP")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("cannot listen for shutdown signal: {err}");
    }
}
