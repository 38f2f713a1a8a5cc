//! Routes, content negotiation and IRI dereferencing.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Query as QueryParams, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::media;
use crate::store::QueryPool;

use super::negotiate::negotiate;

/// Unreserved characters stay as-is in query values.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Fragments additionally keep `/`.
const FRAGMENT_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Everything the handlers need.
pub struct AppState {
    pub pool: QueryPool,
    pub ontology_route: String,
    pub public_domain: Option<String>,
    pub insecure_skip_routes: bool,
    pub debug: bool,
    pub index_html_header: String,
    pub index_html_footer: String,
    pub index_txt_header: String,
    pub index_txt_footer: String,
}

impl AppState {
    /// The one place that knows how to build ontology URLs.
    pub fn ontology_url(
        &self,
        identifier: &str,
        format: Option<&str>,
        download: bool,
        fragment: Option<&str>,
    ) -> String {
        let mut url = format!(
            "{}?identifier={}",
            self.ontology_route,
            utf8_percent_encode(identifier, QUERY_VALUE)
        );
        if let Some(format) = format {
            url.push_str(&format!("&format={}", utf8_percent_encode(format, QUERY_VALUE)));
        }
        if download {
            url.push_str("&download=1");
        }
        if let Some(fragment) = fragment {
            url.push_str(&format!("#{}", utf8_percent_encode(fragment, FRAGMENT_VALUE)));
        }
        url
    }
}

/// Build the daemon's router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new().route(&state.ontology_route, get(handle_ontology_route));

    if state.ontology_route != "/" {
        let with_slash = format!("{}/", state.ontology_route.trim_end_matches('/'));
        router = router.route(&with_slash, get(remove_trailing_slash));
    }

    if !state.insecure_skip_routes {
        router = router
            .route("/.well-known/{*path}", get(not_found))
            .route("/favicon.ico", get(not_found))
            .route("/robots.txt", get(not_found));
    }

    router
        .fallback(handle_fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize, Default)]
pub struct OntologyParams {
    identifier: Option<String>,
    format: Option<String>,
    download: Option<String>,
}

fn text_response(code: StatusCode, message: &str) -> Response {
    (
        code,
        [(header::CONTENT_TYPE, media::PLAIN)],
        message.to_string(),
    )
        .into_response()
}

async fn not_found() -> Response {
    text_response(StatusCode::NOT_FOUND, "not found")
}

async fn remove_trailing_slash(State(state): State<Arc<AppState>>) -> Response {
    Redirect::temporary(&state.ontology_route).into_response()
}

fn internal_error(state: &AppState, err: anyhow::Error) -> Response {
    tracing::error!("handler failed: {err:#}");
    let body = if state.debug {
        format!("{err:?}")
    } else {
        "Internal Server Error".to_string()
    };
    text_response(StatusCode::INTERNAL_SERVER_ERROR, &body)
}

async fn handle_ontology_route(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<OntologyParams>,
    headers: HeaderMap,
) -> Response {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let result = match params.identifier {
        Some(identifier) => {
            serve_ontology(state.clone(), identifier, params.format, params.download, accept).await
        }
        None => serve_index(state.clone(), accept).await,
    };
    result.unwrap_or_else(|err| internal_error(&state, err))
}

/// Serve one ontology document in the best available representation.
async fn serve_ontology(
    state: Arc<AppState>,
    identifier: String,
    format: Option<String>,
    download: Option<String>,
    accept: Option<String>,
) -> anyhow::Result<Response> {
    tokio::task::spawn_blocking(move || -> anyhow::Result<Response> {
        let query = state.pool.acquire()?;

        let offers = query.get_mime_types(&identifier)?;
        if offers.is_empty() {
            return Ok(text_response(StatusCode::NOT_FOUND, "Ontology not found"));
        }

        let decision = match &format {
            Some(format) => {
                if !query.has_mime_type(&identifier, format)? {
                    return Ok(text_response(
                        StatusCode::NOT_FOUND,
                        "Requested format not available",
                    ));
                }
                format.clone()
            }
            None => {
                let negotiated = negotiate(accept.as_deref(), &offers)
                    .filter(|decision| offers.contains(decision));
                let fallback = || offers.iter().find(|o| *o == media::PLAIN).cloned();
                match negotiated.or_else(fallback) {
                    Some(decision) => decision,
                    None => {
                        return Ok(text_response(
                            StatusCode::NOT_ACCEPTABLE,
                            "No available content type",
                        ));
                    }
                }
            }
        };

        tracing::debug!(%identifier, %decision, "serving ontology");
        let Some(data) = query.get_data(&identifier, &decision)? else {
            return Ok(text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Negotiated content type went away",
            ));
        };

        let disposition_kind = if download.is_some() { "attachment" } else { "inline" };
        let extension = media::extension_from_type(&decision).unwrap_or("bin");
        let disposition = format!(
            "{disposition_kind}; filename*=UTF-8''{}.{extension}",
            utf8_percent_encode(filename_stem(&identifier), QUERY_VALUE)
        );

        Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, decision),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            Body::from(data),
        )
            .into_response())
    })
    .await?
}

/// The index of all ontologies, as plain text or HTML.
async fn serve_index(state: Arc<AppState>, accept: Option<String>) -> anyhow::Result<Response> {
    tokio::task::spawn_blocking(move || -> anyhow::Result<Response> {
        // plain first, so it is the default for absent or indifferent
        // Accept headers
        let offers = [media::PLAIN.to_string(), media::HTML.to_string()];
        let decision =
            negotiate(accept.as_deref(), &offers).unwrap_or_else(|| media::PLAIN.to_string());
        let html = decision == media::HTML;

        let query = state.pool.acquire()?;
        let ontologies = query.list_ontologies()?;

        let mut body = String::new();
        body.push_str(if html {
            &state.index_html_header
        } else {
            &state.index_txt_header
        });

        for ontology in &ontologies {
            if html {
                push_index_fieldset(&state, &mut body, &ontology.identifier, &ontology.uri, &ontology.mime_types);
            } else {
                push_index_block(&state, &mut body, ontology);
            }
        }

        body.push_str(if html {
            &state.index_html_footer
        } else {
            &state.index_txt_footer
        });

        Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, decision)],
            body,
        )
            .into_response())
    })
    .await?
}

fn push_index_block(
    state: &AppState,
    body: &mut String,
    ontology: &crate::store::OntologySummary,
) {
    body.push_str(&format!("## Ontology {}:\n", ontology.uri));
    body.push_str(&format!("* Identifier: {}\n", ontology.identifier));
    body.push_str(&format!("* Definienda: {}\n", ontology.definienda_count));
    if !ontology.alternate_uris.is_empty() {
        body.push_str("Alternate URIs:\n");
        for uri in &ontology.alternate_uris {
            body.push_str(&format!("* <{uri}>\n"));
        }
    }
    body.push_str("Available Formats:\n");
    for mime_type in &ontology.mime_types {
        let url = state.ontology_url(&ontology.identifier, Some(mime_type), false, None);
        body.push_str(&format!("* {mime_type}: {url}\n"));
    }
    body.push('\n');
}

fn push_index_fieldset(
    state: &AppState,
    body: &mut String,
    identifier: &str,
    uri: &str,
    mime_types: &[String],
) {
    use crate::html::{a, code, fieldset, legend, li, ul};

    let mut formats = ul();
    for mime_type in mime_types {
        let view = state.ontology_url(identifier, Some(mime_type), false, None);
        let download = state.ontology_url(identifier, Some(mime_type), true, None);
        formats = formats.child(
            li().child(a().attr("href", view).text(mime_type))
                .text(" (")
                .child(a().attr("href", download).text("download"))
                .text(")"),
        );
    }

    let block = fieldset()
        .child(
            legend().child(
                a().attr("href", state.ontology_url(identifier, None, false, None))
                    .child(code().text(uri)),
            ),
        )
        .child(formats);
    body.push_str(&block.render());
    body.push('\n');
}

/// Dereference an arbitrary request IRI to the ontology that defines it.
async fn handle_fallback(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    dereference(state.clone(), uri, headers)
        .await
        .unwrap_or_else(|err| internal_error(&state, err))
}

async fn dereference(
    state: Arc<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> anyhow::Result<Response> {
    let path = uri.path().to_string();

    let host = match &state.public_domain {
        Some(domain) => Some(domain.clone()),
        None => headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(strip_port),
    };
    let Some(host) = host else {
        return Ok(text_response(StatusCode::NOT_FOUND, "not found"));
    };

    let trimmed = path.trim_end_matches('/');
    let candidates: Vec<String> = ["http", "https"]
        .iter()
        .flat_map(|scheme| {
            [
                format!("{scheme}://{host}{trimmed}"),
                format!("{scheme}://{host}{trimmed}/"),
            ]
        })
        .collect();
    tracing::debug!(?candidates, "looking up IRIs");

    let rows = {
        let state = state.clone();
        tokio::task::spawn_blocking(move || {
            let query = state.pool.acquire()?;
            query.get_definienda(&candidates)
        })
        .await??
    };

    let Some(row) = rows.first() else {
        if path == "/" {
            return Ok(Redirect::to(&state.ontology_route).into_response());
        }
        return Ok(text_response(StatusCode::NOT_FOUND, "not found"));
    };

    let url = state.ontology_url(&row.ontology_id, None, false, row.fragment.as_deref());
    Ok(Redirect::to(&url).into_response())
}

/// The filename stem for a served document: the identifier's last
/// non-empty path segment, so IRI-shaped identifiers yield short names.
fn filename_stem(identifier: &str) -> &str {
    identifier
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(identifier)
}

/// Drop a port suffix from a Host header value.
fn strip_port(host: &str) -> String {
    if let Some(end) = host.find(']') {
        // bracketed IPv6 literal
        return host[..=end].to_string();
    }
    host.split(':').next().unwrap_or(host).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState {
            pool: QueryPool::new(
                2,
                crate::store::Connector::new("handler-url-test", crate::store::Mode::Memory),
            ),
            ontology_route: "/".to_string(),
            public_domain: None,
            insecure_skip_routes: false,
            debug: false,
            index_html_header: String::new(),
            index_html_footer: String::new(),
            index_txt_header: String::new(),
            index_txt_footer: String::new(),
        }
    }

    #[test]
    fn ontology_url_escapes_identifier() {
        let url = state().ontology_url("http://example.org/o", None, false, Some("Thing"));
        assert_eq!(url, "/?identifier=http%3A%2F%2Fexample.org%2Fo#Thing");
    }

    #[test]
    fn ontology_url_includes_format_and_download() {
        let url = state().ontology_url("o", Some("text/turtle"), true, None);
        assert_eq!(url, "/?identifier=o&format=text%2Fturtle&download=1");
    }

    #[test]
    fn filename_stem_shortens_iris() {
        assert_eq!(filename_stem("o"), "o");
        assert_eq!(filename_stem("http://example.org/o"), "o");
        assert_eq!(filename_stem("http://example.org/path/"), "path");
    }

    #[test]
    fn strip_port_handles_common_hosts() {
        assert_eq!(strip_port("example.org"), "example.org");
        assert_eq!(strip_port("example.org:8080"), "example.org");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
    }
}
