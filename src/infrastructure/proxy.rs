// Same-origin reverse proxy with server-side credential injection
use axum::{
    body::Body,
    extract::{Path, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::config::UpstreamsSettings;

/// One proxied upstream: base URL plus the headers injected on every forward.
pub struct ProxyTarget {
    client: reqwest::Client,
    base: String,
    headers: Vec<(&'static str, String)>,
}

impl ProxyTarget {
    fn new(client: reqwest::Client, base: &str, headers: Vec<(&'static str, String)>) -> Arc<Self> {
        Arc::new(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            headers,
        })
    }
}

/// `/api/{uptime,portainer,do}/*` routes for a browser client. Credentials
/// never reach the browser; the upstream status code is surfaced as-is.
pub fn proxy_router(settings: &UpstreamsSettings) -> Router {
    let client = reqwest::Client::new();

    let uptime = ProxyTarget::new(client.clone(), &settings.uptime.base_url, Vec::new());
    let container = ProxyTarget::new(
        client.clone(),
        &format!("{}/api", settings.container.base_url.trim_end_matches('/')),
        vec![("X-API-Key", settings.container.api_key.clone())],
    );
    let cloud = ProxyTarget::new(
        client,
        &settings.cloud.base_url,
        vec![("Authorization", format!("Bearer {}", settings.cloud.token))],
    );

    Router::new()
        .merge(
            Router::new()
                .route("/api/uptime/*path", get(forward))
                .with_state(uptime),
        )
        .merge(
            Router::new()
                .route("/api/portainer/*path", get(forward))
                .with_state(container),
        )
        .merge(
            Router::new()
                .route("/api/do/*path", get(forward))
                .with_state(cloud),
        )
}

async fn forward(
    State(target): State<Arc<ProxyTarget>>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let mut url = format!("{}/{}", target.base, path);
    if let Some(query) = query {
        url.push('?');
        url.push_str(&query);
    }

    let mut request = target.client.get(&url);
    for (name, value) in &target.headers {
        request = request.header(*name, value.as_str());
    }

    let upstream = match request.send().await {
        Ok(upstream) => upstream,
        Err(err) => {
            tracing::warn!("proxy request to {url} failed: {err}");
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": "upstream unreachable"})),
            )
                .into_response();
        }
    };

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/json")
        .to_string();

    match upstream.bytes().await {
        Ok(body) => {
            let mut response = Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, content_type);
            if status.is_client_error() || status.is_server_error() {
                tracing::debug!("proxy surfaced upstream status {status} for {url}");
            }
            response = response.header(header::CACHE_CONTROL, "no-store");
            response
                .body(Body::from(body))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        Err(err) => {
            tracing::warn!("proxy body read from {url} failed: {err}");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": "upstream body unreadable"})),
            )
                .into_response()
        }
    }
}
