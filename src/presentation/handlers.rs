// HTTP request handlers
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use futures::StreamExt;
use serde::Serialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;

use crate::domain::panel::PanelDraft;
use crate::domain::runtime::{PanelRuntime, RenderMode};
use crate::presentation::app_state::AppState;

/// Runtime snapshot plus its derived render mode, as one JSON document.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PanelStateView {
    #[serde(flatten)]
    runtime: PanelRuntime,
    render: RenderMode,
}

impl From<PanelRuntime> for PanelStateView {
    fn from(runtime: PanelRuntime) -> Self {
        let render = runtime.render_mode();
        Self { runtime, render }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_panels(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.panels.list())
}

pub async fn add_panel(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<PanelDraft>,
) -> Response {
    if let Err(reason) = draft.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": reason})),
        )
            .into_response();
    }

    match state.panels.add(draft) {
        Ok(panel) => (StatusCode::CREATED, Json(panel)).into_response(),
        Err(err) => {
            tracing::error!("adding panel failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn remove_panel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.panels.remove(&id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            tracing::error!(panel = %id, "removing panel failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn panel_state(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.panels.snapshot(&id) {
        Some(runtime) => Json(PanelStateView::from(runtime)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn refresh_panel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    if state.panels.refresh(&id) {
        StatusCode::ACCEPTED.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

pub async fn toggle_fullscreen(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.panels.toggle_fullscreen(&id) {
        Some(fullscreen) => Json(json!({"fullscreen": fullscreen})).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// NDJSON feed of runtime snapshots: the current state immediately, then one
/// line per completed poll cycle until the panel is removed.
pub async fn stream_panel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let Some(rx) = state.panels.subscribe(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let lines = WatchStream::new(rx).filter_map(|snapshot| async move {
        let view = PanelStateView::from(snapshot);
        match serde_json::to_vec(&view) {
            Ok(mut line) => {
                line.push(b'\n');
                Some(Ok::<Bytes, Infallible>(Bytes::from(line)))
            }
            Err(err) => {
                tracing::error!("failed to encode panel snapshot: {err}");
                None
            }
        }
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(lines))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
