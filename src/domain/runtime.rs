// Per-panel runtime state and its view projection
use serde::Serialize;

use super::sample::{RollingBuffer, UptimeRecord};

/// What a panel currently holds: a rolling series for container and cloud
/// panels, a flat monitor snapshot for uptime panels.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "camelCase")]
pub enum PanelData {
    Series(RollingBuffer),
    Uptime(Vec<UptimeRecord>),
}

impl PanelData {
    pub fn is_empty(&self) -> bool {
        match self {
            PanelData::Series(buffer) => buffer.is_empty(),
            PanelData::Uptime(records) => records.is_empty(),
        }
    }
}

/// Non-persisted per-panel state. Created when the panel's poller starts,
/// gone when it stops.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelRuntime {
    pub is_loading: bool,
    pub has_error: bool,
    pub error_message: Option<String>,
    pub fullscreen: bool,
    pub data: PanelData,
}

impl PanelRuntime {
    pub fn new(series: bool) -> Self {
        Self {
            is_loading: true,
            has_error: false,
            error_message: None,
            fullscreen: false,
            data: if series {
                PanelData::Series(RollingBuffer::default())
            } else {
                PanelData::Uptime(Vec::new())
            },
        }
    }

    /// Pure projection to a render mode. An error panel is only shown when no
    /// prior data exists; stale data stays visible with the error surfaced as
    /// a degraded flag. Fullscreen is orthogonal and not part of the mode.
    pub fn render_mode(&self) -> RenderMode {
        if self.data.is_empty() {
            if self.has_error {
                RenderMode::Error
            } else {
                RenderMode::Loading
            }
        } else {
            RenderMode::Ready {
                degraded: self.has_error,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum RenderMode {
    Loading,
    Error,
    Ready { degraded: bool },
}
