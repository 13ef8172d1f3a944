// Panel configuration models
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tagged source union: one variant per panel kind, carrying the
/// type-specific upstream reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum PanelSource {
    Uptime { status_page_slug: String },
    Container { container_id: String },
    CloudMetrics { host_id: String },
}

impl PanelSource {
    pub fn kind(&self) -> &'static str {
        match self {
            PanelSource::Uptime { .. } => "uptime",
            PanelSource::Container { .. } => "container",
            PanelSource::CloudMetrics { .. } => "cloud-metrics",
        }
    }

    /// Container stats change fast; cloud metrics are coarse, so poll less often.
    pub fn poll_interval(&self) -> Duration {
        match self {
            PanelSource::CloudMetrics { .. } => Duration::from_secs(60),
            _ => Duration::from_secs(30),
        }
    }

    /// Whether this source feeds the rolling time series (uptime panels hold
    /// a flat snapshot instead).
    pub fn is_series(&self) -> bool {
        !matches!(self, PanelSource::Uptime { .. })
    }

    pub fn source_ref(&self) -> &str {
        match self {
            PanelSource::Uptime { status_page_slug } => status_page_slug,
            PanelSource::Container { container_id } => container_id,
            PanelSource::CloudMetrics { host_id } => host_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IconKind {
    #[default]
    Monitor,
    Server,
    Activity,
    Database,
    Smartphone,
    Cloud,
    Wifi,
    HardDrive,
    BarChart3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: IconKind,
    #[serde(flatten)]
    pub source: PanelSource,
}

impl PanelConfig {
    /// Ids are minted from the creation instant and never change afterwards.
    pub fn mint_id() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

/// A panel as submitted through the add-panel form, before an id is assigned.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: IconKind,
    #[serde(flatten)]
    pub source: PanelSource,
}

impl PanelDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.source.source_ref().trim().is_empty() {
            return Err(format!(
                "{} panels need a source reference",
                self.source.kind()
            ));
        }
        Ok(())
    }

    pub fn into_config(self, id: String) -> PanelConfig {
        PanelConfig {
            id,
            title: self.title,
            description: self.description,
            icon: self.icon,
            source: self.source,
        }
    }
}

/// Panels seeded on first start, before the user has added any.
pub fn default_panels() -> Vec<PanelConfig> {
    vec![PanelConfig {
        id: "1".to_string(),
        title: "Service Uptime".to_string(),
        description: "Availability of monitored services".to_string(),
        icon: IconKind::Monitor,
        source: PanelSource::Uptime {
            status_page_slug: "default".to_string(),
        },
    }]
}
