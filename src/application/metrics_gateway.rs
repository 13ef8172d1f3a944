// Gateway trait over the three upstream services
use async_trait::async_trait;
use thiserror::Error;

use crate::infrastructure::upstream::{
    ContainerStats, DropletMetrics, HeartbeatResponse, StatusPageData,
};

/// Failure taxonomy for one upstream fetch. `Partial` never fails a panel on
/// its own; the collector degrades the affected metric to zero and logs it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("upstream returned {0}")]
    Upstream(String),
    #[error("unexpected response shape: {0}")]
    Parse(String),
    #[error("partial data: {0}")]
    Partial(String),
}

/// Named droplet metrics the cloud panel pulls in parallel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropletMetric {
    Cpu,
    MemoryTotal,
    MemoryAvailable,
    FilesystemSize,
    FilesystemFree,
}

impl DropletMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropletMetric::Cpu => "cpu",
            DropletMetric::MemoryTotal => "memory_total",
            DropletMetric::MemoryAvailable => "memory_available",
            DropletMetric::FilesystemSize => "filesystem_size",
            DropletMetric::FilesystemFree => "filesystem_free",
        }
    }
}

#[async_trait]
pub trait MetricsGateway: Send + Sync {
    /// Status-page summary: groups of public monitors.
    async fn status_page(&self, slug: &str) -> Result<StatusPageData, FetchError>;

    /// Heartbeat history and rolling uptime ratios for one status page.
    async fn heartbeats(&self, slug: &str) -> Result<HeartbeatResponse, FetchError>;

    /// One stats snapshot for a container, current plus previous counters.
    async fn container_stats(&self, container_id: &str) -> Result<ContainerStats, FetchError>;

    /// One named droplet metric over the `[start, end]` window (unix seconds).
    async fn droplet_metric(
        &self,
        metric: DropletMetric,
        host_id: &str,
        start: i64,
        end: i64,
    ) -> Result<DropletMetrics, FetchError>;
}
