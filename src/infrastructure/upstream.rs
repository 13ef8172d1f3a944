// Wire shapes for the three upstream services
use serde::Deserialize;
use std::collections::HashMap;

// --- Uptime monitor ---

/// `GET status-page/{slug}`: groups of public monitors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPageData {
    #[serde(default)]
    pub public_group_list: Vec<MonitorGroup>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorGroup {
    #[allow(dead_code)]
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub monitor_list: Vec<PublicMonitor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicMonitor {
    pub id: i64,
    pub name: String,
}

/// `GET status-page/heartbeat/{slug}`: recent heartbeats keyed by monitor id
/// and rolling uptime ratios keyed by `"<id>_24"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatResponse {
    #[serde(default)]
    pub heartbeat_list: HashMap<String, Vec<Heartbeat>>,
    #[serde(default)]
    pub uptime_list: HashMap<String, f64>,
}

/// One check result: 0 = down, 1 = up, 2 = pending.
#[derive(Debug, Clone, Deserialize)]
pub struct Heartbeat {
    pub status: i32,
    #[allow(dead_code)]
    #[serde(default)]
    pub time: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub msg: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub ping: Option<f64>,
}

// --- Container manager ---

/// `GET containers/{id}/stats?stream=false`: one snapshot holding the current
/// and previous CPU counters.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerStats {
    pub precpu_stats: CpuStats,
    pub cpu_stats: CpuStats,
    pub memory_stats: MemoryStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CpuStats {
    pub cpu_usage: CpuUsage,
    // Absent on the very first read of a fresh container.
    #[serde(default)]
    pub system_cpu_usage: f64,
    #[serde(default)]
    pub online_cpus: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CpuUsage {
    pub total_usage: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryStats {
    pub usage: f64,
    #[allow(dead_code)]
    #[serde(default)]
    pub limit: f64,
}

// --- Cloud metrics ---

/// `GET monitoring/metrics/droplet/{metric}`: prometheus-style series, one per
/// label set (CPU carries one series per mode).
#[derive(Debug, Clone, Deserialize)]
pub struct DropletMetrics {
    pub data: MetricData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricData {
    #[serde(default)]
    pub result: Vec<MetricSeries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricSeries {
    #[serde(default)]
    pub metric: HashMap<String, String>,
    #[serde(default)]
    pub values: Vec<MetricPoint>,
}

/// `[timestamp, value]` pair; the provider encodes values as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricPoint(#[allow(dead_code)] pub f64, pub serde_json::Value);

impl MetricPoint {
    pub fn value(&self) -> Option<f64> {
        match &self.1 {
            serde_json::Value::String(s) => s.parse().ok(),
            other => other.as_f64(),
        }
    }
}
