// Test support: scripted gateway and upstream payload fixtures
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::application::metrics_gateway::{DropletMetric, FetchError, MetricsGateway};
use crate::infrastructure::upstream::{
    ContainerStats, DropletMetrics, HeartbeatResponse, StatusPageData,
};

/// Gateway that replays scripted responses in order. An exhausted script
/// answers with a network error, so tests fail loudly instead of hanging.
pub struct StubGateway {
    pages: Mutex<VecDeque<Result<StatusPageData, FetchError>>>,
    beats: Mutex<VecDeque<Result<HeartbeatResponse, FetchError>>>,
    stats: Mutex<VecDeque<Result<ContainerStats, FetchError>>>,
    droplets: Mutex<VecDeque<Result<DropletMetrics, FetchError>>>,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl StubGateway {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(VecDeque::new()),
            beats: Mutex::new(VecDeque::new()),
            stats: Mutex::new(VecDeque::new()),
            droplets: Mutex::new(VecDeque::new()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        let mut stub = Self::new();
        stub.delay = delay;
        stub
    }

    pub fn push_page(&self, response: Result<StatusPageData, FetchError>) {
        self.pages.lock().expect("stub lock").push_back(response);
    }

    pub fn push_beats(&self, response: Result<HeartbeatResponse, FetchError>) {
        self.beats.lock().expect("stub lock").push_back(response);
    }

    pub fn push_stats(&self, response: Result<ContainerStats, FetchError>) {
        self.stats.lock().expect("stub lock").push_back(response);
    }

    pub fn push_droplet(&self, response: Result<DropletMetrics, FetchError>) {
        self.droplets.lock().expect("stub lock").push_back(response);
    }

    async fn answer<T>(&self, queue: &Mutex<VecDeque<Result<T, FetchError>>>) -> Result<T, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        queue
            .lock()
            .expect("stub lock")
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("no scripted response".to_string())))
    }
}

#[async_trait]
impl MetricsGateway for StubGateway {
    async fn status_page(&self, _slug: &str) -> Result<StatusPageData, FetchError> {
        self.answer(&self.pages).await
    }

    async fn heartbeats(&self, _slug: &str) -> Result<HeartbeatResponse, FetchError> {
        self.answer(&self.beats).await
    }

    async fn container_stats(&self, _container_id: &str) -> Result<ContainerStats, FetchError> {
        self.answer(&self.stats).await
    }

    async fn droplet_metric(
        &self,
        _metric: DropletMetric,
        _host_id: &str,
        _start: i64,
        _end: i64,
    ) -> Result<DropletMetrics, FetchError> {
        self.answer(&self.droplets).await
    }
}

pub fn status_page_fixture(monitors: &[(i64, &str)]) -> StatusPageData {
    let list: Vec<_> = monitors
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();
    serde_json::from_value(json!({
        "publicGroupList": [{"name": "Services", "monitorList": list}]
    }))
    .expect("status page fixture")
}

pub fn heartbeats_fixture(
    beats: &[(&str, &[i32])],
    ratios: &[(&str, f64)],
) -> HeartbeatResponse {
    let heartbeat_list: serde_json::Map<String, serde_json::Value> = beats
        .iter()
        .map(|(id, codes)| {
            let history: Vec<_> = codes
                .iter()
                .map(|code| json!({"status": code, "time": "", "msg": ""}))
                .collect();
            ((*id).to_string(), json!(history))
        })
        .collect();
    let uptime_list: serde_json::Map<String, serde_json::Value> = ratios
        .iter()
        .map(|(key, ratio)| ((*key).to_string(), json!(ratio)))
        .collect();
    serde_json::from_value(json!({
        "heartbeatList": heartbeat_list,
        "uptimeList": uptime_list
    }))
    .expect("heartbeat fixture")
}

pub fn container_stats_fixture(
    cpu_total: f64,
    precpu_total: f64,
    system: f64,
    presystem: f64,
    online_cpus: Option<u32>,
    memory_bytes: f64,
) -> ContainerStats {
    let mut cpu_stats = json!({
        "cpu_usage": {"total_usage": cpu_total},
        "system_cpu_usage": system
    });
    if let Some(cpus) = online_cpus {
        cpu_stats["online_cpus"] = json!(cpus);
    }
    serde_json::from_value(json!({
        "precpu_stats": {
            "cpu_usage": {"total_usage": precpu_total},
            "system_cpu_usage": presystem
        },
        "cpu_stats": cpu_stats,
        "memory_stats": {"usage": memory_bytes, "limit": 0.0}
    }))
    .expect("container stats fixture")
}

/// Build a droplet metrics payload; an empty mode name omits the label, as
/// the memory and filesystem series do.
pub fn droplet_metrics_fixture(series: &[(&str, &[(f64, f64)])]) -> DropletMetrics {
    let result: Vec<_> = series
        .iter()
        .map(|(mode, values)| {
            let metric = if mode.is_empty() {
                json!({})
            } else {
                json!({"mode": mode})
            };
            let values: Vec<_> = values
                .iter()
                .map(|(ts, value)| json!([ts, value.to_string()]))
                .collect();
            json!({"metric": metric, "values": values})
        })
        .collect();
    serde_json::from_value(json!({"data": {"result": result}})).expect("droplet metrics fixture")
}
