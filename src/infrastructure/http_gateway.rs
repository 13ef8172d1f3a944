// Reqwest-backed gateway over the three upstream services
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::application::metrics_gateway::{DropletMetric, FetchError, MetricsGateway};
use crate::infrastructure::config::UpstreamsSettings;
use crate::infrastructure::upstream::{
    ContainerStats, DropletMetrics, HeartbeatResponse, StatusPageData,
};

/// One shared client; credentials are injected per upstream, mirroring what
/// the reverse-proxy layer does for browser requests.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    uptime_base: String,
    container_base: String,
    container_key: String,
    endpoint_id: i64,
    cloud_base: String,
    cloud_token: String,
}

impl HttpGateway {
    pub fn new(settings: &UpstreamsSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            uptime_base: settings.uptime.base_url.trim_end_matches('/').to_string(),
            container_base: settings.container.base_url.trim_end_matches('/').to_string(),
            container_key: settings.container.api_key.clone(),
            endpoint_id: settings.container.endpoint_id,
            cloud_base: settings.cloud.base_url.trim_end_matches('/').to_string(),
            cloud_token: settings.cloud.token.clone(),
        }
    }

    fn container_stats_url(&self, container_id: &str) -> String {
        format!(
            "{}/api/endpoints/{}/docker/containers/{}/stats?stream=false",
            self.container_base, self.endpoint_id, container_id
        )
    }

    fn droplet_metric_url(
        &self,
        metric: DropletMetric,
        host_id: &str,
        start: i64,
        end: i64,
    ) -> String {
        format!(
            "{}/v2/monitoring/metrics/droplet/{}?host_id={}&start={}&end={}",
            self.cloud_base,
            metric.as_str(),
            host_id,
            start,
            end
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        headers: &[(&'static str, String)],
    ) -> Result<T, FetchError> {
        let mut request = self.client.get(&url);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream(status.to_string()));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| FetchError::Parse(err.to_string()))
    }
}

#[async_trait]
impl MetricsGateway for HttpGateway {
    async fn status_page(&self, slug: &str) -> Result<StatusPageData, FetchError> {
        let url = format!("{}/api/status-page/{}", self.uptime_base, slug);
        self.get_json(url, &[]).await
    }

    async fn heartbeats(&self, slug: &str) -> Result<HeartbeatResponse, FetchError> {
        let url = format!("{}/api/status-page/heartbeat/{}", self.uptime_base, slug);
        self.get_json(url, &[]).await
    }

    async fn container_stats(&self, container_id: &str) -> Result<ContainerStats, FetchError> {
        let url = self.container_stats_url(container_id);
        self.get_json(url, &[("X-API-Key", self.container_key.clone())])
            .await
    }

    async fn droplet_metric(
        &self,
        metric: DropletMetric,
        host_id: &str,
        start: i64,
        end: i64,
    ) -> Result<DropletMetrics, FetchError> {
        let url = self.droplet_metric_url(metric, host_id, start, end);
        self.get_json(url, &[("Authorization", format!("Bearer {}", self.cloud_token))])
            .await
    }
}
