// One poll cycle for one panel
use chrono::Utc;
use std::time::Duration;
use tokio::time::timeout;

use crate::application::metrics_gateway::{DropletMetric, FetchError, MetricsGateway};
use crate::application::normalizer::{cloud_sample, combine_uptime, container_sample};
use crate::domain::panel::PanelSource;
use crate::domain::sample::{MetricSample, UptimeRecord};
use crate::infrastructure::upstream::DropletMetrics;

/// Cloud metrics are queried over the trailing hour.
const CLOUD_WINDOW_SECS: i64 = 3600;
/// Bounded wait per cloud sub-fetch; the other sources have no timeout.
const CLOUD_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// What one successful poll produced: a sample to append, or a full
/// replacement snapshot for uptime panels.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    Series(MetricSample),
    Uptime(Vec<UptimeRecord>),
}

/// Fetch and normalize one cycle for the given source. Errors are returned to
/// the poller; partial cloud data is degraded here and never surfaces as an
/// error.
pub async fn collect(
    gateway: &dyn MetricsGateway,
    source: &PanelSource,
) -> Result<PollOutcome, FetchError> {
    match source {
        PanelSource::Uptime { status_page_slug } => {
            let (page, beats) = futures::try_join!(
                gateway.status_page(status_page_slug),
                gateway.heartbeats(status_page_slug)
            )?;
            Ok(PollOutcome::Uptime(combine_uptime(&page, &beats)))
        }
        PanelSource::Container { container_id } => {
            let stats = gateway.container_stats(container_id).await?;
            Ok(PollOutcome::Series(container_sample(&stats, Utc::now())))
        }
        PanelSource::CloudMetrics { host_id } => {
            let end = Utc::now().timestamp();
            let start = end - CLOUD_WINDOW_SECS;

            let (cpu, memory_total, memory_available, disk_total, disk_free) = futures::join!(
                bounded_fetch(gateway, DropletMetric::Cpu, host_id, start, end),
                bounded_fetch(gateway, DropletMetric::MemoryTotal, host_id, start, end),
                bounded_fetch(gateway, DropletMetric::MemoryAvailable, host_id, start, end),
                bounded_fetch(gateway, DropletMetric::FilesystemSize, host_id, start, end),
                bounded_fetch(gateway, DropletMetric::FilesystemFree, host_id, start, end),
            );

            Ok(PollOutcome::Series(cloud_sample(
                cpu.as_ref(),
                memory_total.as_ref(),
                memory_available.as_ref(),
                disk_total.as_ref(),
                disk_free.as_ref(),
                Utc::now(),
            )))
        }
    }
}

async fn bounded_fetch(
    gateway: &dyn MetricsGateway,
    metric: DropletMetric,
    host_id: &str,
    start: i64,
    end: i64,
) -> Option<DropletMetrics> {
    match timeout(
        CLOUD_FETCH_TIMEOUT,
        gateway.droplet_metric(metric, host_id, start, end),
    )
    .await
    {
        Ok(Ok(metrics)) => Some(metrics),
        Ok(Err(err)) => {
            let degraded = FetchError::Partial(format!("{}: {}", metric.as_str(), err));
            tracing::warn!("degrading cloud metric to zero: {degraded}");
            None
        }
        Err(_) => {
            tracing::warn!("cloud metric {} timed out, degrading to zero", metric.as_str());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        container_stats_fixture, droplet_metrics_fixture, heartbeats_fixture,
        status_page_fixture, StubGateway,
    };
    use crate::domain::sample::MonitorStatus;

    #[tokio::test]
    async fn container_poll_yields_one_sample() {
        let gateway = StubGateway::new();
        gateway.push_stats(Ok(container_stats_fixture(
            200.0,
            100.0,
            1000.0,
            800.0,
            Some(2),
            64.0 * 1024.0 * 1024.0,
        )));

        let source = PanelSource::Container {
            container_id: "abc".to_string(),
        };
        let outcome = collect(&gateway, &source).await.expect("poll");
        match outcome {
            PollOutcome::Series(sample) => {
                assert_eq!(sample.cpu, 100.0);
                assert_eq!(sample.memory, 64.0);
            }
            PollOutcome::Uptime(_) => panic!("expected a series sample"),
        }
    }

    #[tokio::test]
    async fn uptime_poll_replaces_the_whole_snapshot() {
        let gateway = StubGateway::new();
        gateway.push_page(Ok(status_page_fixture(&[(1, "Web")])));
        gateway.push_beats(Ok(heartbeats_fixture(&[("1", &[1])], &[("1_24", 1.0)])));

        let source = PanelSource::Uptime {
            status_page_slug: "main".to_string(),
        };
        let outcome = collect(&gateway, &source).await.expect("poll");
        match outcome {
            PollOutcome::Uptime(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].status, MonitorStatus::Up);
                assert_eq!(records[0].uptime_ratio, 100.0);
            }
            PollOutcome::Series(_) => panic!("expected an uptime snapshot"),
        }
    }

    #[tokio::test]
    async fn uptime_poll_propagates_upstream_failure() {
        let gateway = StubGateway::new();
        gateway.push_page(Ok(status_page_fixture(&[(1, "Web")])));
        gateway.push_beats(Err(FetchError::Upstream("502 Bad Gateway".to_string())));

        let source = PanelSource::Uptime {
            status_page_slug: "main".to_string(),
        };
        let err = collect(&gateway, &source).await.expect_err("must fail");
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn cloud_poll_combines_all_five_metrics() {
        let gateway = StubGateway::new();
        // Responses are consumed in fetch order: cpu, memory total/available,
        // filesystem size/free.
        gateway.push_droplet(Ok(droplet_metrics_fixture(&[
            ("idle", &[(0.0, 100.0), (10.0, 150.0)]),
            ("user", &[(0.0, 50.0), (10.0, 100.0)]),
        ])));
        gateway.push_droplet(Ok(droplet_metrics_fixture(&[("", &[(10.0, 4096.0)])])));
        gateway.push_droplet(Ok(droplet_metrics_fixture(&[("", &[(10.0, 1024.0)])])));
        gateway.push_droplet(Ok(droplet_metrics_fixture(&[("", &[(10.0, 100.0)])])));
        gateway.push_droplet(Ok(droplet_metrics_fixture(&[("", &[(10.0, 40.0)])])));

        let source = PanelSource::CloudMetrics {
            host_id: "9".to_string(),
        };
        let outcome = collect(&gateway, &source).await.expect("poll");
        match outcome {
            PollOutcome::Series(sample) => {
                // Busy share: 100 * (100 - 50) / 100 over the counter deltas.
                assert_eq!(sample.cpu, 50.0);
                // 100 * (1 - 1024 / 4096).
                assert_eq!(sample.memory, 75.0);
                // 100 * (1 - 40 / 100).
                assert_eq!(sample.disk, Some(60.0));
            }
            PollOutcome::Uptime(_) => panic!("expected a series sample"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cloud_poll_degrades_missing_series_to_zero() {
        // Every sub-fetch fails; the panel still gets a sample.
        let gateway = StubGateway::new();
        let source = PanelSource::CloudMetrics {
            host_id: "9".to_string(),
        };
        let outcome = collect(&gateway, &source).await.expect("poll");
        match outcome {
            PollOutcome::Series(sample) => {
                assert_eq!(sample.cpu, 0.0);
                assert_eq!(sample.memory, 0.0);
                assert_eq!(sample.disk, Some(0.0));
            }
            PollOutcome::Uptime(_) => panic!("expected a series sample"),
        }
    }
}
