// Normalizers - one pure function per panel source kind
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::sample::{round2, MetricSample, MonitorStatus, UptimeRecord};
use crate::infrastructure::upstream::{
    ContainerStats, DropletMetrics, HeartbeatResponse, StatusPageData,
};

/// Join the status-page monitor list with the heartbeat feed: one record per
/// monitor, status taken from the most recent heartbeat (pending when none
/// exists yet), ratio from the 24h uptime map scaled to a percent.
pub fn combine_uptime(page: &StatusPageData, beats: &HeartbeatResponse) -> Vec<UptimeRecord> {
    page.public_group_list
        .iter()
        .flat_map(|group| &group.monitor_list)
        .map(|monitor| {
            let ratio_key = format!("{}_24", monitor.id);
            let ratio = beats.uptime_list.get(&ratio_key).copied().unwrap_or(0.0) * 100.0;

            let latest = beats
                .heartbeat_list
                .get(&monitor.id.to_string())
                .and_then(|history| history.last());
            let status = match latest {
                Some(beat) if beat.status == 1 => MonitorStatus::Up,
                Some(beat) if beat.status == 0 => MonitorStatus::Down,
                _ => MonitorStatus::Pending,
            };

            UptimeRecord {
                monitor_id: monitor.id,
                name: monitor.name.clone(),
                status,
                uptime_ratio: round2(ratio),
            }
        })
        .collect()
}

/// CPU percent from the delta between the snapshot's current and previous
/// counters, scaled by the online CPU count. Inconsistent upstream counters
/// can push this past 100; the value is kept unclamped. Memory is MB.
pub fn container_sample(stats: &ContainerStats, at: DateTime<Utc>) -> MetricSample {
    let cpu_delta = stats.cpu_stats.cpu_usage.total_usage - stats.precpu_stats.cpu_usage.total_usage;
    let system_delta = stats.cpu_stats.system_cpu_usage - stats.precpu_stats.system_cpu_usage;
    let cpus = f64::from(stats.cpu_stats.online_cpus.unwrap_or(1));

    let cpu = if system_delta > 0.0 && cpu_delta > 0.0 {
        (cpu_delta / system_delta) * cpus * 100.0
    } else {
        0.0
    };

    MetricSample {
        time: at,
        cpu: round2(cpu),
        memory: round2(stats.memory_stats.usage / (1024.0 * 1024.0)),
        disk: None,
    }
}

/// CPU percent from per-mode counter series: sum the last two samples across
/// modes and take `(totalDelta - idleDelta) / totalDelta`, clamped to [0,100].
/// Any mode with fewer than two samples means insufficient data, which is 0.
pub fn cloud_cpu_percent(metrics: Option<&DropletMetrics>) -> f64 {
    let Some(result) = metrics.map(|m| &m.data.result) else {
        return 0.0;
    };
    if result.is_empty() {
        return 0.0;
    }

    let mut last: HashMap<String, f64> = HashMap::new();
    let mut prev: HashMap<String, f64> = HashMap::new();
    for series in result {
        let n = series.values.len();
        if n < 2 {
            return 0.0;
        }
        let (Some(last_value), Some(prev_value)) =
            (series.values[n - 1].value(), series.values[n - 2].value())
        else {
            return 0.0;
        };
        let mode = series.metric.get("mode").cloned().unwrap_or_default();
        last.insert(mode.clone(), last_value);
        prev.insert(mode, prev_value);
    }

    let total_delta: f64 = last.values().sum::<f64>() - prev.values().sum::<f64>();
    let idle_delta =
        last.get("idle").copied().unwrap_or(0.0) - prev.get("idle").copied().unwrap_or(0.0);

    if total_delta > 0.0 {
        (100.0 * (total_delta - idle_delta) / total_delta).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// `100 * (1 - remainder/total)` from the latest sample of two parallel
/// series. Either series missing or empty means 0.
pub fn cloud_ratio_percent(
    total: Option<&DropletMetrics>,
    remainder: Option<&DropletMetrics>,
) -> f64 {
    let (Some(total), Some(remainder)) = (total.and_then(latest_value), remainder.and_then(latest_value))
    else {
        return 0.0;
    };
    if total > 0.0 {
        100.0 * (1.0 - remainder / total)
    } else {
        0.0
    }
}

fn latest_value(metrics: &DropletMetrics) -> Option<f64> {
    metrics.data.result.first()?.values.last()?.value()
}

/// Assemble one cloud sample from the five metric responses. A missing series
/// degrades that metric to 0 rather than failing the panel.
pub fn cloud_sample(
    cpu: Option<&DropletMetrics>,
    memory_total: Option<&DropletMetrics>,
    memory_available: Option<&DropletMetrics>,
    disk_total: Option<&DropletMetrics>,
    disk_free: Option<&DropletMetrics>,
    at: DateTime<Utc>,
) -> MetricSample {
    MetricSample {
        time: at,
        cpu: round2(cloud_cpu_percent(cpu)),
        memory: round2(cloud_ratio_percent(memory_total, memory_available)),
        disk: Some(round2(cloud_ratio_percent(disk_total, disk_free))),
    }
}
