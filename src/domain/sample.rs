// Canonical sample models and the rolling window
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Chart window: the ten most recent samples.
pub const ROLLING_CAPACITY: usize = 10;

/// Derived percentages are stored with two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One normalized poll result for a time-series panel. `memory` is a percent
/// for cloud panels and MB for container panels; `disk` only exists for cloud
/// panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub time: DateTime<Utc>,
    pub cpu: f64,
    pub memory: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    Up,
    Down,
    Pending,
}

/// Current state of one uptime monitor. Replaced wholesale every poll,
/// no history kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeRecord {
    pub monitor_id: i64,
    pub name: String,
    pub status: MonitorStatus,
    pub uptime_ratio: f64,
}

/// Fixed-capacity FIFO series: push appends, the oldest sample is evicted
/// once the window is full.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RollingBuffer {
    samples: Vec<MetricSample>,
}

impl RollingBuffer {
    pub fn push(&mut self, sample: MetricSample) {
        if self.samples.len() >= ROLLING_CAPACITY {
            let excess = self.samples.len() - (ROLLING_CAPACITY - 1);
            self.samples.drain(..excess);
        }
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&MetricSample> {
        self.samples.last()
    }

    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }
}
