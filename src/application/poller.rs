// Per-panel poll loop: fixed cadence, manual refresh, stop lifecycle
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use crate::application::collector::{collect, PollOutcome};
use crate::application::metrics_gateway::MetricsGateway;
use crate::domain::panel::PanelConfig;
use crate::domain::runtime::{PanelData, PanelRuntime};

/// Owns the fetch cadence for one panel. The loop runs Fetching cycles on a
/// fixed interval per source kind; a manual refresh forces an immediate cycle
/// without resetting the interval's own schedule. One cycle is in flight at a
/// time; a manual refresh while a poll is running is dropped.
pub struct PanelPoller {
    alive: Arc<AtomicBool>,
    in_flight: Arc<AtomicBool>,
    manual: Arc<AtomicBool>,
    wake: Arc<Notify>,
    fullscreen: Arc<AtomicBool>,
    state: watch::Receiver<PanelRuntime>,
    _handle: JoinHandle<()>,
}

impl PanelPoller {
    pub fn spawn(gateway: Arc<dyn MetricsGateway>, panel: PanelConfig) -> Self {
        let alive = Arc::new(AtomicBool::new(true));
        let in_flight = Arc::new(AtomicBool::new(false));
        let manual = Arc::new(AtomicBool::new(false));
        let wake = Arc::new(Notify::new());
        let fullscreen = Arc::new(AtomicBool::new(false));
        let (tx, rx) = watch::channel(PanelRuntime::new(panel.source.is_series()));

        let handle = tokio::spawn(run(
            gateway,
            panel,
            alive.clone(),
            in_flight.clone(),
            manual.clone(),
            wake.clone(),
            fullscreen.clone(),
            tx,
        ));

        Self {
            alive,
            in_flight,
            manual,
            wake,
            fullscreen,
            state: rx,
            _handle: handle,
        }
    }

    /// Trigger an immediate fetch. Dropped when a poll is already in flight.
    pub fn refresh(&self) {
        if self.in_flight.load(Ordering::SeqCst) {
            tracing::debug!("manual refresh dropped, poll already in flight");
            return;
        }
        self.manual.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Stop scheduling further fetches. An in-flight fetch finishes on its
    /// own; the liveness flag keeps it from touching state afterwards.
    pub fn stop(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.wake.notify_one();
    }

    pub fn toggle_fullscreen(&self) -> bool {
        let next = !self.fullscreen.load(Ordering::SeqCst);
        self.fullscreen.store(next, Ordering::SeqCst);
        next
    }

    pub fn snapshot(&self) -> PanelRuntime {
        let mut snapshot = self.state.borrow().clone();
        snapshot.fullscreen = self.fullscreen.load(Ordering::SeqCst);
        snapshot
    }

    pub fn subscribe(&self) -> watch::Receiver<PanelRuntime> {
        self.state.clone()
    }
}

#[allow(clippy::too_many_arguments)]
async fn run(
    gateway: Arc<dyn MetricsGateway>,
    panel: PanelConfig,
    alive: Arc<AtomicBool>,
    in_flight: Arc<AtomicBool>,
    manual: Arc<AtomicBool>,
    wake: Arc<Notify>,
    fullscreen: Arc<AtomicBool>,
    tx: watch::Sender<PanelRuntime>,
) {
    let mut state = PanelRuntime::new(panel.source.is_series());
    // The first tick fires immediately: spawn transitions straight to Fetching.
    let mut ticker = tokio::time::interval(panel.source.poll_interval());

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = wake.notified() => {}
        }
        if !alive.load(Ordering::SeqCst) {
            break;
        }

        let manual_cycle = manual.swap(false, Ordering::SeqCst);
        in_flight.store(true, Ordering::SeqCst);

        // The spinner shows on the initial load and on manual refresh; timer
        // cycles keep the current view visible while fetching.
        if manual_cycle || state.data.is_empty() {
            state.is_loading = true;
            publish(&tx, &state, &fullscreen);
        }

        let result = collect(gateway.as_ref(), &panel.source).await;
        in_flight.store(false, Ordering::SeqCst);
        if !alive.load(Ordering::SeqCst) {
            // The fetch raced with stop(); its completion must not mutate state.
            break;
        }

        match result {
            Ok(PollOutcome::Series(sample)) => {
                if let PanelData::Series(buffer) = &mut state.data {
                    buffer.push(sample);
                }
                state.has_error = false;
                state.error_message = None;
            }
            Ok(PollOutcome::Uptime(records)) => {
                state.data = PanelData::Uptime(records);
                state.has_error = false;
                state.error_message = None;
            }
            Err(err) => {
                tracing::warn!(panel = %panel.id, "poll failed: {err}");
                // Buffer stays as-is: stale data beats a blank panel.
                state.has_error = true;
                state.error_message = Some(err.to_string());
            }
        }
        state.is_loading = false;
        publish(&tx, &state, &fullscreen);
    }

    tracing::debug!(panel = %panel.id, "poller stopped");
}

fn publish(tx: &watch::Sender<PanelRuntime>, state: &PanelRuntime, fullscreen: &AtomicBool) {
    let mut snapshot = state.clone();
    snapshot.fullscreen = fullscreen.load(Ordering::SeqCst);
    let _ = tx.send(snapshot);
}
