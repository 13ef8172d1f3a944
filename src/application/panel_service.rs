// Panel service - CRUD over the persisted list, bound to poller lifecycle
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use crate::application::metrics_gateway::MetricsGateway;
use crate::application::panel_store::PanelStore;
use crate::application::poller::PanelPoller;
use crate::domain::panel::{default_panels, PanelConfig, PanelDraft};
use crate::domain::runtime::PanelRuntime;

/// Owns the panel list and one poller per panel. Adding a panel persists it
/// and starts its poller; removing it persists the shrunken list and stops
/// the poller.
pub struct PanelService {
    store: Arc<dyn PanelStore>,
    gateway: Arc<dyn MetricsGateway>,
    panels: Mutex<Vec<PanelConfig>>,
    pollers: Mutex<HashMap<String, PanelPoller>>,
}

impl PanelService {
    pub fn new(store: Arc<dyn PanelStore>, gateway: Arc<dyn MetricsGateway>) -> Self {
        Self {
            store,
            gateway,
            panels: Mutex::new(Vec::new()),
            pollers: Mutex::new(HashMap::new()),
        }
    }

    /// Load the saved list (seeding defaults on first start) and spawn one
    /// poller per panel. Must run inside the tokio runtime.
    pub fn start(&self) -> anyhow::Result<()> {
        let mut panels = self.store.load()?;
        if panels.is_empty() {
            panels = default_panels();
            self.store.save(&panels)?;
            tracing::info!("seeded {} default panels", panels.len());
        }

        let mut pollers = self.pollers.lock().expect("poller lock");
        for panel in &panels {
            pollers.insert(
                panel.id.clone(),
                PanelPoller::spawn(self.gateway.clone(), panel.clone()),
            );
        }
        drop(pollers);

        tracing::info!("monitoring {} panels", panels.len());
        *self.panels.lock().expect("panel lock") = panels;
        Ok(())
    }

    pub fn list(&self) -> Vec<PanelConfig> {
        self.panels.lock().expect("panel lock").clone()
    }

    pub fn add(&self, draft: PanelDraft) -> anyhow::Result<PanelConfig> {
        let panel = draft.into_config(PanelConfig::mint_id());

        // Persist first; memory only changes once the save went through.
        let mut panels = self.panels.lock().expect("panel lock");
        let mut next = panels.clone();
        next.push(panel.clone());
        self.store.save(&next)?;
        *panels = next;
        drop(panels);

        self.pollers.lock().expect("poller lock").insert(
            panel.id.clone(),
            PanelPoller::spawn(self.gateway.clone(), panel.clone()),
        );

        tracing::info!(panel = %panel.id, kind = panel.source.kind(), "panel added");
        Ok(panel)
    }

    /// Returns false when no panel carries the id.
    pub fn remove(&self, id: &str) -> anyhow::Result<bool> {
        let mut panels = self.panels.lock().expect("panel lock");
        let next: Vec<PanelConfig> = panels.iter().filter(|p| p.id != id).cloned().collect();
        if next.len() == panels.len() {
            return Ok(false);
        }
        self.store.save(&next)?;
        *panels = next;
        drop(panels);

        if let Some(poller) = self.pollers.lock().expect("poller lock").remove(id) {
            poller.stop();
        }
        tracing::info!(panel = %id, "panel removed");
        Ok(true)
    }

    pub fn snapshot(&self, id: &str) -> Option<PanelRuntime> {
        self.pollers
            .lock()
            .expect("poller lock")
            .get(id)
            .map(PanelPoller::snapshot)
    }

    pub fn subscribe(&self, id: &str) -> Option<watch::Receiver<PanelRuntime>> {
        self.pollers
            .lock()
            .expect("poller lock")
            .get(id)
            .map(PanelPoller::subscribe)
    }

    pub fn refresh(&self, id: &str) -> bool {
        match self.pollers.lock().expect("poller lock").get(id) {
            Some(poller) => {
                poller.refresh();
                true
            }
            None => false,
        }
    }

    pub fn toggle_fullscreen(&self, id: &str) -> Option<bool> {
        self.pollers
            .lock()
            .expect("poller lock")
            .get(id)
            .map(PanelPoller::toggle_fullscreen)
    }
}
