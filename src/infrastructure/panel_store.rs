// JSON-file panel store - the client-local storage analog
use anyhow::Context;
use std::fs;
use std::path::PathBuf;

use crate::application::panel_store::PanelStore;
use crate::domain::panel::PanelConfig;

/// The whole panel list lives under one file, read at startup and rewritten
/// wholesale on every mutation. Single-writer by design; concurrent-process
/// write races are an accepted limitation.
#[derive(Debug, Clone)]
pub struct JsonPanelStore {
    path: PathBuf,
}

impl JsonPanelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PanelStore for JsonPanelStore {
    fn load(&self) -> anyhow::Result<Vec<PanelConfig>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading panel list from {}", self.path.display()))?;
        let panels = serde_json::from_str(&raw)
            .with_context(|| format!("parsing panel list in {}", self.path.display()))?;
        Ok(panels)
    }

    fn save(&self, panels: &[PanelConfig]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(panels)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing panel list to {}", self.path.display()))?;
        Ok(())
    }
}
