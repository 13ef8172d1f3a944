// Persisted panel-list contract
use crate::domain::panel::PanelConfig;

/// Load/save contract for the ordered panel list. The list is read once at
/// startup and rewritten wholesale on every mutation; there is no partial
/// update.
pub trait PanelStore: Send + Sync {
    /// The saved list in insertion order; an absent store yields an empty list.
    fn load(&self) -> anyhow::Result<Vec<PanelConfig>>;

    /// Replace the whole saved list.
    fn save(&self, panels: &[PanelConfig]) -> anyhow::Result<()>;
}
