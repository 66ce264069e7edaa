use super::SettingsStore;
use crate::error::{QuickWrapError, Result};
use crate::model::QuickWrapperSettings;

/// In-memory storage for testing and development.
/// Does NOT persist data.
///
/// The document is kept as raw JSON so tests can seed partial or corrupt
/// content exactly as it would sit on disk.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    raw: Option<String>,
    simulate_write_error: bool,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    /// The last document written, parsed back.
    pub fn saved(&self) -> Option<QuickWrapperSettings> {
        self.raw
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SettingsStore for InMemoryStore {
    fn load(&self) -> Result<Option<QuickWrapperSettings>> {
        match &self.raw {
            None => Ok(None),
            Some(raw) => Ok(Some(
                serde_json::from_str(raw).map_err(QuickWrapError::Serialization)?,
            )),
        }
    }

    fn save(&mut self, settings: &QuickWrapperSettings) -> Result<()> {
        if self.simulate_write_error {
            return Err(QuickWrapError::Store("Simulated write error".to_string()));
        }
        self.raw = Some(serde_json::to_string(settings).map_err(QuickWrapError::Serialization)?);
        self.saves += 1;
        Ok(())
    }
}
