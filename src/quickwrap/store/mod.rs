//! # Settings Storage
//!
//! The [`SettingsStore`] trait is the persistence boundary for
//! [`QuickWrapperSettings`]. The core only ever loads the whole document and
//! writes it back after each mutation.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: `data.json` in the data directory, written atomically.
//! - [`memory::InMemoryStore`]: keeps the raw JSON in memory, for tests.
//!
//! ## Loading Rules
//!
//! [`load_settings`] applies the recovery policy on top of a store:
//!
//! 1. **Absent**: nothing stored yet, so defaults are written and returned.
//! 2. **Partial**: missing fields fall back to `{quickTags: [], nextId: 1}`.
//! 3. **Corrupt**: unparsable content is treated as absent and overwritten.
//! 4. **Inconsistent**: a `nextId` that does not clear every stored id is raised.

use crate::error::{QuickWrapError, Result};
use crate::model::QuickWrapperSettings;

pub mod fs;
pub mod memory;

pub trait SettingsStore {
    /// Load the stored settings, `Ok(None)` if nothing has been stored yet.
    fn load(&self) -> Result<Option<QuickWrapperSettings>>;

    /// Replace the stored settings.
    fn save(&mut self, settings: &QuickWrapperSettings) -> Result<()>;
}

/// Load settings, writing defaults on first run and recovering from corrupt data.
pub fn load_settings<S: SettingsStore>(store: &mut S) -> Result<QuickWrapperSettings> {
    match store.load() {
        Ok(Some(mut settings)) => match settings.repair_next_id() {
            Ok(true) => {
                log::warn!(
                    "Stored nextId was behind existing tags, raised to {}",
                    settings.next_id
                );
                store.save(&settings)?;
                Ok(settings)
            }
            Ok(false) => Ok(settings),
            Err(e) => replace_with_defaults(store, &e),
        },
        Ok(None) => {
            log::info!("No stored settings, writing defaults");
            let settings = QuickWrapperSettings::default();
            store.save(&settings)?;
            Ok(settings)
        }
        Err(e @ QuickWrapError::Serialization(_)) => replace_with_defaults(store, &e),
        Err(e) => Err(e),
    }
}

fn replace_with_defaults<S: SettingsStore>(
    store: &mut S,
    cause: &QuickWrapError,
) -> Result<QuickWrapperSettings> {
    log::warn!("Stored settings are corrupt ({}), replacing with defaults", cause);
    let settings = QuickWrapperSettings::default();
    store.save(&settings)?;
    Ok(settings)
}
