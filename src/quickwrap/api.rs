//! # API Facade
//!
//! [`QuickWrapApi`] is the single entry point a host (or the bundled CLI) uses.
//! It owns the loaded settings, the settings store, the host handle and the
//! synchronizer's ownership record, and it sequences them:
//!
//! ```text
//! load ──► sync
//! update ──► apply ──► save ──► sync ──► sync (layout change)
//! ```
//!
//! ## Failure Policy
//!
//! - `load` never fails. If settings cannot be loaded the API comes up
//!   *degraded*: default settings, no commands, mutations refused.
//! - Host failures during synchronization are logged inside [`crate::sync`]
//!   and never reach the caller.
//! - A failed save is returned as an error, but only after commands have been
//!   resynchronized, so the command table always reflects what the user sees.
//!
//! ## Generic Over Store and Host
//!
//! Production: `QuickWrapApi<FileStore, FileHost>`.
//! Testing: `QuickWrapApi<InMemoryStore, MemHost>`.

use crate::commands::{CmdResult, SettingsUpdate, TagField};
use crate::error::{QuickWrapError, Result};
use crate::host::{Editor, Host, Notifier};
use crate::model::{QuickTag, QuickWrapperSettings};
use crate::store::{load_settings, SettingsStore};
use crate::sync::{CommandSync, SyncOptions};
use crate::wrap::WrapOutcome;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiOptions {
    pub sync: SyncOptions,
    /// Resynchronize a second time after each save, as the host's layout-change
    /// notification would.
    pub layout_resync: bool,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            sync: SyncOptions::default(),
            layout_resync: true,
        }
    }
}

impl From<&crate::config::QuickWrapConfig> for ApiOptions {
    fn from(config: &crate::config::QuickWrapConfig) -> Self {
        Self {
            sync: config.sync_options(),
            layout_resync: config.layout_resync,
        }
    }
}

pub struct QuickWrapApi<S: SettingsStore, H: Host> {
    store: S,
    host: H,
    settings: QuickWrapperSettings,
    sync: CommandSync,
    layout_resync: bool,
    degraded: bool,
}

impl<S: SettingsStore, H: Host> QuickWrapApi<S, H> {
    /// Load settings and register the initial command set.
    pub fn load(store: S, host: H, options: ApiOptions) -> Self {
        Self::resume(store, host, options, BTreeSet::new())
    }

    /// Like [`QuickWrapApi::load`], but take over `owned` commands left in the
    /// host by an earlier session before the first pass.
    pub fn resume(mut store: S, host: H, options: ApiOptions, owned: BTreeSet<String>) -> Self {
        let mut sync = CommandSync::with_owned(options.sync, owned);
        let (settings, degraded) = match load_settings(&mut store) {
            Ok(settings) => {
                sync.sync(&settings, &host);
                log::info!(
                    "Loaded {} quick tags, {} commands registered",
                    settings.quick_tags.len(),
                    sync.owned().len()
                );
                (settings, false)
            }
            Err(e) => {
                log::error!("Failed to load quick tag settings, no commands registered: {}", e);
                (QuickWrapperSettings::default(), true)
            }
        };

        Self {
            store,
            host,
            settings,
            sync,
            layout_resync: options.layout_resync,
            degraded,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn settings(&self) -> &QuickWrapperSettings {
        &self.settings
    }

    pub fn tags(&self) -> &[QuickTag] {
        &self.settings.quick_tags
    }

    /// Command ids currently owned by this integration.
    pub fn registered(&self) -> &BTreeSet<String> {
        self.sync.owned()
    }

    pub fn is_registered(&self, tag: &QuickTag) -> bool {
        self.sync.owned().contains(&tag.command_id())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply an update, persist, then resynchronize commands.
    pub fn apply(&mut self, update: SettingsUpdate) -> Result<CmdResult> {
        if self.degraded {
            return Err(QuickWrapError::Api(
                "Settings could not be loaded; refusing to modify them".to_string(),
            ));
        }

        let result = update.apply(&mut self.settings)?;
        let saved = self.store.save(&self.settings);
        self.sync.sync(&self.settings, &self.host);
        if self.layout_resync {
            self.on_layout_change();
        }
        saved?;
        Ok(result)
    }

    pub fn add_tag(&mut self) -> Result<CmdResult> {
        self.apply(SettingsUpdate::AddTag)
    }

    pub fn set_field(&mut self, id: u64, field: TagField, value: String) -> Result<CmdResult> {
        self.apply(SettingsUpdate::SetField { id, field, value })
    }

    pub fn delete_tag(&mut self, id: u64) -> Result<CmdResult> {
        self.apply(SettingsUpdate::DeleteTag { id })
    }

    /// Resynchronize without any settings change. Safe to call repeatedly.
    pub fn on_layout_change(&mut self) {
        if self.degraded {
            return;
        }
        self.sync.sync(&self.settings, &self.host);
    }

    /// Remove every command this integration registered.
    pub fn unload(&mut self) {
        self.sync.clear(&self.host);
    }

    /// Resolve a tag by numeric id, falling back to the first tag with that name.
    pub fn find_tag(&self, selector: &str) -> Result<&QuickTag> {
        if let Ok(id) = selector.parse::<u64>() {
            if let Some(tag) = self.settings.tag(id) {
                return Ok(tag);
            }
        }
        self.settings
            .quick_tags
            .iter()
            .find(|t| !t.name.is_empty() && t.name == selector)
            .ok_or_else(|| QuickWrapError::Api(format!("No quick tag matches '{}'", selector)))
    }

    /// Run the host command of the tag matched by `selector` against `editor`.
    ///
    /// This is whatever the host holds for the tag's id, which lags behind the
    /// settings while an old command could not be removed.
    pub fn run_tag<E, N>(&self, selector: &str, editor: &mut E, notifier: &N) -> Result<WrapOutcome>
    where
        E: Editor + ?Sized,
        N: Notifier + ?Sized,
    {
        let id = self.find_tag(selector)?.command_id();
        if !self.sync.owned().contains(&id) {
            return Err(QuickWrapError::CommandNotFound(id));
        }
        let command = self
            .host
            .command(&id)
            .ok_or(QuickWrapError::CommandNotFound(id))?;
        Ok(command.run(editor, notifier))
    }
}
