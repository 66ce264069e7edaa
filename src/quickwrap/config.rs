//! # Configuration
//!
//! Application settings are loaded with [`confique`], layered in priority order:
//!
//! 1. **Environment variables**: `QUICKWRAP_SWEEP_ORPHANS`, `QUICKWRAP_LAYOUT_RESYNC`.
//! 2. **Config file**: `quickwrap.toml` in the data directory.
//! 3. **Compiled defaults**.
//!
//! These tune the integration itself. The user's quick tags are not
//! configuration; they live in the settings store (see [`crate::store`]).
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `sweep_orphans` | `true` | Remove leftover `wrap-with-*` commands nobody owns |
//! | `layout_resync` | `true` | Resynchronize again, as a layout change, after every save |

use crate::error::{QuickWrapError, Result};
use crate::sync::SyncOptions;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILENAME: &str = "quickwrap.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuickWrapConfig {
    /// Remove `wrap-with-*` commands left behind by an earlier session.
    #[config(default = true, env = "QUICKWRAP_SWEEP_ORPHANS")]
    pub sweep_orphans: bool,

    /// Run a second, layout-change synchronization after each save.
    #[config(default = true, env = "QUICKWRAP_LAYOUT_RESYNC")]
    pub layout_resync: bool,
}

impl Default for QuickWrapConfig {
    fn default() -> Self {
        Self {
            sweep_orphans: true,
            layout_resync: true,
        }
    }
}

impl QuickWrapConfig {
    /// Load from the environment and `<dir>/quickwrap.toml`. A missing file is fine.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        QuickWrapConfig::builder()
            .env()
            .file(dir.as_ref().join(CONFIG_FILENAME))
            .load()
            .map_err(QuickWrapError::Config)
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            sweep_orphans: self.sweep_orphans,
        }
    }
}
