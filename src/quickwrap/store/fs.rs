use super::SettingsStore;
use crate::error::{QuickWrapError, Result};
use crate::model::QuickWrapperSettings;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DATA_FILENAME: &str = "data.json";

/// Settings persisted as pretty JSON in `<root>/data.json`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(DATA_FILENAME)
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Result<Option<QuickWrapperSettings>> {
        let data_file = self.data_path();
        if !data_file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(data_file).map_err(QuickWrapError::Io)?;
        // An empty file is what a crash between create and write leaves behind.
        if content.trim().is_empty() {
            return Ok(None);
        }
        let settings: QuickWrapperSettings =
            serde_json::from_str(&content).map_err(QuickWrapError::Serialization)?;
        Ok(Some(settings))
    }

    fn save(&mut self, settings: &QuickWrapperSettings) -> Result<()> {
        let content =
            serde_json::to_string_pretty(settings).map_err(QuickWrapError::Serialization)?;
        write_atomic(&self.root, DATA_FILENAME, &content)
    }
}

/// Write `content` to `root/filename` via a temp file and rename.
pub(crate) fn write_atomic(root: &Path, filename: &str, content: &str) -> Result<()> {
    if !root.exists() {
        fs::create_dir_all(root).map_err(QuickWrapError::Io)?;
    }
    let tmp_file = root.join(format!(".{}-{}.tmp", filename, Uuid::new_v4()));
    fs::write(&tmp_file, content).map_err(QuickWrapError::Io)?;
    fs::rename(&tmp_file, root.join(filename)).map_err(QuickWrapError::Io)?;
    Ok(())
}
