use super::{Binding, Command, CommandTable, KeyBindings};
use crate::error::{QuickWrapError, Result};
use crate::store::fs::write_atomic;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const COMMANDS_FILENAME: &str = "commands.json";
const HOTKEYS_FILENAME: &str = "hotkeys.json";

/// A host whose command and hotkey tables live in JSON files.
///
/// Tables are read once in [`FileHost::open`] and held in memory. The hotkey
/// table is written by [`KeyBindings::persist_bindings`]; the command table is
/// written by [`FileHost::flush`], which the caller runs at the end of a
/// session.
pub struct FileHost {
    root: PathBuf,
    commands: RefCell<BTreeMap<String, Command>>,
    bindings: RefCell<BTreeMap<String, Vec<Binding>>>,
}

impl FileHost {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let commands: Vec<Command> = read_table(&root.join(COMMANDS_FILENAME))?;
        let bindings: BTreeMap<String, Vec<Binding>> = read_table(&root.join(HOTKEYS_FILENAME))?;
        Ok(Self {
            root,
            commands: RefCell::new(commands.into_iter().map(|c| (c.id.clone(), c)).collect()),
            bindings: RefCell::new(bindings),
        })
    }

    /// All registered commands in id order.
    pub fn commands(&self) -> Vec<Command> {
        self.commands.borrow().values().cloned().collect()
    }

    /// Append a custom binding for `id`. Not persisted until `persist_bindings`.
    pub fn add_binding(&self, id: &str, binding: Binding) {
        let mut bindings = self.bindings.borrow_mut();
        let entry = bindings.entry(id.to_string()).or_default();
        if !entry.contains(&binding) {
            entry.push(binding);
        }
    }

    /// Write the command table to disk.
    pub fn flush(&self) -> Result<()> {
        let commands: Vec<Command> = self.commands();
        let content =
            serde_json::to_string_pretty(&commands).map_err(QuickWrapError::Serialization)?;
        write_atomic(&self.root, COMMANDS_FILENAME, &content)
    }
}

/// Read a JSON table, treating a missing or unreadable file as empty.
fn read_table<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path).map_err(QuickWrapError::Io)?;
    match serde_json::from_str(&content) {
        Ok(table) => Ok(table),
        Err(e) => {
            log::warn!("Ignoring unreadable host table {}: {}", path.display(), e);
            Ok(T::default())
        }
    }
}

impl CommandTable for FileHost {
    fn register_command(&self, command: Command) -> Result<()> {
        let mut commands = self.commands.borrow_mut();
        if commands.contains_key(&command.id) {
            return Err(QuickWrapError::DuplicateCommand(command.id));
        }
        commands.insert(command.id.clone(), command);
        Ok(())
    }

    fn remove_command(&self, id: &str) -> Result<()> {
        self.commands.borrow_mut().remove(id);
        Ok(())
    }

    fn list_command_ids(&self) -> Result<Vec<String>> {
        Ok(self.commands.borrow().keys().cloned().collect())
    }

    fn command(&self, id: &str) -> Option<Command> {
        self.commands.borrow().get(id).cloned()
    }
}

impl KeyBindings for FileHost {
    fn custom_binding(&self, id: &str) -> Option<Vec<Binding>> {
        self.bindings
            .borrow()
            .get(id)
            .filter(|b| !b.is_empty())
            .cloned()
    }

    fn remove_binding(&self, id: &str) -> Result<()> {
        self.bindings.borrow_mut().remove(id);
        Ok(())
    }

    fn persist_bindings(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&*self.bindings.borrow())
            .map_err(QuickWrapError::Serialization)?;
        write_atomic(&self.root, HOTKEYS_FILENAME, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap::WrapAction;

    fn cmd(id: &str) -> Command {
        Command {
            id: id.to_string(),
            name: "Wrap with b".to_string(),
            action: WrapAction::new("<b>", "</b>"),
        }
    }

    #[test]
    fn commands_survive_flush_and_reopen() {
        let temp = tempfile::tempdir().unwrap();
        let host = FileHost::open(temp.path()).unwrap();
        host.register_command(cmd("wrap-with-1")).unwrap();
        host.flush().unwrap();

        let reopened = FileHost::open(temp.path()).unwrap();
        assert_eq!(reopened.command("wrap-with-1"), Some(cmd("wrap-with-1")));
    }

    #[test]
    fn commands_file_uses_flat_records() {
        let temp = tempfile::tempdir().unwrap();
        let host = FileHost::open(temp.path()).unwrap();
        host.register_command(cmd("wrap-with-1")).unwrap();
        host.flush().unwrap();

        let raw = fs::read_to_string(temp.path().join(COMMANDS_FILENAME)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["id"], "wrap-with-1");
        assert_eq!(json[0]["prefix"], "<b>");
    }

    #[test]
    fn bindings_persist_only_on_request() {
        let temp = tempfile::tempdir().unwrap();
        let host = FileHost::open(temp.path()).unwrap();
        host.add_binding(
            "wrap-with-1",
            Binding {
                modifiers: vec!["Mod".into()],
                key: "K".into(),
            },
        );
        assert!(!temp.path().join(HOTKEYS_FILENAME).exists());

        host.persist_bindings().unwrap();
        let reopened = FileHost::open(temp.path()).unwrap();
        assert_eq!(reopened.custom_binding("wrap-with-1").unwrap()[0].key, "K");
    }

    #[test]
    fn corrupt_tables_open_empty() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join(COMMANDS_FILENAME), "not json").unwrap();
        let host = FileHost::open(temp.path()).unwrap();
        assert!(host.list_command_ids().unwrap().is_empty());
    }
}
