use super::{Binding, Command, CommandTable, Editor, KeyBindings, Notifier};
use crate::error::{QuickWrapError, Result};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

/// In-memory host for testing.
///
/// Uses `RefCell` for interior mutability since the host is single-threaded.
/// Individual command ids can be made to fail on register or remove, to
/// exercise the synchronizer's partial-failure handling.
#[derive(Default)]
pub struct MemHost {
    commands: RefCell<BTreeMap<String, Command>>,
    bindings: RefCell<BTreeMap<String, Vec<Binding>>>,
    fail_register: RefCell<HashSet<String>>,
    fail_remove: RefCell<HashSet<String>>,
    simulate_persist_error: Cell<bool>,
    register_calls: Cell<usize>,
    persist_calls: Cell<usize>,
}

impl MemHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `register_command` for `id` fail.
    pub fn fail_register(&self, id: &str) {
        self.fail_register.borrow_mut().insert(id.to_string());
    }

    /// Make every `remove_command` for `id` fail.
    pub fn fail_remove(&self, id: &str) {
        self.fail_remove.borrow_mut().insert(id.to_string());
    }

    pub fn set_simulate_persist_error(&self, simulate: bool) {
        self.simulate_persist_error.set(simulate);
    }

    /// Assign a custom binding, as a user would in the host's hotkey screen.
    pub fn bind(&self, id: &str, binding: Binding) {
        self.bindings
            .borrow_mut()
            .entry(id.to_string())
            .or_default()
            .push(binding);
    }

    /// Registered ids in sorted order.
    pub fn command_ids(&self) -> Vec<String> {
        self.commands.borrow().keys().cloned().collect()
    }

    pub fn has_binding(&self, id: &str) -> bool {
        self.bindings.borrow().contains_key(id)
    }

    pub fn register_calls(&self) -> usize {
        self.register_calls.get()
    }

    pub fn persist_calls(&self) -> usize {
        self.persist_calls.get()
    }
}

impl CommandTable for MemHost {
    fn register_command(&self, command: Command) -> Result<()> {
        self.register_calls.set(self.register_calls.get() + 1);
        if self.fail_register.borrow().contains(&command.id) {
            return Err(QuickWrapError::Host(format!(
                "Simulated register error for {}",
                command.id
            )));
        }
        let mut commands = self.commands.borrow_mut();
        if commands.contains_key(&command.id) {
            return Err(QuickWrapError::DuplicateCommand(command.id));
        }
        commands.insert(command.id.clone(), command);
        Ok(())
    }

    fn remove_command(&self, id: &str) -> Result<()> {
        if self.fail_remove.borrow().contains(id) {
            return Err(QuickWrapError::Host(format!(
                "Simulated remove error for {}",
                id
            )));
        }
        self.commands.borrow_mut().remove(id);
        Ok(())
    }

    fn list_command_ids(&self) -> Result<Vec<String>> {
        Ok(self.command_ids())
    }

    fn command(&self, id: &str) -> Option<Command> {
        self.commands.borrow().get(id).cloned()
    }
}

impl KeyBindings for MemHost {
    fn custom_binding(&self, id: &str) -> Option<Vec<Binding>> {
        self.bindings.borrow().get(id).cloned()
    }

    fn remove_binding(&self, id: &str) -> Result<()> {
        self.bindings.borrow_mut().remove(id);
        Ok(())
    }

    fn persist_bindings(&self) -> Result<()> {
        self.persist_calls.set(self.persist_calls.get() + 1);
        if self.simulate_persist_error.get() {
            return Err(QuickWrapError::Host(
                "Simulated persist error".to_string(),
            ));
        }
        Ok(())
    }
}

/// An editor whose whole buffer is the selection.
///
/// After a replacement the new text stays selected, so the same buffer can be
/// fed through several commands in a row.
#[derive(Debug, Default)]
pub struct BufferEditor {
    selection: String,
    replacements: usize,
}

impl BufferEditor {
    pub fn with_selection(text: impl Into<String>) -> Self {
        Self {
            selection: text.into(),
            replacements: 0,
        }
    }

    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Editor for BufferEditor {
    fn selection(&self) -> String {
        self.selection.clone()
    }

    fn replace_selection(&mut self, text: &str) {
        self.selection = text.to_string();
        self.replacements += 1;
    }
}

/// Records notices instead of showing them.
#[derive(Debug, Default)]
pub struct MemNotifier {
    notices: RefCell<Vec<String>>,
}

impl MemNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }
}

impl Notifier for MemNotifier {
    fn show(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }
}
