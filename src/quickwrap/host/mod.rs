//! # Host Capabilities
//!
//! quickwrap never talks to an editor directly. Everything it needs from the
//! host is expressed as a handful of narrow traits, so the core stays isolated
//! from however the host represents its command and hotkey tables internally.
//!
//! | Trait | Host surface |
//! |-------|--------------|
//! | [`CommandTable`] | the dynamic command registry |
//! | [`KeyBindings`] | user-assigned hotkeys, keyed by command id |
//! | [`Editor`] | selection access in the active editor |
//! | [`Notifier`] | transient, fire-and-forget notices |
//!
//! ## Implementations
//!
//! - [`memory::MemHost`]: in-memory tables with failure injection, for tests.
//! - [`fs::FileHost`]: JSON-backed tables used by the `quickwrap` binary.
//!
//! The host tables take `&self`: access is single-threaded, and implementations
//! use interior mutability where they need it.

use crate::error::Result;
use crate::wrap::{WrapAction, WrapOutcome};
use serde::{Deserialize, Serialize};

pub mod fs;
pub mod memory;

/// A command as handed to the host: identifier, display name and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub action: WrapAction,
}

impl Command {
    pub fn run<E, N>(&self, editor: &mut E, notifier: &N) -> WrapOutcome
    where
        E: Editor + ?Sized,
        N: Notifier + ?Sized,
    {
        self.action.invoke(editor, notifier)
    }
}

/// One hotkey assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub key: String,
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for m in &self.modifiers {
            write!(f, "{}+", m)?;
        }
        write!(f, "{}", self.key)
    }
}

pub trait CommandTable {
    /// Register a command. Fails if the id is already taken.
    fn register_command(&self, command: Command) -> Result<()>;

    /// Remove a command by id.
    fn remove_command(&self, id: &str) -> Result<()>;

    /// Every command id currently registered, ours or not.
    fn list_command_ids(&self) -> Result<Vec<String>>;

    /// The command registered under `id`, as the host will run it.
    fn command(&self, id: &str) -> Option<Command>;
}

pub trait KeyBindings {
    /// Custom bindings the user assigned to `id`, if any.
    fn custom_binding(&self, id: &str) -> Option<Vec<Binding>>;

    fn remove_binding(&self, id: &str) -> Result<()>;

    /// Write the binding table back to the host's storage.
    fn persist_bindings(&self) -> Result<()>;
}

/// Everything the synchronizer needs from a host.
pub trait Host: CommandTable + KeyBindings {}

impl<T: CommandTable + KeyBindings> Host for T {}

pub trait Editor {
    fn selection(&self) -> String;

    fn replace_selection(&mut self, text: &str);
}

pub trait Notifier {
    fn show(&self, message: &str);
}
