//! # Command Synchronization
//!
//! Keeps the host's command table equal to the set of registrable quick tags.
//!
//! The host's command registry is process-wide and has no teardown guarantee,
//! so the synchronizer never assumes a clean slate. It keeps an explicit record
//! of the command ids it owns ([`CommandSync::owned`]) and every pass works
//! from that record:
//!
//! 1. **Removal**: every owned id (plus, with `sweep_orphans`, any leftover
//!    `wrap-with-*` id the host still lists) is removed. Ids that are leaving
//!    for good also lose their custom key-bindings, and the binding table is
//!    persisted once if anything was dropped. A command the host refused to
//!    remove keeps its binding.
//! 2. **Registration**: one command per registrable tag, bound to that tag's
//!    prefix and suffix.
//!
//! Removal always completes before registration starts, so a tag whose
//! validity flips within a single id never collides with its previous command.
//!
//! Host failures never escape a pass. Each one is logged against its id and the
//! pass moves on, so one broken tag cannot take the others down with it.

use crate::host::{Command, CommandTable, Host};
use crate::model::{tag_id_of, QuickWrapperSettings};
use crate::wrap::WrapAction;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Also remove `wrap-with-*` commands the host lists but we do not own.
    pub sweep_orphans: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            sweep_orphans: true,
        }
    }
}

/// Run one synchronization pass and return the ids now owned.
///
/// The result is exactly the de-duplicated set of command ids of registrable
/// tags that the host accepted, plus any previously owned id the host refused
/// to remove (so the next pass tries again).
pub fn synchronize<H: Host + ?Sized>(
    settings: &QuickWrapperSettings,
    previous: &BTreeSet<String>,
    host: &H,
    options: SyncOptions,
) -> BTreeSet<String> {
    let desired: BTreeSet<String> = settings.registrable_tags().map(|t| t.command_id()).collect();

    let mut stale = previous.clone();
    if options.sweep_orphans {
        match host.list_command_ids() {
            Ok(ids) => {
                for id in ids {
                    if tag_id_of(&id).is_some() && !previous.contains(&id) {
                        log::debug!("Sweeping orphaned command {}", id);
                        stale.insert(id);
                    }
                }
            }
            Err(e) => log::warn!("Could not list host commands for orphan sweep: {}", e),
        }
    }

    let mut stuck = BTreeSet::new();
    let mut bindings_dropped = false;
    for id in &stale {
        if let Err(e) = host.remove_command(id) {
            log::warn!("Failed to remove command {}: {}", id, e);
            stuck.insert(id.clone());
            continue;
        }
        if desired.contains(id) || host.custom_binding(id).is_none() {
            continue;
        }
        match host.remove_binding(id) {
            Ok(()) => bindings_dropped = true,
            Err(e) => log::warn!("Failed to remove key binding for {}: {}", id, e),
        }
    }
    if bindings_dropped {
        if let Err(e) = host.persist_bindings() {
            log::warn!("Failed to persist key bindings: {}", e);
        }
    }

    let mut registered = BTreeSet::new();
    for tag in settings.registrable_tags() {
        let id = tag.command_id();
        if registered.contains(&id) {
            log::debug!("Skipping duplicate tag id {}", tag.id);
            continue;
        }
        if stuck.contains(&id) {
            log::warn!("Command {} could not be removed, keeping previous version", id);
            continue;
        }
        let command = Command {
            id: id.clone(),
            name: tag.command_name(),
            action: WrapAction::new(tag.prefix.clone(), tag.suffix.clone()),
        };
        match host.register_command(command) {
            Ok(()) => {
                registered.insert(id);
            }
            Err(e) => log::warn!("Failed to register command {} ({}): {}", id, tag.name, e),
        }
    }

    log::debug!(
        "Synchronized commands: {} registered, {} removed",
        registered.len(),
        stale.len() - stuck.len()
    );

    registered.extend(stuck);
    registered
}

/// The synchronizer's record of which host commands belong to it.
#[derive(Debug, Default)]
pub struct CommandSync {
    owned: BTreeSet<String>,
    options: SyncOptions,
}

impl CommandSync {
    pub fn new(options: SyncOptions) -> Self {
        Self {
            owned: BTreeSet::new(),
            options,
        }
    }

    /// Resume ownership of commands registered by an earlier session, e.g.
    /// ones a file-backed host kept between runs.
    pub fn with_owned(options: SyncOptions, owned: BTreeSet<String>) -> Self {
        Self { owned, options }
    }

    pub fn owned(&self) -> &BTreeSet<String> {
        &self.owned
    }

    pub fn sync<H: Host + ?Sized>(&mut self, settings: &QuickWrapperSettings, host: &H) {
        self.owned = synchronize(settings, &self.owned, host, self.options);
    }

    /// Remove every owned command. Key bindings are left alone.
    pub fn clear<H: CommandTable + ?Sized>(&mut self, host: &H) {
        self.owned.retain(|id| match host.remove_command(id) {
            Ok(()) => false,
            Err(e) => {
                log::warn!("Failed to remove command {}: {}", id, e);
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{BufferEditor, MemHost, MemNotifier};
    use crate::host::{Binding, KeyBindings};
    use crate::model::QuickTag;
    use crate::wrap::WrapOutcome;

    fn tag(id: u64, name: &str, prefix: &str, suffix: &str) -> QuickTag {
        QuickTag {
            id,
            name: name.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    fn settings(tags: Vec<QuickTag>) -> QuickWrapperSettings {
        let next_id = tags.iter().map(|t| t.id + 1).max().unwrap_or(1);
        QuickWrapperSettings {
            quick_tags: tags,
            next_id,
        }
    }

    fn ids(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn binding(key: &str) -> Binding {
        Binding {
            modifiers: vec!["Mod".into()],
            key: key.into(),
        }
    }

    #[test]
    fn registers_exactly_the_registrable_tags() {
        let host = MemHost::new();
        let s = settings(vec![
            tag(1, "b", "<b>", "</b>"),
            tag(2, "", "<i>", "</i>"),
            tag(3, "kbd", "<kbd>", "</kbd>"),
            tag(4, "u", "", "</u>"),
            tag(5, "s", "<s>", ""),
        ]);

        let owned = synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());

        assert_eq!(owned, ids(&["wrap-with-1", "wrap-with-3"]));
        assert_eq!(host.command_ids(), vec!["wrap-with-1", "wrap-with-3"]);
    }

    #[test]
    fn empty_tag_list_registers_nothing() {
        let host = MemHost::new();
        let owned = synchronize(
            &QuickWrapperSettings::default(),
            &BTreeSet::new(),
            &host,
            SyncOptions::default(),
        );
        assert!(owned.is_empty());
        assert_eq!(host.register_calls(), 0);
    }

    #[test]
    fn registered_command_wraps_with_its_tag() {
        let host = MemHost::new();
        let s = settings(vec![tag(7, "kbd", "<kbd>", "</kbd>")]);
        synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());

        let command = host.command("wrap-with-7").unwrap();
        assert_eq!(command.name, "Wrap with kbd");

        let mut editor = BufferEditor::with_selection("Ctrl");
        let outcome = command.run(&mut editor, &MemNotifier::new());
        assert_eq!(outcome, WrapOutcome::Replaced("<kbd>Ctrl</kbd>".into()));
    }

    #[test]
    fn second_pass_is_idempotent() {
        let host = MemHost::new();
        let s = settings(vec![tag(1, "b", "<b>", "</b>"), tag(2, "i", "<i>", "</i>")]);

        let first = synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());
        let second = synchronize(&s, &first, &host, SyncOptions::default());

        assert_eq!(first, second);
        assert_eq!(host.command_ids(), vec!["wrap-with-1", "wrap-with-2"]);
        // MemHost rejects duplicates, so four successful registrations means none collided.
        assert_eq!(host.register_calls(), 4);
    }

    #[test]
    fn edits_are_picked_up_on_resync() {
        let host = MemHost::new();
        let mut s = settings(vec![tag(1, "b", "<b>", "</b>")]);
        let owned = synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());

        s.quick_tags[0].prefix = "<strong>".into();
        s.quick_tags[0].suffix = "</strong>".into();
        synchronize(&s, &owned, &host, SyncOptions::default());

        let command = host.command("wrap-with-1").unwrap();
        assert_eq!(command.action, WrapAction::new("<strong>", "</strong>"));
    }

    #[test]
    fn deleting_a_tag_removes_only_its_command_and_binding() {
        let host = MemHost::new();
        let mut s = settings(vec![tag(1, "b", "<b>", "</b>"), tag(2, "i", "<i>", "</i>")]);
        let owned = synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());
        host.bind("wrap-with-1", binding("B"));
        host.bind("wrap-with-2", binding("I"));

        s.quick_tags.retain(|t| t.id != 1);
        let owned = synchronize(&s, &owned, &host, SyncOptions::default());

        assert_eq!(owned, ids(&["wrap-with-2"]));
        assert_eq!(host.command_ids(), vec!["wrap-with-2"]);
        assert!(!host.has_binding("wrap-with-1"));
        assert_eq!(host.custom_binding("wrap-with-2"), Some(vec![binding("I")]));
        assert_eq!(host.persist_calls(), 1);
    }

    #[test]
    fn tag_becoming_unregistrable_loses_command_and_binding() {
        let host = MemHost::new();
        let mut s = settings(vec![tag(1, "b", "<b>", "</b>")]);
        let owned = synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());
        host.bind("wrap-with-1", binding("B"));

        s.quick_tags[0].name.clear();
        let owned = synchronize(&s, &owned, &host, SyncOptions::default());

        assert!(owned.is_empty());
        assert!(host.command_ids().is_empty());
        assert!(!host.has_binding("wrap-with-1"));
    }

    #[test]
    fn bindings_are_not_persisted_when_nothing_changed() {
        let host = MemHost::new();
        let s = settings(vec![tag(1, "b", "<b>", "</b>")]);
        let owned = synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());
        host.bind("wrap-with-1", binding("B"));

        synchronize(&s, &owned, &host, SyncOptions::default());

        assert_eq!(host.persist_calls(), 0);
        assert!(host.has_binding("wrap-with-1"));
    }

    #[test]
    fn registration_failure_does_not_stop_later_tags() {
        let host = MemHost::new();
        host.fail_register("wrap-with-1");
        let s = settings(vec![
            tag(1, "b", "<b>", "</b>"),
            tag(2, "i", "<i>", "</i>"),
            tag(3, "u", "<u>", "</u>"),
        ]);

        let owned = synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());

        assert_eq!(owned, ids(&["wrap-with-2", "wrap-with-3"]));
        assert_eq!(host.command_ids(), vec!["wrap-with-2", "wrap-with-3"]);
    }

    #[test]
    fn removal_failure_does_not_stop_other_removals() {
        let host = MemHost::new();
        let mut s = settings(vec![tag(1, "b", "<b>", "</b>"), tag(2, "i", "<i>", "</i>")]);
        let owned = synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());

        host.fail_remove("wrap-with-1");
        s.quick_tags.clear();
        let owned = synchronize(&s, &owned, &host, SyncOptions::default());

        // The stuck command stays owned so the next pass retries it.
        assert_eq!(owned, ids(&["wrap-with-1"]));
        assert_eq!(host.command_ids(), vec!["wrap-with-1"]);
    }

    #[test]
    fn stuck_command_keeps_its_binding() {
        let host = MemHost::new();
        let mut s = settings(vec![tag(1, "b", "<b>", "</b>")]);
        let owned = synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());
        host.bind("wrap-with-1", binding("B"));

        host.fail_remove("wrap-with-1");
        s.quick_tags.clear();
        let owned = synchronize(&s, &owned, &host, SyncOptions::default());

        assert_eq!(owned, ids(&["wrap-with-1"]));
        assert_eq!(host.custom_binding("wrap-with-1"), Some(vec![binding("B")]));
        assert_eq!(host.persist_calls(), 0);
    }

    #[test]
    fn persist_failure_is_swallowed() {
        let host = MemHost::new();
        host.set_simulate_persist_error(true);
        let mut s = settings(vec![tag(1, "b", "<b>", "</b>"), tag(2, "i", "<i>", "</i>")]);
        let owned = synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());
        host.bind("wrap-with-1", binding("B"));

        s.quick_tags.remove(0);
        let owned = synchronize(&s, &owned, &host, SyncOptions::default());

        assert_eq!(owned, ids(&["wrap-with-2"]));
        assert_eq!(host.persist_calls(), 1);
    }

    #[test]
    fn duplicate_tag_ids_register_once() {
        let host = MemHost::new();
        let s = settings(vec![tag(1, "b", "<b>", "</b>"), tag(1, "i", "<i>", "</i>")]);

        let owned = synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());

        assert_eq!(owned, ids(&["wrap-with-1"]));
        assert_eq!(host.register_calls(), 1);
        assert_eq!(host.command("wrap-with-1").unwrap().name, "Wrap with b");
    }

    #[test]
    fn orphans_from_an_earlier_session_are_swept() {
        let host = MemHost::new();
        let old = settings(vec![tag(1, "b", "<b>", "</b>"), tag(9, "x", "[", "]")]);
        synchronize(&old, &BTreeSet::new(), &host, SyncOptions::default());
        host.bind("wrap-with-9", binding("X"));
        host.register_command(Command {
            id: "editor:save".into(),
            name: "Save".into(),
            action: WrapAction::new("", ""),
        })
        .unwrap();

        // A fresh session that does not know what it owned before.
        let current = settings(vec![tag(1, "b", "<b>", "</b>")]);
        let owned = synchronize(&current, &BTreeSet::new(), &host, SyncOptions::default());

        assert_eq!(owned, ids(&["wrap-with-1"]));
        assert_eq!(host.command_ids(), vec!["editor:save", "wrap-with-1"]);
        assert!(!host.has_binding("wrap-with-9"));
    }

    #[test]
    fn sweep_skips_ids_that_are_not_tag_commands() {
        let host = MemHost::new();
        host.register_command(Command {
            id: "wrap-with-selection".into(),
            name: "Another plugin".into(),
            action: WrapAction::new("(", ")"),
        })
        .unwrap();

        let owned = synchronize(
            &QuickWrapperSettings::default(),
            &BTreeSet::new(),
            &host,
            SyncOptions::default(),
        );

        assert!(owned.is_empty());
        assert_eq!(host.command_ids(), vec!["wrap-with-selection"]);
    }

    #[test]
    fn without_sweep_foreign_leftovers_block_registration() {
        let host = MemHost::new();
        let s = settings(vec![tag(1, "b", "<b>", "</b>")]);
        synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());

        let options = SyncOptions {
            sweep_orphans: false,
        };
        let owned = synchronize(&s, &BTreeSet::new(), &host, options);

        assert!(owned.is_empty());
        assert_eq!(host.command_ids(), vec!["wrap-with-1"]);
    }

    #[test]
    fn resumed_ownership_replaces_leftovers_without_sweep() {
        let host = MemHost::new();
        let mut s = settings(vec![tag(1, "b", "<b>", "</b>")]);
        let earlier = synchronize(&s, &BTreeSet::new(), &host, SyncOptions::default());

        let options = SyncOptions {
            sweep_orphans: false,
        };
        let mut sync = CommandSync::with_owned(options, earlier);
        s.quick_tags[0].prefix = "<strong>".into();
        sync.sync(&s, &host);

        assert_eq!(sync.owned(), &ids(&["wrap-with-1"]));
        assert_eq!(
            host.command("wrap-with-1").unwrap().action,
            WrapAction::new("<strong>", "</b>")
        );
    }

    #[test]
    fn clear_removes_owned_commands_but_keeps_bindings() {
        let host = MemHost::new();
        let mut sync = CommandSync::default();
        sync.sync(&settings(vec![tag(1, "b", "<b>", "</b>")]), &host);
        host.bind("wrap-with-1", binding("B"));

        sync.clear(&host);

        assert!(sync.owned().is_empty());
        assert!(host.command_ids().is_empty());
        assert!(host.has_binding("wrap-with-1"));
    }
}
