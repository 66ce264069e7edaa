//! # Wrap Operation
//!
//! The body of every quick-tag command: surround the current selection with the
//! tag's prefix and suffix.
//!
//! Prefix and suffix are opaque. Nothing is escaped or validated, and text that
//! is already wrapped gets wrapped again: invoking the same command twice on
//! `x` yields `<b><b>x</b></b>`.

use crate::host::{Editor, Notifier};
use serde::{Deserialize, Serialize};

/// Notice shown when a command runs with nothing selected.
pub const SELECT_TEXT_NOTICE: &str = "Please select some text first";

/// `prefix + selected + suffix`, or `None` when there is nothing to wrap.
pub fn wrap(selected: &str, prefix: &str, suffix: &str) -> Option<String> {
    if selected.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(prefix.len() + selected.len() + suffix.len());
    out.push_str(prefix);
    out.push_str(selected);
    out.push_str(suffix);
    Some(out)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapOutcome {
    Replaced(String),
    NoSelection,
}

/// A wrap bound to one tag's prefix and suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapAction {
    pub prefix: String,
    pub suffix: String,
}

impl WrapAction {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn invoke<E, N>(&self, editor: &mut E, notifier: &N) -> WrapOutcome
    where
        E: Editor + ?Sized,
        N: Notifier + ?Sized,
    {
        let selected = editor.selection();
        match wrap(&selected, &self.prefix, &self.suffix) {
            Some(wrapped) => {
                editor.replace_selection(&wrapped);
                WrapOutcome::Replaced(wrapped)
            }
            None => {
                notifier.show(SELECT_TEXT_NOTICE);
                WrapOutcome::NoSelection
            }
        }
    }
}
