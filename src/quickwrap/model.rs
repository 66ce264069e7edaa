use crate::error::{QuickWrapError, Result};
use serde::{Deserialize, Serialize};

/// Prefix shared by every command identifier this crate registers.
pub const COMMAND_PREFIX: &str = "wrap-with-";

/// Host command identifier for the tag with the given id.
pub fn command_id(tag_id: u64) -> String {
    format!("{}{}", COMMAND_PREFIX, tag_id)
}

/// Reverse of [`command_id`]. Returns `None` for identifiers this crate did not mint.
pub fn tag_id_of(command_id: &str) -> Option<u64> {
    command_id.strip_prefix(COMMAND_PREFIX)?.parse().ok()
}

/// One user-defined wrapping rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickTag {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

impl QuickTag {
    /// A blank tag, as produced by the "Add" action.
    pub fn empty(id: u64) -> Self {
        Self {
            id,
            name: String::new(),
            prefix: String::new(),
            suffix: String::new(),
        }
    }

    /// A tag produces a live command only when every field is filled in.
    pub fn is_registrable(&self) -> bool {
        !self.name.is_empty() && !self.prefix.is_empty() && !self.suffix.is_empty()
    }

    pub fn command_id(&self) -> String {
        command_id(self.id)
    }

    pub fn command_name(&self) -> String {
        format!("Wrap with {}", self.name)
    }
}

/// The persisted state. Missing fields fall back to the defaults, so a partial
/// document on disk is merged over `{quickTags: [], nextId: 1}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickWrapperSettings {
    #[serde(default)]
    pub quick_tags: Vec<QuickTag>,
    #[serde(default = "default_next_id")]
    pub next_id: u64,
}

fn default_next_id() -> u64 {
    1
}

impl Default for QuickWrapperSettings {
    fn default() -> Self {
        Self {
            quick_tags: Vec::new(),
            next_id: default_next_id(),
        }
    }
}

impl QuickWrapperSettings {
    pub fn tag(&self, id: u64) -> Option<&QuickTag> {
        self.quick_tags.iter().find(|t| t.id == id)
    }

    pub fn tag_mut(&mut self, id: u64) -> Option<&mut QuickTag> {
        self.quick_tags.iter_mut().find(|t| t.id == id)
    }

    pub fn registrable_tags(&self) -> impl Iterator<Item = &QuickTag> {
        self.quick_tags.iter().filter(|t| t.is_registrable())
    }

    /// Raise `next_id` above every id present. Returns true if it had to move.
    ///
    /// Ids of deleted tags cannot be recovered from the document, so this only
    /// guards against hand-edited or truncated files. A tag whose id has no
    /// successor leaves no room for a valid `next_id` and is reported as a
    /// store error.
    pub fn repair_next_id(&mut self) -> Result<bool> {
        let mut floor = 1;
        for tag in &self.quick_tags {
            let above = tag.id.checked_add(1).ok_or_else(|| {
                QuickWrapError::Store(format!("Quick tag id {} leaves no next id", tag.id))
            })?;
            floor = floor.max(above);
        }
        if self.next_id < floor {
            self.next_id = floor;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
