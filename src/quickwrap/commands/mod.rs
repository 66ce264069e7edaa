//! # Settings Updates
//!
//! Every action the settings form offers is an explicit [`SettingsUpdate`]
//! value. Applying one is a pure state change on [`QuickWrapperSettings`]; the
//! caller (see [`crate::api`]) is responsible for persisting the result and
//! resynchronizing commands afterwards.
//!
//! Each update lives in its own module with a `run` function that takes the
//! settings by `&mut` and returns a [`CmdResult`].

use crate::error::{QuickWrapError, Result};
use crate::model::{QuickTag, QuickWrapperSettings};
use std::fmt;
use std::str::FromStr;

pub mod add;
pub mod delete;
pub mod update;

/// The editable text fields of a quick tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Name,
    Prefix,
    Suffix,
}

impl TagField {
    pub fn get(self, tag: &QuickTag) -> &str {
        match self {
            TagField::Name => &tag.name,
            TagField::Prefix => &tag.prefix,
            TagField::Suffix => &tag.suffix,
        }
    }

    pub fn set(self, tag: &mut QuickTag, value: String) {
        match self {
            TagField::Name => tag.name = value,
            TagField::Prefix => tag.prefix = value,
            TagField::Suffix => tag.suffix = value,
        }
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TagField::Name => "name",
            TagField::Prefix => "prefix",
            TagField::Suffix => "suffix",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TagField {
    type Err = QuickWrapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(TagField::Name),
            "prefix" => Ok(TagField::Prefix),
            "suffix" => Ok(TagField::Suffix),
            other => Err(QuickWrapError::Api(format!(
                "Unknown field '{}' (expected name, prefix or suffix)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsUpdate {
    AddTag,
    SetField {
        id: u64,
        field: TagField,
        value: String,
    },
    DeleteTag {
        id: u64,
    },
}

impl SettingsUpdate {
    pub fn apply(self, settings: &mut QuickWrapperSettings) -> Result<CmdResult> {
        match self {
            SettingsUpdate::AddTag => add::run(settings),
            SettingsUpdate::SetField { id, field, value } => {
                update::run(settings, id, field, value)
            }
            SettingsUpdate::DeleteTag { id } => delete::run(settings, id),
        }
    }
}

/// How a message is styled when printed. Failures travel as errors, so
/// there are only two levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    fn new(level: MessageLevel, content: String) -> Self {
        Self { level, content }
    }

    pub fn info(content: impl Into<String>) -> Self {
        Self::new(MessageLevel::Info, content.into())
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self::new(MessageLevel::Success, content.into())
    }
}

/// What an update changed, plus the lines to show the user.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_tags: Vec<QuickTag>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }
}
