use crate::commands::{CmdMessage, CmdResult, TagField};
use crate::error::{QuickWrapError, Result};
use crate::model::QuickWrapperSettings;

pub fn run(
    settings: &mut QuickWrapperSettings,
    id: u64,
    field: TagField,
    value: String,
) -> Result<CmdResult> {
    let tag = settings.tag_mut(id).ok_or(QuickWrapError::TagNotFound(id))?;
    field.set(tag, value);
    let tag = tag.clone();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Quick tag #{} {} updated",
        id, field
    )));
    if !tag.is_registrable() {
        result.add_message(CmdMessage::info(format!(
            "Quick tag #{} needs a name, prefix and suffix before it can be used",
            id
        )));
    }
    result.affected_tags.push(tag);
    Ok(result)
}
