use crate::commands::{CmdMessage, CmdResult};
use crate::error::{QuickWrapError, Result};
use crate::model::{QuickTag, QuickWrapperSettings};

/// Append a blank tag under the next id. Fails without touching the settings
/// once the id space is used up.
pub fn run(settings: &mut QuickWrapperSettings) -> Result<CmdResult> {
    let following = settings
        .next_id
        .checked_add(1)
        .ok_or_else(|| QuickWrapError::Api("Quick tag ids are exhausted".to_string()))?;
    let tag = QuickTag::empty(settings.next_id);
    settings.next_id = following;
    settings.quick_tags.push(tag.clone());

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Quick tag added: #{}", tag.id)));
    result.affected_tags.push(tag);
    Ok(result)
}
