use crate::commands::{CmdMessage, CmdResult};
use crate::error::{QuickWrapError, Result};
use crate::model::QuickWrapperSettings;

/// Remove a tag. `next_id` is left alone so the id is never handed out again.
pub fn run(settings: &mut QuickWrapperSettings, id: u64) -> Result<CmdResult> {
    let pos = settings
        .quick_tags
        .iter()
        .position(|t| t.id == id)
        .ok_or(QuickWrapError::TagNotFound(id))?;
    let tag = settings.quick_tags.remove(pos);

    let mut result = CmdResult::default();
    let label = if tag.name.is_empty() {
        format!("#{}", tag.id)
    } else {
        format!("#{} ({})", tag.id, tag.name)
    };
    result.add_message(CmdMessage::success(format!("Quick tag deleted: {}", label)));
    result.affected_tags.push(tag);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;

    #[test]
    fn removes_only_the_target() {
        let mut settings = QuickWrapperSettings::default();
        add::run(&mut settings).unwrap();
        add::run(&mut settings).unwrap();
        add::run(&mut settings).unwrap();

        run(&mut settings, 2).unwrap();

        let ids: Vec<u64> = settings.quick_tags.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut settings = QuickWrapperSettings::default();
        add::run(&mut settings).unwrap();
        run(&mut settings, 1).unwrap();

        let result = add::run(&mut settings).unwrap();

        assert_eq!(result.affected_tags[0].id, 2);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let mut settings = QuickWrapperSettings::default();
        assert!(matches!(
            run(&mut settings, 1),
            Err(QuickWrapError::TagNotFound(1))
        ));
    }
}
