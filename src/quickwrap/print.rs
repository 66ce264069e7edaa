use colored::Colorize;
use quickwrap::commands::{CmdMessage, MessageLevel};
use quickwrap::host::fs::FileHost;
use quickwrap::host::{Command, KeyBindings};
use quickwrap::model::QuickTag;
use std::collections::BTreeSet;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const FIELD_WIDTH: usize = 24;
const LIVE_MARKER: &str = "●";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
        }
    }
}

pub(super) fn print_notice(message: &str) {
    eprintln!("{}", message.yellow());
}

pub(super) fn print_tags(tags: &[QuickTag], registered: &BTreeSet<String>) {
    if tags.is_empty() {
        println!("No quick tags defined.");
        return;
    }

    for tag in tags {
        let live = registered.contains(&tag.command_id());
        let marker = if live {
            LIVE_MARKER.green()
        } else {
            " ".normal()
        };
        let name = if tag.name.is_empty() {
            "(unnamed)".to_string()
        } else {
            tag.name.clone()
        };

        println!(
            "{} {:>3}. {} {} {}",
            marker,
            tag.id,
            pad_to_width(&name, FIELD_WIDTH).bold(),
            pad_to_width(&tag.prefix, FIELD_WIDTH),
            tag.suffix
        );
    }
}

pub(super) fn print_commands(commands: &[Command], host: &FileHost) {
    if commands.is_empty() {
        println!("No commands registered.");
        return;
    }

    for command in commands {
        let keys = host
            .custom_binding(&command.id)
            .map(|bindings| {
                bindings
                    .iter()
                    .map(|b| b.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!(
            "{} {} {}",
            pad_to_width(&command.id, FIELD_WIDTH).yellow(),
            pad_to_width(&command.name, FIELD_WIDTH),
            keys.dimmed()
        );
    }
}

/// Truncate or pad `s` so it occupies exactly `width` columns.
fn pad_to_width(s: &str, width: usize) -> String {
    let mut result = String::new();
    if s.width() <= width {
        result.push_str(s);
    } else {
        let limit = width.saturating_sub(1);
        let mut current_width = 0;
        for c in s.chars() {
            let char_width = c.width().unwrap_or(0);
            if current_width + char_width > limit {
                break;
            }
            result.push(c);
            current_width += char_width;
        }
        result.push('…');
    }

    let padding = width.saturating_sub(result.width());
    result.push_str(&" ".repeat(padding));
    result
}
