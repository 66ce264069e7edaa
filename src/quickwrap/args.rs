use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quickwrap", version)]
#[command(about = "Wrap text with user-defined quick tags", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $QUICKWRAP_HOME, then the platform data dir)
    #[arg(long, global = true, env = "QUICKWRAP_HOME")]
    pub home: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List quick tags
    #[command(alias = "ls")]
    List,

    /// Add a quick tag
    #[command(alias = "n")]
    Add {
        /// Display name (e.g. kbd)
        #[arg(long)]
        name: Option<String>,

        /// Text inserted before the selection (e.g. <kbd>)
        #[arg(long, allow_hyphen_values = true)]
        prefix: Option<String>,

        /// Text inserted after the selection (e.g. </kbd>)
        #[arg(long, allow_hyphen_values = true)]
        suffix: Option<String>,
    },

    /// Change one field of a quick tag
    Set {
        /// Id of the tag
        id: u64,

        /// Field to change: name, prefix or suffix
        field: String,

        /// New value (may be empty)
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Delete a quick tag
    #[command(alias = "rm")]
    Delete {
        /// Id of the tag
        id: u64,
    },

    /// List the registered wrap commands and their key bindings
    Commands,

    /// Assign a key binding to a tag's command
    Bind {
        /// Id or name of the tag
        tag: String,

        /// Key (e.g. K)
        key: String,

        /// Modifier keys (e.g. --mod Mod --mod Shift)
        #[arg(long = "mod")]
        modifiers: Vec<String>,
    },

    /// Wrap text with a tag (reads stdin when no text is given)
    #[command(alias = "w")]
    Wrap {
        /// Id or name of the tag
        tag: String,

        /// Text to wrap
        #[arg(allow_hyphen_values = true)]
        text: Option<String>,
    },

    /// Resynchronize commands with the current tags
    Sync,
}
