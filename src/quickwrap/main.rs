use clap::Parser;
use directories::ProjectDirs;
use quickwrap::api::{ApiOptions, QuickWrapApi};
use quickwrap::commands::TagField;
use quickwrap::config::QuickWrapConfig;
use quickwrap::error::{QuickWrapError, Result};
use quickwrap::model::tag_id_of;
use quickwrap::host::fs::FileHost;
use quickwrap::host::memory::BufferEditor;
use quickwrap::host::{Binding, CommandTable, Notifier};
use quickwrap::store::fs::FileStore;
use quickwrap::wrap::WrapOutcome;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

mod args;
mod print;
use args::{Cli, Commands};
use print::{print_commands, print_messages, print_tags};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

struct AppContext {
    api: QuickWrapApi<FileStore, FileHost>,
}

/// Shows notices on stderr so they never mix with wrapped output.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn show(&self, message: &str) {
        print::print_notice(message);
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context(&cli)?;

    let outcome = match cli.command {
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::Add {
            name,
            prefix,
            suffix,
        }) => handle_add(&mut ctx, name, prefix, suffix),
        Some(Commands::Set { id, field, value }) => handle_set(&mut ctx, id, field, value),
        Some(Commands::Delete { id }) => handle_delete(&mut ctx, id),
        Some(Commands::Commands) => handle_commands(&ctx),
        Some(Commands::Bind {
            tag,
            key,
            modifiers,
        }) => handle_bind(&ctx, tag, key, modifiers),
        Some(Commands::Wrap { tag, text }) => handle_wrap(&ctx, tag, text),
        Some(Commands::Sync) => handle_sync(&mut ctx),
    };

    // The command table is session state on a real host; here it outlives the process.
    ctx.api.host().flush()?;
    outcome
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(home) = &cli.home {
        return Ok(home.clone());
    }
    let proj_dirs = ProjectDirs::from("com", "quickwrap", "quickwrap")
        .ok_or_else(|| QuickWrapError::Api("Could not determine data directory".to_string()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let root = data_dir(cli)?;
    log::debug!("Using data directory {}", root.display());

    let config = QuickWrapConfig::load(&root)?;
    let store = FileStore::new(root.clone());
    let host = FileHost::open(root)?;
    // Every run is a new session over the same command table; adopt what the
    // previous run registered.
    let owned: BTreeSet<String> = host
        .list_command_ids()?
        .into_iter()
        .filter(|id| tag_id_of(id).is_some())
        .collect();
    let api = QuickWrapApi::resume(store, host, ApiOptions::from(&config), owned);

    Ok(AppContext { api })
}

fn handle_list(ctx: &AppContext) -> Result<ExitCode> {
    print_tags(ctx.api.tags(), ctx.api.registered());
    Ok(ExitCode::SUCCESS)
}

fn handle_add(
    ctx: &mut AppContext,
    name: Option<String>,
    prefix: Option<String>,
    suffix: Option<String>,
) -> Result<ExitCode> {
    let result = ctx.api.add_tag()?;
    print_messages(&result.messages);

    let id = result
        .affected_tags
        .first()
        .map(|t| t.id)
        .ok_or_else(|| QuickWrapError::Api("Add produced no tag".to_string()))?;
    let fields = [
        (TagField::Name, name),
        (TagField::Prefix, prefix),
        (TagField::Suffix, suffix),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            ctx.api.set_field(id, field, value)?;
        }
    }

    if let Some(tag) = ctx.api.settings().tag(id) {
        if ctx.api.is_registered(tag) {
            println!("Command registered: {}", tag.command_id());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_set(ctx: &mut AppContext, id: u64, field: String, value: String) -> Result<ExitCode> {
    let field: TagField = field.parse()?;
    let result = ctx.api.set_field(id, field, value)?;
    print_messages(&result.messages);
    Ok(ExitCode::SUCCESS)
}

fn handle_delete(ctx: &mut AppContext, id: u64) -> Result<ExitCode> {
    let result = ctx.api.delete_tag(id)?;
    print_messages(&result.messages);
    Ok(ExitCode::SUCCESS)
}

fn handle_commands(ctx: &AppContext) -> Result<ExitCode> {
    let host = ctx.api.host();
    let commands: Vec<_> = host
        .commands()
        .into_iter()
        .filter(|c| ctx.api.registered().contains(&c.id))
        .collect();
    print_commands(&commands, host);
    Ok(ExitCode::SUCCESS)
}

fn handle_bind(
    ctx: &AppContext,
    tag: String,
    key: String,
    modifiers: Vec<String>,
) -> Result<ExitCode> {
    use quickwrap::host::KeyBindings;

    let tag = ctx.api.find_tag(&tag)?;
    if !ctx.api.is_registered(tag) {
        return Err(QuickWrapError::CommandNotFound(tag.command_id()));
    }
    let binding = Binding { modifiers, key };
    let host = ctx.api.host();
    host.add_binding(&tag.command_id(), binding.clone());
    host.persist_bindings()?;
    println!("Bound {} to {}", binding, tag.command_name());
    Ok(ExitCode::SUCCESS)
}

fn handle_wrap(ctx: &AppContext, tag: String, text: Option<String>) -> Result<ExitCode> {
    let text = match text {
        Some(text) => text,
        None => read_stdin()?,
    };
    let mut editor = BufferEditor::with_selection(text);

    match ctx.api.run_tag(&tag, &mut editor, &TerminalNotifier)? {
        WrapOutcome::Replaced(wrapped) => {
            println!("{}", wrapped);
            Ok(ExitCode::SUCCESS)
        }
        WrapOutcome::NoSelection => Ok(ExitCode::from(2)),
    }
}

fn handle_sync(ctx: &mut AppContext) -> Result<ExitCode> {
    ctx.api.on_layout_change();
    println!("{} commands registered", ctx.api.registered().len());
    Ok(ExitCode::SUCCESS)
}

/// Read stdin, dropping one trailing newline so piped input wraps cleanly.
fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(QuickWrapError::Io)?;
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(buf)
}
