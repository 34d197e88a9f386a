//! easypass - Local credential vault
//!
//! Keeps named secrets in a per-user data directory.
//!
//! Commands:
//! - list: List entry names
//! - add <NAME> [SECRET]: Store a new entry (prompts if no secret)
//! - get <NAME>: Print a secret
//! - edit <NAME>: Change name, secret or description
//! - delete <NAME>: Remove an entry
//! - move <NAME>: Reorder an entry above/below another
//! - export [FILE]: Write an export file
//! - import <FILE>: Read an export file
//! - settings: Show or change settings
//! - stats: Show storage usage
//! - path: Show the data directory
//! - clear: Delete all stored data

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use easypass::collection::{self, EntryDraft, Placement};
use easypass::{CredentialStore, Entry, StorageType};
use easypass_core::{format, Config, Paths};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "easypass")]
#[command(about = "Local credential vault - named secrets kept in your data directory")]
#[command(version)]
#[command(after_help = r#"STORAGE:
    Linux:   ~/.config/easypass/
    macOS:   ~/Library/Application Support/easypass/
    Windows: ~/AppData/Roaming/easypass/

    entries.json   your entries (plain JSON, not encrypted)
    settings.json  preferences

ENVIRONMENT:
    EASYPASS_DATA_DIR  use another data directory
    EASYPASS_LOG       log filter when RUST_LOG is unset"#)]
struct Cli {
    /// Data directory (overrides config and EASYPASS_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored entries (secrets hidden)
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Store a new entry (prompts securely if secret not provided)
    Add {
        /// Entry name (must be unique, case-insensitive)
        name: String,
        /// Secret value (omit for hidden prompt)
        secret: Option<String>,
        /// Optional description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Print a stored secret
    Get {
        /// Don't print trailing newline (useful for piping)
        #[arg(short = 'n')]
        no_newline: bool,
        /// Entry name
        name: String,
    },

    /// Change an existing entry
    Edit {
        /// Entry name
        name: String,
        /// New name
        #[arg(long)]
        rename: Option<String>,
        /// New secret
        #[arg(long)]
        secret: Option<String>,
        /// Prompt for a new secret
        #[arg(long, conflicts_with = "secret")]
        prompt: bool,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete an entry permanently
    Delete {
        /// Entry name
        name: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Move an entry above or below another
    Move(MoveArgs),

    /// Export entries to a file ("-" for stdout)
    Export {
        #[arg(default_value = "easypass-export.json")]
        file: PathBuf,
    },

    /// Import entries from an export file
    Import {
        file: PathBuf,
        /// Replace all entries instead of merging
        #[arg(long)]
        replace: bool,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Show storage usage
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Print the data directory
    Path,

    /// Delete all entries and settings
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
struct MoveArgs {
    /// Entry to move
    name: String,
    #[command(flatten)]
    target: MoveTarget,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct MoveTarget {
    /// Place directly above this entry
    #[arg(long)]
    above: Option<String>,
    /// Place directly below this entry
    #[arg(long)]
    below: Option<String>,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print current settings
    Show,
    /// Restore defaults
    Reset,
    /// Change one setting (e.g. clear-clipboard-after 30)
    Set { key: String, value: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::discover()?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let paths: Paths = config.paths();
    let store = CredentialStore::open(&paths);

    match cli.command {
        Some(Commands::List { json }) => cmd_list(&store, json),
        Some(Commands::Add {
            name,
            secret,
            description,
        }) => cmd_add(&store, &name, secret, &description),
        Some(Commands::Get { no_newline, name }) => cmd_get(&store, &name, no_newline),
        Some(Commands::Edit {
            name,
            rename,
            secret,
            prompt,
            description,
        }) => {
            let secret = if prompt {
                Some(prompt_secret("New secret: ")?)
            } else {
                secret
            };
            cmd_edit(&store, &name, rename, secret, description)
        }
        Some(Commands::Delete { name, yes }) => cmd_delete(&store, &name, yes),
        Some(Commands::Move(args)) => cmd_move(&store, args),
        Some(Commands::Export { file }) => cmd_export(&store, &file),
        Some(Commands::Import { file, replace }) => cmd_import(&store, &file, replace),
        Some(Commands::Settings { action }) => cmd_settings(&store, action),
        Some(Commands::Stats { json }) => cmd_stats(&store, json),
        Some(Commands::Path) => {
            println!("{}", store.data_directory_path().display());
            Ok(())
        }
        Some(Commands::Clear { yes }) => cmd_clear(&store, yes),
        None => cmd_list(&store, false),
    }
}

/// Prompt for hidden input; empty input is refused
fn prompt_secret(prompt: &str) -> Result<String> {
    let secret = rpassword::prompt_password(prompt).context("Failed to read secret")?;
    if secret.is_empty() {
        bail!("Empty secret not allowed");
    }
    Ok(secret)
}

/// Ask a yes/no question on stderr
fn confirm(question: &str) -> Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn save(store: &CredentialStore, entries: &[Entry]) -> Result<()> {
    if !store.save_entries(entries) {
        bail!(
            "Failed to save entries in {}",
            store.data_directory_path().display()
        );
    }
    Ok(())
}

fn require<'a>(entries: &'a [Entry], name: &str) -> Result<&'a Entry> {
    collection::find_by_name(entries, name).with_context(|| format!("Entry not found: {}", name))
}

/// Entries as JSON with secrets masked
fn json_listing(entries: &[Entry]) -> Vec<serde_json::Value> {
    entries
        .iter()
        .map(|e| {
            serde_json::json!({
                "id": e.id,
                "name": e.name,
                "secret": format::mask(&e.secret),
                "description": e.description,
            })
        })
        .collect()
}

/// List entries
fn cmd_list(store: &CredentialStore, json: bool) -> Result<()> {
    let entries = store.load_entries();

    if json {
        println!("{}", serde_json::to_string_pretty(&json_listing(&entries))?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No entries stored. Add one with: easypass add <name>");
        return Ok(());
    }

    let settings = store.load_settings();
    println!("Stored Entries");
    println!();

    for entry in &entries {
        if settings.show_descriptions && !entry.description.is_empty() {
            println!(
                "  {:<24} {}",
                format::truncate(&entry.name, 24),
                format::truncate(&entry.description, 48)
            );
        } else {
            println!("  {}", entry.name);
        }
    }

    Ok(())
}

/// Store a new entry
fn cmd_add(
    store: &CredentialStore,
    name: &str,
    secret: Option<String>,
    description: &str,
) -> Result<()> {
    let secret = match secret {
        Some(s) => s,
        None => prompt_secret("Enter secret: ")?,
    };

    let mut entries = store.load_entries();
    let entry = collection::add_entry(&mut entries, &EntryDraft::new(name, &secret, description))?;
    save(store, &entries)?;

    println!("success: Entry stored: {}", entry.name);
    Ok(())
}

/// Print a secret
fn cmd_get(store: &CredentialStore, name: &str, no_newline: bool) -> Result<()> {
    let entries = store.load_entries();
    let entry = require(&entries, name)?;

    if no_newline {
        print!("{}", entry.secret);
    } else {
        println!("{}", entry.secret);
    }
    Ok(())
}

/// Change an existing entry
fn cmd_edit(
    store: &CredentialStore,
    name: &str,
    rename: Option<String>,
    secret: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let mut entries = store.load_entries();
    let current = require(&entries, name)?.clone();

    let draft = EntryDraft {
        name: rename.unwrap_or(current.name),
        secret: secret.unwrap_or(current.secret),
        description: description.unwrap_or(current.description),
    };
    let updated = collection::update_entry(&mut entries, current.id, &draft)?;
    save(store, &entries)?;

    println!("success: Entry updated: {}", updated.name);
    Ok(())
}

/// Delete an entry
fn cmd_delete(store: &CredentialStore, name: &str, yes: bool) -> Result<()> {
    let mut entries = store.load_entries();
    let id = require(&entries, name)?.id;

    if !yes && store.load_settings().confirm_delete && !confirm(&format!("Delete '{}'?", name))? {
        println!("Cancelled");
        return Ok(());
    }

    let removed = collection::remove_entry(&mut entries, id)?;
    save(store, &entries)?;

    println!("success: Entry deleted: {}", removed.name);
    Ok(())
}

/// Reorder an entry
fn cmd_move(store: &CredentialStore, args: MoveArgs) -> Result<()> {
    let (target, placement) = match (args.target.above, args.target.below) {
        (Some(t), None) => (t, Placement::Above),
        (None, Some(t)) => (t, Placement::Below),
        _ => bail!("Specify exactly one of --above or --below"),
    };

    let mut entries = store.load_entries();
    let dragged = require(&entries, &args.name)?.id;
    let target_id = require(&entries, &target)?.id;

    collection::move_entry(&mut entries, dragged, target_id, placement)?;
    save(store, &entries)?;

    println!("success: Entry order updated");
    Ok(())
}

/// Export entries
fn cmd_export(store: &CredentialStore, file: &PathBuf) -> Result<()> {
    let entries = store.load_entries();
    let text = store
        .export_entries(&entries)
        .context("Failed to export entries")?;

    if file.as_os_str() == "-" {
        println!("{}", text);
        return Ok(());
    }

    std::fs::write(file, text)
        .with_context(|| format!("Failed to write export: {}", file.display()))?;

    println!("success: {} entries exported to: {}", entries.len(), file.display());
    println!("The export file is not encrypted. Store it somewhere safe.");
    Ok(())
}

/// Import entries
fn cmd_import(store: &CredentialStore, file: &PathBuf, replace: bool) -> Result<()> {
    if !file.exists() {
        bail!("Import file not found: {}", file.display());
    }

    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;
    let incoming = store
        .import_entries(&text)
        .context("Invalid import file: expected an easypass export")?;

    let mut entries = if replace {
        Vec::new()
    } else {
        store.load_entries()
    };
    let added = collection::merge_entries(&mut entries, &incoming);
    save(store, &entries)?;

    let skipped = incoming.len() - added;
    println!("success: {} entries imported", added);
    if skipped > 0 {
        println!("{} skipped (name already exists)", skipped);
    }
    Ok(())
}

/// Show or change settings
fn cmd_settings(store: &CredentialStore, action: Option<SettingsAction>) -> Result<()> {
    match action.unwrap_or(SettingsAction::Show) {
        SettingsAction::Show => {
            let settings = store.load_settings();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Reset => {
            if !store.save_settings(&store.default_settings()) {
                bail!("Failed to save settings");
            }
            println!("success: Settings reset to defaults");
        }
        SettingsAction::Set { key, value } => {
            let mut settings = store.load_settings();
            settings.set(&key, &value)?;
            if !store.save_settings(&settings) {
                bail!("Failed to save settings");
            }
            println!("success: {} = {}", key, value);
        }
    }
    Ok(())
}

/// Show storage usage
fn cmd_stats(store: &CredentialStore, json: bool) -> Result<()> {
    let stats = store
        .storage_stats()
        .context("Failed to read storage stats")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let mode = match stats.storage_type {
        StorageType::File => "file",
        StorageType::Legacy => "legacy (not yet migrated)",
    };

    println!("Storage");
    println!();
    println!("  Directory: {}", store.data_directory_path().display());
    println!("  Mode:      {}", mode);
    println!("  Entries:   {}", format::bytes(stats.entries_size));
    println!("  Settings:  {}", format::bytes(stats.settings_size));
    println!("  Total:     {}", format::bytes(stats.total_size));
    println!("  As of:     {}", stats.last_modified);
    Ok(())
}

/// Delete all stored data
fn cmd_clear(store: &CredentialStore, yes: bool) -> Result<()> {
    if !yes && !confirm("Delete all entries and settings?")? {
        println!("Cancelled");
        return Ok(());
    }

    if !store.clear_all_data() {
        bail!("Failed to clear all data");
    }

    println!("success: All data cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        let cli = Cli::try_parse_from(["easypass", "add", "prod", "s3cret", "-d", "main db"]).unwrap();
        if let Some(Commands::Add {
            name,
            secret,
            description,
        }) = cli.command
        {
            assert_eq!(name, "prod");
            assert_eq!(secret, Some("s3cret".to_string()));
            assert_eq!(description, "main db");
        } else {
            panic!("Expected Add command");
        }

        let cli = Cli::try_parse_from(["easypass", "get", "-n", "prod"]).unwrap();
        if let Some(Commands::Get { no_newline, name }) = cli.command {
            assert!(no_newline);
            assert_eq!(name, "prod");
        } else {
            panic!("Expected Get command");
        }

        let cli = Cli::try_parse_from(["easypass"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_json_listing_masks_secrets() {
        let entries = vec![Entry::new(3, "prod", "s3cret", "main db")];
        let listing = json_listing(&entries);

        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0]["id"], 3);
        assert_eq!(listing[0]["name"], "prod");
        assert_eq!(listing[0]["secret"], "********");
        assert_eq!(listing[0]["description"], "main db");
        assert!(!listing[0].to_string().contains("s3cret"));
    }

    #[test]
    fn test_cli_global_data_dir() {
        let cli = Cli::try_parse_from(["easypass", "path", "--data-dir", "/tmp/ep"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/ep")));
        assert!(matches!(cli.command, Some(Commands::Path)));
    }

    #[test]
    fn test_cli_move_requires_one_target() {
        let cli = Cli::try_parse_from(["easypass", "move", "a", "--below", "b"]).unwrap();
        if let Some(Commands::Move(args)) = cli.command {
            assert_eq!(args.name, "a");
            assert_eq!(args.target.below, Some("b".to_string()));
            assert!(args.target.above.is_none());
        } else {
            panic!("Expected Move command");
        }

        assert!(Cli::try_parse_from(["easypass", "move", "a"]).is_err());
        assert!(Cli::try_parse_from(["easypass", "move", "a", "--above", "b", "--below", "c"]).is_err());
    }

    #[test]
    fn test_cli_settings_set() {
        let cli =
            Cli::try_parse_from(["easypass", "settings", "set", "clear-clipboard-after", "30"])
                .unwrap();
        if let Some(Commands::Settings {
            action: Some(SettingsAction::Set { key, value }),
        }) = cli.command
        {
            assert_eq!(key, "clear-clipboard-after");
            assert_eq!(value, "30");
        } else {
            panic!("Expected Settings Set command");
        }
    }

    #[test]
    fn test_cli_edit_prompt_conflicts_with_secret() {
        assert!(Cli::try_parse_from(["easypass", "edit", "a", "--secret", "x", "--prompt"]).is_err());
    }
}
