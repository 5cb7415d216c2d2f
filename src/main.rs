//! Pinstore CLI - command-line front end for the pin database

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use pinstore::config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{Context, NewPin, PinEdit};

#[derive(Parser)]
#[command(name = "pinstore")]
#[command(version)]
#[command(about = "Local persistence for pinned notes and their groups")]
#[command(long_about = r#"
Pinstore keeps short pinned notes in a local SQLite database, organized
into groups. The pre-seeded "unlimited" group is exempt from display limits.

Example usage:
  pinstore add --title "Milk" --visibility 1 --priority 0 --show-actions
  pinstore list
  pinstore update --id 1 --color 2 --group Unlimited
  pinstore delete --id 1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new pin
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(long, default_value = "")]
        content: String,

        /// Visibility level of the pin
        #[arg(long, allow_negative_numbers = true)]
        visibility: i32,

        /// Priority of the pin
        #[arg(short, long, allow_negative_numbers = true)]
        priority: i32,

        /// Color: 0 for none, 1-3 for a concrete color
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        color: i64,

        /// Keep the pin from being dismissed
        #[arg(long)]
        persistent: bool,

        /// Show action buttons with the pin
        #[arg(long)]
        show_actions: bool,

        /// Group label (as shown by `groups`)
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Change an existing pin; unspecified fields keep their values
    Update {
        #[arg(long)]
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        visibility: Option<i32>,

        #[arg(short, long, allow_negative_numbers = true)]
        priority: Option<i32>,

        #[arg(long, allow_negative_numbers = true)]
        color: Option<i64>,

        #[arg(long)]
        persistent: Option<bool>,

        #[arg(long)]
        show_actions: Option<bool>,

        /// Move the pin into this group
        #[arg(short, long, conflicts_with = "ungroup")]
        group: Option<String>,

        /// Remove the pin from its group
        #[arg(long)]
        ungroup: bool,
    },

    /// Delete a pin
    Delete {
        #[arg(long)]
        id: i64,
    },

    /// Delete every pin (groups are kept)
    Clear,

    /// Print the number of stored pins
    Count,

    /// List all pins
    List,

    /// List groups in display order
    Groups,

    /// Replay every stored pin, as done after a restart
    Restore,

    /// Show statistics about the database
    Stats,

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the version
    Version,
}

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Print a JSON success envelope for `command`
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    debug_assert!(!output_mode.is_human());
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let loaded = config::load_config(Some(config_path.as_path()))?.unwrap_or_default();
    let cwd = std::env::current_dir()?;
    let database = loaded.database_path(cli.database.as_deref(), &cwd);

    let ctx = Context {
        output_mode,
        config: loaded,
        config_path,
        database,
    };

    match cli.command {
        Commands::Add { title, content, visibility, priority, color, persistent, show_actions, group } => {
            commands::run_add(&ctx, NewPin {
                title,
                content,
                visibility,
                priority,
                color,
                persistent,
                show_actions,
                group,
            })
        }
        Commands::Update {
            id,
            title,
            content,
            visibility,
            priority,
            color,
            persistent,
            show_actions,
            group,
            ungroup,
        } => commands::run_update(&ctx, id, PinEdit {
            title,
            content,
            visibility,
            priority,
            color,
            persistent,
            show_actions,
            group,
            ungroup,
        }),
        Commands::Delete { id } => commands::run_delete(&ctx, id),
        Commands::Clear => commands::run_clear(&ctx),
        Commands::Count => commands::run_count(&ctx),
        Commands::List => commands::run_list(&ctx),
        Commands::Groups => commands::run_groups(&ctx),
        Commands::Restore => commands::run_restore(&ctx),
        Commands::Stats => commands::run_stats(&ctx),
        Commands::Init { force } => commands::run_init(&ctx, force),
        Commands::Version => commands::run_version(output_mode),
    }
}
