mod cli;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use saypi::config::SaypiConfig;

#[derive(Parser)]
#[command(name = "saypi", version, about = "Moods, conversations, and lines for talking cows")]
struct Cli {
    /// Config file (defaults to ~/.saypi/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database path, overriding the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Owner whose data is read or written
    #[arg(long, global = true)]
    owner: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Built-in and user-defined moods
    Moods {
        #[command(subcommand)]
        action: MoodAction,
    },
    /// Conversations
    Convos {
        #[command(subcommand)]
        action: ConvoAction,
    },
    /// Lines within a conversation
    Lines {
        #[command(subcommand)]
        action: LineAction,
    },
}

/// Cursor options shared by list commands.
#[derive(Args)]
struct PageArgs {
    /// Return items after this cursor
    #[arg(long, conflicts_with = "before")]
    after: Option<String>,

    /// Return items before this cursor, newest first
    #[arg(long)]
    before: Option<String>,

    /// Page size (0-100)
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Subcommand)]
enum MoodAction {
    /// List moods: yours first, then the built-ins
    List(PageArgs),
    /// Show one mood
    Get { name: String },
    /// Create or update one of your moods
    Set {
        name: String,
        #[arg(long)]
        eyes: String,
        #[arg(long)]
        tongue: String,
    },
    /// Delete one of your moods
    Delete { name: String },
}

#[derive(Subcommand)]
enum ConvoAction {
    /// List conversations
    List(PageArgs),
    /// Start a conversation
    New { heading: String },
    /// Show a conversation and its lines
    Get { id: String },
    /// Delete a conversation and its lines
    Delete { id: String },
}

#[derive(Subcommand)]
enum LineAction {
    /// Append a line to a conversation
    Add {
        conversation: String,
        #[arg(long, default_value = "default")]
        animal: String,
        #[arg(long, default_value = "default")]
        mood: String,
        #[arg(long)]
        think: bool,
        text: String,
    },
    /// Show one line
    Get { conversation: String, line: String },
    /// Delete one line
    Delete { conversation: String, line: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SaypiConfig::load_from(path)?,
        None => SaypiConfig::load()?,
    };
    if let Some(db) = &cli.db {
        config.storage.db_path = db.to_string_lossy().into_owned();
    }

    // Log to stderr so stdout stays clean JSON.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let owner = cli
        .owner
        .clone()
        .unwrap_or_else(|| config.storage.default_owner.clone());
    let session = cli::Session::open(&config, owner)?;

    match cli.command {
        Command::Moods { action } => match action {
            MoodAction::List(page) => session.list_moods(page.after, page.before, page.limit),
            MoodAction::Get { name } => session.get_mood(&name),
            MoodAction::Set { name, eyes, tongue } => session.set_mood(&name, &eyes, &tongue),
            MoodAction::Delete { name } => session.delete_mood(&name),
        },
        Command::Convos { action } => match action {
            ConvoAction::List(page) => {
                session.list_conversations(page.after, page.before, page.limit)
            }
            ConvoAction::New { heading } => session.new_conversation(&heading),
            ConvoAction::Get { id } => session.get_conversation(&id),
            ConvoAction::Delete { id } => session.delete_conversation(&id),
        },
        Command::Lines { action } => match action {
            LineAction::Add {
                conversation,
                animal,
                mood,
                think,
                text,
            } => session.insert_line(
                &conversation,
                saypi::say::NewLine {
                    animal,
                    think,
                    mood,
                    text,
                },
            ),
            LineAction::Get { conversation, line } => session.get_line(&conversation, &line),
            LineAction::Delete { conversation, line } => {
                session.delete_line(&conversation, &line)
            }
        },
    }
}
