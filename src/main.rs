use highlights_app::*;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::Config;
use database::{HighlightRepository, ImportJobRepository, SqliteStore, Store};
use models::{
    DigestRequestPayload, HighlightImportPayload, HighlightSource, ImportEntry, NotePayload,
    ReviewFeedbackPayload,
};

/// Highlights - spaced repetition review for reading highlights
#[derive(Parser)]
#[command(name = "highlights")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Import highlights, review them on a schedule and plan digests")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import highlights from a JSON payload file
    Import {
        /// Path to the payload ({"source": ..., "entries": [...]})
        file: PathBuf,
    },

    /// Add a manual note
    Note {
        /// Note text
        text: String,
        /// Title of the book or article
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: Option<String>,
        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List highlights, newest first
    List {
        /// Show at most this many highlights
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show highlights that are due for review
    Queue,

    /// Grade a highlight: again, hard, good or easy
    Review { id: String, rating: String },

    /// Schedule or inspect digests
    Digest {
        #[command(subcommand)]
        command: DigestCommand,
    },

    /// Show library statistics
    Stats,

    /// List import jobs
    Jobs,

    /// Export all highlights to a JSON file
    Export { output: PathBuf },

    /// Delete a highlight
    Delete { id: String },

    /// Load a few sample highlights
    Seed,
}

#[derive(Subcommand)]
enum DigestCommand {
    /// Schedule a digest for the given RFC 3339 time
    Schedule { when: DateTime<Utc> },
    /// Show the latest scheduled digest
    Latest,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    cli.config.validate()?;
    let store = SqliteStore::open(&cli.config.database_path).with_context(|| {
        format!("failed to open database {}", cli.config.database_path.display())
    })?;

    run(cli.command, &cli.config, &store, Utc::now())
}

/// Directives from `RUST_LOG` when set and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn run<S: Store>(
    command: Commands,
    config: &Config,
    store: &S,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let user_id = config.user_id.as_str();

    match command {
        Commands::Import { file } => {
            let payload = export::import_payload_from_path(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            print_json(&services::process_highlight_import(store, user_id, &payload, now)?)
        }
        Commands::Note {
            text,
            title,
            author,
            tags,
        } => {
            let payload = NotePayload {
                text,
                source_title: title,
                author,
                tags,
            };
            print_json(&services::create_manual_note(store, user_id, &payload, now)?)
        }
        Commands::List { limit } => print_json(&services::list_library(store, user_id, limit)?),
        Commands::Queue => print_json(&services::review_queue(
            store,
            user_id,
            now,
            config.queue_limit,
        )?),
        Commands::Review { id, rating } => {
            let payload = ReviewFeedbackPayload {
                highlight_id: id,
                rating,
            };
            print_json(&services::submit_review_feedback(store, &payload, now)?)
        }
        Commands::Digest { command } => match command {
            DigestCommand::Schedule { when } => {
                let payload = DigestRequestPayload {
                    user_id: user_id.to_string(),
                    scheduled_for: when,
                };
                print_json(&services::schedule_digest(store, &payload)?)
            }
            DigestCommand::Latest => print_json(&services::latest_digest_for_user(store, user_id)?),
        },
        Commands::Stats => print_json(&services::library_stats(store, user_id, now)?),
        Commands::Jobs => print_json(&store.list_jobs(user_id)?),
        Commands::Export { output } => {
            let highlights = store.list_highlights(user_id)?;
            export::export_highlights_to_path(&highlights, &output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Exported {} highlights to {}", highlights.len(), output.display());
            Ok(())
        }
        Commands::Delete { id } => {
            store.delete_highlight(&id)?;
            println!("Deleted highlight {id}");
            Ok(())
        }
        Commands::Seed => {
            let payload = sample_payload(now);
            let result = services::process_highlight_import(store, user_id, &payload, now)?;
            println!("Sample data created! ({} highlights)", result.highlights.len());
            Ok(())
        }
    }
}

fn sample_payload(now: DateTime<Utc>) -> HighlightImportPayload {
    let entry = |text: &str, title: &str, author: &str, days_ago: i64, tags: [&str; 2]| ImportEntry {
        text: text.to_string(),
        source_title: title.to_string(),
        author: Some(author.to_string()),
        location: None,
        captured_at: (now - Duration::days(days_ago)).to_rfc3339(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    };

    HighlightImportPayload {
        source: HighlightSource::Kindle,
        entries: vec![
            entry(
                "Complex ideas deserve repeated exposure. Schedule time to revisit notes that mattered most.",
                "Learning in the Digital Age",
                "A. Lerner",
                6,
                ["learning", "workflow"],
            ),
            entry(
                "Knowledge compounds when you resurface highlights just before you forget them.",
                "Spaced Repetition Playbook",
                "N. Ortega",
                3,
                ["memory", "focus"],
            ),
            entry(
                "Summaries are helpful, but the original words often trigger deeper context and emotion.",
                "Reading for Remembering",
                "L. Chambers",
                1,
                ["reading", "mindset"],
            ),
        ],
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
