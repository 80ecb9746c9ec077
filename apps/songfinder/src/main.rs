use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, normalize_database_url, Settings},
    presenter::{self, ResultRow},
    PreferenceStore, RecommendationClient, RecommendationSession, ViewPhase,
};
use shared::domain::{ContextFlag, PreferenceUpdate};
use storage::SqliteKeyValueStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "songfinder", about = "Song recommendations from your taste profile")]
struct Args {
    /// Recommendation service base URL; overrides settings and environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print the saved preferences.
    Show,
    /// Set one preference, e.g. `set tempo 140`.
    Set { field: String, value: String },
    /// Flip a listening context such as `good_for_running`.
    Toggle { flag: String },
    /// Forget the saved preferences.
    Clear,
    /// Ask the service for songs matching the saved preferences.
    Recommend,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    let settings = resolve_settings(load_settings(), &args);
    info!(
        environment = ?settings.environment,
        api = settings.resolved_base_url(),
        "starting songfinder"
    );

    let records = SqliteKeyValueStore::open(&settings.database_url)
        .await
        .with_context(|| format!("failed to open preference store at {}", settings.database_url))?;
    let store = PreferenceStore::new(Arc::new(records));
    let client = RecommendationClient::from_settings(&settings)
        .context("failed to configure the recommendation client")?;
    let mut session =
        RecommendationSession::open(store, Arc::new(client), settings.result_count).await;

    match args.command {
        Command::Show => {
            println!("{}", serde_json::to_string_pretty(session.preferences())?);
        }
        Command::Set { field, value } => {
            let update = PreferenceUpdate::parse(&field, &value)?;
            let preferences = session.update(update).await;
            println!("{}", serde_json::to_string_pretty(preferences)?);
        }
        Command::Toggle { flag } => {
            let Some(flag) = ContextFlag::from_wire_name(&flag) else {
                bail!("unknown context '{flag}'");
            };
            let enabled = !session.preferences().flag(flag);
            session.update(PreferenceUpdate::Flag(flag, enabled)).await;
            println!("{}: {}", flag.label(), if enabled { "on" } else { "off" });
        }
        Command::Clear => {
            session.clear_saved_preferences().await;
            println!("Saved preferences cleared.");
        }
        Command::Recommend => {
            session.start();
            println!("Finding your perfect songs...");
            match session.run_submission().await {
                Some(ViewPhase::Results) => {
                    let rows = session.rows();
                    println!("{}", presenter::summary_line(rows.len()));
                    for row in &rows {
                        println!("{}", render_row(row));
                    }
                }
                _ => {
                    let message = session
                        .machine()
                        .last_failure()
                        .unwrap_or("Recommendation request did not complete.");
                    bail!("{message}");
                }
            }
        }
    }

    Ok(())
}

fn resolve_settings(mut settings: Settings, args: &Args) -> Settings {
    if let Some(server_url) = &args.server_url {
        settings.api_base_url = Some(server_url.clone());
    }
    let database_url = args
        .database_url
        .as_deref()
        .unwrap_or(&settings.database_url);
    settings.database_url = normalize_database_url(database_url);
    settings
}

fn render_row(row: &ResultRow) -> String {
    let mut out = format!(
        "{:>3}. [{}] {} by {}  {:>6} match\n     {} | {} | {} \u{2022} {}",
        row.rank,
        row.initials,
        row.title,
        row.artist,
        row.score,
        row.genre,
        row.length,
        row.album,
        row.release_date,
    );
    if !row.similar_songs.is_empty() {
        out.push_str("\n     Similar: ");
        out.push_str(&row.similar_songs.join(", "));
    }
    out
}
