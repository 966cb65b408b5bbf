mod commands;
mod notifier;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tempo_core::config::AppConfig;
use tempo_storage::Database;

use commands::helpers::{parse_ratio, parse_toggle, resolve_profile};
use commands::profile::ProfileAction;
use commands::settings::SettingsUpdate;

#[derive(Parser)]
#[command(name = "tempo")]
#[command(about = "Work/leisure session timer", long_about = None)]
struct Cli {
    /// Database file (defaults to tempo.db in the data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Start an interactive timer session
    Run {
        /// Profile name (defaults to `default_profile` from config.toml)
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Show past sessions
    History {
        /// Profile name
        #[arg(short, long)]
        profile: Option<String>,
        /// Only show the most recent N sessions
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the last seven days and overall totals
    Stats {
        /// Profile name
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Show challenge progress
    Challenges {
        /// Profile name
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Show or change profile settings
    Settings {
        /// Profile name
        #[arg(short, long)]
        profile: Option<String>,
        /// Show notices while the timer runs (on/off)
        #[arg(long, value_parser = parse_toggle)]
        notifications: Option<bool>,
        /// Ring the terminal bell with notices (on/off)
        #[arg(long, value_parser = parse_toggle)]
        sound: Option<bool>,
        /// Percentage of work time earned as leisure (0-100, steps of 10)
        #[arg(long, value_parser = parse_ratio)]
        ratio: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let config = AppConfig::load_or_default();
    let db = Arc::new(Database::new(cli.db)?);

    match cli.command {
        Commands::Profile { action } => commands::profile::handle_profile_command(&db, action),
        Commands::Run { profile } => {
            let profile = resolve_profile(&db, profile.as_deref(), &config)?;
            commands::run::handle_run_command(db, &profile, &config).await
        }
        Commands::History {
            profile,
            limit,
            json,
        } => {
            let profile = resolve_profile(&db, profile.as_deref(), &config)?;
            commands::history::handle_history_command(&db, &profile, limit, json)
        }
        Commands::Stats { profile } => {
            let profile = resolve_profile(&db, profile.as_deref(), &config)?;
            commands::stats::handle_stats_command(&db, &profile)
        }
        Commands::Challenges { profile } => {
            let profile = resolve_profile(&db, profile.as_deref(), &config)?;
            commands::stats::handle_challenges_command(&db, &profile)
        }
        Commands::Settings {
            profile,
            notifications,
            sound,
            ratio,
        } => {
            let profile = resolve_profile(&db, profile.as_deref(), &config)?;
            let update = SettingsUpdate {
                notifications,
                sound,
                ratio,
            };
            commands::settings::handle_settings_command(&db, &profile, &update)
        }
    }
}
