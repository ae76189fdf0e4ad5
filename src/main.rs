//! Main entry point for the anime-schedule status-bar widget.
//!
//! Always prints exactly one JSON line and exits successfully; failures are
//! reported through the payload's `error` class.

use anime_schedule::api::AniListClient;
use anime_schedule::config::{clamp_day_offset, Config};
use anime_schedule::present::error_payload;
use anime_schedule::types::Mode;
use anime_schedule::widget;
use anime_schedule::window::DayWindow;
use clap::Parser;
use log::{debug, warn};
use std::path::PathBuf;

/// Command-line arguments. Each flag overrides the config file and environment.
#[derive(Parser, Debug)]
#[command(
    name = "anime-schedule",
    version,
    about = "Anime airing schedule for your status bar",
    long_about = "Query AniList for today's airing episodes or your watch list and print a waybar JSON payload."
)]
struct Args {
    /// AniList user name (overrides ANILIST_USER and username=)
    #[arg(short, long)]
    user: Option<String>,

    /// Mode: "user", "list" or "global"
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Number of entries considered for the headline
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Day offset from today (e.g. 1 for tomorrow)
    #[arg(short, long, allow_hyphen_values = true)]
    days: Option<i64>,

    /// Path to the key=value config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level: 0=error, 1=warn, 2=info, 3=debug, 4=trace
    #[arg(short, long, default_value_t = 1)]
    log: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Initialize logging (stderr; stdout carries the payload)
    let log_level = match args.log {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    debug!("Log level set to {:?}", log_level);

    // Load config
    let mut config = Config::load(args.config.as_deref());

    // Merge config with CLI args
    if let Some(user) = &args.user {
        config.apply_user_override(user);
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(limit) = args.limit {
        config.limit = limit.max(1);
    }
    if let Some(days) = args.days {
        config.day_offset = clamp_day_offset(days);
    }

    debug!("Resolved config: {:?}", config);

    let window = DayWindow::today(config.day_offset);
    let payload = match AniListClient::new() {
        Ok(client) => widget::run(&config, &client, &window).await,
        Err(e) => {
            warn!("Failed to build HTTP client: {}", e);
            error_payload(&e)
        }
    };

    println!("{}", payload.to_json());
}
