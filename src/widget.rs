//! One pass of the widget: window, fetch, render.

use crate::api::AniListClient;
use crate::config::Config;
use crate::present::render_in;
use crate::types::DisplayPayload;
use crate::window::DayWindow;
use chrono::{Local, TimeZone};
use log::{info, warn};

/// Fetch and render the payload for `window`, with times in local time.
pub async fn run(config: &Config, client: &AniListClient, window: &DayWindow) -> DisplayPayload {
    run_in(config, client, window, &Local).await
}

/// Fetch and render the payload for `window`, with times in `tz`.
///
/// Never fails: fetch errors become the error payload.
pub async fn run_in<Tz: TimeZone>(
    config: &Config,
    client: &AniListClient,
    window: &DayWindow,
    tz: &Tz,
) -> DisplayPayload
where
    Tz::Offset: std::fmt::Display,
{
    let result = client.fetch(config, window).await;
    match &result {
        Ok(entries) => info!("{} entries for {} mode", entries.len(), config.effective_mode()),
        Err(e) => warn!("Fetch failed: {}", e),
    }
    render_in(&result, config, tz)
}
