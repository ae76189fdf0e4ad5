//! Rendering of fetch results into the status-bar payload.
//!
//! Exactly one of four shapes is produced, checked in this order: error,
//! unconfigured ("set user"), empty, and the normal listing.

use crate::aggregate::{aggregate, Aggregate};
use crate::config::{Config, USER_ENV};
use crate::error::AppError;
use crate::types::{DisplayClass, DisplayPayload, Mode, ScheduleEntry};
use chrono::TimeZone;

/// Glyph prefixed to every headline.
pub const ICON: &str = "󰎊";

const DEFAULT_CONFIG_HINT: &str = "~/.config/waybar/anime_schedule.conf";

/// Render with times shown in `tz`.
pub fn render_in<Tz: TimeZone>(
    result: &Result<Vec<ScheduleEntry>, AppError>,
    config: &Config,
    tz: &Tz,
) -> DisplayPayload
where
    Tz::Offset: std::fmt::Display,
{
    let entries = match result {
        Ok(entries) => entries,
        Err(err) => return error_payload(err),
    };

    if entries.is_empty() {
        return empty_payload(config);
    }

    let agg = aggregate(entries, config.limit);
    match config.mode {
        Mode::List => list_payload(&agg),
        Mode::User | Mode::Global => airing_payload(&agg, tz),
    }
}

pub fn error_payload(err: &AppError) -> DisplayPayload {
    DisplayPayload {
        text: format!("{} AN: error", ICON),
        class: DisplayClass::Error,
        tooltip: format!("Anime schedule error: {}", err),
    }
}

fn empty_payload(config: &Config) -> DisplayPayload {
    let (text, tooltip) = match (config.mode, &config.username) {
        (Mode::User | Mode::List, None) => {
            let path = config
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| DEFAULT_CONFIG_HINT.to_string());
            (
                "set user",
                format!("Set {} env or username= in {}", USER_ENV, path),
            )
        }
        (Mode::List, Some(_)) => ("empty", "No entries in selected list status.".to_string()),
        _ => ("none", "No scheduled episodes for this day.".to_string()),
    };

    DisplayPayload {
        text: format!("{} AN: {}", ICON, text),
        class: DisplayClass::Muted,
        tooltip,
    }
}

fn list_payload(agg: &Aggregate<'_>) -> DisplayPayload {
    let lines: Vec<String> = agg
        .tooltip
        .iter()
        .filter_map(|entry| match entry {
            ScheduleEntry::Listed(item) => Some(match item.progress_display() {
                Some(progress) => format!("{}  {}", item.title, progress),
                None => item.title.clone(),
            }),
            ScheduleEntry::Airing(_) => None,
        })
        .collect();

    DisplayPayload {
        text: format!("{} AN: {}", ICON, agg.total),
        class: DisplayClass::Normal,
        tooltip: lines.join("\n"),
    }
}

fn airing_payload<Tz: TimeZone>(agg: &Aggregate<'_>, tz: &Tz) -> DisplayPayload
where
    Tz::Offset: std::fmt::Display,
{
    let line = |entry: &ScheduleEntry, sep: &str| match entry {
        ScheduleEntry::Airing(item) => format!(
            "{}{sep}{}{sep}E{}",
            format_time(item.airing, tz),
            item.title,
            episode_label(item.episode),
        ),
        ScheduleEntry::Listed(item) => item.title.clone(),
    };

    let mut text = match agg.headline.first() {
        Some(first) => format!("{} {}", ICON, line(first, " ")),
        None => format!("{} AN: none", ICON),
    };
    let more = agg.total.saturating_sub(1);
    if more > 0 {
        text.push_str(&format!(" +{}", more));
    }

    let tooltip = agg
        .tooltip
        .iter()
        .map(|entry| line(entry, "  "))
        .collect::<Vec<_>>()
        .join("\n");

    DisplayPayload {
        text,
        class: DisplayClass::Normal,
        tooltip,
    }
}

fn episode_label(episode: Option<i64>) -> String {
    episode.map_or_else(|| "?".to_string(), |e| e.to_string())
}

/// `HH:MM` of a Unix timestamp in `tz`.
///
/// # Examples
///
/// ```
/// use anime_schedule::present::format_time;
/// use chrono::Utc;
///
/// assert_eq!(format_time(1_700_010_000, &Utc), "01:00");
/// ```
pub fn format_time<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match tz.timestamp_opt(timestamp, 0).single() {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AiringEntry, ListEntry};
    use chrono::{FixedOffset, Utc};
    use std::path::PathBuf;

    fn airing(ts: i64, episode: Option<i64>, title: &str) -> ScheduleEntry {
        ScheduleEntry::Airing(AiringEntry {
            airing: ts,
            episode,
            title: title.to_string(),
            url: String::new(),
        })
    }

    fn listed(title: &str, progress: Option<i64>, episodes: Option<i64>) -> ScheduleEntry {
        ScheduleEntry::Listed(ListEntry {
            title: title.to_string(),
            progress,
            episodes,
            url: String::new(),
        })
    }

    fn config(mode: Mode, username: Option<&str>) -> Config {
        Config {
            mode,
            username: username.map(str::to_string),
            ..Config::new()
        }
    }

    #[test]
    fn test_error_state() {
        let result = Err(AppError::Network("operation timed out".to_string()));
        let payload = render_in(&result, &config(Mode::User, Some("alice")), &Utc);

        assert_eq!(payload.text, "󰎊 AN: error");
        assert_eq!(payload.class, DisplayClass::Error);
        assert_eq!(
            payload.tooltip,
            "Anime schedule error: Network error: operation timed out"
        );
    }

    #[test]
    fn test_unconfigured_state() {
        for mode in [Mode::User, Mode::List] {
            let payload = render_in(&Ok(vec![]), &config(mode, None), &Utc);
            assert_eq!(payload.text, "󰎊 AN: set user");
            assert_eq!(payload.class, DisplayClass::Muted);
            assert!(payload.tooltip.contains("ANILIST_USER"));
            assert!(payload.tooltip.contains(DEFAULT_CONFIG_HINT));
        }
    }

    #[test]
    fn test_unconfigured_hint_uses_loaded_path() {
        let mut cfg = config(Mode::User, None);
        cfg.path = Some(PathBuf::from("/etc/anime.conf"));
        let payload = render_in(&Ok(vec![]), &cfg, &Utc);
        assert!(payload.tooltip.ends_with("/etc/anime.conf"));
    }

    #[test]
    fn test_empty_states() {
        let payload = render_in(&Ok(vec![]), &config(Mode::List, Some("alice")), &Utc);
        assert_eq!(payload.text, "󰎊 AN: empty");
        assert_eq!(payload.class, DisplayClass::Muted);

        let payload = render_in(&Ok(vec![]), &config(Mode::User, Some("alice")), &Utc);
        assert_eq!(payload.text, "󰎊 AN: none");

        let payload = render_in(&Ok(vec![]), &config(Mode::Global, None), &Utc);
        assert_eq!(payload.text, "󰎊 AN: none");
        assert_eq!(payload.tooltip, "No scheduled episodes for this day.");
    }

    #[test]
    fn test_global_normal_state() {
        let entries = vec![
            airing(1_700_010_000, Some(5), "Show A"),
            airing(1_700_050_000, Some(2), "Show B"),
        ];
        let payload = render_in(&Ok(entries), &config(Mode::Global, None), &Utc);

        assert_eq!(payload.text, "󰎊 01:00 Show A E5 +1");
        assert_eq!(payload.class, DisplayClass::Normal);
        assert_eq!(payload.tooltip, "01:00  Show A  E5\n12:06  Show B  E2");
    }

    #[test]
    fn test_user_mode_without_username_renders_entries() {
        let entries = vec![airing(1_700_010_000, Some(5), "Show A")];
        let payload = render_in(&Ok(entries), &config(Mode::User, None), &Utc);
        assert_eq!(payload.text, "󰎊 01:00 Show A E5");
    }

    #[test]
    fn test_single_entry_has_no_suffix() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let entries = vec![airing(1_700_010_000, None, "Solo")];
        let payload = render_in(&Ok(entries), &config(Mode::User, Some("alice")), &tz);

        assert_eq!(payload.text, "󰎊 10:00 Solo E?");
        assert_eq!(payload.tooltip, "10:00  Solo  E?");
    }

    #[test]
    fn test_suffix_counts_all_entries_beyond_first() {
        let entries: Vec<_> = (0..30)
            .map(|i| airing(1_700_000_000 + i * 60, Some(i), "Show"))
            .collect();
        let mut cfg = config(Mode::Global, None);
        cfg.limit = 1;
        let payload = render_in(&Ok(entries), &cfg, &Utc);

        assert!(payload.text.ends_with(" +29"));
        assert_eq!(payload.tooltip.lines().count(), 20);
    }

    #[test]
    fn test_list_normal_state() {
        let entries = vec![
            listed("Frieren", Some(3), Some(28)),
            listed("One Piece", Some(1100), None),
            listed("Planned", None, Some(12)),
        ];
        let payload = render_in(&Ok(entries), &config(Mode::List, Some("alice")), &Utc);

        assert_eq!(payload.text, "󰎊 AN: 3");
        assert_eq!(payload.class, DisplayClass::Normal);
        assert_eq!(payload.tooltip, "Frieren  3/28\nOne Piece  1100\nPlanned");
    }

    #[test]
    fn test_list_tooltip_capped_total_not() {
        let entries: Vec<_> = (0..25).map(|i| listed(&format!("S{}", i), None, None)).collect();
        let payload = render_in(&Ok(entries), &config(Mode::List, Some("alice")), &Utc);

        assert_eq!(payload.text, "󰎊 AN: 25");
        assert_eq!(payload.tooltip.lines().count(), 20);
    }

    #[test]
    fn test_format_time_out_of_range() {
        assert_eq!(format_time(i64::MAX, &Utc), "--:--");
    }
}
