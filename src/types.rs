//! Type definitions for the anime-schedule widget.
//!
//! This module contains the core data structures shared by the fetcher,
//! aggregator and presenter: the operating mode, the normalized schedule
//! entries and the display payload written to the status bar.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which query and aggregation strategy runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Airing episodes from the user's CURRENT and PLANNING lists.
    #[default]
    User,
    /// The user's list filtered by status, without time filtering.
    List,
    /// Every airing schedule for the day.
    Global,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::User => "user",
            Mode::List => "list",
            Mode::Global => "global",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = AppError;

    /// Parse a mode name, case-insensitively. An empty string means `user`.
    ///
    /// # Examples
    ///
    /// ```
    /// use anime_schedule::types::Mode;
    ///
    /// assert_eq!("GLOBAL".parse::<Mode>().unwrap(), Mode::Global);
    /// assert_eq!("".parse::<Mode>().unwrap(), Mode::User);
    /// assert!("weekly".parse::<Mode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "user" => Ok(Mode::User),
            "list" => Ok(Mode::List),
            "global" => Ok(Mode::Global),
            other => Err(AppError::Config(format!(
                "unknown mode '{}', expected user, list or global",
                other
            ))),
        }
    }
}

/// Title block of an AniList media object.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MediaTitle {
    #[serde(default)]
    pub romaji: Option<String>,
    #[serde(default)]
    pub english: Option<String>,
}

impl MediaTitle {
    /// Pick the display title: romaji, then english, then `"?"`.
    ///
    /// Empty strings count as missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use anime_schedule::types::MediaTitle;
    ///
    /// let title = MediaTitle { romaji: Some("".into()), english: Some("Foo".into()) };
    /// assert_eq!(title.resolve(), "Foo");
    /// assert_eq!(MediaTitle::default().resolve(), "?");
    /// ```
    pub fn resolve(&self) -> String {
        [&self.romaji, &self.english]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
            .cloned()
            .unwrap_or_else(|| "?".to_string())
    }
}

/// An episode airing at a known time.
#[derive(Debug, Clone, PartialEq)]
pub struct AiringEntry {
    /// Unix timestamp (seconds) the episode airs at.
    pub airing: i64,
    pub episode: Option<i64>,
    pub title: String,
    pub url: String,
}

/// An item of the user's anime list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub title: String,
    /// Episodes watched so far.
    pub progress: Option<i64>,
    /// Total episode count, when the series has one.
    pub episodes: Option<i64>,
    pub url: String,
}

impl ListEntry {
    /// Format the progress column: `"3/12"`, `"3"` or nothing.
    ///
    /// A zero episode count is treated like an unknown one.
    pub fn progress_display(&self) -> Option<String> {
        let progress = self.progress?;
        match self.episodes {
            Some(total) if total > 0 => Some(format!("{}/{}", progress, total)),
            _ => Some(progress.to_string()),
        }
    }
}

/// A normalized entry produced by one of the fetch strategies.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleEntry {
    Airing(AiringEntry),
    Listed(ListEntry),
}

impl ScheduleEntry {
    /// Airing timestamp, for entries that have one.
    pub fn airing(&self) -> Option<i64> {
        match self {
            ScheduleEntry::Airing(entry) => Some(entry.airing),
            ScheduleEntry::Listed(_) => None,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ScheduleEntry::Airing(entry) => &entry.title,
            ScheduleEntry::Listed(entry) => &entry.title,
        }
    }
}

/// Styling class understood by the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayClass {
    Normal,
    Muted,
    Error,
}

/// The JSON object written to stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPayload {
    pub text: String,
    pub class: DisplayClass,
    pub tooltip: String,
}

impl DisplayPayload {
    /// Serialize to a single JSON line. Non-ASCII characters are kept as-is.
    pub fn to_json(&self) -> String {
        // A struct of strings and a unit enum cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"text":"AN: error","class":"error","tooltip":"serialization failed"}"#.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(romaji: Option<&str>, english: Option<&str>) -> MediaTitle {
        MediaTitle {
            romaji: romaji.map(str::to_string),
            english: english.map(str::to_string),
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("user".parse::<Mode>().unwrap(), Mode::User);
        assert_eq!(" List ".parse::<Mode>().unwrap(), Mode::List);
        assert_eq!("Global".parse::<Mode>().unwrap(), Mode::Global);
        assert_eq!("".parse::<Mode>().unwrap(), Mode::User);
    }

    #[test]
    fn test_mode_parsing_unknown() {
        let err = "daily".parse::<Mode>().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("daily"));
    }

    #[test]
    fn test_title_prefers_romaji() {
        assert_eq!(title(Some("Shingeki"), Some("Attack")).resolve(), "Shingeki");
    }

    #[test]
    fn test_title_empty_romaji_falls_back() {
        assert_eq!(title(Some(""), Some("Foo")).resolve(), "Foo");
        assert_eq!(title(None, Some("Foo")).resolve(), "Foo");
    }

    #[test]
    fn test_title_missing() {
        assert_eq!(title(None, None).resolve(), "?");
        assert_eq!(title(Some(""), Some("")).resolve(), "?");
    }

    #[test]
    fn test_title_deserializes_nulls() {
        let parsed: MediaTitle = serde_json::from_str(r#"{"romaji":null,"english":null}"#).unwrap();
        assert_eq!(parsed.resolve(), "?");
    }

    #[test]
    fn test_progress_display() {
        let mut entry = ListEntry {
            title: "Show".to_string(),
            progress: Some(3),
            episodes: Some(12),
            url: String::new(),
        };
        assert_eq!(entry.progress_display().as_deref(), Some("3/12"));

        entry.episodes = None;
        assert_eq!(entry.progress_display().as_deref(), Some("3"));

        entry.episodes = Some(0);
        assert_eq!(entry.progress_display().as_deref(), Some("3"));

        entry.progress = None;
        assert_eq!(entry.progress_display(), None);
    }

    #[test]
    fn test_payload_json_shape() {
        let payload = DisplayPayload {
            text: "󰎊 AN: none".to_string(),
            class: DisplayClass::Muted,
            tooltip: "line 1\nline 2".to_string(),
        };
        assert_eq!(
            payload.to_json(),
            r#"{"text":"󰎊 AN: none","class":"muted","tooltip":"line 1\nline 2"}"#
        );
    }
}
