//! Configuration file support for anime-schedule.
//!
//! Settings come from a `key=value` file shared with the status bar config
//! (`~/.config/waybar/anime_schedule.conf` on Linux), with the username
//! overridable through the `ANILIST_USER` environment variable.

use crate::error::AppError;
use crate::types::Mode;
use crate::window::MAX_DAY_OFFSET;
use log::{debug, warn};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable that takes precedence over `username=`.
pub const USER_ENV: &str = "ANILIST_USER";

const DEFAULT_LIMIT: usize = 3;
const DEFAULT_LIST_STATUS: &str = "CURRENT";

/// Resolved widget settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// AniList user name.
    pub username: Option<String>,

    /// Configured mode, before the no-username fallback is applied.
    pub mode: Mode,

    /// How many entries the headline considers (at least 1).
    pub limit: usize,

    /// Days to shift the window by, relative to today.
    pub day_offset: i64,

    /// AniList `MediaListStatus` values used in list mode, upper-cased.
    pub list_statuses: Vec<String>,

    /// File the settings were read from.
    pub path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self {
            username: None,
            mode: Mode::User,
            limit: DEFAULT_LIMIT,
            day_offset: 0,
            list_statuses: vec![DEFAULT_LIST_STATUS.to_string()],
            path: None,
        }
    }

    /// Get the path to the config file.
    ///
    /// Returns ~/.config/waybar/anime_schedule.conf on Linux,
    /// or a platform-appropriate location on other systems.
    pub fn get_config_path() -> Result<PathBuf, io::Error> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Could not find config directory")
            })?
            .join("waybar");

        Ok(config_dir.join("anime_schedule.conf"))
    }

    /// Load config from `path`, or from the default location when `None`,
    /// then apply the `ANILIST_USER` override.
    ///
    /// A missing or unreadable file leaves the defaults in place; the
    /// environment override is applied either way.
    pub fn load(path: Option<&Path>) -> Self {
        Self::load_with_user(path, env::var(USER_ENV).ok())
    }

    /// Like [`Config::load`], with the environment username passed in.
    pub fn load_with_user(path: Option<&Path>, env_user: Option<String>) -> Self {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::get_config_path()
                .map_err(|e| warn!("Failed to locate config: {}. Using defaults.", e))
                .ok(),
        };

        let mut config = match &path {
            Some(p) if p.exists() => match Self::read(p) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to load config {}: {}. Using defaults.", p.display(), e);
                    Self::new()
                }
            },
            Some(p) => {
                debug!("No config file at {}, using defaults", p.display());
                Self::new()
            }
            None => Self::new(),
        };
        config.path = path;

        if let Some(user) = env_user {
            config.apply_user_override(&user);
        }

        config
    }

    fn read(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Build a config from `key=value` text.
    ///
    /// Invalid values are logged and replaced by their defaults.
    pub fn parse(content: &str) -> Self {
        let pairs = parse_pairs(content);
        let mut config = Self::new();

        if let Some(user) = pairs.get("username") {
            config.apply_user_override(user);
        }

        if let Some(mode) = pairs.get("mode") {
            config.mode = mode.parse().unwrap_or_else(|e| {
                warn!("{}. Using user mode.", e);
                Mode::User
            });
        }

        if let Some(limit) = pairs.get("limit") {
            config.limit = match limit.parse::<i64>() {
                Ok(n) => n.max(1) as usize,
                Err(_) => {
                    warn!("Invalid limit '{}'. Using {}.", limit, DEFAULT_LIMIT);
                    DEFAULT_LIMIT
                }
            };
        }

        if let Some(days) = pairs.get("days") {
            config.day_offset = match days.parse::<i64>() {
                Ok(n) => clamp_day_offset(n),
                Err(_) => {
                    warn!("Invalid days '{}'. Using 0.", days);
                    0
                }
            };
        }

        if let Some(statuses) = pairs.get("list_status") {
            config.list_statuses = parse_statuses(statuses);
        }

        config
    }

    /// Replace the username when `user` is non-empty after trimming.
    pub fn apply_user_override(&mut self, user: &str) {
        let user = user.trim();
        if !user.is_empty() {
            self.username = Some(user.to_string());
        }
    }

    /// The mode that actually runs: `user` without a username means `global`.
    pub fn effective_mode(&self) -> Mode {
        match (self.mode, &self.username) {
            (Mode::User, None) => Mode::Global,
            (mode, _) => mode,
        }
    }
}

/// Limit a day offset to `±MAX_DAY_OFFSET`, warning when it is out of range.
pub fn clamp_day_offset(days: i64) -> i64 {
    let clamped = days.clamp(-MAX_DAY_OFFSET, MAX_DAY_OFFSET);
    if clamped != days {
        warn!("Day offset {} out of range. Using {}.", days, clamped);
    }
    clamped
}

/// Split `key=value` lines, skipping blanks, comments and lines without `=`.
fn parse_pairs(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// Parse a comma-separated status list, e.g. `"current, paused"`.
///
/// # Examples
///
/// ```
/// use anime_schedule::config::parse_statuses;
///
/// assert_eq!(parse_statuses("current, Paused,,"), vec!["CURRENT", "PAUSED"]);
/// assert_eq!(parse_statuses(" , "), vec!["CURRENT"]);
/// ```
pub fn parse_statuses(raw: &str) -> Vec<String> {
    let statuses: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .collect();

    if statuses.is_empty() {
        vec![DEFAULT_LIST_STATUS.to_string()]
    } else {
        statuses
    }
}
