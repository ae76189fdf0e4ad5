//! A status-bar widget showing today's anime airing schedule.
//!
//! anime-schedule queries the AniList GraphQL API once per invocation and
//! prints a single JSON line (`text`, `class`, `tooltip`) suitable for a
//! waybar `custom` module. Three modes are supported:
//!
//! - `user`: next episodes from the user's CURRENT and PLANNING lists that air today
//! - `list`: the user's list filtered by status, with watch progress
//! - `global`: every episode airing today
//!
//! # Usage
//!
//! ```bash
//! # Today's episodes from alice's lists
//! ANILIST_USER=alice cargo run
//!
//! # Tomorrow's global schedule
//! cargo run -- --mode global --days 1
//! ```

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod present;
pub mod types;
pub mod widget;
pub mod window;
