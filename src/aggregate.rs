//! Filtering, ordering and truncation of fetched entries.

use crate::types::ScheduleEntry;
use crate::window::DayWindow;

/// Maximum number of lines shown in the tooltip, independent of `limit`.
pub const TOOLTIP_MAX: usize = 20;

/// Entries split into the views the presenter needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate<'a> {
    /// First `limit` entries.
    pub headline: &'a [ScheduleEntry],
    /// First `TOOLTIP_MAX` entries.
    pub tooltip: &'a [ScheduleEntry],
    /// Number of entries before truncation.
    pub total: usize,
}

/// Keep airing entries inside `window`. List entries have no airing time and
/// are kept.
pub fn within_window(entries: Vec<ScheduleEntry>, window: &DayWindow) -> Vec<ScheduleEntry> {
    entries
        .into_iter()
        .filter(|e| e.airing().is_none_or(|ts| window.contains(ts)))
        .collect()
}

/// Stable ascending sort by airing time.
pub fn sort_by_airing(entries: &mut [ScheduleEntry]) {
    entries.sort_by_key(|e| e.airing().unwrap_or(i64::MAX));
}

/// Truncate to the headline and tooltip caps.
pub fn aggregate(entries: &[ScheduleEntry], limit: usize) -> Aggregate<'_> {
    let limit = limit.max(1);
    Aggregate {
        headline: &entries[..entries.len().min(limit)],
        tooltip: &entries[..entries.len().min(TOOLTIP_MAX)],
        total: entries.len(),
    }
}
