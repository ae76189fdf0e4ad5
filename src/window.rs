//! Local calendar-day windows.

use chrono::{DateTime, Local, Offset, TimeZone};

/// Seconds in one calendar day.
pub const DAY_SECONDS: i64 = 86_400;

/// Largest accepted day offset in either direction (about 100 years).
pub const MAX_DAY_OFFSET: i64 = 36_500;

/// Half-open interval `[start, end)` of Unix timestamps covering one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: i64,
    pub end: i64,
}

impl DayWindow {
    /// Window for "today, shifted by `day_offset` days" in the local time zone.
    pub fn today(day_offset: i64) -> Self {
        Self::around(&Local::now(), day_offset)
    }

    /// Window for the day containing `now`, shifted by `day_offset` days.
    ///
    /// Midnight is computed with the UTC offset in force at `now`, so the
    /// DST state of the current instant is kept for the whole window.
    /// `day_offset` is clamped to `±MAX_DAY_OFFSET`.
    ///
    /// # Examples
    ///
    /// ```
    /// use anime_schedule::window::DayWindow;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let now = Utc.timestamp_opt(1_700_010_000, 0).unwrap();
    /// let window = DayWindow::around(&now, 0);
    /// assert_eq!(window.start, 1_700_006_400);
    /// assert_eq!(window.end - window.start, 86_400);
    /// ```
    pub fn around<Tz: TimeZone>(now: &DateTime<Tz>, day_offset: i64) -> Self {
        let offset = now.offset().fix().local_minus_utc() as i64;
        let local_midnight = now
            .naive_local()
            .date()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc().timestamp())
            .unwrap_or_else(|| now.timestamp() + offset);

        let day_offset = day_offset.clamp(-MAX_DAY_OFFSET, MAX_DAY_OFFSET);
        let start = local_midnight - offset + day_offset * DAY_SECONDS;
        Self {
            start,
            end: start + DAY_SECONDS,
        }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp < self.end
    }
}
