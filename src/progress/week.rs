use chrono::{Datelike, Days, NaiveDate};

use super::dates;

/// Inclusive 7-day window of a group week, bounds encoded as YYYYMMDD
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WeekWindow {
    pub start: i32,
    pub end: i32,
}

/// Effective length and pacing offset of the week being scored.
///
/// Usually `days_in_week = 7` and `day_offset` counts whole days elapsed
/// since the window start. Both shrink for users created mid-way through the
/// group's first week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekShape {
    pub days_in_week: i64,
    pub day_offset: i64,
}

impl WeekShape {
    /// Shape of an ordinary full week with `day_offset` elapsed days
    pub fn full_week(day_offset: i64) -> Self {
        Self {
            days_in_week: 7,
            day_offset,
        }
    }
}

/// Compute the current week's window for a group anchored on
/// `anchor_day_of_week` (0 = Sunday).
///
/// The window starts at the most recent occurrence of the anchor weekday
/// (today, when today is the anchor) and always spans 7 inclusive days.
pub fn week_window(anchor_day_of_week: u8, today: NaiveDate) -> WeekWindow {
    let today_dow = today.weekday().num_days_from_sunday();
    let days_since_anchor = (today_dow + 7 - anchor_day_of_week as u32 % 7) % 7;

    let start = today - Days::new(days_since_anchor as u64);
    let end = start + Days::new(6);

    WeekWindow {
        start: dates::encode(start),
        end: dates::encode(end),
    }
}

/// Resolve the effective week shape for a user within `window`.
///
/// The first week is special: not everyone starts on the same day, so users
/// created after the window opened pace against a shortened week running
/// from their creation date to the window end.
pub fn effective_week(
    window: WeekWindow,
    group_week_num: i32,
    user_date_created: i32,
    today: NaiveDate,
) -> WeekShape {
    let default_offset = dates::decode(window.start)
        .map(|start| (today - start).num_days())
        .unwrap_or(0);

    if group_week_num == 0 && user_date_created > window.start {
        if let (Some(days_in_week), Some(created)) = (
            dates::days_between(user_date_created, window.end),
            dates::decode(user_date_created),
        ) {
            return WeekShape {
                days_in_week,
                day_offset: (today - created).num_days(),
            };
        }
    }

    WeekShape::full_week(default_offset)
}
