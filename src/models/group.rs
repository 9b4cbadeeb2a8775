use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::progress::dates;

/// Group model representing a training group with a weekly minutes target
///
/// Dates are stored as YYYYMMDD integers. `day_of_week` is the weekly anchor
/// (0 = Sunday) the progress window aligns to; it defaults to the weekday of
/// `start_date` when the group is created.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub name: String,
    pub start_date: i32,
    pub end_date: i32,
    pub day_of_week: i16,
    pub weekly_minutes_target: i32,
    pub earnings: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl Group {
    /// Create a new Group (typically used for creating from API input)
    pub fn new(name: String, start_date: i32, end_date: i32, weekly_minutes_target: i32) -> Self {
        let day_of_week = dates::decode(start_date)
            .map(|d| d.weekday().num_days_from_sunday() as i16)
            .unwrap_or(0);

        Self {
            name,
            start_date,
            end_date,
            day_of_week,
            weekly_minutes_target,
            earnings: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Daily minutes target, derived from the weekly target
    pub fn daily_minutes_target(&self) -> i32 {
        self.weekly_minutes_target / 7
    }

    /// Zero-based week number of `today` within the group's schedule.
    ///
    /// Negative before `start_date`; callers treat week 0 as the first week.
    pub fn week_num(&self, today: NaiveDate) -> i32 {
        match dates::decode(self.start_date) {
            Some(start) => {
                let days = (today - start).num_days();
                days.div_euclid(7) as i32
            }
            None => 0,
        }
    }

    /// Whether the group's schedule covers `today`
    pub fn is_active(&self, today: NaiveDate) -> bool {
        dates::encode(today) <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(start_date: i32, end_date: i32) -> Group {
        Group::new("hrv-spring".to_string(), start_date, end_date, 210)
    }

    #[test]
    fn test_anchor_defaults_to_start_weekday() {
        // 2023-01-02 is a Monday
        let g = group(20230102, 20230212);
        assert_eq!(g.day_of_week, 1);
    }

    #[test]
    fn test_week_num() {
        let g = group(20230102, 20230212);
        let day = |d: u32| NaiveDate::from_ymd_opt(2023, 1, d).unwrap();

        assert_eq!(g.week_num(day(2)), 0);
        assert_eq!(g.week_num(day(8)), 0);
        assert_eq!(g.week_num(day(9)), 1);
        assert_eq!(g.week_num(day(23)), 3);
        // before the schedule starts
        assert_eq!(g.week_num(day(1)), -1);
    }

    #[test]
    fn test_daily_target_derivation() {
        assert_eq!(group(20230102, 20230212).daily_minutes_target(), 30);
    }

    #[test]
    fn test_is_active() {
        let g = group(20230102, 20230212);
        assert!(g.is_active(NaiveDate::from_ymd_opt(2023, 2, 12).unwrap()));
        assert!(!g.is_active(NaiveDate::from_ymd_opt(2023, 2, 13).unwrap()));
    }
}
