use chrono::{Datelike, NaiveDate};
use pacer_backend::auth;
use pacer_backend::models::*;
use pacer_backend::progress::*;
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(date: i32, minutes: Option<i32>, emoji: &[(&str, &str)]) -> UserData {
    let mut data = UserData::new(Uuid::nil(), date);
    data.minutes = minutes;
    data.emoji = emoji
        .iter()
        .map(|(e, from)| EmojiFeedback::new(e.to_string(), from.to_string()))
        .collect();
    data
}

/// Unit tests for the week-window calculator
#[test]
fn test_window_contains_today_for_every_anchor_and_weekday() {
    // One date per weekday
    for offset in 0..7 {
        let today = day(2023, 6, 12 + offset);
        let encoded = dates::encode(today);

        for anchor in 0u8..=6 {
            let window = week_window(anchor, today);
            assert!(
                window.start <= encoded && encoded <= window.end,
                "window {:?} misses {} for anchor {}",
                window,
                encoded,
                anchor
            );

            let start = dates::decode(window.start).unwrap();
            let end = dates::decode(window.end).unwrap();
            assert_eq!((end - start).num_days(), 6);
            assert_eq!(start.weekday().num_days_from_sunday(), anchor as u32);
        }
    }
}

#[test]
fn test_window_spanning_a_month_boundary() {
    // 2023-02-01 is a Wednesday; Monday anchor reaches back into January
    let window = week_window(1, day(2023, 2, 1));
    assert_eq!(window, WeekWindow { start: 20230130, end: 20230205 });
}

/// Unit tests for the first-week rule
#[test]
fn test_first_week_shortening() {
    // Group week 0, created Tuesday 2023-01-03, window ends Sunday the 8th
    let window = week_window(1, day(2023, 1, 5));
    assert_eq!(window.end, 20230108);

    let shape = effective_week(window, 0, 20230103, day(2023, 1, 5));
    assert_eq!(shape.days_in_week, 5);

    // Weekly target shortens with the week
    let daily_target = 30;
    assert_eq!(daily_target * shape.days_in_week, 150);
}

#[test]
fn test_first_week_rule_only_applies_in_week_zero() {
    let window = week_window(1, day(2023, 1, 12));
    let shape = effective_week(window, 1, 20230110, day(2023, 1, 12));
    assert_eq!(shape, WeekShape::full_week(3));
}

/// Unit tests for the aggregator
#[test]
fn test_aggregate_empty() {
    let totals = aggregate(&[]);
    assert_eq!(totals.minutes, 0);
    assert!(totals.emojis.is_empty());
}

#[test]
fn test_aggregate_is_associative_under_splits() {
    let records = vec![
        record(20230102, Some(20), &[]),
        record(20230103, None, &[("🔥", "Bob")]),
        record(20230104, Some(10), &[("💪", "Ada")]),
        record(20230105, Some(45), &[]),
    ];

    let whole = aggregate(&records);
    for split_at in 0..=records.len() {
        let merged = aggregate(&records[..split_at]).merge(aggregate(&records[split_at..]));
        assert_eq!(whole, merged, "split at {}", split_at);
    }
}

/// Unit tests for the status classifier
#[test]
fn test_percent_bucket_clamps() {
    assert_eq!(PercentBucket::from_ratio(-1.0), PercentBucket::None);
    assert_eq!(PercentBucket::from_ratio(0.0), PercentBucket::None);
    assert_eq!(PercentBucket::from_ratio(1.0), PercentBucket::OneHundred);
    assert_eq!(PercentBucket::from_ratio(2.5), PercentBucket::OneHundred);
}

#[test]
fn test_percent_bucket_is_monotonic() {
    let mut previous = PercentBucket::from_ratio(-0.5);
    for step in 0..=60 {
        let bucket = PercentBucket::from_ratio(step as f64 * 0.025);
        assert!(bucket >= previous);
        previous = bucket;
    }
}

#[test]
fn test_track_status_spec_examples() {
    // daily 30, three days into the week: 90 minutes owed
    assert_eq!(TrackStatus::classify(90, 30, 3), TrackStatus::Good);
    assert_eq!(TrackStatus::classify(65, 30, 3), TrackStatus::Iffy);
    assert_eq!(TrackStatus::classify(50, 30, 3), TrackStatus::Bad);
}

#[test]
fn test_end_to_end_classification_example() {
    // Two logged days into a Monday week, one reaction, daily target 10
    let records = vec![
        record(20230102, Some(20), &[]),
        record(20230103, Some(10), &[("🔥", "Bob")]),
    ];

    let totals = aggregate(&records);
    assert_eq!(totals.minutes, 30);
    assert_eq!(
        totals.emojis,
        vec![EmojiFeedback::new("🔥".to_string(), "Bob".to_string())]
    );

    let status = ProgressStatus::classify(totals.minutes, 10, &WeekShape::full_week(2));
    assert_eq!(status.track, TrackStatus::Good);
    // 30 / 70 = 0.4286 rounds to the forty bucket
    assert_eq!(status.bucket, PercentBucket::Forty);
    assert_eq!(status.css_classes(), "forty good");
}

#[test]
fn test_out_of_range_decile_renders_distinct_fallback() {
    assert_eq!(PercentBucket::from_decile(11).css_class(), "none bad");
}

/// Unit tests for models
#[test]
fn test_member_role_conversion() {
    let admin = MemberRole::Admin;
    assert_eq!(admin.as_str(), "admin");

    let member = MemberRole::Member;
    assert_eq!(member.as_str(), "member");
}

#[test]
fn test_group_week_num_and_daily_target() {
    let group = Group::new("hrv-spring".to_string(), 20230102, 20230212, 210);
    assert_eq!(group.daily_minutes_target(), 30);
    assert_eq!(group.week_num(day(2023, 1, 2)), 0);
    assert_eq!(group.week_num(day(2023, 1, 9)), 1);
}

#[test]
fn test_message_tombstone_detection() {
    let mut msg = GroupMessage::new("hrv-spring".to_string(), 1_672_700_000_000, "hi".to_string());
    assert!(!msg.is_deleted());

    msg.original = Some(msg.body.clone());
    msg.body = DELETED_MESSAGE_BODY.to_string();
    assert!(msg.is_deleted());
}

/// Unit tests for auth tokens
#[test]
fn test_token_issue_and_verify() {
    let user_id = Uuid::new_v4();
    let now = 1_700_000_000;

    let token = auth::issue_token(&user_id, "secret", now);
    assert!(token.starts_with("pacer_auth:"));
    assert_eq!(auth::verify_token(&token, "secret", now).unwrap(), user_id);

    // Stale tokens and bad digests are rejected
    assert!(auth::verify_token(&token, "secret", now + 400).is_err());
    assert!(auth::verify_token(&token, "other-secret", now).is_err());
}

/// Unit tests for error handling
#[test]
fn test_error_status_codes() {
    use pacer_backend::error::AppError;

    assert_eq!(AppError::NotFound("x".into()).status_code(), 404);
    assert_eq!(AppError::Unauthorized("x".into()).status_code(), 401);
    assert_eq!(AppError::Validation("x".into()).status_code(), 400);
    assert_eq!(AppError::BusinessLogic("x".into()).status_code(), 409);
    assert_eq!(AppError::ExternalService("x".into()).status_code(), 502);
}

#[test]
fn test_repository_errors_map_to_http_statuses() {
    use pacer_backend::error::{AppError, RepositoryError};

    let duplicate: AppError = RepositoryError::Duplicate("groups_pkey".into()).into();
    assert_eq!(duplicate.status_code(), 409);

    let constraint: AppError = RepositoryError::ConstraintViolation("fkey".into()).into();
    assert_eq!(constraint.status_code(), 400);

    let missing: AppError = RepositoryError::NotFound("no such row".into()).into();
    assert_eq!(missing.status_code(), 404);
}
