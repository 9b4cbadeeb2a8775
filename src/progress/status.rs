use serde::{Deserialize, Serialize};

use super::week::WeekShape;

/// Share of the weekly target completed, bucketed to the nearest decile.
///
/// Rendered names double as progress-bar styling hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PercentBucket {
    None,
    Ten,
    Twenty,
    Thirty,
    Forty,
    Fifty,
    Sixty,
    Seventy,
    Eighty,
    Ninety,
    OneHundred,
    /// Fallback for deciles no clamped ratio can produce; renders a visibly
    /// broken bar instead of panicking on malformed upstream data.
    #[serde(rename = "none bad")]
    OutOfRange,
}

impl PercentBucket {
    /// Bucket a completion ratio (minutes / weekly target).
    ///
    /// The ratio is scaled to deciles, rounded to the nearest integer, and
    /// clamped to [0, 10].
    pub fn from_ratio(ratio: f64) -> Self {
        let decile = ((ratio * 10.0).round() as i64).clamp(0, 10);
        Self::from_decile(decile)
    }

    /// Map a decile in [0, 10] to its bucket.
    ///
    /// Out-of-range input should be unreachable after clamping and maps to
    /// the distinct fallback.
    pub fn from_decile(decile: i64) -> Self {
        match decile {
            0 => PercentBucket::None,
            1 => PercentBucket::Ten,
            2 => PercentBucket::Twenty,
            3 => PercentBucket::Thirty,
            4 => PercentBucket::Forty,
            5 => PercentBucket::Fifty,
            6 => PercentBucket::Sixty,
            7 => PercentBucket::Seventy,
            8 => PercentBucket::Eighty,
            9 => PercentBucket::Ninety,
            10 => PercentBucket::OneHundred,
            // should never happen
            _ => PercentBucket::OutOfRange,
        }
    }

    /// CSS class fragment for the progress bar
    pub fn css_class(&self) -> &'static str {
        match self {
            PercentBucket::None => "none",
            PercentBucket::Ten => "ten",
            PercentBucket::Twenty => "twenty",
            PercentBucket::Thirty => "thirty",
            PercentBucket::Forty => "forty",
            PercentBucket::Fifty => "fifty",
            PercentBucket::Sixty => "sixty",
            PercentBucket::Seventy => "seventy",
            PercentBucket::Eighty => "eighty",
            PercentBucket::Ninety => "ninety",
            PercentBucket::OneHundred => "one-hundred",
            PercentBucket::OutOfRange => "none bad",
        }
    }
}

/// Whether the user is keeping pace with the daily target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackStatus {
    Good,
    Iffy,
    Bad,
}

impl TrackStatus {
    /// Classify accumulated minutes against the target owed so far.
    ///
    /// behind > 1 day -> bad, behind <= 1 day -> iffy, not behind -> good.
    pub fn classify(minutes: i64, daily_target: i64, day_offset: i64) -> Self {
        let target_to_date = daily_target * day_offset;
        if minutes >= target_to_date {
            TrackStatus::Good
        } else if minutes >= target_to_date - daily_target {
            TrackStatus::Iffy
        } else {
            TrackStatus::Bad
        }
    }

    /// CSS class fragment for the progress bar
    pub fn css_class(&self) -> &'static str {
        match self {
            TrackStatus::Good => "good",
            TrackStatus::Iffy => "iffy",
            TrackStatus::Bad => "bad",
        }
    }
}

/// The two independent display labels derived from one week's totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStatus {
    pub bucket: PercentBucket,
    pub track: TrackStatus,
}

impl ProgressStatus {
    /// Derive both labels for a week's minutes given the daily target and
    /// the effective week shape.
    pub fn classify(minutes: i64, daily_target: i64, shape: &WeekShape) -> Self {
        let weekly_target = daily_target * shape.days_in_week;
        let ratio = minutes as f64 / weekly_target as f64;

        Self {
            bucket: PercentBucket::from_ratio(ratio),
            track: TrackStatus::classify(minutes, daily_target, shape.day_offset),
        }
    }

    /// Concatenated styling hooks, e.g. "seventy good"
    pub fn css_classes(&self) -> String {
        format!("{} {}", self.bucket.css_class(), self.track.css_class())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_clamps_at_both_ends() {
        assert_eq!(PercentBucket::from_ratio(-0.3), PercentBucket::None);
        assert_eq!(PercentBucket::from_ratio(0.0), PercentBucket::None);
        assert_eq!(PercentBucket::from_ratio(1.0), PercentBucket::OneHundred);
        assert_eq!(PercentBucket::from_ratio(3.7), PercentBucket::OneHundred);
    }

    #[test]
    fn test_bucket_rounds_to_nearest_decile() {
        assert_eq!(PercentBucket::from_ratio(0.4286), PercentBucket::Forty);
        assert_eq!(PercentBucket::from_ratio(0.65), PercentBucket::Seventy);
        assert_eq!(PercentBucket::from_ratio(0.04), PercentBucket::None);
    }

    #[test]
    fn test_bucket_is_monotonic_in_the_ratio() {
        let mut previous = PercentBucket::from_ratio(0.0);
        for step in 1..=40 {
            let bucket = PercentBucket::from_ratio(step as f64 * 0.05);
            assert!(bucket >= previous);
            previous = bucket;
        }
    }

    #[test]
    fn test_out_of_range_decile_renders_fallback() {
        assert_eq!(PercentBucket::from_decile(11).css_class(), "none bad");
        assert_eq!(PercentBucket::from_decile(-1).css_class(), "none bad");
    }

    #[test]
    fn test_track_status_thresholds() {
        // daily 30, three days in: 90 owed
        assert_eq!(TrackStatus::classify(90, 30, 3), TrackStatus::Good);
        assert_eq!(TrackStatus::classify(65, 30, 3), TrackStatus::Iffy);
        assert_eq!(TrackStatus::classify(60, 30, 3), TrackStatus::Iffy);
        assert_eq!(TrackStatus::classify(50, 30, 3), TrackStatus::Bad);
    }

    #[test]
    fn test_day_zero_is_always_good() {
        assert_eq!(TrackStatus::classify(0, 30, 0), TrackStatus::Good);
    }

    #[test]
    fn test_combined_css_classes() {
        let status = ProgressStatus::classify(30, 10, &WeekShape::full_week(2));
        assert_eq!(status.bucket, PercentBucket::Forty);
        assert_eq!(status.track, TrackStatus::Good);
        assert_eq!(status.css_classes(), "forty good");
    }
}
