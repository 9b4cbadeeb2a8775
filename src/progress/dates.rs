use chrono::NaiveDate;

/// Encode a calendar date as a YYYYMMDD integer
pub fn encode(date: NaiveDate) -> i32 {
    use chrono::Datelike;
    date.year() * 10_000 + date.month() as i32 * 100 + date.day() as i32
}

/// Decode a YYYYMMDD integer back into a calendar date.
///
/// Returns `None` for values that do not name a real date (bad month/day
/// digits, zero, negatives).
pub fn decode(yyyymmdd: i32) -> Option<NaiveDate> {
    if yyyymmdd <= 0 {
        return None;
    }
    let year = yyyymmdd / 10_000;
    let month = (yyyymmdd / 100 % 100) as u32;
    let day = (yyyymmdd % 100) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Days from `from` to `to` (negative when `to` is earlier).
///
/// `None` when either bound is not a valid encoded date.
pub fn days_between(from: i32, to: i32) -> Option<i64> {
    Some((decode(to)? - decode(from)?).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 8).unwrap();
        assert_eq!(encode(date), 20230108);
        assert_eq!(decode(20230108), Some(date));
    }

    #[test]
    fn test_decode_rejects_malformed_values() {
        assert_eq!(decode(0), None);
        assert_eq!(decode(-20230108), None);
        assert_eq!(decode(20231301), None); // month 13
        assert_eq!(decode(20230230), None); // Feb 30
    }

    #[test]
    fn test_days_between_spans_month_boundary() {
        assert_eq!(days_between(20230103, 20230108), Some(5));
        assert_eq!(days_between(20230131, 20230201), Some(1));
        assert_eq!(days_between(20230108, 20230103), Some(-5));
    }
}
