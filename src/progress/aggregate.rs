use crate::models::{EmojiFeedback, UserData};

/// Training totals accumulated over a window of per-day records
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct WeeklyTotals {
    pub minutes: i64,
    pub emojis: Vec<EmojiFeedback>,
}

impl WeeklyTotals {
    /// Fold another slice's totals into this one.
    ///
    /// Aggregating a range in contiguous pieces and merging is equivalent to
    /// aggregating it at once.
    pub fn merge(mut self, other: WeeklyTotals) -> Self {
        self.minutes += other.minutes;
        self.emojis.extend(other.emojis);
        self
    }
}

/// Reduce a date-ordered slice of per-day records to weekly totals.
///
/// Days with no logged minutes contribute 0; emoji feedback is concatenated
/// in record order. An empty slice yields zeroed totals.
pub fn aggregate(records: &[UserData]) -> WeeklyTotals {
    let mut totals = WeeklyTotals::default();
    for record in records {
        if let Some(minutes) = record.minutes {
            totals.minutes += minutes as i64;
        }
        if !record.emoji.is_empty() {
            totals.emojis.extend(record.emoji.iter().cloned());
        }
    }
    totals
}
