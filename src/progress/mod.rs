//! Weekly progress computation.
//!
//! Pure, clock-free logic behind the progress bars: the week-window
//! calculator, the per-week aggregator, and the status classifier. Callers
//! supply "today" explicitly so everything here stays deterministic and
//! testable.

pub mod aggregate;
pub mod dates;
pub mod status;
pub mod week;

pub use aggregate::{aggregate, WeeklyTotals};
pub use status::{PercentBucket, ProgressStatus, TrackStatus};
pub use week::{effective_week, week_window, WeekShape, WeekWindow};
