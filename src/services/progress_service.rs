use crate::error::{AppError, AppResult};
use crate::models::EmojiFeedback;
use crate::progress::{aggregate, effective_week, week_window, ProgressStatus, WeekWindow};
use crate::repositories::{GroupRepository, UserDataRepository, UserRepository};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// One user's weekly progress, ready for display
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProgressReport {
    pub user_id: Uuid,
    pub group: String,
    pub window: WeekWindow,
    pub weekly_minutes: i64,
    pub weekly_target: i64,
    pub emojis: Vec<EmojiFeedback>,
    pub status: ProgressStatus,
    /// Concatenated styling hooks for the progress bar, e.g. "seventy good"
    pub progress_classes: String,
}

/// Service computing weekly progress for users
pub struct ProgressService {
    group_repo: Arc<GroupRepository>,
    user_repo: Arc<UserRepository>,
    user_data_repo: Arc<UserDataRepository>,
}

impl ProgressService {
    pub fn new(
        group_repo: Arc<GroupRepository>,
        user_repo: Arc<UserRepository>,
        user_data_repo: Arc<UserDataRepository>,
    ) -> Self {
        Self {
            group_repo,
            user_repo,
            user_data_repo,
        }
    }

    /// Compute a user's progress for the week of `today` in the given group.
    ///
    /// `today` is injected by the caller so the window math stays
    /// deterministic under test.
    pub async fn weekly_progress(
        &self,
        user_id: Uuid,
        group_name: &str,
        today: NaiveDate,
    ) -> AppResult<ProgressReport> {
        let group = self
            .group_repo
            .find_by_name(group_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {} not found", group_name)))?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let window = week_window(group.day_of_week as u8, today);

        let records = self
            .user_data_repo
            .find_range(user_id, window.start, window.end)
            .await?;

        let totals = aggregate(&records);
        let shape = effective_week(window, group.week_num(today), user.date_created, today);
        let daily_target = group.daily_minutes_target() as i64;
        let status = ProgressStatus::classify(totals.minutes, daily_target, &shape);

        debug!(
            "Progress for {} in {}: {} min over {} days -> {}",
            user_id,
            group.name,
            totals.minutes,
            shape.days_in_week,
            status.css_classes()
        );

        Ok(ProgressReport {
            user_id,
            group: group.name,
            window,
            weekly_minutes: totals.minutes,
            weekly_target: daily_target * shape.days_in_week,
            emojis: totals.emojis,
            status,
            progress_classes: status.css_classes(),
        })
    }
}
