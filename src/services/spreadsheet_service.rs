use crate::config::SheetsConfig;
use crate::error::{AppError, AppResult};
use crate::models::Group;
use crate::progress::{aggregate, dates, effective_week, week_window, ProgressStatus, WeekShape, WeekWindow};
use crate::repositories::{GroupMemberRepository, GroupRepository, UserDataRepository, UserRepository};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Latest week a sheet may be requested for explicitly
const MAX_SHEET_WEEK: i32 = 5;

/// One member's weekly line in the exported sheet
#[derive(Debug, Clone, serde::Serialize)]
pub struct SheetRow {
    pub group: String,
    pub week: i32,
    pub user_id: Uuid,
    pub member: String,
    pub minutes: i64,
    pub weekly_target: i64,
    pub percent: String,
    pub status: String,
}

/// What a sheet update touched
#[derive(Debug, Clone, serde::Serialize)]
pub struct SheetUpdateSummary {
    pub groups: usize,
    pub rows: usize,
    pub pushed: bool,
}

/// Service that recomputes weekly progress rows and pushes them to the
/// configured sheets endpoint
pub struct SpreadsheetService {
    group_repo: Arc<GroupRepository>,
    member_repo: Arc<GroupMemberRepository>,
    user_repo: Arc<UserRepository>,
    user_data_repo: Arc<UserDataRepository>,
    client: reqwest::Client,
    config: SheetsConfig,
}

impl SpreadsheetService {
    pub fn new(
        group_repo: Arc<GroupRepository>,
        member_repo: Arc<GroupMemberRepository>,
        user_repo: Arc<UserRepository>,
        user_data_repo: Arc<UserDataRepository>,
        config: SheetsConfig,
    ) -> Self {
        Self {
            group_repo,
            member_repo,
            user_repo,
            user_data_repo,
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Recompute sheet rows for active groups (or all groups) and push them
    /// to the configured endpoint.
    ///
    /// `week` selects an explicit group week; `None` means the week of
    /// `today`. Groups that fail to compute are logged and skipped so one
    /// bad group does not sink the whole export.
    pub async fn update(
        &self,
        week: Option<i32>,
        all_groups: bool,
        today: NaiveDate,
    ) -> AppResult<SheetUpdateSummary> {
        if let Some(w) = week {
            if !(0..=MAX_SHEET_WEEK).contains(&w) {
                return Err(AppError::Validation(format!(
                    "Sheet week {} outside 0..={}",
                    w, MAX_SHEET_WEEK
                )));
            }
        }

        let groups = if all_groups {
            self.group_repo.find_all().await?
        } else {
            self.group_repo.find_active(dates::encode(today)).await?
        };

        let mut rows = Vec::new();
        let mut exported_groups = 0;
        for group in &groups {
            match self.rows_for_group(group, week, today).await {
                Ok(mut group_rows) => {
                    exported_groups += 1;
                    rows.append(&mut group_rows);
                }
                Err(e) => {
                    error!("Error building sheet rows for group {}: {}", group.name, e);
                }
            }
        }

        let pushed = self.push_rows(&rows).await?;

        info!(
            "Sheet update: {} rows across {} groups (pushed: {})",
            rows.len(),
            exported_groups,
            pushed
        );

        Ok(SheetUpdateSummary {
            groups: exported_groups,
            rows: rows.len(),
            pushed,
        })
    }

    /// Build one row per member of `group` for the requested week
    pub async fn rows_for_group(
        &self,
        group: &Group,
        week: Option<i32>,
        today: NaiveDate,
    ) -> AppResult<Vec<SheetRow>> {
        let (week_num, window) = match week {
            Some(w) => (w, self.explicit_week_window(group, w)?),
            None => {
                let current = group.week_num(today);
                if current < 0 {
                    debug!("Group {} has not started yet, skipping", group.name);
                    return Ok(Vec::new());
                }
                (current, week_window(group.day_of_week as u8, today))
            }
        };

        let members = self.member_repo.find_by_group(&group.name).await?;

        let ids: Vec<Uuid> = members.iter().map(|m| m.user_id).collect();
        let users = self.user_repo.find_by_ids(&ids).await?;

        let daily_target = group.daily_minutes_target() as i64;
        let contains_today = {
            let encoded = dates::encode(today);
            window.start <= encoded && encoded <= window.end
        };

        let mut rows = Vec::with_capacity(users.len());
        for user in users {
            let records = self
                .user_data_repo
                .find_range(user.id, window.start, window.end)
                .await?;

            let totals = aggregate(&records);
            let shape = if contains_today {
                effective_week(window, week_num, user.date_created, today)
            } else {
                completed_week_shape(window, week_num, user.date_created)
            };
            let status = ProgressStatus::classify(totals.minutes, daily_target, &shape);

            rows.push(SheetRow {
                group: group.name.clone(),
                week: week_num,
                user_id: user.id,
                member: user.name(),
                minutes: totals.minutes,
                weekly_target: daily_target * shape.days_in_week,
                percent: status.bucket.css_class().to_string(),
                status: status.track.css_class().to_string(),
            });
        }

        Ok(rows)
    }

    /// Window of the group's week `w`, anchored on the schedule start
    fn explicit_week_window(&self, group: &Group, w: i32) -> AppResult<WeekWindow> {
        if !(0..=MAX_SHEET_WEEK).contains(&w) {
            return Err(AppError::Validation(format!(
                "Sheet week {} outside 0..={}",
                w, MAX_SHEET_WEEK
            )));
        }

        let start = dates::decode(group.start_date).ok_or_else(|| {
            AppError::Validation(format!(
                "Group {} has malformed start date {}",
                group.name, group.start_date
            ))
        })?;

        let week_start = start + chrono::Days::new(7 * w as u64);
        let week_end = week_start + chrono::Days::new(6);
        Ok(WeekWindow {
            start: dates::encode(week_start),
            end: dates::encode(week_end),
        })
    }

    /// POST rows to the sheets endpoint, when one is configured.
    ///
    /// Returns whether a push happened.
    async fn push_rows(&self, rows: &[SheetRow]) -> AppResult<bool> {
        let url = match &self.config.push_url {
            Some(url) => url,
            None => return Ok(false),
        };

        let body = serde_json::json!({ "rows": rows });

        let response = self
            .client
            .post(url)
            .json(&body)
            .timeout(self.config.request_timeout())
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Sheets push failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Sheets push returned {}",
                response.status()
            )));
        }

        Ok(true)
    }

    /// Periodically re-export the current week for active groups.
    ///
    /// Runs until the task is dropped; individual failures are logged and
    /// the next tick tries again.
    pub async fn start_sync(self: Arc<Self>, interval: Duration) {
        let mut ticker = time::interval(interval);
        info!("Sheet sync task started, updating every {:?}", interval);

        loop {
            ticker.tick().await;

            let today = chrono::Utc::now().date_naive();
            if let Err(e) = self.update(None, false, today).await {
                warn!("Error in sheet sync: {}", e);
            }
        }
    }
}

/// Shape of a week that has fully elapsed: every day's target is owed.
///
/// The first-week shortening still applies to members created after week 0
/// opened.
fn completed_week_shape(window: WeekWindow, week_num: i32, date_created: i32) -> WeekShape {
    if week_num == 0 && date_created > window.start {
        if let Some(days) = dates::days_between(date_created, window.end) {
            return WeekShape {
                days_in_week: days,
                day_offset: days,
            };
        }
    }

    WeekShape {
        days_in_week: 7,
        day_offset: 7,
    }
}
