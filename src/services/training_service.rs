use crate::error::{AppError, AppResult};
use crate::models::{EmojiFeedback, User};
use crate::progress::dates;
use crate::repositories::{UserDataRepository, UserRepository};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Longest plausible single-day entry (a full day)
const MAX_DAILY_MINUTES: i32 = 24 * 60;

/// Service for logging training minutes and emoji feedback
pub struct TrainingService {
    user_repo: Arc<UserRepository>,
    user_data_repo: Arc<UserDataRepository>,
}

impl TrainingService {
    pub fn new(user_repo: Arc<UserRepository>, user_data_repo: Arc<UserDataRepository>) -> Self {
        Self {
            user_repo,
            user_data_repo,
        }
    }

    /// Record minutes trained for a (user, day).
    ///
    /// Users log their own training; staff may correct anyone's. Logging the
    /// same day twice overwrites the earlier entry.
    pub async fn log_minutes(
        &self,
        user_id: Uuid,
        date: i32,
        minutes: i32,
        caller: &User,
    ) -> AppResult<()> {
        if caller.id != user_id && !caller.is_admin {
            return Err(AppError::Unauthorized(
                "May only log your own training".into(),
            ));
        }

        if dates::decode(date).is_none() {
            return Err(AppError::Validation(format!("Invalid date {}", date)));
        }

        if !(0..=MAX_DAILY_MINUTES).contains(&minutes) {
            return Err(AppError::Validation(format!(
                "Minutes {} outside 0..={}",
                minutes, MAX_DAILY_MINUTES
            )));
        }

        self.user_data_repo
            .upsert_minutes(user_id, date, minutes)
            .await?;

        info!("Logged {} minutes for {} on {}", minutes, user_id, date);
        Ok(())
    }

    /// Leave an emoji reaction on another user's training day.
    ///
    /// Reacting to your own day is rejected; the sender's display name is
    /// stamped onto the feedback so the recipient sees who reacted.
    pub async fn give_emoji(
        &self,
        recipient_id: Uuid,
        date: i32,
        emoji: &str,
        sender: &User,
    ) -> AppResult<EmojiFeedback> {
        if emoji.trim().is_empty() {
            return Err(AppError::Validation("Emoji is empty".into()));
        }

        if dates::decode(date).is_none() {
            return Err(AppError::Validation(format!("Invalid date {}", date)));
        }

        if sender.id == recipient_id {
            return Err(AppError::Validation(
                "Cannot react to your own training day".into(),
            ));
        }

        let recipient = self
            .user_repo
            .find_by_id(recipient_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", recipient_id)))?;

        let feedback = self
            .user_data_repo
            .add_emoji(recipient.id, date, emoji, &sender.name())
            .await?;

        info!(
            "{} reacted {} to {} on {}",
            sender.id, emoji, recipient.id, date
        );
        Ok(feedback)
    }
}
