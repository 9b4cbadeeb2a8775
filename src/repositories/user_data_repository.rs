use crate::error::RepositoryResult;
use crate::models::{EmojiFeedback, UserData};
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(FromRow)]
struct MinutesRow {
    date: i32,
    minutes: Option<i32>,
}

#[derive(FromRow)]
struct EmojiRow {
    date: i32,
    emoji: String,
    from_name: String,
}

/// Repository for per-day training records and emoji feedback
pub struct UserDataRepository {
    pool: PgPool,
}

impl UserDataRepository {
    /// Create a new UserDataRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record minutes trained for a (user, day); overwrites an earlier entry
    /// for the same day
    pub async fn upsert_minutes(
        &self,
        user_id: Uuid,
        date: i32,
        minutes: i32,
    ) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_data (user_id, date, minutes)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, date) DO UPDATE
            SET minutes = EXCLUDED.minutes
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(minutes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append an emoji reaction to a (user, day)
    pub async fn add_emoji(
        &self,
        user_id: Uuid,
        date: i32,
        emoji: &str,
        from_name: &str,
    ) -> RepositoryResult<EmojiFeedback> {
        sqlx::query(
            r#"
            INSERT INTO emoji_feedback (id, user_id, date, emoji, from_name)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(date)
        .bind(emoji)
        .bind(from_name)
        .execute(&self.pool)
        .await?;

        Ok(EmojiFeedback::new(emoji.to_string(), from_name.to_string()))
    }

    /// Fetch a user's records for an inclusive YYYYMMDD range, ascending by
    /// date, with each day's emoji feedback attached.
    ///
    /// Days that only have feedback still produce a record (with no minutes),
    /// matching how the progress aggregator expects its input.
    pub async fn find_range(
        &self,
        user_id: Uuid,
        start_date: i32,
        end_date: i32,
    ) -> RepositoryResult<Vec<UserData>> {
        let minutes_rows = sqlx::query_as::<_, MinutesRow>(
            r#"
            SELECT date, minutes
            FROM user_data
            WHERE user_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        let emoji_rows = sqlx::query_as::<_, EmojiRow>(
            r#"
            SELECT date, emoji, from_name
            FROM emoji_feedback
            WHERE user_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date ASC, created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        let mut by_date: BTreeMap<i32, UserData> = BTreeMap::new();
        for row in minutes_rows {
            let mut record = UserData::new(user_id, row.date);
            record.minutes = row.minutes;
            by_date.insert(row.date, record);
        }
        for row in emoji_rows {
            by_date
                .entry(row.date)
                .or_insert_with(|| UserData::new(user_id, row.date))
                .emoji
                .push(EmojiFeedback::new(row.emoji, row.from_name));
        }

        Ok(by_date.into_values().collect())
    }
}
