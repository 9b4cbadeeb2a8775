use crate::error::RepositoryResult;
use crate::models::{GroupMessage, DELETED_MESSAGE_BODY};
use sqlx::PgPool;

/// Repository for group message data access
pub struct GroupMessageRepository {
    pool: PgPool,
}

impl GroupMessageRepository {
    /// Create a new GroupMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new message
    pub async fn create(&self, message: &GroupMessage) -> RepositoryResult<GroupMessage> {
        let message = sqlx::query_as::<_, GroupMessage>(
            r#"
            INSERT INTO group_messages (group_name, date, body)
            VALUES ($1, $2, $3)
            RETURNING group_name, date, body, original
            "#,
        )
        .bind(&message.group)
        .bind(message.date)
        .bind(&message.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// Find a group's messages newer than `since` (epoch millis), ascending
    pub async fn find_since(
        &self,
        group_name: &str,
        since: i64,
    ) -> RepositoryResult<Vec<GroupMessage>> {
        let messages = sqlx::query_as::<_, GroupMessage>(
            r#"
            SELECT group_name, date, body, original
            FROM group_messages
            WHERE group_name = $1 AND date > $2
            ORDER BY date ASC
            "#,
        )
        .bind(group_name)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Soft-delete a message: swap the body for the tombstone and keep the
    /// first original. Returns the updated row.
    pub async fn soft_delete(&self, group_name: &str, date: i64) -> RepositoryResult<GroupMessage> {
        let message = sqlx::query_as::<_, GroupMessage>(
            r#"
            UPDATE group_messages
            SET original = COALESCE(original, body), body = $3
            WHERE group_name = $1 AND date = $2
            RETURNING group_name, date, body, original
            "#,
        )
        .bind(group_name)
        .bind(date)
        .bind(DELETED_MESSAGE_BODY)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }
}
