use crate::error::RepositoryResult;
use crate::models::Group;
use sqlx::PgPool;

/// Repository for training group data access
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Create a new GroupRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new group
    pub async fn create(&self, group: &Group) -> RepositoryResult<Group> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (name, start_date, end_date, day_of_week, weekly_minutes_target, earnings)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING name, start_date, end_date, day_of_week, weekly_minutes_target, earnings, created_at
            "#,
        )
        .bind(&group.name)
        .bind(group.start_date)
        .bind(group.end_date)
        .bind(group.day_of_week)
        .bind(group.weekly_minutes_target)
        .bind(group.earnings)
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    /// Find a group by name
    pub async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            SELECT name, start_date, end_date, day_of_week, weekly_minutes_target, earnings, created_at
            FROM groups
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Find all groups
    pub async fn find_all(&self) -> RepositoryResult<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT name, start_date, end_date, day_of_week, weekly_minutes_target, earnings, created_at
            FROM groups
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Find groups whose schedule still covers the given YYYYMMDD date
    pub async fn find_active(&self, today: i32) -> RepositoryResult<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT name, start_date, end_date, day_of_week, weekly_minutes_target, earnings, created_at
            FROM groups
            WHERE end_date >= $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Update a group's earnings figure
    pub async fn update_earnings(&self, name: &str, earnings: i64) -> RepositoryResult<Group> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            UPDATE groups
            SET earnings = $2
            WHERE name = $1
            RETURNING name, start_date, end_date, day_of_week, weekly_minutes_target, earnings, created_at
            "#,
        )
        .bind(name)
        .bind(earnings)
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }
}
