use crate::error::RepositoryResult;
use crate::models::{GroupMember, MemberRole};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for group member data access
pub struct GroupMemberRepository {
    pool: PgPool,
}

impl GroupMemberRepository {
    /// Create a new GroupMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a member to a group
    pub async fn add_member(
        &self,
        group_name: &str,
        user_id: Uuid,
        role: MemberRole,
    ) -> RepositoryResult<GroupMember> {
        let member = sqlx::query_as::<_, GroupMember>(
            r#"
            INSERT INTO group_members (group_name, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (group_name, user_id) DO UPDATE
            SET role = EXCLUDED.role
            RETURNING group_name, user_id, role, joined_at
            "#,
        )
        .bind(group_name)
        .bind(user_id)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    /// Remove a member from a group
    pub async fn remove_member(&self, group_name: &str, user_id: Uuid) -> RepositoryResult<bool> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM group_members
            WHERE group_name = $1 AND user_id = $2
            "#,
        )
        .bind(group_name)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Find all members of a group
    pub async fn find_by_group(&self, group_name: &str) -> RepositoryResult<Vec<GroupMember>> {
        let members = sqlx::query_as::<_, GroupMember>(
            r#"
            SELECT group_name, user_id, role, joined_at
            FROM group_members
            WHERE group_name = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(group_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Find all group memberships for a user
    pub async fn find_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<GroupMember>> {
        let members = sqlx::query_as::<_, GroupMember>(
            r#"
            SELECT group_name, user_id, role, joined_at
            FROM group_members
            WHERE user_id = $1
            ORDER BY joined_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Get the role of a member in a group
    pub async fn find_role(
        &self,
        group_name: &str,
        user_id: Uuid,
    ) -> RepositoryResult<Option<MemberRole>> {
        let role: Option<String> = sqlx::query_scalar(
            r#"
            SELECT role
            FROM group_members
            WHERE group_name = $1 AND user_id = $2
            "#,
        )
        .bind(group_name)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role.and_then(|r| MemberRole::from_str(&r).ok()))
    }

    /// Check if a user is a member of a group
    pub async fn is_member(&self, group_name: &str, user_id: Uuid) -> RepositoryResult<bool> {
        let found: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT 1
            FROM group_members
            WHERE group_name = $1 AND user_id = $2
            LIMIT 1
            "#,
        )
        .bind(group_name)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Get member count for a group
    pub async fn count_by_group(&self, group_name: &str) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM group_members
            WHERE group_name = $1
            "#,
        )
        .bind(group_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
