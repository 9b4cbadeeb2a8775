use crate::error::RepositoryResult;
use crate::models::User;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for user data access
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user
    pub async fn create(&self, user: &User) -> RepositoryResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, first_name, last_name, date_created, is_admin, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, date_created, is_admin, photo_url
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.date_created)
        .bind(user.is_admin)
        .bind(&user.photo_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by UUID
    pub async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, date_created, is_admin, photo_url
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find several users by id, preserving no particular order
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, date_created, is_admin, photo_url
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Mark or unmark a user as staff
    pub async fn set_admin(&self, id: Uuid, is_admin: bool) -> RepositoryResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_admin = $2
            WHERE id = $1
            RETURNING id, first_name, last_name, date_created, is_admin, photo_url
            "#,
        )
        .bind(id)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
