use sqlx::PgPool;
use uuid::Uuid;

use crate::users::repo_types::{User, UserChanges};

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, bio, image, role, is_verified, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, bio, image, role, is_verified, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with a hashed password. Bio, image, role and the
    /// verified flag take their column defaults.
    pub async fn create(
        db: &PgPool,
        id: Uuid,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, bio, image, role, is_verified, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// All users, oldest first.
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, bio, image, role, is_verified, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    /// Apply a partial update; absent fields keep their current value.
    /// Returns `None` when the row no longer exists.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        changes: &UserChanges,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                bio = COALESCE($4, bio),
                image = COALESCE($5, image),
                password_hash = COALESCE($6, password_hash)
            WHERE id = $1
            RETURNING id, name, email, password_hash, bio, image, role, is_verified, created_at
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.bio.as_deref())
        .bind(changes.image.as_deref())
        .bind(changes.password_hash.as_deref())
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Delete a user row. Returns false when nothing was deleted.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
