//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use hoso_application::{UserRecord, UserRepository};
use hoso_core::{AppError, AppResult};
use sqlx::PgPool;

use crate::postgres_errors::{StatementKind, map_sqlx_error};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    display_name: String,
    password_hash: String,
    role: String,
    group_name: Option<String>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.to_string(),
            username: row.username,
            display_name: row.display_name,
            credential: row.password_hash,
            role: row.role,
            group: row.group_name,
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, display_name, password_hash, role, group_name
            FROM users
            WHERE username = $1
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_sqlx_error(error, StatementKind::Read, "failed to find user by username")
        })?;

        Ok(row.map(UserRecord::from))
    }

    async fn replace_credential(&self, user_id: &str, credential: &str) -> AppResult<()> {
        let id = user_id
            .parse::<i64>()
            .map_err(|error| AppError::Validation(format!("invalid user id '{user_id}': {error}")))?;

        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(credential)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                map_sqlx_error(error, StatementKind::Write, "failed to update user credential")
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        Ok(())
    }
}
