use async_trait::async_trait;
use hoso_application::PermissionRepository;
use hoso_core::AppResult;
use hoso_domain::PermissionGrant;
use sqlx::PgPool;

use crate::postgres_errors::{StatementKind, map_sqlx_error};

/// PostgreSQL-backed repository for permission grants and role/group links.
#[derive(Clone)]
pub struct PostgresPermissionRepository {
    pool: PgPool,
}

impl PostgresPermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn list_codes_for_identity(
        &self,
        role: &str,
        group: Option<&str>,
    ) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT permission_code FROM role_permissions WHERE role = $1
            UNION
            SELECT permission_code FROM group_permissions WHERE group_name = $2
            "#,
        )
        .bind(role)
        .bind(group)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            map_sqlx_error(
                error,
                StatementKind::Read,
                &format!("failed to load permissions for role '{role}'"),
            )
        })
    }

    async fn upsert_grants(&self, grants: &[PermissionGrant]) -> AppResult<usize> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            map_sqlx_error(error, StatementKind::Write, "failed to begin permission seed")
        })?;

        for grant in grants {
            sqlx::query(
                r#"
                INSERT INTO permissions (code, display_name, group_name)
                VALUES ($1, $2, $3)
                ON CONFLICT (code) DO UPDATE
                SET display_name = EXCLUDED.display_name,
                    group_name = EXCLUDED.group_name
                "#,
            )
            .bind(grant.code().as_str())
            .bind(grant.display_name().as_str())
            .bind(grant.group().as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                map_sqlx_error(
                    error,
                    StatementKind::Write,
                    &format!("failed to upsert permission '{}'", grant.code()),
                )
            })?;
        }

        transaction.commit().await.map_err(|error| {
            map_sqlx_error(error, StatementKind::Write, "failed to commit permission seed")
        })?;

        Ok(grants.len())
    }

    async fn grant_to_role(&self, role: &str, codes: &[String]) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role, permission_code)
            SELECT $1, code FROM UNNEST($2::text[]) AS code
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role)
        .bind(codes)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_sqlx_error(
                error,
                StatementKind::Write,
                &format!("failed to grant permissions to role '{role}'"),
            )
        })?;

        Ok(())
    }

    async fn list_codes(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT code FROM permissions ORDER BY code")
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                map_sqlx_error(error, StatementKind::Read, "failed to list permission codes")
            })
    }

    async fn rename_code(&self, from: &str, to: &str) -> AppResult<()> {
        let context = format!("failed to rename permission '{from}' to '{to}'");
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| map_sqlx_error(error, StatementKind::Write, &context))?;

        // The canonical row may already exist; links are merged into it before
        // the legacy row (and its links, by cascade) is removed.
        let statements = [
            r#"
            INSERT INTO permissions (code, display_name, group_name)
            SELECT $2, display_name, group_name FROM permissions WHERE code = $1
            ON CONFLICT (code) DO NOTHING
            "#,
            r#"
            INSERT INTO role_permissions (role, permission_code)
            SELECT role, $2 FROM role_permissions WHERE permission_code = $1
            ON CONFLICT DO NOTHING
            "#,
            r#"
            INSERT INTO group_permissions (group_name, permission_code)
            SELECT group_name, $2 FROM group_permissions WHERE permission_code = $1
            ON CONFLICT DO NOTHING
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .bind(from)
                .bind(to)
                .execute(&mut *transaction)
                .await
                .map_err(|error| map_sqlx_error(error, StatementKind::Write, &context))?;
        }

        sqlx::query("DELETE FROM permissions WHERE code = $1")
            .bind(from)
            .execute(&mut *transaction)
            .await
            .map_err(|error| map_sqlx_error(error, StatementKind::Write, &context))?;

        transaction
            .commit()
            .await
            .map_err(|error| map_sqlx_error(error, StatementKind::Write, &context))
    }
}
