use std::sync::Arc;

use hoso_application::{PermissionSeedService, SeedReport};
use hoso_core::AppResult;
use hoso_domain::ModuleRegistry;
use hoso_infrastructure::PostgresPermissionRepository;
use sqlx::PgPool;

use crate::api_config::ApiConfig;

/// Rewrites legacy grants and seeds the standard module permissions.
pub async fn seed_permissions(pool: PgPool, config: &ApiConfig) -> AppResult<SeedReport> {
    PermissionSeedService::new(
        Arc::new(PostgresPermissionRepository::new(pool)),
        Arc::new(ModuleRegistry::standard()),
        config.admin_role.clone(),
    )
    .run()
    .await
}
