use std::sync::Arc;

use hoso_application::{AuthorizationService, CrudService, UserService};
use hoso_domain::ModuleRegistry;
use hoso_infrastructure::{
    Argon2PasswordHasher, BroadcastCacheInvalidator, PostgresPermissionRepository,
    PostgresRecordStore, PostgresUserRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let registry = Arc::new(ModuleRegistry::standard());
    let invalidator = BroadcastCacheInvalidator::new(config.invalidation_buffer);

    let crud_service = CrudService::new(
        registry,
        AuthorizationService::new(config.admin_role.clone()),
        Arc::new(PostgresRecordStore::new(pool.clone())),
        Arc::new(invalidator.clone()),
    );

    let user_service = UserService::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresPermissionRepository::new(pool.clone())),
        Arc::new(Argon2PasswordHasher::new()),
    );

    AppState {
        crud_service,
        user_service,
        invalidator,
        postgres_pool: pool,
        frontend_url: config.frontend_url.clone(),
    }
}
