use hoso_application::{CrudService, UserService};
use hoso_infrastructure::BroadcastCacheInvalidator;
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub crud_service: CrudService,
    pub user_service: UserService,
    pub invalidator: BroadcastCacheInvalidator,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
}
