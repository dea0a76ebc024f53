mod database;
mod seed;
mod sessions;
mod state_builder;

pub use database::connect_and_migrate;
pub use seed::seed_permissions;
pub use sessions::build_postgres_session_layer;
pub use state_builder::build_app_state;
