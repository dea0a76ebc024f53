//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod broadcast_cache_invalidator;
mod in_memory_record_store;
mod postgres_errors;
mod postgres_permission_repository;
mod postgres_record_store;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use broadcast_cache_invalidator::BroadcastCacheInvalidator;
pub use in_memory_record_store::InMemoryRecordStore;
pub use postgres_permission_repository::PostgresPermissionRepository;
pub use postgres_record_store::PostgresRecordStore;
pub use postgres_user_repository::PostgresUserRepository;

/// Message returned when a delete is blocked by rows that reference the record.
pub(crate) const RELATED_DATA_CONFLICT: &str =
    "Không thể xóa — có thể còn dữ liệu liên quan (likely has related data)";
