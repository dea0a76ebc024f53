//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod cache_ports;
mod crud_service;
mod permission_seed_service;
mod record_ports;
mod record_query;
mod security_ports;
mod user_service;

pub use authorization_service::{AuthorizationService, DEFAULT_ADMIN_ROLE, PermissionDecision};
pub use cache_ports::{CacheInvalidator, InvalidationTarget, NoopCacheInvalidator};
pub use crud_service::{
    ActionEnvelope, CrudAction, CrudPayload, CrudRequest, CrudService, DispatchResponse,
    FailureKind, ListResult, failure_message,
};
pub use permission_seed_service::{PermissionSeedService, SeedReport};
pub use record_ports::{RecordPage, RecordStore};
pub use record_query::{MAX_PAGE_SIZE, QueryDescriptor, RawListQuery};
pub use security_ports::{PasswordHasher, PermissionRepository, UserRecord, UserRepository};
pub use user_service::{AuthOutcome, UserService};
