//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod module;
mod permission;
mod record;

pub use module::{
    ModuleDescriptor, ModuleKind, ModuleRegistry, PrimaryKey, PrimaryKeyKind, RecordRelation,
    RecordSort,
};
pub use permission::{
    LEGACY_ACTION_ALIASES, PermissionAction, PermissionCode, PermissionGrant, slug_segment,
};
pub use record::{GenericRecord, RecordKey, value_text};
