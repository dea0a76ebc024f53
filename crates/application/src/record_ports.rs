use async_trait::async_trait;
use hoso_core::AppResult;
use hoso_domain::{GenericRecord, ModuleDescriptor, RecordKey};

use crate::QueryDescriptor;

/// One page of records plus the total match count before pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPage {
    /// Records on the requested page, in deterministic order.
    pub items: Vec<GenericRecord>,
    /// Number of records matching the filters and search term.
    pub total: u64,
}

/// Persistence port for the record types described by the module registry.
///
/// Implementations derive their table, key and search columns from the
/// descriptor. Constraint violations surface as `Validation` on writes and
/// `Conflict` on delete; connectivity failures surface as `Transient`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Lists one page of records matching the query.
    async fn list(
        &self,
        module: &ModuleDescriptor,
        query: &QueryDescriptor,
    ) -> AppResult<RecordPage>;

    /// Finds one record by primary key.
    async fn find(
        &self,
        module: &ModuleDescriptor,
        key: &RecordKey,
    ) -> AppResult<Option<GenericRecord>>;

    /// Inserts a record and returns it as persisted, including generated keys.
    async fn create(&self, module: &ModuleDescriptor, data: GenericRecord)
    -> AppResult<GenericRecord>;

    /// Applies a partial update and returns the full updated record.
    async fn update(
        &self,
        module: &ModuleDescriptor,
        key: &RecordKey,
        partial: GenericRecord,
    ) -> AppResult<GenericRecord>;

    /// Deletes one record by primary key.
    async fn delete(&self, module: &ModuleDescriptor, key: &RecordKey) -> AppResult<()>;
}
