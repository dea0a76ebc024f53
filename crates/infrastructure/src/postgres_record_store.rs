//! PostgreSQL-backed record store.
//!
//! Rows are read back as `to_jsonb(row)` so every module shares one code
//! path. Table, key and sort columns come from the static descriptors;
//! payload field names are validated as plain identifiers before they are
//! quoted into statements.

use async_trait::async_trait;
use hoso_application::{QueryDescriptor, RecordPage, RecordStore};
use hoso_core::{AppError, AppResult};
use hoso_domain::{GenericRecord, ModuleDescriptor, RecordKey};
use sqlx::PgPool;

mod query;
mod write;

use crate::postgres_errors::{StatementKind, map_sqlx_error};

/// PostgreSQL implementation of the record store port.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RecordRow {
    data: serde_json::Value,
}

fn record_from_row(row: RecordRow) -> AppResult<GenericRecord> {
    GenericRecord::from_value(row.data)
        .map_err(|error| AppError::Internal(format!("failed to decode record row: {error}")))
}

/// Double-quotes a column name after checking it is a plain lowercase identifier.
fn quoted_identifier(name: &str) -> AppResult<String> {
    let mut characters = name.chars();
    let valid_start = characters
        .next()
        .is_some_and(|first| first.is_ascii_lowercase() || first == '_');
    let valid_rest =
        characters.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if !valid_start || !valid_rest || name.len() > 63 {
        return Err(AppError::Validation(format!("invalid field name '{name}'")));
    }

    Ok(format!("\"{name}\""))
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn list(
        &self,
        module: &ModuleDescriptor,
        query: &QueryDescriptor,
    ) -> AppResult<RecordPage> {
        self.list_impl(module, query).await
    }

    async fn find(
        &self,
        module: &ModuleDescriptor,
        key: &RecordKey,
    ) -> AppResult<Option<GenericRecord>> {
        self.find_impl(module, key).await
    }

    async fn create(
        &self,
        module: &ModuleDescriptor,
        data: GenericRecord,
    ) -> AppResult<GenericRecord> {
        self.create_impl(module, data).await
    }

    async fn update(
        &self,
        module: &ModuleDescriptor,
        key: &RecordKey,
        partial: GenericRecord,
    ) -> AppResult<GenericRecord> {
        self.update_impl(module, key, partial).await
    }

    async fn delete(&self, module: &ModuleDescriptor, key: &RecordKey) -> AppResult<()> {
        self.delete_impl(module, key).await
    }
}
