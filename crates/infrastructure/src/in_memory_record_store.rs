//! In-memory record store used by tests and local tooling.
//!
//! Mirrors the constraints the Postgres schema enforces: required columns,
//! primary-key uniqueness and the foreign keys declared on the descriptors.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use hoso_application::{QueryDescriptor, RecordPage, RecordStore};
use hoso_core::{AppError, AppResult};
use hoso_domain::{
    GenericRecord, ModuleDescriptor, ModuleKind, PrimaryKeyKind, RecordKey, value_text,
};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::RELATED_DATA_CONFLICT;

mod constraints;

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<&'static str, Vec<GenericRecord>>,
    sequences: HashMap<&'static str, i64>,
}

impl Tables {
    fn rows_of(&self, record_type_name: &str) -> &[GenericRecord] {
        self.rows
            .get(record_type_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// In-memory record store implementation.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<Tables>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list(
        &self,
        module: &ModuleDescriptor,
        query: &QueryDescriptor,
    ) -> AppResult<RecordPage> {
        let tables = self.tables.read().await;

        let mut matching: Vec<GenericRecord> = tables
            .rows_of(module.record_type_name())
            .iter()
            .filter(|record| matches_filters(record, query) && matches_search(module, record, query))
            .cloned()
            .collect();
        matching.sort_by(|left, right| compare_records(module, left, right));

        Ok(RecordPage {
            total: matching.len() as u64,
            items: matching
                .into_iter()
                .skip(query.offset())
                .take(query.page_size())
                .collect(),
        })
    }

    async fn find(
        &self,
        module: &ModuleDescriptor,
        key: &RecordKey,
    ) -> AppResult<Option<GenericRecord>> {
        let tables = self.tables.read().await;

        Ok(tables
            .rows_of(module.record_type_name())
            .iter()
            .find(|record| has_key(module, record, key))
            .cloned())
    }

    async fn create(
        &self,
        module: &ModuleDescriptor,
        mut data: GenericRecord,
    ) -> AppResult<GenericRecord> {
        let mut tables = self.tables.write().await;
        let pk_field = module.primary_key_field();

        if !data.has_value(pk_field) {
            match module.primary_key().kind() {
                PrimaryKeyKind::AutoIncrement => {
                    let next = next_sequence_value(&tables, module);
                    tables.sequences.insert(module.record_type_name(), next);
                    data.insert(pk_field, json!(next));
                }
                PrimaryKeyKind::Uuid => {
                    data.insert(pk_field, json!(Uuid::new_v4().to_string()));
                }
                PrimaryKeyKind::Natural => {}
            }
        }
        let stamp_field = insertion_timestamp_field(module);
        if !data.has_value(stamp_field) {
            data.insert(stamp_field, json!(chrono::Utc::now().to_rfc3339()));
        }

        constraints::check_required(module, &data)?;
        constraints::check_references(&tables, module, &data)?;
        let key = data.text(pk_field).unwrap_or_default();
        if tables
            .rows_of(module.record_type_name())
            .iter()
            .any(|record| record.text(pk_field).as_deref() == Some(key.as_str()))
        {
            return Err(AppError::Validation(format!(
                "duplicate key value violates unique constraint \"{}_pkey\"",
                module.record_type_name()
            )));
        }

        tables
            .rows
            .entry(module.record_type_name())
            .or_default()
            .push(data.clone());
        Ok(data)
    }

    async fn update(
        &self,
        module: &ModuleDescriptor,
        key: &RecordKey,
        partial: GenericRecord,
    ) -> AppResult<GenericRecord> {
        let mut tables = self.tables.write().await;

        let mut updated = tables
            .rows_of(module.record_type_name())
            .iter()
            .find(|record| has_key(module, record, key))
            .cloned()
            .ok_or_else(|| not_found(module, key))?;
        updated.merge(&partial);

        constraints::check_required(module, &updated)?;
        constraints::check_references(&tables, module, &updated)?;

        let rows = tables.rows.entry(module.record_type_name()).or_default();
        if let Some(slot) = rows.iter_mut().find(|record| has_key(module, record, key)) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, module: &ModuleDescriptor, key: &RecordKey) -> AppResult<()> {
        let mut tables = self.tables.write().await;

        let record = tables
            .rows_of(module.record_type_name())
            .iter()
            .find(|record| has_key(module, record, key))
            .cloned()
            .ok_or_else(|| not_found(module, key))?;
        if constraints::is_referenced(&tables, module, &record) {
            return Err(AppError::Conflict(RELATED_DATA_CONFLICT.to_owned()));
        }

        if let Some(rows) = tables.rows.get_mut(module.record_type_name()) {
            rows.retain(|candidate| !has_key(module, candidate, key));
        }
        Ok(())
    }
}

// Newest-first modules sort on their insertion timestamp; every other table stamps `created_at`.
fn insertion_timestamp_field(module: &ModuleDescriptor) -> &'static str {
    let sort = module.default_sort();
    if sort.is_descending() {
        sort.field()
    } else {
        "created_at"
    }
}

fn next_sequence_value(tables: &Tables, module: &ModuleDescriptor) -> i64 {
    let current = tables
        .sequences
        .get(module.record_type_name())
        .copied()
        .unwrap_or(0);
    let highest = tables
        .rows_of(module.record_type_name())
        .iter()
        .filter_map(|record| record.get(module.primary_key_field()).and_then(Value::as_i64))
        .max()
        .unwrap_or(0);

    current.max(highest) + 1
}

fn has_key(module: &ModuleDescriptor, record: &GenericRecord, key: &RecordKey) -> bool {
    record.text(module.primary_key_field()).as_deref() == Some(key.as_str())
}

fn not_found(module: &ModuleDescriptor, key: &RecordKey) -> AppError {
    AppError::NotFound(format!(
        "{} '{key}' does not exist",
        module.record_type_name()
    ))
}

fn matches_filters(record: &GenericRecord, query: &QueryDescriptor) -> bool {
    query.filters().iter().all(|(field, expected)| {
        value_text(expected).is_some_and(|expected| record.text(field) == Some(expected))
    })
}

fn matches_search(module: &ModuleDescriptor, record: &GenericRecord, query: &QueryDescriptor) -> bool {
    let Some(term) = query.search_term() else {
        return true;
    };
    let needle = term.to_lowercase();

    module.searchable_fields().iter().any(|field| {
        record
            .text(field)
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    })
}

fn compare_records(module: &ModuleDescriptor, left: &GenericRecord, right: &GenericRecord) -> Ordering {
    let sort = module.default_sort();
    let primary = compare_values(left.get(sort.field()), right.get(sort.field()));
    let primary = if sort.is_descending() {
        primary.reverse()
    } else {
        primary
    };

    primary.then_with(|| {
        compare_values(
            left.get(module.primary_key_field()),
            right.get(module.primary_key_field()),
        )
    })
}

// Nulls sort last, matching the Postgres default for ascending order.
fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    let left = left.filter(|value| !value.is_null());
    let right = right.filter(|value| !value.is_null());

    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(left)), Some(Value::Number(right))) => left
            .as_f64()
            .unwrap_or_default()
            .total_cmp(&right.as_f64().unwrap_or_default()),
        (Some(left), Some(right)) => value_text(left).cmp(&value_text(right)),
    }
}

/// Module kinds whose records reference the given record type.
fn referencing_modules(record_type_name: &str) -> impl Iterator<Item = &'static ModuleDescriptor> + '_ {
    ModuleKind::ALL
        .into_iter()
        .map(ModuleKind::descriptor)
        .filter(move |descriptor| {
            descriptor
                .relations()
                .iter()
                .any(|relation| relation.target_record_type() == record_type_name)
        })
}
