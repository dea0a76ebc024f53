use tracing::debug;

use super::*;

impl PostgresRecordStore {
    pub(super) async fn create_impl(
        &self,
        module: &ModuleDescriptor,
        data: GenericRecord,
    ) -> AppResult<GenericRecord> {
        let table = quoted_identifier(module.record_type_name())?;
        let columns = quoted_columns(&data)?;

        let statement = if columns.is_empty() {
            format!("INSERT INTO {table} AS record_row DEFAULT VALUES RETURNING to_jsonb(record_row) AS data")
        } else {
            let column_list = columns.join(", ");
            format!(
                "INSERT INTO {table} AS record_row ({column_list}) \
                 SELECT {column_list} FROM jsonb_populate_record(NULL::{table}, $1) \
                 RETURNING to_jsonb(record_row) AS data"
            )
        };

        let query = sqlx::query_as::<_, RecordRow>(&statement);
        let query = if columns.is_empty() {
            query
        } else {
            query.bind(data.into_value())
        };

        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                map_sqlx_error(
                    error,
                    StatementKind::Write,
                    &format!("failed to insert into '{}'", module.record_type_name()),
                )
            })?;

        debug!(table = module.record_type_name(), "record inserted");
        record_from_row(row)
    }

    pub(super) async fn update_impl(
        &self,
        module: &ModuleDescriptor,
        key: &RecordKey,
        partial: GenericRecord,
    ) -> AppResult<GenericRecord> {
        let table = quoted_identifier(module.record_type_name())?;
        let key_column = quoted_identifier(module.primary_key_field())?;
        let columns = quoted_columns(&partial)?;
        if columns.is_empty() {
            return Err(AppError::Validation(
                "update payload must contain at least one field".to_owned(),
            ));
        }

        let assignments = columns
            .iter()
            .map(|column| format!("{column} = source_row.{column}"))
            .collect::<Vec<_>>()
            .join(", ");
        let statement = format!(
            "UPDATE {table} AS record_row SET {assignments} \
             FROM jsonb_populate_record(NULL::{table}, $1) AS source_row \
             WHERE record_row.{key_column}::text = $2 \
             RETURNING to_jsonb(record_row) AS data"
        );

        let row = sqlx::query_as::<_, RecordRow>(&statement)
            .bind(partial.into_value())
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                map_sqlx_error(
                    error,
                    StatementKind::Write,
                    &format!(
                        "failed to update {} '{key}'",
                        module.record_type_name()
                    ),
                )
            })?;

        let Some(row) = row else {
            return Err(AppError::NotFound(format!(
                "{} '{key}' does not exist",
                module.record_type_name()
            )));
        };
        record_from_row(row)
    }

    pub(super) async fn delete_impl(
        &self,
        module: &ModuleDescriptor,
        key: &RecordKey,
    ) -> AppResult<()> {
        let table = quoted_identifier(module.record_type_name())?;
        let key_column = quoted_identifier(module.primary_key_field())?;

        let statement = format!("DELETE FROM {table} WHERE {key_column}::text = $1");
        let result = sqlx::query(&statement)
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                map_sqlx_error(
                    error,
                    StatementKind::Delete,
                    &format!(
                        "failed to delete {} '{key}'",
                        module.record_type_name()
                    ),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "{} '{key}' does not exist",
                module.record_type_name()
            )));
        }

        Ok(())
    }
}

fn quoted_columns(record: &GenericRecord) -> AppResult<Vec<String>> {
    record.field_names().map(quoted_identifier).collect()
}
