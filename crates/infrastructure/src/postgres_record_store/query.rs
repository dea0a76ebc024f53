use hoso_domain::value_text;
use sqlx::{Postgres, QueryBuilder};

use super::*;

const ROW_ALIAS: &str = "record_row";

impl PostgresRecordStore {
    pub(super) async fn list_impl(
        &self,
        module: &ModuleDescriptor,
        query: &QueryDescriptor,
    ) -> AppResult<RecordPage> {
        let limit = i64::try_from(query.page_size()).map_err(|error| {
            AppError::Validation(format!("invalid record query page size: {error}"))
        })?;
        let offset = i64::try_from(query.offset()).map_err(|error| {
            AppError::Validation(format!("invalid record query offset: {error}"))
        })?;
        let table = quoted_identifier(module.record_type_name())?;
        let sort_column = quoted_identifier(module.default_sort().field())?;
        let key_column = quoted_identifier(module.primary_key_field())?;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT to_jsonb(");
        builder.push(ROW_ALIAS);
        builder.push(") AS data FROM ");
        builder.push(table.as_str());
        builder.push(" ");
        builder.push(ROW_ALIAS);
        push_predicate(&mut builder, module, query);
        builder.push(" ORDER BY ");
        builder.push(ROW_ALIAS);
        builder.push(".");
        builder.push(sort_column.as_str());
        builder.push(if module.default_sort().is_descending() {
            " DESC NULLS LAST, "
        } else {
            " ASC NULLS LAST, "
        });
        builder.push(ROW_ALIAS);
        builder.push(".");
        builder.push(key_column.as_str());
        builder.push(" ASC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<RecordRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                map_sqlx_error(
                    error,
                    StatementKind::Read,
                    &format!("failed to list records of '{}'", module.record_type_name()),
                )
            })?;

        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM ");
        count_builder.push(table.as_str());
        count_builder.push(" ");
        count_builder.push(ROW_ALIAS);
        push_predicate(&mut count_builder, module, query);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                map_sqlx_error(
                    error,
                    StatementKind::Read,
                    &format!("failed to count records of '{}'", module.record_type_name()),
                )
            })?;

        Ok(RecordPage {
            items: rows
                .into_iter()
                .map(record_from_row)
                .collect::<AppResult<Vec<_>>>()?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    pub(super) async fn find_impl(
        &self,
        module: &ModuleDescriptor,
        key: &RecordKey,
    ) -> AppResult<Option<GenericRecord>> {
        let table = quoted_identifier(module.record_type_name())?;
        let key_column = quoted_identifier(module.primary_key_field())?;

        let statement = format!(
            "SELECT to_jsonb({ROW_ALIAS}) AS data FROM {table} {ROW_ALIAS} \
             WHERE {ROW_ALIAS}.{key_column}::text = $1 LIMIT 1"
        );
        let row = sqlx::query_as::<_, RecordRow>(&statement)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                map_sqlx_error(
                    error,
                    StatementKind::Read,
                    &format!(
                        "failed to find {} '{key}'",
                        module.record_type_name()
                    ),
                )
            })?;

        row.map(record_from_row).transpose()
    }
}

/// Appends the WHERE clause shared by the page and count statements.
///
/// Filters compare the text rendering of the stored value; a null filter
/// value matches nothing. The search term is OR'd across searchable fields.
fn push_predicate(
    builder: &mut QueryBuilder<'_, Postgres>,
    module: &ModuleDescriptor,
    query: &QueryDescriptor,
) {
    builder.push(" WHERE TRUE");

    for (field, value) in query.filters() {
        match value_text(value) {
            Some(expected) => {
                builder.push(" AND (to_jsonb(");
                builder.push(ROW_ALIAS);
                builder.push(") ->> ");
                builder.push_bind(field.clone());
                builder.push(") = ");
                builder.push_bind(expected);
            }
            None => {
                builder.push(" AND FALSE");
            }
        }
    }

    let searchable = module.searchable_fields();
    if let Some(term) = query.search_term()
        && !searchable.is_empty()
    {
        let pattern = format!("%{}%", escape_like(term));
        builder.push(" AND (");
        for (index, field) in searchable.iter().enumerate() {
            if index > 0 {
                builder.push(" OR ");
            }
            builder.push("(to_jsonb(");
            builder.push(ROW_ALIAS);
            builder.push(") ->> ");
            builder.push_bind(*field);
            builder.push(") ILIKE ");
            builder.push_bind(pattern.clone());
        }
        builder.push(")");
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for character in term.chars() {
        if matches!(character, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use hoso_application::QueryDescriptor;
    use hoso_domain::ModuleKind;
    use serde_json::json;
    use sqlx::{Postgres, QueryBuilder};

    use super::{escape_like, push_predicate};

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
    }

    #[test]
    fn predicate_binds_filters_and_search() {
        let query = QueryDescriptor::new(10)
            .with_filter("trang_thai", json!("moi"))
            .with_search_term("trộm");
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 FROM t record_row");

        push_predicate(&mut builder, ModuleKind::CaseDossiers.descriptor(), &query);

        let sql = builder.sql();
        assert!(sql.contains("(to_jsonb(record_row) ->> $1) = $2"));
        assert_eq!(sql.matches("ILIKE").count(), 5);
        assert!(!sql.contains("trộm"));
    }

    #[test]
    fn null_filter_matches_nothing() {
        let query = QueryDescriptor::new(10).with_filter("ghi_chu", json!(null));
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1");

        push_predicate(&mut builder, ModuleKind::Tasks.descriptor(), &query);

        assert!(builder.sql().ends_with("AND FALSE"));
    }
}
