use hoso_core::{AppError, AppResult};
use hoso_domain::{GenericRecord, ModuleDescriptor};

use super::{Tables, referencing_modules};

pub(super) fn check_required(module: &ModuleDescriptor, record: &GenericRecord) -> AppResult<()> {
    match module
        .required_fields()
        .iter()
        .find(|field| !record.has_value(field))
    {
        Some(field) => Err(AppError::Validation(format!(
            "null value in column \"{field}\" of relation \"{}\" violates not-null constraint",
            module.record_type_name()
        ))),
        None => Ok(()),
    }
}

pub(super) fn check_references(
    tables: &Tables,
    module: &ModuleDescriptor,
    record: &GenericRecord,
) -> AppResult<()> {
    for relation in module.relations() {
        let Some(value) = record.text(relation.field()) else {
            continue;
        };

        let target_exists = tables
            .rows_of(relation.target_record_type())
            .iter()
            .any(|target| target.text(relation.target_field()).as_deref() == Some(value.as_str()));
        if !target_exists {
            return Err(AppError::Validation(format!(
                "insert or update on table \"{}\" violates foreign key constraint on \"{}\"",
                module.record_type_name(),
                relation.field()
            )));
        }
    }

    Ok(())
}

pub(super) fn is_referenced(tables: &Tables, module: &ModuleDescriptor, record: &GenericRecord) -> bool {
    referencing_modules(module.record_type_name()).any(|child_module| {
        child_module
            .relations()
            .iter()
            .filter(|relation| relation.target_record_type() == module.record_type_name())
            .any(|relation| {
                let Some(target_value) = record.text(relation.target_field()) else {
                    return false;
                };
                tables
                    .rows_of(child_module.record_type_name())
                    .iter()
                    .any(|child| child.text(relation.field()).as_deref() == Some(target_value.as_str()))
            })
    })
}
