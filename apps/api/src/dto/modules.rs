use hoso_domain::ModuleDescriptor;
use serde::Serialize;
use ts_rs::TS;

/// Navigation entry for one record module.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/module-response.ts"
)]
pub struct ModuleResponse {
    pub slug: String,
    pub title: String,
    pub record_type: String,
    pub primary_key: String,
    pub searchable_fields: Vec<String>,
    pub default_page_size: u32,
    pub has_detail_view: bool,
}

impl From<&ModuleDescriptor> for ModuleResponse {
    fn from(descriptor: &ModuleDescriptor) -> Self {
        Self {
            slug: descriptor.slug().to_owned(),
            title: descriptor.display_title().to_owned(),
            record_type: descriptor.record_type_name().to_owned(),
            primary_key: descriptor.primary_key_field().to_owned(),
            searchable_fields: descriptor
                .searchable_fields()
                .iter()
                .map(|field| (*field).to_owned())
                .collect(),
            default_page_size: u32::try_from(descriptor.default_page_size()).unwrap_or(u32::MAX),
            has_detail_view: descriptor.has_detail_view(),
        }
    }
}
