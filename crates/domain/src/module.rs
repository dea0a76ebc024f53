use hoso_core::{AppError, AppResult};

/// How a record type obtains its primary-key value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKeyKind {
    /// Integer assigned by the database sequence.
    AutoIncrement,
    /// UUID generated by the database.
    Uuid,
    /// Caller-chosen domain key such as a legal code.
    Natural,
}

/// Primary-key declaration of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryKey {
    field: &'static str,
    kind: PrimaryKeyKind,
}

impl PrimaryKey {
    const fn new(field: &'static str, kind: PrimaryKeyKind) -> Self {
        Self { field, kind }
    }

    /// Returns the key field name.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns how key values are assigned.
    #[must_use]
    pub fn kind(&self) -> PrimaryKeyKind {
        self.kind
    }
}

/// Foreign-key relation from a field to another record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordRelation {
    field: &'static str,
    target_record_type: &'static str,
    target_field: &'static str,
}

impl RecordRelation {
    const fn new(
        field: &'static str,
        target_record_type: &'static str,
        target_field: &'static str,
    ) -> Self {
        Self {
            field,
            target_record_type,
            target_field,
        }
    }

    /// Returns the referencing field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the referenced record type.
    #[must_use]
    pub fn target_record_type(&self) -> &'static str {
        self.target_record_type
    }

    /// Returns the referenced field on the target record type.
    #[must_use]
    pub fn target_field(&self) -> &'static str {
        self.target_field
    }
}

/// Default list ordering of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSort {
    field: &'static str,
    descending: bool,
}

impl RecordSort {
    const fn desc(field: &'static str) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    const fn asc(field: &'static str) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    /// Returns the sort field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns whether the sort is descending.
    #[must_use]
    pub fn is_descending(&self) -> bool {
        self.descending
    }
}

/// Closed set of record-type modules exposed through the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleKind {
    /// Internal tasks.
    Tasks,
    /// Legal-code lookup.
    LegalCodes,
    /// Case dossiers.
    CaseDossiers,
    /// Files attached to case dossiers.
    Attachments,
    /// Imported chat logs.
    ChatLogs,
    /// Zalo group directory.
    ZaloGroups,
    /// Key/value application settings.
    Settings,
    /// Permission grant catalogue.
    Permissions,
}

impl ModuleKind {
    /// Every registered module, in navigation order.
    pub const ALL: [Self; 8] = [
        Self::Tasks,
        Self::LegalCodes,
        Self::CaseDossiers,
        Self::Attachments,
        Self::ChatLogs,
        Self::ZaloGroups,
        Self::Settings,
        Self::Permissions,
    ];

    /// Returns the static descriptor of this module.
    #[must_use]
    pub fn descriptor(self) -> &'static ModuleDescriptor {
        match self {
            Self::Tasks => &TASKS,
            Self::LegalCodes => &LEGAL_CODES,
            Self::CaseDossiers => &CASE_DOSSIERS,
            Self::Attachments => &ATTACHMENTS,
            Self::ChatLogs => &CHAT_LOGS,
            Self::ZaloGroups => &ZALO_GROUPS,
            Self::Settings => &SETTINGS,
            Self::Permissions => &PERMISSIONS,
        }
    }

    /// Finds the module registered under a slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.descriptor().slug() == slug)
    }
}

/// Immutable description of one record-type module.
#[derive(Debug, PartialEq, Eq)]
pub struct ModuleDescriptor {
    kind: ModuleKind,
    slug: &'static str,
    record_type_name: &'static str,
    primary_key: PrimaryKey,
    display_title: &'static str,
    searchable_fields: &'static [&'static str],
    required_fields: &'static [&'static str],
    relations: &'static [RecordRelation],
    default_sort: RecordSort,
    default_page_size: usize,
    has_detail_view: bool,
}

impl ModuleDescriptor {
    /// Returns the module kind.
    #[must_use]
    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    /// Returns the URL-safe slug.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        self.slug
    }

    /// Returns the persisted record-type (table) name.
    #[must_use]
    pub fn record_type_name(&self) -> &'static str {
        self.record_type_name
    }

    /// Returns the primary-key declaration.
    #[must_use]
    pub fn primary_key(&self) -> PrimaryKey {
        self.primary_key
    }

    /// Returns the primary-key field name.
    #[must_use]
    pub fn primary_key_field(&self) -> &'static str {
        self.primary_key.field
    }

    /// Returns the localized display title.
    #[must_use]
    pub fn display_title(&self) -> &'static str {
        self.display_title
    }

    /// Returns the fields matched by free-text search.
    #[must_use]
    pub fn searchable_fields(&self) -> &'static [&'static str] {
        self.searchable_fields
    }

    /// Returns the fields persistence requires on insert.
    #[must_use]
    pub fn required_fields(&self) -> &'static [&'static str] {
        self.required_fields
    }

    /// Returns foreign-key relations declared by this record type.
    #[must_use]
    pub fn relations(&self) -> &'static [RecordRelation] {
        self.relations
    }

    /// Returns the default list ordering.
    #[must_use]
    pub fn default_sort(&self) -> RecordSort {
        self.default_sort
    }

    /// Returns the default page size for list views.
    #[must_use]
    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    /// Returns whether records have their own detail view.
    #[must_use]
    pub fn has_detail_view(&self) -> bool {
        self.has_detail_view
    }

    /// Path of the list view rendered for this module.
    #[must_use]
    pub fn list_view_path(&self) -> String {
        format!("/{}", self.slug)
    }

    /// Path of the detail view for one record.
    #[must_use]
    pub fn detail_view_path(&self, key: &str) -> String {
        format!("/{}/{key}", self.slug)
    }
}

static TASKS: ModuleDescriptor = ModuleDescriptor {
    kind: ModuleKind::Tasks,
    slug: "cong-viec",
    record_type_name: "cong_viec",
    primary_key: PrimaryKey::new("id", PrimaryKeyKind::AutoIncrement),
    display_title: "Công việc",
    searchable_fields: &["tieu_de", "mo_ta", "nguoi_phu_trach"],
    required_fields: &["tieu_de"],
    relations: &[],
    default_sort: RecordSort::desc("created_at"),
    default_page_size: 20,
    has_detail_view: false,
};

static LEGAL_CODES: ModuleDescriptor = ModuleDescriptor {
    kind: ModuleKind::LegalCodes,
    slug: "bo-luat",
    record_type_name: "bo_luat",
    primary_key: PrimaryKey::new("ma", PrimaryKeyKind::Natural),
    display_title: "Bộ luật",
    searchable_fields: &["ma", "ten", "noi_dung"],
    required_fields: &["ma", "ten"],
    relations: &[],
    default_sort: RecordSort::asc("ma"),
    default_page_size: 20,
    has_detail_view: false,
};

static CASE_DOSSIERS: ModuleDescriptor = ModuleDescriptor {
    kind: ModuleKind::CaseDossiers,
    slug: "data-don-an",
    record_type_name: "data_don_an",
    primary_key: PrimaryKey::new("id", PrimaryKeyKind::AutoIncrement),
    display_title: "Hồ sơ đơn án",
    searchable_fields: &["so_thu_ly", "nguyen_don", "bi_don", "toi_danh", "noi_dung"],
    required_fields: &["so_thu_ly"],
    relations: &[],
    default_sort: RecordSort::desc("created_at"),
    default_page_size: 10,
    has_detail_view: true,
};

static ATTACHMENTS: ModuleDescriptor = ModuleDescriptor {
    kind: ModuleKind::Attachments,
    slug: "tep-dinh-kem",
    record_type_name: "tep_dinh_kem",
    primary_key: PrimaryKey::new("id", PrimaryKeyKind::Uuid),
    display_title: "Tệp đính kèm",
    searchable_fields: &["ten_tep"],
    required_fields: &["don_an_id", "ten_tep", "duong_dan"],
    relations: &[RecordRelation::new("don_an_id", "data_don_an", "id")],
    default_sort: RecordSort::desc("created_at"),
    default_page_size: 20,
    has_detail_view: false,
};

static CHAT_LOGS: ModuleDescriptor = ModuleDescriptor {
    kind: ModuleKind::ChatLogs,
    slug: "lich-su-chat",
    record_type_name: "lich_su_chat",
    primary_key: PrimaryKey::new("id", PrimaryKeyKind::AutoIncrement),
    display_title: "Lịch sử chat",
    searchable_fields: &["nguoi_gui", "noi_dung"],
    required_fields: &["noi_dung"],
    relations: &[RecordRelation::new("don_an_id", "data_don_an", "id")],
    default_sort: RecordSort::desc("thoi_gian"),
    default_page_size: 20,
    has_detail_view: false,
};

static ZALO_GROUPS: ModuleDescriptor = ModuleDescriptor {
    kind: ModuleKind::ZaloGroups,
    slug: "nhom-zalo",
    record_type_name: "nhom_zalo",
    primary_key: PrimaryKey::new("group_id", PrimaryKeyKind::Natural),
    display_title: "Nhóm Zalo",
    searchable_fields: &["ten_nhom", "mo_ta"],
    required_fields: &["group_id", "ten_nhom"],
    relations: &[RecordRelation::new("don_an_id", "data_don_an", "id")],
    default_sort: RecordSort::asc("ten_nhom"),
    default_page_size: 20,
    has_detail_view: false,
};

static SETTINGS: ModuleDescriptor = ModuleDescriptor {
    kind: ModuleKind::Settings,
    slug: "cai-dat",
    record_type_name: "cai_dat",
    primary_key: PrimaryKey::new("khoa", PrimaryKeyKind::Natural),
    display_title: "Cài đặt",
    searchable_fields: &["khoa", "mo_ta"],
    required_fields: &["khoa"],
    relations: &[],
    default_sort: RecordSort::asc("khoa"),
    default_page_size: 20,
    has_detail_view: false,
};

static PERMISSIONS: ModuleDescriptor = ModuleDescriptor {
    kind: ModuleKind::Permissions,
    slug: "quyen",
    record_type_name: "permissions",
    primary_key: PrimaryKey::new("code", PrimaryKeyKind::Natural),
    display_title: "Phân quyền",
    searchable_fields: &["code", "display_name", "group_name"],
    required_fields: &["code", "display_name", "group_name"],
    relations: &[],
    default_sort: RecordSort::asc("code"),
    default_page_size: 20,
    has_detail_view: false,
};

/// Read-only slug lookup built once at startup.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    modules: Vec<ModuleKind>,
}

impl ModuleRegistry {
    /// Registry containing every module.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_modules(ModuleKind::ALL)
    }

    /// Registry restricted to the provided modules.
    #[must_use]
    pub fn with_modules(modules: impl IntoIterator<Item = ModuleKind>) -> Self {
        let mut modules: Vec<ModuleKind> = modules.into_iter().collect();
        modules.sort();
        modules.dedup();
        Self { modules }
    }

    /// Resolves a slug to its descriptor.
    pub fn resolve(&self, slug: &str) -> AppResult<&'static ModuleDescriptor> {
        ModuleKind::from_slug(slug)
            .filter(|kind| self.modules.contains(kind))
            .map(ModuleKind::descriptor)
            .ok_or_else(|| AppError::InvalidModule(format!("unknown module slug '{slug}'")))
    }

    /// Returns every registered descriptor.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static ModuleDescriptor> + '_ {
        self.modules.iter().map(|kind| kind.descriptor())
    }

    /// Finds the descriptor of a persisted record type.
    #[must_use]
    pub fn by_record_type(&self, record_type_name: &str) -> Option<&'static ModuleDescriptor> {
        self.descriptors()
            .find(|descriptor| descriptor.record_type_name() == record_type_name)
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
