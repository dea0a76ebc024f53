use hoso_domain::ModuleDescriptor;

/// Cached view that must be refreshed after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationTarget {
    /// List view of a module.
    ListView {
        /// Module slug.
        slug: &'static str,
    },
    /// Detail view of one record.
    DetailView {
        /// Module slug.
        slug: &'static str,
        /// Primary-key text of the record.
        key: String,
    },
}

impl InvalidationTarget {
    /// Targets the list view of a module.
    #[must_use]
    pub fn list_view(module: &ModuleDescriptor) -> Self {
        Self::ListView {
            slug: module.slug(),
        }
    }

    /// Targets the detail view of one record.
    #[must_use]
    pub fn detail_view(module: &ModuleDescriptor, key: impl Into<String>) -> Self {
        Self::DetailView {
            slug: module.slug(),
            key: key.into(),
        }
    }

    /// Returns the module slug.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            Self::ListView { slug } | Self::DetailView { slug, .. } => slug,
        }
    }

    /// Returns the view path the target refers to.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::ListView { slug } => format!("/{slug}"),
            Self::DetailView { slug, key } => format!("/{slug}/{key}"),
        }
    }
}

/// Port notified after every successful mutation.
///
/// Notification is fire-and-forget: implementations must not block and
/// cannot fail the mutation that triggered them.
pub trait CacheInvalidator: Send + Sync {
    /// Signals that a cached view is stale.
    fn invalidate(&self, target: InvalidationTarget);
}

/// Invalidator that discards every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCacheInvalidator;

impl CacheInvalidator for NoopCacheInvalidator {
    fn invalidate(&self, _target: InvalidationTarget) {}
}
