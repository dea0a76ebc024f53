use std::collections::BTreeMap;

use serde_json::Value;

/// Upper bound applied to any requested page size.
pub const MAX_PAGE_SIZE: usize = 100;

/// Normalized list request: pagination, search term and exact-match filters.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    page: usize,
    page_size: usize,
    search_term: Option<String>,
    filters: BTreeMap<String, Value>,
}

impl QueryDescriptor {
    /// First page of an unfiltered listing.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            search_term: None,
            filters: BTreeMap::new(),
        }
    }

    /// Moves to a page; zero is treated as the first page.
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Applies a search term and returns to the first page.
    ///
    /// Blank terms clear the search.
    #[must_use]
    pub fn with_search_term(mut self, term: impl AsRef<str>) -> Self {
        self.search_term = normalize_search(Some(term.as_ref()));
        self.page = 1;
        self
    }

    /// Adds an exact-match filter on a field.
    #[must_use]
    pub fn with_filter(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filters.insert(field.into(), value);
        self
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the number of records skipped before this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Returns the search term, if any.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    /// Returns the exact-match filters.
    #[must_use]
    pub fn filters(&self) -> &BTreeMap<String, Value> {
        &self.filters
    }
}

/// List parameters as they arrive from a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListQuery {
    /// Requested page.
    pub page: Option<String>,
    /// Requested page size.
    pub page_size: Option<String>,
    /// Submitted search term.
    pub search: Option<String>,
    /// Search term the client submitted on its previous request.
    pub previous_search: Option<String>,
    /// Remaining query pairs, applied as exact-match filters.
    pub filters: BTreeMap<String, String>,
}

impl RawListQuery {
    /// Coerces the raw parameters into a query descriptor.
    ///
    /// Unparseable or non-positive pages become 1, and unparseable page
    /// sizes fall back to the module default. A search term that differs
    /// from the previously submitted one starts again at page 1.
    #[must_use]
    pub fn into_descriptor(self, default_page_size: usize) -> QueryDescriptor {
        let page_size = parse_positive(self.page_size.as_deref()).unwrap_or(default_page_size);
        let search_term = normalize_search(self.search.as_deref());
        let previous_search = normalize_search(self.previous_search.as_deref());
        let search_changed = self.previous_search.is_some() && search_term != previous_search;

        let page = if search_changed {
            1
        } else {
            parse_positive(self.page.as_deref()).unwrap_or(1)
        };

        let mut descriptor = QueryDescriptor::new(page_size).with_page(page);
        descriptor.search_term = search_term;
        for (field, value) in self.filters {
            descriptor = descriptor.with_filter(field, Value::String(value));
        }

        descriptor
    }
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}

fn normalize_search(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;
    use serde_json::json;

    use super::{MAX_PAGE_SIZE, QueryDescriptor, RawListQuery};

    fn raw(page: Option<&str>, page_size: Option<&str>) -> RawListQuery {
        RawListQuery {
            page: page.map(str::to_owned),
            page_size: page_size.map(str::to_owned),
            ..RawListQuery::default()
        }
    }

    #[test]
    fn invalid_page_falls_back_to_first() {
        for page in ["abc", "0", "-3", "", "1.5"] {
            let descriptor = raw(Some(page), None).into_descriptor(20);
            assert_eq!(descriptor.page(), 1, "page input {page:?}");
        }
    }

    #[test]
    fn invalid_page_size_uses_module_default() {
        assert_eq!(raw(None, Some("x")).into_descriptor(10).page_size(), 10);
        assert_eq!(raw(None, Some("0")).into_descriptor(10).page_size(), 10);
        assert_eq!(raw(None, Some("25")).into_descriptor(10).page_size(), 25);
    }

    #[test]
    fn page_size_is_capped() {
        let descriptor = raw(None, Some("5000")).into_descriptor(20);
        assert_eq!(descriptor.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn new_search_term_resets_page() {
        let descriptor = RawListQuery {
            page: Some("4".to_owned()),
            search: Some("trộm cắp".to_owned()),
            previous_search: Some("lừa đảo".to_owned()),
            ..RawListQuery::default()
        }
        .into_descriptor(10);

        assert_eq!(descriptor.page(), 1);
        assert_eq!(descriptor.search_term(), Some("trộm cắp"));
    }

    #[test]
    fn unchanged_search_term_keeps_page() {
        let descriptor = RawListQuery {
            page: Some("3".to_owned()),
            search: Some(" trộm cắp ".to_owned()),
            previous_search: Some("trộm cắp".to_owned()),
            ..RawListQuery::default()
        }
        .into_descriptor(10);

        assert_eq!(descriptor.page(), 3);
    }

    #[test]
    fn clearing_search_resets_page() {
        let descriptor = RawListQuery {
            page: Some("2".to_owned()),
            search: Some("   ".to_owned()),
            previous_search: Some("BLHS".to_owned()),
            ..RawListQuery::default()
        }
        .into_descriptor(20);

        assert_eq!(descriptor.page(), 1);
        assert_eq!(descriptor.search_term(), None);
    }

    #[test]
    fn filters_become_string_values() {
        let descriptor = RawListQuery {
            filters: BTreeMap::from([("trang_thai".to_owned(), "dang_xu_ly".to_owned())]),
            ..RawListQuery::default()
        }
        .into_descriptor(20);

        assert_eq!(
            descriptor.filters().get("trang_thai"),
            Some(&json!("dang_xu_ly"))
        );
    }

    #[test]
    fn with_search_term_returns_to_first_page() {
        let descriptor = QueryDescriptor::new(20).with_page(5).with_search_term("hợp đồng");
        assert_eq!(descriptor.page(), 1);
        assert_eq!(descriptor.offset(), 0);
    }

    proptest! {
        #[test]
        fn coerced_descriptor_is_always_valid(
            page in proptest::option::of(".{0,6}"),
            page_size in proptest::option::of(".{0,6}"),
            default_page_size in 1usize..=100,
        ) {
            let descriptor = RawListQuery {
                page,
                page_size,
                ..RawListQuery::default()
            }
            .into_descriptor(default_page_size);

            prop_assert!(descriptor.page() >= 1);
            prop_assert!(descriptor.page_size() >= 1);
            prop_assert!(descriptor.page_size() <= MAX_PAGE_SIZE);
            prop_assert_eq!(
                descriptor.offset(),
                (descriptor.page() - 1) * descriptor.page_size()
            );
        }
    }
}
