use std::fmt::{Display, Formatter};
use std::str::FromStr;

use hoso_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::ModuleDescriptor;

/// Actions a permission code can grant on a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionAction {
    /// Read list and detail views.
    View,
    /// Create records.
    Add,
    /// Update records.
    Edit,
    /// Delete records.
    Delete,
}

/// Legacy action prefixes still present in seeded data, with their canonical action.
pub const LEGACY_ACTION_ALIASES: &[(&str, PermissionAction)] = &[("CREATE", PermissionAction::Add)];

impl PermissionAction {
    /// Every canonical action, in seeding order.
    pub const ALL: [Self; 4] = [Self::View, Self::Add, Self::Edit, Self::Delete];

    /// Returns the canonical code prefix.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::Add => "ADD",
            Self::Edit => "EDIT",
            Self::Delete => "DELETE",
        }
    }

    /// Returns the localized verb used in grant display names.
    #[must_use]
    pub fn display_verb(&self) -> &'static str {
        match self {
            Self::View => "Xem",
            Self::Add => "Thêm",
            Self::Edit => "Sửa",
            Self::Delete => "Xóa",
        }
    }

    /// Parses a canonical or legacy code prefix.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == prefix)
            .or_else(|| {
                LEGACY_ACTION_ALIASES
                    .iter()
                    .find(|(legacy, _)| *legacy == prefix)
                    .map(|(_, action)| *action)
            })
    }
}

impl FromStr for PermissionAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_prefix(value).ok_or_else(|| {
            AppError::Validation(format!("unknown permission action '{value}'"))
        })
    }
}

/// Converts a module slug into its permission-code segment.
#[must_use]
pub fn slug_segment(slug: &str) -> String {
    slug.replace('-', "_").to_uppercase()
}

/// Canonical `ACTION_SLUG` permission code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionCode(String);

impl PermissionCode {
    /// Derives the code required for an action on a module slug.
    #[must_use]
    pub fn derive(action: PermissionAction, slug: &str) -> Self {
        Self(format!("{}_{}", action.as_str(), slug_segment(slug)))
    }

    /// Derives the code required for an action on a module.
    #[must_use]
    pub fn for_module(action: PermissionAction, descriptor: &ModuleDescriptor) -> Self {
        Self::derive(action, descriptor.slug())
    }

    /// Rewrites a legacy-prefixed code to its canonical form; other codes pass through.
    #[must_use]
    pub fn canonicalize(raw: &str) -> String {
        LEGACY_ACTION_ALIASES
            .iter()
            .find_map(|(legacy, action)| {
                raw.strip_prefix(legacy)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| format!("{}_{rest}", action.as_str()))
            })
            .unwrap_or_else(|| raw.to_owned())
    }

    /// Returns whether the code uses a legacy action prefix.
    #[must_use]
    pub fn is_legacy(raw: &str) -> bool {
        Self::canonicalize(raw) != raw
    }

    /// Returns the code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for PermissionCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl From<PermissionCode> for String {
    fn from(value: PermissionCode) -> Self {
        value.0
    }
}

/// Seeded permission row looked up by code at authorization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGrant {
    code: PermissionCode,
    display_name: NonEmptyString,
    group: NonEmptyString,
}

impl PermissionGrant {
    /// Creates a validated grant.
    pub fn new(
        code: PermissionCode,
        display_name: impl Into<String>,
        group: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            code,
            display_name: NonEmptyString::new(display_name)?,
            group: NonEmptyString::new(group)?,
        })
    }

    /// Builds the standard grant for an action on a module.
    pub fn for_module(action: PermissionAction, descriptor: &ModuleDescriptor) -> AppResult<Self> {
        Self::new(
            PermissionCode::for_module(action, descriptor),
            format!("{} {}", action.display_verb(), descriptor.display_title()),
            descriptor.display_title(),
        )
    }

    /// Returns the grant code.
    #[must_use]
    pub fn code(&self) -> &PermissionCode {
        &self.code
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &NonEmptyString {
        &self.display_name
    }

    /// Returns the grouping label.
    #[must_use]
    pub fn group(&self) -> &NonEmptyString {
        &self.group
    }
}
