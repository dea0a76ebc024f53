use std::sync::Arc;

use hoso_core::{AppError, AppResult, AuthContext};
use hoso_domain::{ModuleDescriptor, ModuleRegistry, PermissionAction, PermissionCode};
use tracing::{debug, warn};

/// Role name that bypasses permission checks when none is configured.
pub const DEFAULT_ADMIN_ROLE: &str = "admin";

/// Outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    /// Caller holds the administrative role; the code was not consulted.
    AdminBypass,
    /// Caller's permission set contains the code.
    Granted,
    /// No identity, or the code is absent from the permission set.
    Denied,
}

impl PermissionDecision {
    /// Returns whether the decision allows the action.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// Permission oracle evaluated against an explicit caller context.
#[derive(Debug, Clone)]
pub struct AuthorizationService {
    admin_role: Arc<str>,
}

impl AuthorizationService {
    /// Creates an oracle treating `admin_role` as the bypass role.
    #[must_use]
    pub fn new(admin_role: impl Into<String>) -> Self {
        Self {
            admin_role: Arc::from(admin_role.into()),
        }
    }

    /// Returns the configured bypass role.
    #[must_use]
    pub fn admin_role(&self) -> &str {
        &self.admin_role
    }

    /// Decides whether the caller may use the permission code.
    #[must_use]
    pub fn decide(&self, context: &AuthContext, code: &PermissionCode) -> PermissionDecision {
        let Some(identity) = context.identity() else {
            return PermissionDecision::Denied;
        };

        if identity.role() == &*self.admin_role {
            debug!(subject = identity.subject(), code = %code, "admin role bypassed permission check");
            return PermissionDecision::AdminBypass;
        }

        if identity.holds_permission(code.as_str()) {
            PermissionDecision::Granted
        } else {
            PermissionDecision::Denied
        }
    }

    /// Returns whether the caller may use the permission code. Never fails.
    #[must_use]
    pub fn check_permission(&self, context: &AuthContext, code: &PermissionCode) -> bool {
        self.decide(context, code).is_allowed()
    }

    /// Ensures the caller may use the permission code.
    pub fn require_permission(&self, context: &AuthContext, code: &PermissionCode) -> AppResult<()> {
        if self.check_permission(context, code) {
            return Ok(());
        }

        warn!(subject = context.subject_label(), code = %code, "permission denied");
        Err(AppError::Unauthorized {
            permission: code.to_string(),
        })
    }

    /// Lists the registered modules the caller may view, in registry order.
    #[must_use]
    pub fn viewable_modules(
        &self,
        context: &AuthContext,
        registry: &ModuleRegistry,
    ) -> Vec<&'static ModuleDescriptor> {
        registry
            .descriptors()
            .filter(|descriptor| {
                self.check_permission(
                    context,
                    &PermissionCode::for_module(PermissionAction::View, descriptor),
                )
            })
            .collect()
    }
}

impl Default for AuthorizationService {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_ROLE)
    }
}

#[cfg(test)]
mod tests;
