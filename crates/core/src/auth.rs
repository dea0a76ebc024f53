use std::collections::BTreeSet;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// User information persisted in the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    display_name: String,
    role: String,
    #[serde(default)]
    group: Option<String>,
    #[serde(default, deserialize_with = "deserialize_permission_set")]
    permissions: BTreeSet<String>,
}

impl UserIdentity {
    /// Creates a user identity from authentication data.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        display_name: impl Into<String>,
        role: impl Into<String>,
        group: Option<String>,
        permissions: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            role: role.into(),
            group,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the role name assigned to the user.
    #[must_use]
    pub fn role(&self) -> &str {
        self.role.as_str()
    }

    /// Returns the group the user belongs to, if any.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Returns the explicit permission codes held by the user.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    /// Returns whether the permission set contains the exact code.
    #[must_use]
    pub fn holds_permission(&self, code: &str) -> bool {
        self.permissions.contains(code)
    }
}

/// Caller context passed explicitly into every dispatcher call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    identity: Option<UserIdentity>,
}

impl AuthContext {
    /// Context without an authenticated user.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    /// Context for an authenticated user.
    #[must_use]
    pub fn authenticated(identity: UserIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Returns the identity, if a user is authenticated.
    #[must_use]
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    /// Returns the subject for logging, or `anonymous`.
    #[must_use]
    pub fn subject_label(&self) -> &str {
        self.identity
            .as_ref()
            .map(UserIdentity::subject)
            .unwrap_or("anonymous")
    }
}

impl From<Option<UserIdentity>> for AuthContext {
    fn from(identity: Option<UserIdentity>) -> Self {
        Self { identity }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PermissionSetRepr {
    Codes(Vec<String>),
    Malformed(IgnoredAny),
}

// A malformed permission set decodes as empty so every non-admin check fails closed.
fn deserialize_permission_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PermissionSetRepr::deserialize(deserializer)? {
        PermissionSetRepr::Codes(codes) => codes.into_iter().collect(),
        PermissionSetRepr::Malformed(_) => BTreeSet::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::{AuthContext, UserIdentity};

    #[test]
    fn anonymous_context_has_no_identity() {
        let context = AuthContext::anonymous();
        assert!(context.identity().is_none());
        assert_eq!(context.subject_label(), "anonymous");
    }

    #[test]
    fn identity_roundtrips_through_session_json() {
        let identity = UserIdentity::new(
            "42",
            "Thư ký",
            "clerk",
            Some("to-hinh-su".to_owned()),
            ["VIEW_BO_LUAT".to_owned()],
        );

        let encoded = serde_json::to_value(&identity).unwrap_or_default();
        let decoded = serde_json::from_value::<UserIdentity>(encoded);
        assert!(matches!(decoded, Ok(value) if value == identity));
    }

    #[test]
    fn malformed_permission_set_decodes_as_empty() {
        let decoded = serde_json::from_value::<UserIdentity>(serde_json::json!({
            "subject": "7",
            "display_name": "Nguyễn Văn A",
            "role": "clerk",
            "permissions": "VIEW_BO_LUAT"
        }));

        assert!(matches!(decoded, Ok(identity) if identity.permissions().is_empty()));
    }

    #[test]
    fn permission_lookup_is_case_sensitive() {
        let identity = UserIdentity::new("1", "A", "clerk", None, ["VIEW_BO_LUAT".to_owned()]);
        assert!(identity.holds_permission("VIEW_BO_LUAT"));
        assert!(!identity.holds_permission("view_bo_luat"));
    }
}
