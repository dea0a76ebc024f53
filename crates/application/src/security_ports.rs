use async_trait::async_trait;
use hoso_core::AppResult;
use hoso_domain::PermissionGrant;

/// User row returned by credential lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Stable user identifier.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Display name shown in the UI.
    pub display_name: String,
    /// Stored credential: an Argon2id PHC string, or a legacy plaintext value.
    pub credential: String,
    /// Role name.
    pub role: String,
    /// Optional group name.
    pub group: Option<String>,
}

/// Repository port for user credentials.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by login name.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>>;

    /// Replaces the stored credential of a user.
    async fn replace_credential(&self, user_id: &str, credential: &str) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps the application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;

    /// Returns whether a stored credential is a hash this hasher understands.
    fn is_password_hash(&self, stored: &str) -> bool;
}

/// Repository port for permission grants and their role/group links.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Lists the raw permission codes linked to a role and optional group.
    async fn list_codes_for_identity(&self, role: &str, group: Option<&str>)
    -> AppResult<Vec<String>>;

    /// Inserts or refreshes permission rows, returning how many were written.
    async fn upsert_grants(&self, grants: &[PermissionGrant]) -> AppResult<usize>;

    /// Links permission codes to a role; existing links are kept.
    async fn grant_to_role(&self, role: &str, codes: &[String]) -> AppResult<()>;

    /// Lists every stored permission code.
    async fn list_codes(&self) -> AppResult<Vec<String>>;

    /// Renames a code together with its role and group links.
    async fn rename_code(&self, from: &str, to: &str) -> AppResult<()>;
}
