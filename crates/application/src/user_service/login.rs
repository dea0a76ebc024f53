use hoso_core::{AppResult, UserIdentity};
use hoso_domain::PermissionCode;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::UserRecord;

use super::{AuthOutcome, UserService};

impl UserService {
    /// Authenticates a user with login name and password.
    ///
    /// Returns `AuthOutcome::Failed` for any credential mismatch so callers
    /// cannot tell unknown users from wrong passwords.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthOutcome> {
        let Some(user) = self.user_repository.find_by_username(username).await? else {
            // Keep timing close to the known-user path.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        if self.password_hasher.is_password_hash(&user.credential) {
            if !self
                .password_hasher
                .verify_password(password, &user.credential)?
            {
                warn!(user_id = %user.id, "login rejected");
                return Ok(AuthOutcome::Failed);
            }
        } else {
            let matches: bool = password.as_bytes().ct_eq(user.credential.as_bytes()).into();
            if !matches {
                let _ = self.password_hasher.hash_password(password);
                warn!(user_id = %user.id, "login rejected");
                return Ok(AuthOutcome::Failed);
            }

            let rehashed = self.password_hasher.hash_password(password)?;
            self.user_repository
                .replace_credential(&user.id, &rehashed)
                .await?;
            info!(user_id = %user.id, "legacy plaintext credential rehashed");
        }

        let identity = self.build_identity(&user).await?;
        info!(user_id = %user.id, role = %user.role, "login succeeded");
        Ok(AuthOutcome::Authenticated(identity))
    }

    async fn build_identity(&self, user: &UserRecord) -> AppResult<UserIdentity> {
        let codes = self
            .permission_repository
            .list_codes_for_identity(&user.role, user.group.as_deref())
            .await?;

        Ok(UserIdentity::new(
            user.id.clone(),
            user.display_name.clone(),
            user.role.clone(),
            user.group.clone(),
            codes
                .iter()
                .map(String::as_str)
                .map(PermissionCode::canonicalize),
        ))
    }
}
