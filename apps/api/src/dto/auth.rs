use hoso_core::UserIdentity;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Password login payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub username: String,
    pub password: String,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub role: String,
    pub group: Option<String>,
    pub permissions: Vec<String>,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            role: identity.role().to_owned(),
            group: identity.group().map(str::to_owned),
            permissions: identity.permissions().iter().cloned().collect(),
        }
    }
}
