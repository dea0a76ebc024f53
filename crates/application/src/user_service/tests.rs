use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use hoso_core::{AppError, AppResult};
use hoso_domain::PermissionGrant;
use tokio::sync::Mutex;

use crate::{PasswordHasher, PermissionRepository, UserRecord, UserRepository};

use super::{AuthOutcome, UserService};

#[derive(Default)]
struct FakeUserRepository {
    users: Mutex<HashMap<String, UserRecord>>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        Ok(self.users.lock().await.get(username).cloned())
    }

    async fn replace_credential(&self, user_id: &str, credential: &str) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .values_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AppError::NotFound(user_id.to_owned()))?;
        user.credential = credential.to_owned();
        Ok(())
    }
}

struct FakePermissionRepository {
    role_codes: Vec<String>,
    group_codes: Vec<String>,
}

#[async_trait]
impl PermissionRepository for FakePermissionRepository {
    async fn list_codes_for_identity(
        &self,
        _role: &str,
        group: Option<&str>,
    ) -> AppResult<Vec<String>> {
        let mut codes = self.role_codes.clone();
        if group.is_some() {
            codes.extend(self.group_codes.iter().cloned());
        }
        Ok(codes)
    }

    async fn upsert_grants(&self, grants: &[PermissionGrant]) -> AppResult<usize> {
        Ok(grants.len())
    }

    async fn grant_to_role(&self, _role: &str, _codes: &[String]) -> AppResult<()> {
        Ok(())
    }

    async fn list_codes(&self) -> AppResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn rename_code(&self, _from: &str, _to: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Marks hashes with a prefix instead of running Argon2.
struct PrefixHasher;

impl PasswordHasher for PrefixHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("$fake${password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash.strip_prefix("$fake$") == Some(password))
    }

    fn is_password_hash(&self, stored: &str) -> bool {
        stored.starts_with("$fake$")
    }
}

fn user(credential: &str, group: Option<&str>) -> UserRecord {
    UserRecord {
        id: "7".to_owned(),
        username: "lan.tk".to_owned(),
        display_name: "Thư ký Lan".to_owned(),
        credential: credential.to_owned(),
        role: "clerk".to_owned(),
        group: group.map(str::to_owned),
    }
}

async fn service_with(user: UserRecord) -> (UserService, Arc<FakeUserRepository>) {
    let users = Arc::new(FakeUserRepository::default());
    users
        .users
        .lock()
        .await
        .insert(user.username.clone(), user);
    let permissions = Arc::new(FakePermissionRepository {
        role_codes: vec!["VIEW_BO_LUAT".to_owned(), "CREATE_BO_LUAT".to_owned()],
        group_codes: vec!["VIEW_DATA_DON_AN".to_owned()],
    });

    (
        UserService::new(users.clone(), permissions, Arc::new(PrefixHasher)),
        users,
    )
}

#[tokio::test]
async fn hashed_credential_logs_in() {
    let (service, _) = service_with(user("$fake$bimat", None)).await;

    let outcome = service.login("lan.tk", "bimat").await;

    assert!(matches!(
        outcome,
        Ok(AuthOutcome::Authenticated(identity))
            if identity.subject() == "7"
                && identity.holds_permission("VIEW_BO_LUAT")
                && identity.holds_permission("ADD_BO_LUAT")
                && !identity.holds_permission("CREATE_BO_LUAT")
                && !identity.holds_permission("VIEW_DATA_DON_AN")
    ));
}

#[tokio::test]
async fn group_grants_are_merged() {
    let (service, _) = service_with(user("$fake$bimat", Some("to-hinh-su"))).await;

    let outcome = service.login("lan.tk", "bimat").await;

    assert!(matches!(
        outcome,
        Ok(AuthOutcome::Authenticated(identity))
            if identity.holds_permission("VIEW_DATA_DON_AN")
                && identity.group() == Some("to-hinh-su")
    ));
}

#[tokio::test]
async fn wrong_password_fails() {
    let (service, _) = service_with(user("$fake$bimat", None)).await;

    assert!(matches!(
        service.login("lan.tk", "sai").await,
        Ok(AuthOutcome::Failed)
    ));
}

#[tokio::test]
async fn unknown_user_fails() {
    let (service, _) = service_with(user("$fake$bimat", None)).await;

    assert!(matches!(
        service.login("khong.co", "bimat").await,
        Ok(AuthOutcome::Failed)
    ));
}

#[tokio::test]
async fn plaintext_credential_is_rehashed_once() {
    let (service, users) = service_with(user("matkhau-cu", None)).await;

    let outcome = service.login("lan.tk", "matkhau-cu").await;
    assert!(matches!(outcome, Ok(AuthOutcome::Authenticated(_))));

    let stored = users
        .find_by_username("lan.tk")
        .await
        .ok()
        .flatten()
        .map(|user| user.credential);
    assert_eq!(stored.as_deref(), Some("$fake$matkhau-cu"));

    assert!(matches!(
        service.login("lan.tk", "matkhau-cu").await,
        Ok(AuthOutcome::Authenticated(_))
    ));
}

#[tokio::test]
async fn wrong_plaintext_password_keeps_credential() {
    let (service, users) = service_with(user("matkhau-cu", None)).await;

    assert!(matches!(
        service.login("lan.tk", "doan-bua").await,
        Ok(AuthOutcome::Failed)
    ));

    let stored = users
        .find_by_username("lan.tk")
        .await
        .ok()
        .flatten()
        .map(|user| user.credential);
    assert_eq!(stored.as_deref(), Some("matkhau-cu"));
}
