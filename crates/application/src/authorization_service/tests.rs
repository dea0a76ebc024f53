use hoso_core::{AppError, AuthContext, UserIdentity};
use hoso_domain::{ModuleKind, ModuleRegistry, PermissionAction, PermissionCode};

use super::{AuthorizationService, PermissionDecision};

fn clerk(permissions: &[&str]) -> AuthContext {
    AuthContext::authenticated(UserIdentity::new(
        "12",
        "Thư ký Lan",
        "clerk",
        Some("to-dan-su".to_owned()),
        permissions.iter().map(|code| (*code).to_owned()),
    ))
}

fn view_legal_codes() -> PermissionCode {
    PermissionCode::derive(PermissionAction::View, "bo-luat")
}

#[test]
fn anonymous_context_is_denied() {
    let service = AuthorizationService::default();

    assert_eq!(
        service.decide(&AuthContext::anonymous(), &view_legal_codes()),
        PermissionDecision::Denied
    );
    assert!(!service.check_permission(&AuthContext::anonymous(), &view_legal_codes()));
}

#[test]
fn admin_role_bypasses_missing_code() {
    let service = AuthorizationService::default();
    let admin = AuthContext::authenticated(UserIdentity::new(
        "1",
        "Quản trị",
        "admin",
        None,
        Vec::<String>::new(),
    ));

    for kind in ModuleKind::ALL {
        for action in PermissionAction::ALL {
            let code = PermissionCode::for_module(action, kind.descriptor());
            assert_eq!(service.decide(&admin, &code), PermissionDecision::AdminBypass);
        }
    }
}

#[test]
fn configured_admin_role_replaces_default() {
    let service = AuthorizationService::new("chanh-an");
    let default_admin = AuthContext::authenticated(UserIdentity::new(
        "1",
        "A",
        "admin",
        None,
        Vec::<String>::new(),
    ));
    let configured_admin = AuthContext::authenticated(UserIdentity::new(
        "2",
        "B",
        "chanh-an",
        None,
        Vec::<String>::new(),
    ));

    assert!(!service.check_permission(&default_admin, &view_legal_codes()));
    assert!(service.check_permission(&configured_admin, &view_legal_codes()));
    assert_eq!(service.admin_role(), "chanh-an");
}

#[test]
fn exact_code_match_is_required() {
    let service = AuthorizationService::default();
    let context = clerk(&["VIEW_BO_LUAT", "view_cong_viec", "CREATE_BO_LUAT"]);

    assert_eq!(
        service.decide(&context, &view_legal_codes()),
        PermissionDecision::Granted
    );
    assert!(!service.check_permission(
        &context,
        &PermissionCode::derive(PermissionAction::View, "cong-viec")
    ));
    assert!(!service.check_permission(
        &context,
        &PermissionCode::derive(PermissionAction::Add, "bo-luat")
    ));
}

#[test]
fn require_permission_names_missing_code() {
    let service = AuthorizationService::default();
    let result = service.require_permission(
        &clerk(&["VIEW_BO_LUAT"]),
        &PermissionCode::derive(PermissionAction::Delete, "bo-luat"),
    );

    assert!(matches!(
        result,
        Err(AppError::Unauthorized { permission }) if permission == "DELETE_BO_LUAT"
    ));
}

#[test]
fn viewable_modules_follow_view_grants() {
    let service = AuthorizationService::default();
    let context = clerk(&["VIEW_DATA_DON_AN", "VIEW_BO_LUAT", "EDIT_CONG_VIEC"]);

    let slugs: Vec<&str> = service
        .viewable_modules(&context, &ModuleRegistry::standard())
        .into_iter()
        .map(|descriptor| descriptor.slug())
        .collect();

    assert_eq!(slugs, vec!["bo-luat", "data-don-an"]);
}
