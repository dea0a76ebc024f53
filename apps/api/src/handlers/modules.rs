use axum::Json;
use axum::extract::{Extension, State};
use hoso_core::{AuthContext, UserIdentity};

use crate::dto::ModuleResponse;
use crate::state::AppState;

/// Lists the modules the caller holds the view permission for.
pub async fn list_modules_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> Json<Vec<ModuleResponse>> {
    let context = AuthContext::authenticated(user);
    let crud_service = &state.crud_service;

    Json(
        crud_service
            .authorization_service()
            .viewable_modules(&context, crud_service.registry())
            .into_iter()
            .map(ModuleResponse::from)
            .collect(),
    )
}
