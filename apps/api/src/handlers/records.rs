use std::collections::BTreeMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hoso_application::{
    ActionEnvelope, CrudAction, CrudPayload, CrudRequest, CrudService, FailureKind, RawListQuery,
    failure_message,
};
use hoso_core::{AppError, AuthContext, UserIdentity};
use serde_json::Value;

use crate::state::AppState;

const PAGE_PARAM: &str = "page";
const PAGE_SIZE_PARAM: &str = "pageSize";
const SEARCH_PARAM: &str = "search";
const PREVIOUS_SEARCH_PARAM: &str = "previousSearch";

pub async fn list_records_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(slug): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let request = CrudRequest::List(raw_list_query(params));
    dispatch_records(&state.crud_service, user, &slug, request).await
}

pub async fn get_record_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((slug, key)): Path<(String, String)>,
) -> Response {
    dispatch_records(&state.crud_service, user, &slug, CrudRequest::Get { key }).await
}

pub async fn create_record_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(slug): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let data = match payload {
        Ok(Json(data)) => data,
        Err(rejection) => return rejected_body(&rejection),
    };
    dispatch_records(&state.crud_service, user, &slug, CrudRequest::Create { data }).await
}

pub async fn update_record_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((slug, key)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let data = match payload {
        Ok(Json(data)) => data,
        Err(rejection) => return rejected_body(&rejection),
    };
    dispatch_records(
        &state.crud_service,
        user,
        &slug,
        CrudRequest::Update { key, data },
    )
    .await
}

pub async fn delete_record_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((slug, key)): Path<(String, String)>,
) -> Response {
    dispatch_records(&state.crud_service, user, &slug, CrudRequest::Delete { key }).await
}

/// Runs the dispatcher and attaches the HTTP status matching the envelope.
pub(crate) async fn dispatch_records(
    crud_service: &CrudService,
    user: UserIdentity,
    slug: &str,
    request: CrudRequest,
) -> Response {
    let action = request.action();
    let context = AuthContext::authenticated(user);
    let response = crud_service.dispatch(&context, slug, request).await;

    let status = match response.failure {
        Some(kind) => failure_status(kind),
        None if action == CrudAction::Create => StatusCode::CREATED,
        None => StatusCode::OK,
    };

    (status, Json(response.envelope)).into_response()
}

/// Malformed or non-JSON bodies fail with the same envelope as payload validation.
pub(crate) fn rejected_body(rejection: &JsonRejection) -> Response {
    let envelope = ActionEnvelope::<CrudPayload>::failed(failure_message(&AppError::Validation(
        rejection.body_text(),
    )));
    (failure_status(FailureKind::Validation), Json(envelope)).into_response()
}

fn failure_status(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::InvalidModule | FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::Unauthorized => StatusCode::FORBIDDEN,
        FailureKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        FailureKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        FailureKind::Conflict => StatusCode::CONFLICT,
        FailureKind::Transient => StatusCode::SERVICE_UNAVAILABLE,
        FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Splits query-string pairs into pagination, search and field filters.
///
/// Filter pairs with a blank value are dropped so an empty select box does not
/// narrow the list to nothing.
pub(crate) fn raw_list_query(mut params: BTreeMap<String, String>) -> RawListQuery {
    let page = params.remove(PAGE_PARAM);
    let page_size = params.remove(PAGE_SIZE_PARAM);
    let search = params.remove(SEARCH_PARAM);
    let previous_search = params.remove(PREVIOUS_SEARCH_PARAM);
    params.retain(|_, value| !value.trim().is_empty());

    RawListQuery {
        page,
        page_size,
        search,
        previous_search,
        filters: params,
    }
}

#[cfg(test)]
mod tests;
