use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::FromRequest;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use hoso_application::{AuthorizationService, CrudRequest, CrudService, NoopCacheInvalidator};
use hoso_core::UserIdentity;
use hoso_domain::ModuleRegistry;
use hoso_infrastructure::InMemoryRecordStore;
use proptest::prelude::*;
use serde_json::{Value, json};

use super::{dispatch_records, raw_list_query, rejected_body};

fn crud_service() -> CrudService {
    CrudService::new(
        Arc::new(ModuleRegistry::standard()),
        AuthorizationService::default(),
        Arc::new(InMemoryRecordStore::new()),
        Arc::new(NoopCacheInvalidator),
    )
}

fn clerk(permissions: &[&str]) -> UserIdentity {
    UserIdentity::new(
        "42",
        "Thư ký",
        "clerk",
        None,
        permissions.iter().map(|code| (*code).to_owned()),
    )
}

fn admin() -> UserIdentity {
    UserIdentity::new("1", "Quản trị", "admin", None, Vec::new())
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

#[tokio::test]
async fn create_returns_201_with_envelope() {
    let service = crud_service();
    let response = dispatch_records(
        &service,
        clerk(&["ADD_BO_LUAT"]),
        "bo-luat",
        CrudRequest::Create {
            data: json!({"ma": "BLHS", "ten": "Bộ luật Hình sự"}),
        },
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Thêm mới thành công"));
    assert_eq!(body["data"]["ma"], json!("BLHS"));
}

#[tokio::test]
async fn missing_permission_returns_403_and_names_code() {
    let service = crud_service();
    let response = dispatch_records(
        &service,
        clerk(&["VIEW_BO_LUAT"]),
        "bo-luat",
        CrudRequest::Create {
            data: json!({"ma": "BLHS", "ten": "Bộ luật Hình sự"}),
        },
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body.get("data").is_none());
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.contains("ADD_BO_LUAT"))
    );
}

#[tokio::test]
async fn unknown_slug_returns_404() {
    let service = crud_service();
    let response = dispatch_records(
        &service,
        admin(),
        "khong-ton-tai",
        CrudRequest::List(raw_list_query(BTreeMap::new())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_envelope_uses_camel_case_metadata() {
    let service = crud_service();
    for index in 0..3 {
        let created = dispatch_records(
            &service,
            admin(),
            "bo-luat",
            CrudRequest::Create {
                data: json!({"ma": format!("BL-{index}"), "ten": "Bộ luật"}),
            },
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
    }

    let params = BTreeMap::from([
        ("page".to_owned(), "2".to_owned()),
        ("pageSize".to_owned(), "2".to_owned()),
    ]);
    let response = dispatch_records(
        &service,
        clerk(&["VIEW_BO_LUAT"]),
        "bo-luat",
        CrudRequest::List(raw_list_query(params)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], json!(3));
    assert_eq!(body["data"]["page"], json!(2));
    assert_eq!(body["data"]["pageSize"], json!(2));
    assert_eq!(body["data"]["modelName"], json!("bo_luat"));
    assert_eq!(body["data"]["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn delete_missing_record_returns_404() {
    let service = crud_service();
    let response = dispatch_records(
        &service,
        admin(),
        "cai-dat",
        CrudRequest::Delete {
            key: "theme".to_owned(),
        },
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_payload_returns_422() {
    let service = crud_service();
    let response = dispatch_records(
        &service,
        admin(),
        "bo-luat",
        CrudRequest::Create {
            data: json!({"ten": "thiếu mã"}),
        },
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_json_body_returns_422_envelope() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/modules/bo-luat/records")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"ma\": \"BLHS\","))
        .unwrap_or_default();
    let Err(rejection) = Json::<Value>::from_request(request, &()).await else {
        unreachable!("truncated JSON must be rejected");
    };

    let response = rejected_body(&rejection);

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body.get("data").is_none());
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("Dữ liệu không hợp lệ"))
    );
}

#[tokio::test]
async fn missing_content_type_returns_422_envelope() {
    let request = Request::builder()
        .method("PATCH")
        .uri("/api/modules/bo-luat/records/BLHS")
        .body(Body::from("{}"))
        .unwrap_or_default();
    let Err(rejection) = Json::<Value>::from_request(request, &()).await else {
        unreachable!("JSON extractor requires a content type");
    };

    let response = rejected_body(&rejection);

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["success"], json!(false));
}

#[test]
fn reserved_params_are_split_from_filters() {
    let params = BTreeMap::from([
        ("page".to_owned(), "3".to_owned()),
        ("pageSize".to_owned(), "50".to_owned()),
        ("search".to_owned(), "trộm".to_owned()),
        ("previousSearch".to_owned(), "trom".to_owned()),
        ("trang_thai".to_owned(), "mo".to_owned()),
        ("nguoi_phu_trach".to_owned(), "  ".to_owned()),
    ]);

    let raw = raw_list_query(params);

    assert_eq!(raw.page.as_deref(), Some("3"));
    assert_eq!(raw.page_size.as_deref(), Some("50"));
    assert_eq!(raw.search.as_deref(), Some("trộm"));
    assert_eq!(raw.previous_search.as_deref(), Some("trom"));
    assert_eq!(
        raw.filters,
        BTreeMap::from([("trang_thai".to_owned(), "mo".to_owned())])
    );
}

#[test]
fn changed_search_resets_page_through_query_string() {
    let params = BTreeMap::from([
        ("page".to_owned(), "4".to_owned()),
        ("search".to_owned(), "trộm cắp".to_owned()),
        ("previousSearch".to_owned(), "trộm".to_owned()),
    ]);

    let descriptor = raw_list_query(params).into_descriptor(10);

    assert_eq!(descriptor.page(), 1);
    assert_eq!(descriptor.search_term(), Some("trộm cắp"));
}

proptest! {
    #[test]
    fn non_reserved_pairs_become_filters(field in "[a-z_]{3,12}", value in "[a-z0-9]{1,8}") {
        prop_assume!(!matches!(field.as_str(), "page" | "search"));
        let params = BTreeMap::from([(field.clone(), value.clone())]);

        let raw = raw_list_query(params);

        prop_assert_eq!(raw.filters.get(&field), Some(&value));
        prop_assert!(raw.page.is_none());
    }
}
