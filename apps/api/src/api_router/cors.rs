use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use hoso_core::AppError;
use tower_http::cors::CorsLayer;

const RECORD_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Credentialed CORS for the dashboard origin only.
pub(super) fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    let origin = HeaderValue::from_str(frontend_url)
        .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(RECORD_METHODS)
        .allow_headers([CONTENT_TYPE, ACCEPT]))
}

#[cfg(test)]
mod tests {
    use super::build_cors_layer;

    #[test]
    fn rejects_origin_with_control_characters() {
        assert!(build_cors_layer("http://localhost:3000\n").is_err());
        assert!(build_cors_layer("http://localhost:3000").is_ok());
    }
}
