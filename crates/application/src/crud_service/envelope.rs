use hoso_core::AppError;
use hoso_domain::GenericRecord;
use serde::Serialize;

use super::CrudAction;

/// Uniform result wrapper returned to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionEnvelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Operation result, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Localized user-facing message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ActionEnvelope<T> {
    /// Successful envelope.
    #[must_use]
    pub fn ok(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
        }
    }

    /// Failed envelope carrying only a message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// One page of records with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult {
    /// Records on this page.
    pub data: Vec<GenericRecord>,
    /// Total matches before pagination.
    pub total: u64,
    /// 1-based page number.
    pub page: usize,
    /// Page size used for the query.
    pub page_size: usize,
    /// Record type name of the module.
    pub model_name: String,
}

/// Data carried by a successful dispatcher call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CrudPayload {
    /// Paginated listing.
    List(ListResult),
    /// Single record.
    Record(GenericRecord),
}

/// Failure categories exposed alongside a failed envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Unknown module slug.
    InvalidModule,
    /// Missing permission code.
    Unauthorized,
    /// No authenticated session.
    Unauthenticated,
    /// Record does not exist.
    NotFound,
    /// Invalid payload or constraint violation on write.
    Validation,
    /// Delete blocked by related data.
    Conflict,
    /// Persistence temporarily unavailable.
    Transient,
    /// Unexpected failure.
    Internal,
}

impl From<&AppError> for FailureKind {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::InvalidModule(_) => Self::InvalidModule,
            AppError::Unauthorized { .. } => Self::Unauthorized,
            AppError::Unauthenticated(_) => Self::Unauthenticated,
            AppError::NotFound(_) => Self::NotFound,
            AppError::Validation(_) => Self::Validation,
            AppError::Conflict(_) => Self::Conflict,
            AppError::Transient(_) => Self::Transient,
            AppError::Internal(_) => Self::Internal,
        }
    }
}

/// Envelope plus the failure category the transport maps to a status code.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResponse {
    /// Envelope returned to the caller.
    pub envelope: ActionEnvelope<CrudPayload>,
    /// Failure category, absent on success.
    pub failure: Option<FailureKind>,
}

impl DispatchResponse {
    pub(super) fn success(action: CrudAction, data: Option<CrudPayload>) -> Self {
        Self {
            envelope: ActionEnvelope::ok(data, success_message(action).map(str::to_owned)),
            failure: None,
        }
    }

    pub(super) fn failure(error: &AppError) -> Self {
        Self {
            envelope: ActionEnvelope::failed(failure_message(error)),
            failure: Some(FailureKind::from(error)),
        }
    }

    /// Returns whether the call succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

fn success_message(action: CrudAction) -> Option<&'static str> {
    match action {
        CrudAction::List | CrudAction::Get => None,
        CrudAction::Create => Some("Thêm mới thành công"),
        CrudAction::Update => Some("Cập nhật thành công"),
        CrudAction::Delete => Some("Xóa thành công"),
    }
}

/// Localized message for a failed operation.
#[must_use]
pub fn failure_message(error: &AppError) -> String {
    match error {
        AppError::InvalidModule(_) => "Module không hợp lệ (invalid module)".to_owned(),
        AppError::Unauthorized { permission } => {
            format!("Bạn không có quyền thực hiện thao tác này (cần quyền {permission})")
        }
        AppError::Unauthenticated(_) => "Vui lòng đăng nhập lại".to_owned(),
        AppError::NotFound(_) => "Không tìm thấy bản ghi".to_owned(),
        AppError::Validation(detail) => format!("Dữ liệu không hợp lệ: {detail}"),
        AppError::Conflict(detail) => detail.clone(),
        AppError::Transient(_) => {
            "Không thể kết nối cơ sở dữ liệu, vui lòng thử lại sau".to_owned()
        }
        AppError::Internal(_) => "Đã xảy ra lỗi hệ thống".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ActionEnvelope, ListResult};

    #[test]
    fn list_result_serializes_camel_case() {
        let list = ListResult {
            data: Vec::new(),
            total: 0,
            page: 1,
            page_size: 20,
            model_name: "bo_luat".to_owned(),
        };

        assert_eq!(
            serde_json::to_value(&list).unwrap_or_default(),
            json!({"data": [], "total": 0, "page": 1, "pageSize": 20, "modelName": "bo_luat"})
        );
    }

    #[test]
    fn failed_envelope_omits_data() {
        let envelope = ActionEnvelope::<ListResult>::failed("Không tìm thấy bản ghi");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap_or_default(),
            json!({"success": false, "message": "Không tìm thấy bản ghi"})
        );
    }
}
