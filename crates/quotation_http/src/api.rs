//! HTTP handlers for quotation use-cases.
//!
//! # Responsibility
//! - Translate requests into `QuotationService` calls.
//! - Map service outcomes to the `{success, message, data}` envelope.
//!
//! # Invariants
//! - Validation and not-found failures keep HTTP 200; clients branch on
//!   `success`.
//! - A malformed request body is 400; storage and render failures are 500.
//! - Handlers never panic; every failure becomes an envelope.
//! - Storage and rendering run on the blocking pool, off the async workers.

use crate::escape::attachment_disposition;
use crate::page::render_index;
use crate::SharedService;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use quotation_core::{core_version, ExportedFile, IdError, ServiceError, ServiceResult};
use serde::Serialize;
use serde_json::Value;

pub const MSG_EMPTY_NUMBER: &str = "報價單編號不能為空";
pub const MSG_INVALID_NUMBER: &str = "報價單編號格式無效";
pub const MSG_SAVED: &str = "報價單儲存成功";
pub const MSG_NOT_FOUND: &str = "報價單不存在";
pub const MSG_DELETED: &str = "報價單已刪除";
pub const MSG_BAD_REQUEST: &str = "請求內容不是有效的 JSON";
pub const MSG_UNREADABLE: &str = "報價單資料無法讀取";
pub const MSG_STORAGE_FAILED: &str = "報價單儲存空間發生錯誤";
pub const MSG_EXPORT_FAILED: &str = "報價單匯出失敗";
pub const MSG_TASK_FAILED: &str = "伺服器處理請求失敗";

/// Response envelope shared by every JSON endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiResponse {
    pub fn ok_message(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: None,
        }
    }

    pub fn ok_data(data: Value) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            data: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

type EnvelopeResponse = (StatusCode, Json<ApiResponse>);

/// Status and envelope reported for a failed use-case.
pub fn error_envelope(event: &str, err: &ServiceError) -> EnvelopeResponse {
    let (status, message) = match err {
        ServiceError::Validation(IdError::Empty) => (StatusCode::OK, MSG_EMPTY_NUMBER),
        ServiceError::Validation(IdError::Unsafe(_)) => (StatusCode::OK, MSG_INVALID_NUMBER),
        ServiceError::NotFound(_) => (StatusCode::OK, MSG_NOT_FOUND),
        ServiceError::Parse { .. } => (StatusCode::INTERNAL_SERVER_ERROR, MSG_UNREADABLE),
        ServiceError::Repo(_) => (StatusCode::INTERNAL_SERVER_ERROR, MSG_STORAGE_FAILED),
        ServiceError::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, MSG_EXPORT_FAILED),
    };
    if status.is_server_error() {
        error!("event={event} module=http status=error error={err}");
    } else {
        warn!("event={event} module=http status=rejected error={err}");
    }
    (status, Json(ApiResponse::failure(message)))
}

/// Runs a synchronous service call on the blocking pool.
async fn run_blocking<T, F>(event: &'static str, job: F) -> Result<T, EnvelopeResponse>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(error_envelope(event, &err)),
        Err(err) => {
            error!("event={event} module=http status=error error_code=task_join_failed error={err}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure(MSG_TASK_FAILED)),
            ))
        }
    }
}

fn attachment(file: ExportedFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                attachment_disposition(&file.file_name),
            ),
        ],
        file.bytes,
    )
        .into_response()
}

/// `GET /`
pub async fn index(State(service): State<SharedService>) -> Response {
    let page = run_blocking("http_index", move || {
        let summaries = service.list_quotations()?;
        Ok(render_index(&service.new_draft(), &summaries))
    })
    .await;
    match page {
        Ok(html) => Html(html).into_response(),
        Err(failure) => failure.into_response(),
    }
}

/// `POST /save`
pub async fn save(
    State(service): State<SharedService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> EnvelopeResponse {
    let Json(document) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("event=http_save module=http status=bad_request error={rejection}");
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(MSG_BAD_REQUEST)),
            );
        }
    };
    match run_blocking("http_save", move || service.save(&document)).await {
        Ok(_) => (StatusCode::OK, Json(ApiResponse::ok_message(MSG_SAVED))),
        Err(failure) => failure,
    }
}

/// `GET /load/:id`
pub async fn load(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> EnvelopeResponse {
    match run_blocking("http_load", move || service.load(&id)).await {
        Ok(document) => (StatusCode::OK, Json(ApiResponse::ok_data(document))),
        Err(failure) => failure,
    }
}

/// `GET /delete/:id`
pub async fn delete(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> EnvelopeResponse {
    match run_blocking("http_delete", move || service.delete(&id)).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok_message(MSG_DELETED))),
        Err(failure) => failure,
    }
}

/// `GET /export/txt/:id`
pub async fn export_text(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Response {
    match run_blocking("http_export_txt", move || service.export_text(&id)).await {
        Ok(file) => attachment(file),
        Err(failure) => failure.into_response(),
    }
}

/// `GET /export/excel/:id`
pub async fn export_spreadsheet(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Response {
    match run_blocking("http_export_excel", move || service.export_spreadsheet(&id)).await {
        Ok(file) => attachment(file),
        Err(failure) => failure.into_response(),
    }
}

/// `GET /healthz`
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: core_version(),
    })
}

#[cfg(test)]
mod tests {
    use super::{error_envelope, run_blocking, ApiResponse, MSG_EMPTY_NUMBER, MSG_NOT_FOUND};
    use axum::http::StatusCode;
    use quotation_core::{IdError, ServiceError};
    use serde_json::json;

    #[test]
    fn envelope_omits_absent_fields() {
        let value = serde_json::to_value(ApiResponse::failure(MSG_NOT_FOUND)).unwrap();
        assert_eq!(value, json!({"success": false, "message": "報價單不存在"}));

        let value = serde_json::to_value(ApiResponse::ok_data(json!({"a": 1}))).unwrap();
        assert_eq!(value, json!({"success": true, "data": {"a": 1}}));
    }

    #[test]
    fn client_errors_keep_status_ok() {
        let (status, body) = error_envelope("test", &ServiceError::Validation(IdError::Empty));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.0.message.as_deref(), Some(MSG_EMPTY_NUMBER));

        let (status, _) = error_envelope("test", &ServiceError::NotFound("QTN-X".to_string()));
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn unreadable_documents_are_server_errors() {
        let err = ServiceError::Parse {
            id: quotation_core::QuotationId::parse("QTN-X").unwrap(),
            message: "expected value".to_string(),
        };
        let (status, body) = error_envelope("test", &err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.0.success);
    }

    #[tokio::test]
    async fn blocking_calls_return_value_or_envelope() {
        let value = run_blocking("test", || Ok(7)).await.unwrap();
        assert_eq!(value, 7);

        let (status, body) = run_blocking::<(), _>("test", || {
            Err(ServiceError::NotFound("QTN-X".to_string()))
        })
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.0.message.as_deref(), Some(MSG_NOT_FOUND));
    }
}
