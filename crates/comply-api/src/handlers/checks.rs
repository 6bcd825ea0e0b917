//! Compliance check handlers
//!
//! Endpoints for the label check workflow: create a session, upload panel
//! images, run the analysis, and fetch or export the results.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use comply_core::value_objects::PanelType;
use comply_service::dto::{
    AnalyzeCheckRequest, CheckDetailResponse, CheckResponse, CreateCheckRequest,
    PaginatedResponse, PanelResponse, UploadPanelRequest,
};
use comply_service::services::{CheckService, ReportService};
use uuid::Uuid;

use crate::extractors::{AuthUser, OptionalValidatedJson, PaginationParams, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// Start a new compliance check session
///
/// POST /checks
pub async fn create_check(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateCheckRequest>,
) -> ApiResult<Created<Json<CheckResponse>>> {
    let service = CheckService::new(state.service_context());
    let response = service.create(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// List the caller's checks, newest first
///
/// GET /checks
pub async fn list_checks(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<PaginatedResponse<CheckResponse>>> {
    let service = CheckService::new(state.service_context());
    let checks = service
        .list(auth.user_id, params.limit(), params.offset())
        .await?;
    Ok(Json(PaginatedResponse::new(
        checks,
        params.limit(),
        params.offset(),
    )))
}

/// Fetch a check with its panels and results
///
/// GET /checks/:check_id
pub async fn get_check(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(check_id): Path<Uuid>,
) -> ApiResult<Json<CheckDetailResponse>> {
    let service = CheckService::new(state.service_context());
    let response = service.get(auth.user_id, check_id).await?;
    Ok(Json(response))
}

/// Attach a panel image to a pending check
///
/// POST /checks/:check_id/panels
///
/// Multipart form with a `panel_type` text field and an `image` file field.
pub async fn upload_panel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(check_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Created<Json<PanelResponse>>> {
    let max_bytes = usize::try_from(state.config().storage.max_file_size_mb)
        .unwrap_or(usize::MAX)
        .saturating_mul(1024 * 1024);

    let mut panel_type: Option<PanelType> = None;
    let mut content_type: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_body(e.to_string()))?
    {
        match field.name() {
            Some("panel_type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::invalid_body(e.to_string()))?;
                let parsed = text
                    .parse::<PanelType>()
                    .map_err(|e| ApiError::invalid_body(e.to_string()))?;
                panel_type = Some(parsed);
            }
            Some("image") => {
                content_type = field.content_type().map(ToString::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::invalid_body(e.to_string()))?;
                if data.len() > max_bytes {
                    return Err(ApiError::invalid_body(format!(
                        "Image exceeds the {} MB upload limit",
                        state.config().storage.max_file_size_mb
                    )));
                }
                bytes = Some(data.to_vec());
            }
            _ => {}
        }
    }

    let request = UploadPanelRequest {
        panel_type: panel_type
            .ok_or_else(|| ApiError::invalid_body("Missing panel_type field"))?,
        content_type: content_type
            .ok_or_else(|| ApiError::invalid_body("Image field has no content type"))?,
        bytes: bytes.ok_or_else(|| ApiError::invalid_body("Missing image field"))?,
    };

    let service = CheckService::new(state.service_context());
    let response = service.upload_panel(auth.user_id, check_id, request).await?;
    Ok(Created(Json(response)))
}

/// Run extraction and scoring for a pending check
///
/// POST /checks/:check_id/analyze
pub async fn analyze_check(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(check_id): Path<Uuid>,
    OptionalValidatedJson(request): OptionalValidatedJson<AnalyzeCheckRequest>,
) -> ApiResult<Json<CheckDetailResponse>> {
    let service = CheckService::new(state.service_context());
    let response = service
        .analyze(auth.user_id, check_id, request.unwrap_or_default().rule_ids)
        .await?;
    Ok(Json(response))
}

/// Download the per-rule results of a check as CSV
///
/// GET /checks/:check_id/report
pub async fn check_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(check_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let service = ReportService::new(state.service_context());
    let csv = service.csv_report(auth.user_id, check_id).await?;
    let filename = ReportService::filename(check_id);

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}
