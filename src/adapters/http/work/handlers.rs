//! HTTP handlers for work period endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::work::{
    GeneratePeriodsCommand, GeneratePeriodsHandler, PreviewPeriodHandler, PreviewPeriodQuery,
    UpdatePeriodStatusCommand, UpdatePeriodStatusHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode, WorkId, WorkPeriodId};

use super::dto::{
    ErrorResponse, GeneratePeriodsRequest, GenerationResponse, PreviewQuery, PreviewResponse,
    StatusResponse, UpdateStatusRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct WorkHandlers {
    generate_handler: Arc<GeneratePeriodsHandler>,
    preview_handler: Arc<PreviewPeriodHandler>,
    update_status_handler: Arc<UpdatePeriodStatusHandler>,
}

impl WorkHandlers {
    pub fn new(
        generate_handler: Arc<GeneratePeriodsHandler>,
        preview_handler: Arc<PreviewPeriodHandler>,
        update_status_handler: Arc<UpdatePeriodStatusHandler>,
    ) -> Self {
        Self {
            generate_handler,
            preview_handler,
            update_status_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/works/:work_id/periods/generate - Generate the framed period
pub async fn generate_periods(
    State(handlers): State<WorkHandlers>,
    Path(work_id): Path<String>,
    Json(req): Json<GeneratePeriodsRequest>,
) -> Response {
    let work_id = match work_id.parse::<WorkId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid work ID"),
    };

    let cmd = GeneratePeriodsCommand {
        work_id,
        reference_date: req.reference_date,
    };

    match handlers.generate_handler.handle(cmd).await {
        Ok(result) => {
            let status = if result.is_created() {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(GenerationResponse::from(result))).into_response()
        }
        Err(e) => handle_domain_error(e.into()),
    }
}

/// GET /api/works/:work_id/periods/preview - Preview the framed period
pub async fn preview_period(
    State(handlers): State<WorkHandlers>,
    Path(work_id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let work_id = match work_id.parse::<WorkId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid work ID"),
    };

    let query = PreviewPeriodQuery {
        work_id,
        reference_date: query.reference_date,
    };

    match handlers.preview_handler.handle(query).await {
        Ok(preview) => (StatusCode::OK, Json(PreviewResponse::from(preview))).into_response(),
        Err(e) => handle_domain_error(DomainError::new(e.code(), e.to_string())),
    }
}

/// PATCH /api/works/periods/:period_id/status - Change a period's status
pub async fn update_period_status(
    State(handlers): State<WorkHandlers>,
    Path(period_id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Response {
    let period_id = match period_id.parse::<WorkPeriodId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid period ID"),
    };

    let cmd = UpdatePeriodStatusCommand {
        period_id,
        status: req.status,
    };

    match handlers.update_status_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(StatusResponse::from(result))).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════

/// HTTP status for a domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        code if code.is_validation() => StatusCode::BAD_REQUEST,
        ErrorCode::WorkNotFound | ErrorCode::PeriodNotFound => StatusCode::NOT_FOUND,
        ErrorCode::InvalidStateTransition | ErrorCode::DuplicatePeriod => StatusCode::CONFLICT,
        ErrorCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn handle_domain_error(error: DomainError) -> Response {
    let status = status_for(error.code);
    if status.is_server_error() {
        tracing::error!(code = %error.code, message = %error.message, "Request failed");
    }
    (status, Json(ErrorResponse::from(&error))).into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(message))).into_response()
}
