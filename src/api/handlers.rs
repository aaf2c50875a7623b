//! HTTP request handlers for the bulletin engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::compute_variance;
use crate::models::DailyReport;

use super::request::{
    ApproveRequest, DailyReportRequest, GenerateBulletinRequest, InvoiceRequest,
    PayProfileRequest, VarianceRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/daily-reports", post(ingest_report_handler))
        .route(
            "/employees/:employee_ref/pay-profile",
            put(register_profile_handler),
        )
        .route("/bulletins", post(generate_bulletin_handler))
        .route("/bulletins/:id", get(get_bulletin_handler))
        .route("/bulletins/:id/approve", post(approve_handler))
        .route("/bulletins/:id/invoice", post(invoice_handler))
        .route("/variance", post(variance_handler))
        .with_state(state)
}

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Handler for POST /daily-reports.
///
/// Stores the report, replacing and bumping the revision of an existing one.
async fn ingest_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<DailyReportRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing daily report ingestion");

    let request = parse_json(payload, correlation_id)?;
    request
        .validate()
        .map_err(|e| invalid(correlation_id, e))?;

    let report: DailyReport = request.into();
    let stored = state.reports().upsert(report);
    info!(
        correlation_id = %correlation_id,
        report_id = %stored.id,
        revision = stored.revision,
        "Daily report stored"
    );
    Ok(json_response(StatusCode::OK, &stored))
}

/// Handler for PUT /employees/{employee_ref}/pay-profile.
async fn register_profile_handler(
    State(state): State<AppState>,
    Path(employee_ref): Path<String>,
    payload: Result<Json<PayProfileRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        employee_ref = %employee_ref,
        "Processing pay profile registration"
    );

    let request = parse_json(payload, correlation_id)?;
    request
        .validate()
        .map_err(|e| invalid(correlation_id, e))?;

    let profile = request.into_profile(&employee_ref);
    state.profiles().register(profile.clone());
    Ok(json_response(StatusCode::OK, &profile))
}

/// Handler for POST /bulletins.
///
/// Returns 201 with the generated bulletin, or the existing one when the
/// report set was already measured.
async fn generate_bulletin_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateBulletinRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing bulletin generation");

    let request = parse_json(payload, correlation_id)?;
    request
        .validate()
        .map_err(|e| invalid(correlation_id, e))?;

    let start_time = Instant::now();
    let bulletin = state
        .aggregator()
        .generate(&request.site_id, request.period)
        .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        bulletin_id = %bulletin.id,
        grand_total = %bulletin.summary.grand_total,
        duration_us = start_time.elapsed().as_micros(),
        "Bulletin generation completed"
    );
    Ok(json_response(StatusCode::CREATED, &bulletin))
}

/// Handler for GET /bulletins/{id}.
async fn get_bulletin_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = parse_id(id, correlation_id)?;

    let bulletin = state
        .workflow()
        .get(id)
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, &bulletin))
}

/// Handler for POST /bulletins/{id}/approve.
async fn approve_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ApproveRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = parse_id(id, correlation_id)?;
    info!(correlation_id = %correlation_id, bulletin_id = %id, "Processing approval");

    let request = parse_json(payload, correlation_id)?;
    request
        .validate()
        .map_err(|e| invalid(correlation_id, e))?;

    let bulletin = state
        .workflow()
        .approve(id, &request.approver_id)
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, &bulletin))
}

/// Handler for POST /bulletins/{id}/invoice.
async fn invoice_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<InvoiceRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = parse_id(id, correlation_id)?;
    info!(correlation_id = %correlation_id, bulletin_id = %id, "Processing invoice");

    let request = parse_json(payload, correlation_id)?;
    request
        .validate()
        .map_err(|e| invalid(correlation_id, e))?;

    let bulletin = state
        .workflow()
        .invoice(id, &request.invoice_ref)
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, &bulletin))
}

/// Handler for POST /variance.
///
/// Always 200 for a well-formed request; figures that cannot be computed are
/// reported as indeterminate inside the body.
async fn variance_handler(
    State(state): State<AppState>,
    payload: Result<Json<VarianceRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing variance request");

    let request = parse_json(payload, correlation_id)?;
    let report = compute_variance(
        &request.snapshot,
        &request.budget,
        state.config().thresholds(),
    );

    info!(
        correlation_id = %correlation_id,
        site_id = %report.site_id,
        alerts = report.alerts.len(),
        "Variance report computed"
    );
    Ok(json_response(StatusCode::OK, &report))
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn parse_json<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // The body text carries serde's description of the problem
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(ApiErrorResponse::bad_request(error))
        }
    }
}

fn parse_id(
    id: Result<Path<Uuid>, PathRejection>,
    correlation_id: Uuid,
) -> Result<Uuid, ApiErrorResponse> {
    id.map(|Path(id)| id).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Invalid bulletin id"
        );
        ApiErrorResponse::bad_request(ApiError::validation_error(format!(
            "Invalid bulletin id: {}",
            rejection.body_text()
        )))
    })
}

fn invalid(correlation_id: Uuid, error: ApiError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        error = %error.message,
        "Request validation failed"
    );
    ApiErrorResponse::bad_request(error)
}

fn failed(correlation_id: Uuid, error: crate::error::EngineError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
    error.into()
}
