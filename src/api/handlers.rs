//! HTTP request handlers for the day-summary API.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_day_summary_with_rejections, summarize_period};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::DaySummary;

use super::request::{DaySummaryRequest, PeriodSummaryRequest};
use super::response::{ApiError, ApiErrorResponse, PeriodSummaryResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/day-summary", post(day_summary_handler))
        .route("/period-summary", post(period_summary_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Maps a body extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
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
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for POST /day-summary.
async fn day_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<DaySummaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing day summary request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    let date = request.date;
    match summarize_request(request, state.config()) {
        Ok(summary) => {
            info!(
                correlation_id = %correlation_id,
                %date,
                status = %summary.status,
                worked_minutes = summary.worked_minutes,
                net_balance_minutes = summary.clt.net_balance_minutes,
                duration_us = start_time.elapsed().as_micros(),
                "Day summary completed"
            );
            json_response(StatusCode::OK, summary)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Day summary rejected"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /period-summary.
async fn period_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<PeriodSummaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing period summary request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    match summarize_period_request(request, state.config()) {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                days = response.totals.days,
                inconsistent_days = response.totals.inconsistent_days,
                hour_bank_minutes = response.totals.hour_bank_minutes,
                duration_us = start_time.elapsed().as_micros(),
                "Period summary completed"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Period summary rejected"
            );
            error_response(err.into())
        }
    }
}

/// Resolves one day request against the configuration and summarizes it.
///
/// An explicit `schedule` wins over the employee's configured one. The
/// request's `shift_override` wins over a configured override.
fn summarize_request(
    request: DaySummaryRequest,
    config: &ConfigLoader,
) -> EngineResult<DaySummary> {
    request.validate()?;

    let employee_id = request.employee_id.as_deref();
    let (schedule, configured_override, schedule_rejected) = match &request.schedule {
        Some(raw) => {
            let (schedule, rejected) = raw.parse();
            (schedule, None, rejected)
        }
        None => {
            let employee_id = employee_id.ok_or_else(|| EngineError::InvalidRequest {
                field: "employee_id".to_string(),
                message: "required when no schedule is given".to_string(),
            })?;
            let day = config.schedule_for(employee_id, request.date)?;
            (day.schedule, day.shift_override, Vec::new())
        }
    };

    let resolved = request.resolve_punches(config.noon_cutoff());
    let mut rejected = resolved.rejected;
    rejected.extend(schedule_rejected);

    let shift_override = request.shift_override.or(configured_override);

    let mut options = config.summary_options(employee_id, request.compensation_policy);
    if let Some(minutes) = request.interval_tolerance_minutes {
        options.interval_tolerance_minutes = minutes;
    }

    Ok(calculate_day_summary_with_rejections(
        &resolved.punches,
        &schedule,
        request.date,
        shift_override.as_ref(),
        &options,
        &rejected,
    ))
}

fn summarize_period_request(
    request: PeriodSummaryRequest,
    config: &ConfigLoader,
) -> EngineResult<PeriodSummaryResponse> {
    request.validate()?;

    let days = request
        .days
        .into_iter()
        .map(|mut day| {
            if day.employee_id.is_none() {
                day.employee_id = request.employee_id.clone();
            }
            summarize_request(day, config)
        })
        .collect::<EngineResult<Vec<_>>>()?;
    let totals = summarize_period(&days);

    Ok(PeriodSummaryResponse {
        employee_id: request.employee_id,
        days,
        totals,
    })
}
