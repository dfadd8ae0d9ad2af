//! HTTP request handlers for the rotation API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;

use super::request::{AnnualQuery, FilterOptionsQuery, MonthlyQuery, PersonnelQuery};
use super::response::{ApiError, ApiErrorResponse, PersonnelListing};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rotation/monthly", get(monthly_handler))
        .route("/rotation/annual", get(annual_handler))
        .route("/rotation/personnel", get(personnel_handler))
        .route("/rotation/filter-options", get(filter_options_handler))
        .with_state(state)
}

/// Handler for `GET /rotation/monthly`.
async fn monthly_handler(
    State(state): State<AppState>,
    query: Result<Query<MonthlyQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => return invalid_query(correlation_id, rejection),
    };

    info!(
        correlation_id = %correlation_id,
        year = params.year,
        month = params.month,
        "Processing monthly rotation request"
    );

    let started = Instant::now();
    match state
        .service()
        .compute_month(params.year, params.month, &params.filter())
        .await
    {
        Ok(indicators) => {
            info!(
                correlation_id = %correlation_id,
                retired = indicators.retired_count,
                rotation_percentage = %indicators.rotation_percentage,
                duration_us = started.elapsed().as_micros(),
                "Monthly rotation request completed"
            );
            (StatusCode::OK, Json(indicators)).into_response()
        }
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for `GET /rotation/annual`.
///
/// Months that could not be fetched come back degraded inside a 200
/// response.
async fn annual_handler(
    State(state): State<AppState>,
    query: Result<Query<AnnualQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => return invalid_query(correlation_id, rejection),
    };

    info!(
        correlation_id = %correlation_id,
        year = params.year,
        "Processing annual rotation request"
    );

    let started = Instant::now();
    match state
        .service()
        .compute_annual(params.year, &params.filter())
        .await
    {
        Ok(annual) => {
            if !annual.degraded_months.is_empty() {
                warn!(
                    correlation_id = %correlation_id,
                    degraded_months = ?annual.degraded_months,
                    "Annual rotation has degraded months"
                );
            }
            info!(
                correlation_id = %correlation_id,
                total_retired = annual.totals.total_retired,
                duration_us = started.elapsed().as_micros(),
                "Annual rotation request completed"
            );
            (StatusCode::OK, Json(annual)).into_response()
        }
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for `GET /rotation/personnel`.
async fn personnel_handler(
    State(state): State<AppState>,
    query: Result<Query<PersonnelQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => return invalid_query(correlation_id, rejection),
    };

    info!(correlation_id = %correlation_id, date = %params.date, "Processing personnel request");

    match state.service().personnel(params.date, &params.filter()).await {
        Ok(personnel) => {
            let listing = PersonnelListing {
                reference_date: params.date,
                count: personnel.len(),
                personnel,
            };
            (StatusCode::OK, Json(listing)).into_response()
        }
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for `GET /rotation/filter-options`.
async fn filter_options_handler(
    State(state): State<AppState>,
    query: Result<Query<FilterOptionsQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => return invalid_query(correlation_id, rejection),
    };

    info!(correlation_id = %correlation_id, date = %params.date, "Processing filter options request");

    match state.service().filter_options(params.date).await {
        Ok(options) => (StatusCode::OK, Json(options)).into_response(),
        Err(err) => failure(correlation_id, err),
    }
}

fn invalid_query(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(correlation_id = %correlation_id, error = %body_text, "Invalid query string");
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::invalid_query(body_text)),
    )
        .into_response()
}

fn failure(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Rotation request failed");
    ApiErrorResponse::from(err).into_response()
}
