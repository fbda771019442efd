//! Balance handlers

use axum::{extract::State, Json};

use domain_settlement::aggregate_snapshot;

use crate::{AppState, error::ApiError};
use crate::dto::balances::BalancesResponse;
use crate::dto::records::GroupRecordsRequest;

/// Computes balances for posted group records
pub async fn compute_balances(
    State(state): State<AppState>,
    Json(request): Json<GroupRecordsRequest>,
) -> Result<Json<BalancesResponse>, ApiError> {
    let snapshot = request.into_snapshot(state.config.currency)?;
    let sheet = aggregate_snapshot(&snapshot)?;
    Ok(Json(BalancesResponse::from(&sheet)))
}
