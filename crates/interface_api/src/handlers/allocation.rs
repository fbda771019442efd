//! Allocation handlers

use axum::{extract::State, Json};
use tracing::debug;

use core_kernel::Money;
use domain_expense::Allocator;

use crate::{AppState, error::ApiError};
use crate::dto::allocation::*;

/// Splits an amount across a roster without storing anything
pub async fn allocate(
    State(state): State<AppState>,
    Json(request): Json<AllocationRequest>,
) -> Result<Json<AllocationResponse>, ApiError> {
    let currency = request.currency.unwrap_or(state.config.currency);
    let total = Money::new(request.amount, currency);

    let shares = Allocator::new().allocate(total, &request.roster, &request.split())?;
    debug!(policy = ?request.split_type, shares = shares.len(), "Allocated expense");

    Ok(Json(AllocationResponse::new(currency, &shares)))
}
