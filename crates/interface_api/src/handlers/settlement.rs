//! Settlement handlers

use axum::{extract::{Path, State}, Json};

use core_kernel::MemberId;
use domain_settlement::{aggregate_snapshot, Settlement, SettlementReducer};

use crate::{AppState, error::ApiError};
use super::parse_id;
use crate::dto::records::GroupRecordsRequest;
use crate::dto::settlement::{DebtsResponse, UserDebtsResponse};

fn settle(state: &AppState, request: GroupRecordsRequest) -> Result<(Settlement, Vec<MemberId>), ApiError> {
    let snapshot = request.into_snapshot(state.config.currency)?;
    let sheet = aggregate_snapshot(&snapshot)?;
    let members = snapshot.roster.iter().map(|m| m.id).collect();
    Ok((SettlementReducer::new().reduce(&sheet), members))
}

/// Suggests the payments that settle posted group records
pub async fn compute_settlement(
    State(state): State<AppState>,
    Json(request): Json<GroupRecordsRequest>,
) -> Result<Json<DebtsResponse>, ApiError> {
    let (settlement, _) = settle(&state, request)?;
    Ok(Json(DebtsResponse::from(&settlement)))
}

/// One member's view of the settlement for posted group records
pub async fn compute_user_debts(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
    Json(request): Json<GroupRecordsRequest>,
) -> Result<Json<UserDebtsResponse>, ApiError> {
    let member_id: MemberId = parse_id(&member_id, "member")?;
    let (settlement, members) = settle(&state, request)?;
    if !members.contains(&member_id) {
        return Err(ApiError::NotFound(format!("Member {} is not in the roster", member_id)));
    }
    Ok(Json(UserDebtsResponse::from(&settlement.user_debts(member_id))))
}
