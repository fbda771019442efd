//! Stored group handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, Utc};
use tracing::info;

use core_kernel::{GroupId, MemberId, Money, TransferId};
use domain_expense::{ensure_unique_members, roster_ids, Expense, Transfer};
use domain_settlement::{GroupRepository, GroupSnapshot};

use crate::{AppState, error::ApiError};
use super::parse_id;
use crate::dto::balances::BalancesResponse;
use crate::dto::groups::*;
use crate::dto::settlement::{DebtsResponse, UserDebtsResponse};
use crate::dto::statistics::{StatisticsQuery, StatisticsResponse};

fn require_members(
    snapshot: &GroupSnapshot,
    members: impl IntoIterator<Item = MemberId>,
) -> Result<(), ApiError> {
    for member in members {
        if snapshot.member(member).is_none() {
            return Err(ApiError::Validation(format!(
                "Member {} is not in group {}",
                member, snapshot.group_id
            )));
        }
    }
    Ok(())
}

/// Creates an empty group
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), ApiError> {
    if request.roster.is_empty() {
        return Err(ApiError::Validation("A group needs at least one member".to_string()));
    }
    ensure_unique_members(roster_ids(&request.roster))?;

    let currency = request.currency.unwrap_or(state.config.currency);
    let snapshot = GroupSnapshot::new(GroupId::new(), currency).with_roster(request.roster);
    let response = GroupResponse {
        id: snapshot.group_id,
        currency,
        roster: snapshot.roster.clone(),
    };

    info!(group_id = %snapshot.group_id, members = snapshot.roster.len(), "Created group");
    state.store.insert(snapshot).await;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Splits a new expense across the group roster and stores it
pub async fn create_expense(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseResponse>), ApiError> {
    let group_id: GroupId = parse_id(&group_id, "group")?;
    let snapshot = state.store.load_snapshot(group_id).await?;
    require_members(&snapshot, request.referenced_members())?;

    let total = Money::new(request.amount, snapshot.currency);
    let mut expense = Expense::from_allocation(request.paid_by, total, &snapshot.roster, &request.split())?
        .with_category(request.category);
    if let Some(description) = request.description {
        expense = expense.with_description(description);
    }
    if let Some(date) = request.date {
        expense = expense.on(date);
    }

    state.store.add_expense(group_id, expense.clone()).await?;
    info!(group_id = %group_id, expense_id = %expense.id, total = %expense.total, "Recorded expense");
    Ok((StatusCode::CREATED, Json(ExpenseResponse::from(&expense))))
}

/// Records a pending repayment
pub async fn propose_transfer(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(request): Json<ProposeTransferRequest>,
) -> Result<(StatusCode, Json<TransferResponse>), ApiError> {
    let group_id: GroupId = parse_id(&group_id, "group")?;
    let snapshot = state.store.load_snapshot(group_id).await?;
    require_members(&snapshot, [request.from, request.to])?;

    let amount = Money::new(request.amount, snapshot.currency);
    let mut transfer = Transfer::propose(request.from, request.to, amount)?;
    if let Some(note) = request.note {
        transfer = transfer.with_note(note);
    }
    if let Some(date) = request.date {
        transfer = transfer.on(date);
    }

    state.store.add_transfer(group_id, transfer.clone()).await?;
    info!(group_id = %group_id, transfer_id = %transfer.id, "Proposed transfer");
    Ok((StatusCode::CREATED, Json(TransferResponse::from(&transfer))))
}

/// Confirms a pending repayment on behalf of its receiver
pub async fn confirm_transfer(
    State(state): State<AppState>,
    Path((group_id, transfer_id)): Path<(String, String)>,
    Json(request): Json<ConfirmTransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    let group_id: GroupId = parse_id(&group_id, "group")?;
    let transfer_id: TransferId = parse_id(&transfer_id, "transfer")?;
    let transfer = state
        .store
        .confirm_transfer(group_id, transfer_id, request.actor)
        .await?;
    info!(group_id = %group_id, transfer_id = %transfer_id, "Confirmed transfer");
    Ok(Json(TransferResponse::from(&transfer)))
}

/// Current balances of a stored group
pub async fn balances(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<BalancesResponse>, ApiError> {
    let group_id: GroupId = parse_id(&group_id, "group")?;
    let sheet = state.service.balances(group_id).await?;
    Ok(Json(BalancesResponse::from(&sheet)))
}

/// Suggested payments that settle a stored group
pub async fn debts(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<DebtsResponse>, ApiError> {
    let group_id: GroupId = parse_id(&group_id, "group")?;
    let settlement = state.service.settlement(group_id).await?;
    Ok(Json(DebtsResponse::from(&settlement)))
}

/// One member's debts in a stored group
pub async fn user_debts(
    State(state): State<AppState>,
    Path((group_id, member_id)): Path<(String, String)>,
) -> Result<Json<UserDebtsResponse>, ApiError> {
    let group_id: GroupId = parse_id(&group_id, "group")?;
    let member_id: MemberId = parse_id(&member_id, "member")?;
    let debts = state.service.user_debts(group_id, member_id).await?;
    Ok(Json(UserDebtsResponse::from(&debts)))
}

/// Spending statistics for a stored group
///
/// Monthly figures default to the current calendar year.
pub async fn statistics(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    let group_id: GroupId = parse_id(&group_id, "group")?;
    let range = query
        .range()
        .ok_or_else(|| ApiError::BadRequest("endDate must not be before startDate".to_string()))?;
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let report = state.service.statistics(group_id, range, year).await?;
    Ok(Json(StatisticsResponse::from(&report)))
}
