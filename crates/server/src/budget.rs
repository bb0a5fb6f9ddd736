//! Budget ledger endpoints

use api_types::budget::{
    BudgetAlert, BudgetCategory, BudgetLineCreated, BudgetLineNew, BudgetLineUpdate,
    BudgetLineView, BudgetListResponse, BudgetSummary, BudgetSyncErrorView, BudgetSyncRequest,
    BudgetSyncResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    pub wedding_id: Option<String>,
}

fn category_to_engine(category: BudgetCategory) -> engine::BudgetCategory {
    match category {
        BudgetCategory::Venue => engine::BudgetCategory::Venue,
        BudgetCategory::Catering => engine::BudgetCategory::Catering,
        BudgetCategory::Photography => engine::BudgetCategory::Photography,
        BudgetCategory::Decoration => engine::BudgetCategory::Decoration,
        BudgetCategory::Makeup => engine::BudgetCategory::Makeup,
        BudgetCategory::Entertainment => engine::BudgetCategory::Entertainment,
        BudgetCategory::Transportation => engine::BudgetCategory::Transportation,
        BudgetCategory::Invitations => engine::BudgetCategory::Invitations,
        BudgetCategory::Favors => engine::BudgetCategory::Favors,
        BudgetCategory::Other => engine::BudgetCategory::Other,
    }
}

fn category_from_engine(category: engine::BudgetCategory) -> BudgetCategory {
    match category {
        engine::BudgetCategory::Venue => BudgetCategory::Venue,
        engine::BudgetCategory::Catering => BudgetCategory::Catering,
        engine::BudgetCategory::Photography => BudgetCategory::Photography,
        engine::BudgetCategory::Decoration => BudgetCategory::Decoration,
        engine::BudgetCategory::Makeup => BudgetCategory::Makeup,
        engine::BudgetCategory::Entertainment => BudgetCategory::Entertainment,
        engine::BudgetCategory::Transportation => BudgetCategory::Transportation,
        engine::BudgetCategory::Invitations => BudgetCategory::Invitations,
        engine::BudgetCategory::Favors => BudgetCategory::Favors,
        engine::BudgetCategory::Other => BudgetCategory::Other,
    }
}

fn line_view(line: engine::BudgetLine) -> BudgetLineView {
    BudgetLineView {
        variance_percentage: line.variance_percentage(),
        id: line.id,
        wedding_id: line.wedding_id,
        category: category_from_engine(line.category),
        estimated_cost_minor: line.estimated_cost_minor,
        actual_cost_minor: line.actual_cost_minor,
        notes: line.notes,
        created_at: line.created_at,
    }
}

/// Handle requests for the budget overview: lines, totals and overspend
/// alerts.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<BudgetQuery>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let wedding = state
        .engine
        .wedding(query.wedding_id.as_deref(), &user.username)
        .await?;
    let lines = state
        .engine
        .list_budget_lines(Some(&wedding.id), &user.username)
        .await?;

    let total_estimated_minor: i64 = lines.iter().map(|l| l.estimated_cost_minor).sum();
    let total_actual_minor: i64 = lines.iter().map(|l| l.actual_cost_minor).sum();
    let summary = BudgetSummary {
        total_budget_minor: wedding.total_budget_minor,
        total_estimated_minor,
        total_actual_minor,
        remaining_minor: wedding.total_budget_minor - total_actual_minor,
    };

    let alerts = lines
        .iter()
        .filter(|l| l.actual_cost_minor > l.estimated_cost_minor)
        .map(|l| BudgetAlert {
            category: category_from_engine(l.category),
            overspend_minor: l.actual_cost_minor - l.estimated_cost_minor,
        })
        .collect();

    Ok(Json(BudgetListResponse {
        lines: lines.into_iter().map(line_view).collect(),
        summary,
        alerts,
    }))
}

/// Handle requests for adding a manual budget line
pub async fn line_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetLineNew>,
) -> Result<Json<BudgetLineCreated>, ServerError> {
    let id = state
        .engine
        .add_budget_line(
            payload.wedding_id.as_deref(),
            &user.username,
            category_to_engine(payload.category),
            payload.estimated_cost_minor,
            payload.actual_cost_minor.unwrap_or(0),
            payload.notes.as_deref(),
        )
        .await?;

    Ok(Json(BudgetLineCreated { id }))
}

/// Handle requests for reading one budget line
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BudgetLineView>, ServerError> {
    let line = state.engine.budget_line(id, &user.username).await?;

    Ok(Json(line_view(line)))
}

/// Handle requests for updating a budget line
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetLineUpdate>,
) -> Result<Json<BudgetLineView>, ServerError> {
    let line = state
        .engine
        .update_budget_line(
            id,
            &user.username,
            engine::BudgetLinePatch {
                category: payload.category.map(category_to_engine),
                estimated_cost_minor: payload.estimated_cost_minor,
                actual_cost_minor: payload.actual_cost_minor,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(Json(line_view(line)))
}

/// Handle requests for deleting a budget line
pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget_line(id, &user.username).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for the bulk booking-to-budget sync.
///
/// Always answers 200 when the pass itself ran; per-booking failures are
/// reported in the body instead of failing the request.
pub async fn sync(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetSyncRequest>,
) -> Result<Json<BudgetSyncResponse>, ServerError> {
    let report = state
        .engine
        .sync_wedding_budget(payload.wedding_id.as_deref(), &user.username)
        .await?;

    let errors = if report.errors.is_empty() {
        None
    } else {
        Some(
            report
                .errors
                .into_iter()
                .map(|e| BudgetSyncErrorView {
                    booking_id: e.booking_id,
                    error: e.error,
                })
                .collect(),
        )
    };

    Ok(Json(BudgetSyncResponse {
        synced_count: report.synced_count,
        total_confirmed: report.total_confirmed,
        errors,
    }))
}
