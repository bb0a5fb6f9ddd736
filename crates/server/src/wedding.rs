//! Wedding profile endpoints

use api_types::wedding::{WeddingCreated, WeddingNew, WeddingUpdate, WeddingView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState, user};

#[derive(Debug, Deserialize)]
pub struct WeddingQuery {
    pub wedding_id: Option<String>,
}

fn wedding_view(wedding: engine::Wedding) -> WeddingView {
    let today = chrono::Utc::now().date_naive();
    WeddingView {
        days_until: wedding.days_until(today),
        id: wedding.id,
        bride_name: wedding.bride_name,
        groom_name: wedding.groom_name,
        wedding_date: wedding.wedding_date,
        venue: wedding.venue,
        city: wedding.city,
        total_budget_minor: wedding.total_budget_minor,
        notes: wedding.notes,
        created_at: wedding.created_at,
    }
}

/// Handle requests for creating a new wedding profile
pub async fn wedding_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<WeddingNew>,
) -> Result<Json<WeddingCreated>, ServerError> {
    let id = state
        .engine
        .new_wedding(
            &user.username,
            engine::NewWedding {
                bride_name: payload.bride_name,
                groom_name: payload.groom_name,
                wedding_date: payload.wedding_date,
                venue: payload.venue,
                city: payload.city,
                total_budget_minor: payload.total_budget_minor,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(Json(WeddingCreated { id }))
}

/// Handle requests for reading the caller's wedding
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<WeddingQuery>,
) -> Result<Json<WeddingView>, ServerError> {
    let wedding = state
        .engine
        .wedding(query.wedding_id.as_deref(), &user.username)
        .await?;

    Ok(Json(wedding_view(wedding)))
}

/// Handle requests for updating a wedding profile
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<WeddingUpdate>,
) -> Result<Json<WeddingView>, ServerError> {
    let wedding = state
        .engine
        .update_wedding(
            &id,
            &user.username,
            engine::WeddingPatch {
                bride_name: payload.bride_name,
                groom_name: payload.groom_name,
                wedding_date: payload.wedding_date,
                venue: payload.venue,
                city: payload.city,
                total_budget_minor: payload.total_budget_minor,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(Json(wedding_view(wedding)))
}
