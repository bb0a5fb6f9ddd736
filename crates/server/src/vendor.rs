//! Vendor profile endpoints

use api_types::vendor::{VendorCreated, VendorNew, VendorView};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, user};

/// Handle requests for registering a vendor profile
pub async fn vendor_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<VendorNew>,
) -> Result<Json<VendorCreated>, ServerError> {
    let id = state
        .engine
        .new_vendor(
            &user.username,
            &payload.business_name,
            &payload.category,
            payload.city.as_deref(),
        )
        .await?;

    Ok(Json(VendorCreated { id }))
}

/// Handle requests for reading the caller's vendor profile
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<VendorView>, ServerError> {
    let vendor = state.engine.vendor_for_user(&user.username).await?;

    Ok(Json(VendorView {
        id: vendor.id,
        business_name: vendor.business_name,
        category: vendor.category,
        city: vendor.city,
        created_at: vendor.created_at,
    }))
}
