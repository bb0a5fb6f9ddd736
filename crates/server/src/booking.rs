//! Booking endpoints

use api_types::booking::{
    BookingCreated, BookingListResponse, BookingNew, BookingStats, BookingStatus,
    BookingStatusUpdate, BookingUpdate, BookingView, PaymentUpdate,
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
pub struct BookingQuery {
    pub wedding_id: Option<String>,
}

fn status_to_engine(status: BookingStatus) -> engine::BookingStatus {
    match status {
        BookingStatus::Pending => engine::BookingStatus::Pending,
        BookingStatus::Confirmed => engine::BookingStatus::Confirmed,
        BookingStatus::Rejected => engine::BookingStatus::Rejected,
        BookingStatus::Cancelled => engine::BookingStatus::Cancelled,
    }
}

fn status_from_engine(status: engine::BookingStatus) -> BookingStatus {
    match status {
        engine::BookingStatus::Pending => BookingStatus::Pending,
        engine::BookingStatus::Confirmed => BookingStatus::Confirmed,
        engine::BookingStatus::Rejected => BookingStatus::Rejected,
        engine::BookingStatus::Cancelled => BookingStatus::Cancelled,
    }
}

fn booking_view(booking: engine::Booking) -> BookingView {
    BookingView {
        remaining_amount_minor: booking.remaining_amount_minor(),
        id: booking.id,
        wedding_id: booking.wedding_id,
        vendor_id: booking.vendor_id,
        vendor_name: booking.vendor_name,
        contact_person: booking.contact_person,
        email: booking.email,
        phone: booking.phone,
        address: booking.address,
        service_type: booking.service_type,
        event_date: booking.event_date,
        status: status_from_engine(booking.status),
        total_amount_minor: booking.total_amount_minor,
        advance_paid_minor: booking.advance_paid_minor,
        final_paid_minor: booking.final_paid_minor,
        notes: booking.notes,
        created_at: booking.created_at,
    }
}

fn stats_for(bookings: &[engine::Booking]) -> BookingStats {
    let mut stats = BookingStats {
        total: bookings.len(),
        ..Default::default()
    };
    for booking in bookings {
        match booking.status {
            engine::BookingStatus::Pending => stats.pending += 1,
            engine::BookingStatus::Confirmed => {
                stats.confirmed += 1;
                stats.committed_minor += booking.total_amount_minor;
            }
            engine::BookingStatus::Rejected => stats.rejected += 1,
            engine::BookingStatus::Cancelled => stats.cancelled += 1,
        }
    }
    stats
}

fn list_response(bookings: Vec<engine::Booking>) -> BookingListResponse {
    let stats = stats_for(&bookings);
    BookingListResponse {
        bookings: bookings.into_iter().map(booking_view).collect(),
        stats,
    }
}

/// Handle requests for creating a booking
pub async fn booking_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BookingNew>,
) -> Result<Json<BookingCreated>, ServerError> {
    let id = state
        .engine
        .new_booking(
            payload.wedding_id.as_deref(),
            &user.username,
            engine::NewBooking {
                vendor_id: payload.vendor_id,
                vendor_name: payload.vendor_name,
                contact_person: payload.contact_person,
                email: payload.email,
                phone: payload.phone,
                address: payload.address,
                service_type: payload.service_type,
                event_date: payload.event_date,
                status: payload.status.map(status_to_engine),
                total_amount_minor: payload.total_amount_minor,
                advance_paid_minor: payload.advance_paid_minor.unwrap_or(0),
                notes: payload.notes,
            },
        )
        .await?;

    Ok(Json(BookingCreated { id }))
}

/// Handle requests for listing the couple's bookings
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<BookingQuery>,
) -> Result<Json<BookingListResponse>, ServerError> {
    let bookings = state
        .engine
        .list_bookings(query.wedding_id.as_deref(), &user.username)
        .await?;

    Ok(Json(list_response(bookings)))
}

/// Handle requests for listing bookings addressed to the caller's vendor profile
pub async fn vendor_list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BookingListResponse>, ServerError> {
    let bookings = state.engine.vendor_bookings(&user.username).await?;

    Ok(Json(list_response(bookings)))
}

/// Handle requests for reading one booking
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, ServerError> {
    let booking = state.engine.booking(id, &user.username).await?;

    Ok(Json(booking_view(booking)))
}

/// Handle requests for editing a booking (couple side)
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookingUpdate>,
) -> Result<Json<BookingView>, ServerError> {
    let booking = state
        .engine
        .update_booking(
            id,
            &user.username,
            engine::BookingPatch {
                vendor_name: payload.vendor_name,
                contact_person: payload.contact_person,
                email: payload.email,
                phone: payload.phone,
                address: payload.address,
                service_type: payload.service_type,
                event_date: payload.event_date,
                status: payload.status.map(status_to_engine),
                total_amount_minor: payload.total_amount_minor,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(Json(booking_view(booking)))
}

/// Handle requests for vendor accept/reject
pub async fn update_status(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookingStatusUpdate>,
) -> Result<Json<BookingView>, ServerError> {
    let booking = state
        .engine
        .update_booking_status(id, &user.username, status_to_engine(payload.status))
        .await?;

    Ok(Json(booking_view(booking)))
}

/// Handle requests for recording payments against a booking
pub async fn update_payment(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentUpdate>,
) -> Result<Json<BookingView>, ServerError> {
    let booking = state
        .engine
        .update_payment(
            id,
            &user.username,
            payload.advance_paid_minor,
            payload.final_paid_minor,
        )
        .await?;

    Ok(Json(booking_view(booking)))
}

/// Handle requests for deleting a booking
pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_booking(id, &user.username).await?;

    Ok(StatusCode::NO_CONTENT)
}
