use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use application::HotelStatistics;
use domain::{
    Booking, BookingStatus, BookingWithRoom, NewRoom, NewSpecialDate, Room, RoomStatus, RoomType,
    SpecialDate,
};

use crate::{error::ApiError, state::AppState};

/// 管理后台路由：房间、特殊日期、预订状态和统计
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/preset", post(create_room_from_preset))
        .route("/rooms/{room_id}", put(update_room).delete(delete_room))
        .route("/rooms/{room_id}/status", put(update_room_status))
        .route(
            "/special-dates",
            get(list_special_dates).post(create_special_date),
        )
        .route("/special-dates/{special_date_id}", delete(delete_special_date))
        .route("/bookings", get(list_bookings))
        .route("/bookings/{booking_id}/status", put(update_booking_status))
        .route("/statistics", get(statistics))
        .route("/status", get(status_report))
}

#[derive(Debug, Deserialize)]
struct PresetRoomPayload {
    room_type: RoomType,
    room_number: String,
}

#[derive(Debug, Deserialize)]
struct RoomStatusPayload {
    status: RoomStatus,
}

#[derive(Debug, Deserialize)]
struct BookingStatusPayload {
    status: BookingStatus,
}

#[derive(Debug, Deserialize)]
struct AdminBookingsQuery {
    /// "pending" | "confirmed" | "cancelled"
    status: Option<String>,
}

async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, ApiError> {
    Ok(Json(state.admin_service.list_rooms().await?))
}

async fn create_room(
    State(state): State<AppState>,
    Json(payload): Json<NewRoom>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    let room = state.admin_service.create_room(payload).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

async fn create_room_from_preset(
    State(state): State<AppState>,
    Json(payload): Json<PresetRoomPayload>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    let room = state
        .admin_service
        .create_room_from_preset(payload.room_type, &payload.room_number)
        .await?;
    Ok((StatusCode::CREATED, Json(room)))
}

async fn update_room(
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
    Json(payload): Json<NewRoom>,
) -> Result<Json<Room>, ApiError> {
    Ok(Json(state.admin_service.update_room(room_id, payload).await?))
}

async fn delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.admin_service.delete_room(room_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_room_status(
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
    Json(payload): Json<RoomStatusPayload>,
) -> Result<Json<Room>, ApiError> {
    Ok(Json(
        state
            .admin_service
            .update_room_status(room_id, payload.status)
            .await?,
    ))
}

async fn list_special_dates(
    State(state): State<AppState>,
) -> Result<Json<Vec<SpecialDate>>, ApiError> {
    Ok(Json(state.admin_service.list_special_dates().await?))
}

async fn create_special_date(
    State(state): State<AppState>,
    Json(payload): Json<NewSpecialDate>,
) -> Result<(StatusCode, Json<SpecialDate>), ApiError> {
    let special_date = state.admin_service.create_special_date(payload).await?;
    Ok((StatusCode::CREATED, Json(special_date)))
}

async fn delete_special_date(
    State(state): State<AppState>,
    Path(special_date_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .admin_service
        .delete_special_date(special_date_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<AdminBookingsQuery>,
) -> Result<Json<Vec<BookingWithRoom>>, ApiError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(raw.parse::<BookingStatus>().map_err(ApiError::from)?),
        None => None,
    };

    Ok(Json(state.admin_service.list_bookings(status).await?))
}

async fn update_booking_status(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
    Json(payload): Json<BookingStatusPayload>,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(
        state
            .admin_service
            .update_booking_status(booking_id, payload.status)
            .await?,
    ))
}

async fn statistics(State(state): State<AppState>) -> Result<Json<HotelStatistics>, ApiError> {
    Ok(Json(state.admin_service.statistics().await?))
}

async fn status_report(State(state): State<AppState>) -> Result<String, ApiError> {
    Ok(state.admin_service.hotel_status_report().await?)
}
