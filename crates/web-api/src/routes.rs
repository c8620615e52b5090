use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use application::{
    ApplicationError, CreateBookingRequest, NotificationError, PriceCalculationRequest,
    RoomWithAvailability, SearchRoomsRequest,
};
use domain::{
    Booking, BookingResponse, BookingWithRoom, NotificationChannel, NotificationEvent,
    NotificationResponse, NotificationType, PriceCalculation, Room,
};

use crate::{admin_routes::admin_routes, error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
struct BookingListQuery {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendNotificationPayload {
    channel: String,
    recipient: String,
    #[serde(default)]
    subject: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct BroadcastPayload {
    channels: Vec<String>,
    recipient: String,
    #[serde(default)]
    subject: String,
    message: String,
}

/// 状态变更后的预订以及已入队的通知回执
#[derive(Debug, Serialize)]
struct BookingTransitionResponse {
    booking: Booking,
    notifications: Vec<NotificationResponse>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/rooms/search", post(search_rooms))
        .route("/rooms/{room_id}", get(get_room))
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/{booking_id}", get(get_booking))
        .route("/bookings/{booking_id}/confirm", post(confirm_booking))
        .route("/bookings/{booking_id}/cancel", post(cancel_booking))
        .route("/price/calculate", post(calculate_price))
        .route("/notifications/send", post(send_notification))
        .route("/notifications/broadcast", post(broadcast_notification))
        .route("/notifications/types", get(notification_types))
        .route("/notifications/log", get(notification_log))
        .nest("/admin", admin_routes())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, ApiError> {
    Ok(Json(state.booking_service.list_rooms().await?))
}

async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
) -> Result<Json<Room>, ApiError> {
    Ok(Json(state.booking_service.get_room(room_id).await?))
}

async fn search_rooms(
    State(state): State<AppState>,
    Json(payload): Json<SearchRoomsRequest>,
) -> Result<Json<Vec<RoomWithAvailability>>, ApiError> {
    Ok(Json(
        state.booking_service.search_available_rooms(payload).await?,
    ))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let created = state.booking_service.create_booking(payload).await?;

    let ack = state
        .notification_service
        .notify_booking_created(&created.booking, &created.room);
    if !ack.success {
        tracing::warn!(booking_id = created.booking.id, message = %ack.message, "预订创建通知未入队");
    }

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = match query.email.as_deref().filter(|email| !email.is_empty()) {
        Some(email) => state.booking_service.list_bookings_by_email(email).await?,
        None => state.booking_service.list_bookings().await?,
    };
    Ok(Json(bookings))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingWithRoom>, ApiError> {
    Ok(Json(state.booking_service.get_booking(booking_id).await?))
}

async fn confirm_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingTransitionResponse>, ApiError> {
    let booking = state.booking_service.confirm_booking(booking_id).await?;
    let room = state.booking_service.get_room(booking.room_id).await?;
    let notifications = state
        .notification_service
        .notify_booking_confirmed(&booking, &room);

    Ok(Json(BookingTransitionResponse {
        booking,
        notifications,
    }))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingTransitionResponse>, ApiError> {
    let booking = state.booking_service.cancel_booking(booking_id).await?;
    let room = state.booking_service.get_room(booking.room_id).await?;
    let notifications = state
        .notification_service
        .notify_booking_cancelled(&booking, &room);

    Ok(Json(BookingTransitionResponse {
        booking,
        notifications,
    }))
}

async fn calculate_price(
    State(state): State<AppState>,
    Json(payload): Json<PriceCalculationRequest>,
) -> Result<Json<PriceCalculation>, ApiError> {
    Ok(Json(state.booking_service.calculate_price(payload).await?))
}

async fn send_notification(
    State(state): State<AppState>,
    Json(payload): Json<SendNotificationPayload>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let channel: NotificationChannel = payload.channel.parse().map_err(|_| {
        ApplicationError::from(NotificationError::UnknownChannel(payload.channel.clone()))
    })?;

    Ok(Json(state.notification_service.send_to_channel(
        channel,
        &payload.recipient,
        &payload.subject,
        &payload.message,
    )))
}

async fn broadcast_notification(
    State(state): State<AppState>,
    Json(payload): Json<BroadcastPayload>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    if payload.channels.is_empty() {
        return Err(ApiError::bad_request("at least one channel is required"));
    }

    Ok(Json(state.notification_service.broadcast(
        &payload.channels,
        &payload.recipient,
        &payload.subject,
        &payload.message,
    )))
}

async fn notification_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<NotificationType>>, ApiError> {
    Ok(Json(state.notification_service.notification_types().await?))
}

async fn notification_log(State(state): State<AppState>) -> Json<Vec<NotificationEvent>> {
    Json(state.notification_service.event_log())
}
