mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::build_app;

fn booking_payload(room_id: i64, start: &str, end: &str, email: &str) -> serde_json::Value {
    json!({
        "room_id": room_id,
        "start_date": start,
        "end_date": end,
        "guest_info": {
            "name": "Anna",
            "email": email,
            "phone": "+79991234567"
        }
    })
}

#[tokio::test]
async fn health_and_room_listing() {
    let app = build_app();

    let (status, _) = app.send_raw("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, rooms) = app.send("GET", "/api/v1/rooms", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rooms.as_array().unwrap().len(), 6);

    let (status, body) = app.send("GET", "/api/v1/rooms/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ROOM_NOT_FOUND");
}

#[tokio::test]
async fn booking_lifecycle_over_http() {
    let app = build_app();
    let room_id = app.room_id("101").await;

    let (status, created) = app
        .send(
            "POST",
            "/api/v1/bookings",
            Some(booking_payload(room_id, "2024-07-08", "2024-07-10", "anna@example.com")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["nights"], 2);
    assert_eq!(created["room"]["room_number"], "101");
    // 2500 * 1.3 旺季系数 * 2 晚
    assert!((created["price"].as_f64().unwrap() - 6500.0).abs() < 1e-6);

    let booking_id = created["id"].as_i64().unwrap();

    let (status, conflict) = app
        .send(
            "POST",
            "/api/v1/bookings",
            Some(booking_payload(room_id, "2024-07-09", "2024-07-11", "other@example.com")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["code"], "ROOM_NOT_AVAILABLE");

    let (status, confirmed) = app
        .send("POST", &format!("/api/v1/bookings/{booking_id}/confirm"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["booking"]["status"], "confirmed");
    assert_eq!(confirmed["notifications"].as_array().unwrap().len(), 3);

    let (status, again) = app
        .send("POST", &format!("/api/v1/bookings/{booking_id}/confirm"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(again["code"], "INVALID_STATUS_TRANSITION");

    let (status, cancelled) = app
        .send("POST", &format!("/api/v1/bookings/{booking_id}/cancel"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["booking"]["status"], "cancelled");

    let (status, fetched) = app
        .send("GET", &format!("/api/v1/bookings/{booking_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["room"]["id"], room_id);

    let (_, by_email) = app
        .send("GET", "/api/v1/bookings?email=anna@example.com", None)
        .await;
    assert_eq!(by_email.as_array().unwrap().len(), 1);

    // 创建 1 条 + 确认 3 条 + 取消 3 条
    assert_eq!(app.notifications.event_log().len(), 7);
}

#[tokio::test]
async fn invalid_booking_requests_are_rejected() {
    let app = build_app();
    let room_id = app.room_id("201").await;

    let (status, body) = app
        .send(
            "POST",
            "/api/v1/bookings",
            Some(booking_payload(room_id, "2024-07-10", "2024-07-10", "a@example.com")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_DATE_RANGE");

    let (status, body) = app
        .send(
            "POST",
            "/api/v1/bookings",
            Some(booking_payload(room_id, "2024-07-10", "2024-07-12", "")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_GUEST_INFO");

    let (status, body) = app
        .send("POST", "/api/v1/bookings/424242/cancel", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "BOOKING_NOT_FOUND");
}

#[tokio::test]
async fn search_and_price_calculation() {
    let app = build_app();
    let room_id = app.room_id("102").await;
    app.send(
        "POST",
        "/api/v1/bookings",
        Some(booking_payload(room_id, "2024-11-04", "2024-11-06", "s@example.com")),
    )
    .await;

    let (status, results) = app
        .send(
            "POST",
            "/api/v1/rooms/search",
            Some(json!({
                "check_in": "2024-11-04",
                "check_out": "2024-11-06",
                "room_type": "standard"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["room"]["room_number"], "101");
    assert_eq!(results[0]["is_available"], true);

    let (status, price) = app
        .send(
            "POST",
            "/api/v1/price/calculate",
            Some(json!({
                "room_id": room_id,
                "check_in": "2024-11-04",
                "check_out": "2024-11-06"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(price["nights"], 2);
    let breakdown = price["daily_breakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0]["reason"], "Low season");
    assert!((price["total_price"].as_f64().unwrap() - 4500.0).abs() < 1e-6);
}

#[tokio::test]
async fn manual_notifications() {
    let app = build_app();

    let (status, ack) = app
        .send(
            "POST",
            "/api/v1/notifications/send",
            Some(json!({
                "channel": "sms",
                "recipient": "+79990000000",
                "message": "Your room is ready"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["success"], true);
    assert_eq!(ack["message"], "SMS notification queued");

    let (status, body) = app
        .send(
            "POST",
            "/api/v1/notifications/send",
            Some(json!({
                "channel": "fax",
                "recipient": "x",
                "message": "y"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNKNOWN_CHANNEL");

    let (status, acks) = app
        .send(
            "POST",
            "/api/v1/notifications/broadcast",
            Some(json!({
                "channels": ["email", "fax"],
                "recipient": "guest@example.com",
                "subject": "Pool",
                "message": "Pool closed today"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(acks[0]["success"], true);
    assert_eq!(acks[1]["success"], false);
    assert_eq!(acks[1]["message"], "Unknown channel: fax");

    let (_, log) = app.send("GET", "/api/v1/notifications/log", None).await;
    assert_eq!(log.as_array().unwrap().len(), 2);

    let (_, types) = app.send("GET", "/api/v1/notifications/types", None).await;
    assert_eq!(types.as_array().unwrap().len(), 3);
}
