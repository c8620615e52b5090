mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::build_app;

#[tokio::test]
async fn room_management() {
    let app = build_app();

    let (status, preset) = app
        .send(
            "POST",
            "/api/v1/admin/rooms/preset",
            Some(json!({ "room_type": "suite", "room_number": "302" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(preset["base_price"], 7500.0);
    assert_eq!(preset["capacity"], 4);
    let room_id = preset["id"].as_i64().unwrap();

    let (status, duplicate) = app
        .send(
            "POST",
            "/api/v1/admin/rooms",
            Some(json!({
                "room_number": "302",
                "room_type": "standard",
                "base_price": 2000.0,
                "capacity": 2
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(duplicate["code"], "CONFLICT");

    let (status, invalid) = app
        .send(
            "POST",
            "/api/v1/admin/rooms",
            Some(json!({
                "room_number": "303",
                "room_type": "standard",
                "base_price": -1.0,
                "capacity": 2
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid["code"], "VALIDATION_FAILED");

    let (status, updated) = app
        .send(
            "PUT",
            &format!("/api/v1/admin/rooms/{room_id}"),
            Some(json!({
                "room_number": "302",
                "room_type": "suite",
                "base_price": 8000.0,
                "capacity": 4,
                "description": "Renovated suite"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["base_price"], 8000.0);
    assert_eq!(updated["description"], "Renovated suite");

    let (status, maintenance) = app
        .send(
            "PUT",
            &format!("/api/v1/admin/rooms/{room_id}/status"),
            Some(json!({ "status": "maintenance" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(maintenance["status"], "maintenance");

    let (status, _) = app
        .send_raw("DELETE", &format!("/api/v1/admin/rooms/{room_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .send("DELETE", &format!("/api/v1/admin/rooms/{room_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ROOM_NOT_FOUND");
}

#[tokio::test]
async fn special_dates_drive_pricing() {
    let app = build_app();
    let room_id = app.room_id("101").await;

    let (status, special) = app
        .send(
            "POST",
            "/api/v1/admin/special-dates",
            Some(json!({
                "date": "2024-12-31",
                "name": "New Year's Eve",
                "coefficient": 2.0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let special_id = special["id"].as_i64().unwrap();

    let (_, price) = app
        .send(
            "POST",
            "/api/v1/price/calculate",
            Some(json!({
                "room_id": room_id,
                "check_in": "2024-12-31",
                "check_out": "2025-01-01"
            })),
        )
        .await;
    assert_eq!(price["daily_breakdown"][0]["reason"], "New Year's Eve");
    assert!((price["total_price"].as_f64().unwrap() - 5000.0).abs() < 1e-6);

    let (_, listed) = app.send("GET", "/api/v1/admin/special-dates", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = app
        .send_raw(
            "DELETE",
            &format!("/api/v1/admin/special-dates/{special_id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .send(
            "DELETE",
            &format!("/api/v1/admin/special-dates/{special_id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SPECIAL_DATE_NOT_FOUND");
}

#[tokio::test]
async fn booking_overrides_and_statistics() {
    let app = build_app();
    let room_id = app.room_id("401").await;

    let (_, created) = app
        .send(
            "POST",
            "/api/v1/bookings",
            Some(json!({
                "room_id": room_id,
                "start_date": "2024-02-05",
                "end_date": "2024-02-06",
                "guest_info": { "name": "Ivan", "email": "ivan@example.com" }
            })),
        )
        .await;
    let booking_id = created["id"].as_i64().unwrap();

    // 管理员可以绕过状态机
    app.send("POST", &format!("/api/v1/bookings/{booking_id}/cancel"), None)
        .await;
    let (status, revived) = app
        .send(
            "PUT",
            &format!("/api/v1/admin/bookings/{booking_id}/status"),
            Some(json!({ "status": "confirmed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(revived["status"], "confirmed");

    let (status, confirmed) = app
        .send("GET", "/api/v1/admin/bookings?status=confirmed", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed.as_array().unwrap().len(), 1);
    assert_eq!(confirmed[0]["room"]["room_number"], "401");

    let (status, body) = app
        .send("GET", "/api/v1/admin/bookings?status=archived", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let (status, stats) = app.send("GET", "/api/v1/admin/statistics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_rooms"], 6);
    assert_eq!(stats["total_bookings"], 1);
    assert_eq!(stats["confirmed_bookings"], 1);
    assert_eq!(stats["rooms_by_type"]["standard"], 2);
    // 2024-02-05 周一淡季：5500 * 0.9
    assert!((stats["total_revenue"].as_f64().unwrap() - 4950.0).abs() < 1e-6);

    let (status, report) = app.send_raw("GET", "/api/v1/admin/status", None).await;
    assert_eq!(status, StatusCode::OK);
    let report = String::from_utf8(report).unwrap();
    assert!(report.starts_with("=== HOTEL STATUS ===\n"));
    assert!(report.contains("  Confirmed: 1\n"));
    assert!(report.contains("Total revenue: 4950.00 RUB"));
}
