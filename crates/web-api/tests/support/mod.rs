use std::sync::Arc;

use application::{
    AdminService, AdminServiceDependencies, BookingService, BookingServiceDependencies,
    HandlerRegistry, NotificationBroker, NotificationService, NotificationServiceDependencies,
    SystemClock,
};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use infrastructure::{Infrastructure, InMemoryStorage};
use serde_json::Value;
use tower::ServiceExt;
use web_api::{router, AppState};

pub struct TestApp {
    pub router: Router,
    pub notifications: Arc<NotificationService>,
}

/// 预置演示房间的内存仓储 + 真实服务，不启动通知 worker
pub fn build_app() -> TestApp {
    let infrastructure = Infrastructure::in_memory(&InMemoryStorage::seeded());

    let booking_service = Arc::new(BookingService::new(BookingServiceDependencies {
        room_repository: infrastructure.room_repository.clone(),
        booking_repository: infrastructure.booking_repository.clone(),
        special_date_repository: infrastructure.special_date_repository.clone(),
    }));
    let admin_service = Arc::new(AdminService::new(AdminServiceDependencies {
        room_repository: infrastructure.room_repository.clone(),
        booking_repository: infrastructure.booking_repository.clone(),
        special_date_repository: infrastructure.special_date_repository.clone(),
        clock: Arc::new(SystemClock),
    }));
    let notifications = Arc::new(NotificationService::new(NotificationServiceDependencies {
        broker: Arc::new(NotificationBroker::new()),
        notification_type_repository: infrastructure.notification_type_repository.clone(),
        handlers: HandlerRegistry::with_default_channels(),
    }));

    let state = AppState::new(booking_service, admin_service, notifications.clone());
    TestApp {
        router: router(state),
        notifications,
    }
}

impl TestApp {
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(method, uri, body).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn room_id(&self, room_number: &str) -> i64 {
        let (_, rooms) = self.send("GET", "/api/v1/rooms", None).await;
        rooms
            .as_array()
            .expect("room list")
            .iter()
            .find(|room| room["room_number"] == room_number)
            .and_then(|room| room["id"].as_i64())
            .expect("seeded room")
    }
}
