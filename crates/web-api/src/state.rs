use std::sync::Arc;

use application::{AdminService, BookingService, NotificationService};

#[derive(Clone)]
pub struct AppState {
    pub booking_service: Arc<BookingService>,
    pub admin_service: Arc<AdminService>,
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    pub fn new(
        booking_service: Arc<BookingService>,
        admin_service: Arc<AdminService>,
        notification_service: Arc<NotificationService>,
    ) -> Self {
        Self {
            booking_service,
            admin_service,
            notification_service,
        }
    }
}
