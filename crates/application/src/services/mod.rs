mod admin_service;
mod booking_service;
mod notification_service;


pub use admin_service::{AdminService, AdminServiceDependencies, HotelStatistics};
pub use booking_service::{
    BookingPolicy, BookingService, BookingServiceDependencies, CreateBookingRequest,
    PriceCalculationRequest, RoomWithAvailability, SearchRoomsRequest,
};
pub use notification_service::{NotificationService, NotificationServiceDependencies};
