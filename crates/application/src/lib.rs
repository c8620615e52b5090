//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务：预订、管理后台和通知，
//! 以及进程内的通知代理、渠道处理器和后台 worker。

pub mod broker;
pub mod clock;
pub mod error;
pub mod handlers;
pub mod services;
pub mod worker;

pub use broker::{EventReceiver, NotificationBroker, Topic, DEFAULT_QUEUE_CAPACITY};
pub use clock::{Clock, SystemClock};
pub use error::{ApplicationError, NotificationError};
pub use handlers::{EmailHandler, HandlerRegistry, NotificationHandler, SmsHandler, ViberHandler};
pub use services::{
    AdminService, AdminServiceDependencies, BookingPolicy, BookingService,
    BookingServiceDependencies, CreateBookingRequest, HotelStatistics, NotificationService,
    NotificationServiceDependencies, PriceCalculationRequest, RoomWithAvailability,
    SearchRoomsRequest,
};
pub use worker::{run_dispatch_worker, spawn_channel_workers};
