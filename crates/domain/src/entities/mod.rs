//! 领域实体定义
//!
//! 包含系统的核心实体：房间、预订、特殊日期、通知。

pub mod booking;
pub mod notification;
pub mod room;
pub mod special_date;

// 重新导出核心实体
pub use booking::{Booking, BookingResponse, BookingStatus, BookingWithRoom, GuestInfo, NewBooking};
pub use notification::{
    EventType, NewNotificationType, NotificationChannel, NotificationEvent, NotificationResponse,
    NotificationType,
};
pub use room::{NewRoom, Room, RoomStatus, RoomType};
pub use special_date::{NewSpecialDate, SpecialDate};
