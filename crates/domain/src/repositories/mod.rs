//! Repository接口定义
//!
//! 定义数据访问层的抽象接口，内层定义接口，外层实现接口。
//! 按 ID 查找时用 `Ok(None)` 表示记录不存在，而不是返回错误。

pub mod booking_repository;
pub mod notification_type_repository;
pub mod room_repository;
pub mod special_date_repository;

// 重新导出所有Repository特征
pub use booking_repository::BookingRepository;
pub use notification_type_repository::NotificationTypeRepository;
pub use room_repository::RoomRepository;
pub use special_date_repository::SpecialDateRepository;

#[cfg(feature = "testing")]
pub use booking_repository::MockBookingRepository;
#[cfg(feature = "testing")]
pub use notification_type_repository::MockNotificationTypeRepository;
#[cfg(feature = "testing")]
pub use room_repository::MockRoomRepository;
#[cfg(feature = "testing")]
pub use special_date_repository::MockSpecialDateRepository;
