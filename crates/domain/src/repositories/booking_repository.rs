//! 预订Repository接口定义

use async_trait::async_trait;

use crate::entities::booking::{Booking, BookingStatus, BookingWithRoom, NewBooking};
use crate::errors::RepositoryResult;
use crate::value_objects::DateRange;

/// 预订Repository接口
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// 获取全部预订，按创建时间倒序
    async fn get_all(&self) -> RepositoryResult<Vec<Booking>>;

    async fn get_all_with_room(&self) -> RepositoryResult<Vec<BookingWithRoom>>;

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Booking>>;

    async fn get_by_room_id(&self, room_id: i64) -> RepositoryResult<Vec<Booking>>;

    async fn get_by_status(&self, status: BookingStatus) -> RepositoryResult<Vec<Booking>>;

    async fn get_by_status_with_room(
        &self,
        status: BookingStatus,
    ) -> RepositoryResult<Vec<BookingWithRoom>>;

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Vec<Booking>>;

    /// 房间在区间内的未取消预订
    async fn get_active_for_room(
        &self,
        room_id: i64,
        range: DateRange,
    ) -> RepositoryResult<Vec<Booking>>;

    /// 与已有未取消预订重叠时可能返回 `RepositoryError::Conflict`
    async fn create(&self, booking: NewBooking) -> RepositoryResult<Booking>;

    async fn update(&self, booking: Booking) -> RepositoryResult<Booking>;

    async fn update_status(&self, id: i64, status: BookingStatus) -> RepositoryResult<()>;

    async fn delete(&self, id: i64) -> RepositoryResult<()>;

    /// 区间内没有重叠的未取消预订
    async fn is_room_available(&self, room_id: i64, range: DateRange) -> RepositoryResult<bool>;
}
