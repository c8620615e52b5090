//! 房间Repository接口定义

use async_trait::async_trait;

use crate::entities::room::{NewRoom, Room, RoomStatus, RoomType};
use crate::errors::RepositoryResult;
use crate::value_objects::DateRange;

/// 房间Repository接口
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 获取全部房间，按房间号排序
    async fn get_all(&self) -> RepositoryResult<Vec<Room>>;

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Room>>;

    async fn get_by_number(&self, room_number: &str) -> RepositoryResult<Option<Room>>;

    /// 状态为 available 且区间内没有未取消预订的房间
    async fn get_available(&self, range: DateRange) -> RepositoryResult<Vec<Room>>;

    async fn get_available_by_type(
        &self,
        room_type: RoomType,
        range: DateRange,
    ) -> RepositoryResult<Vec<Room>>;

    /// 容量不小于 `min_capacity` 的可用房间
    async fn get_available_by_capacity(
        &self,
        min_capacity: i32,
        range: DateRange,
    ) -> RepositoryResult<Vec<Room>>;

    /// 房间号重复时返回 `RepositoryError::Conflict`
    async fn create(&self, room: NewRoom) -> RepositoryResult<Room>;

    async fn update(&self, room: Room) -> RepositoryResult<Room>;

    /// 仍有关联预订时返回 `RepositoryError::Conflict`
    async fn delete(&self, id: i64) -> RepositoryResult<()>;

    async fn update_status(&self, id: i64, status: RoomStatus) -> RepositoryResult<()>;
}
