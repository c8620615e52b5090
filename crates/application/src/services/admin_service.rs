//! 管理后台用例
//!
//! 房间与特殊日期的维护、预订状态的强制修改，以及酒店统计。
//! 管理员修改预订状态不经过状态机。

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::sync::Arc;

use domain::{
    Booking, BookingRepository, BookingStatus, BookingWithRoom, DomainError, NewRoom,
    NewSpecialDate, RepositoryError, Room, RoomFactory, RoomRepository, RoomStatus, RoomType,
    SpecialDate, SpecialDateRepository,
};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::ApplicationError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotelStatistics {
    pub total_rooms: usize,
    pub available_rooms: usize,
    pub occupied_rooms: usize,
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub confirmed_bookings: usize,
    pub cancelled_bookings: usize,
    pub rooms_by_type: BTreeMap<RoomType, usize>,
    /// 已确认预订的总价之和
    pub total_revenue: f64,
}

pub struct AdminServiceDependencies {
    pub room_repository: Arc<dyn RoomRepository>,
    pub booking_repository: Arc<dyn BookingRepository>,
    pub special_date_repository: Arc<dyn SpecialDateRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct AdminService {
    deps: AdminServiceDependencies,
    room_factory: RoomFactory,
}

impl AdminService {
    pub fn new(deps: AdminServiceDependencies) -> Self {
        Self {
            deps,
            room_factory: RoomFactory::new(),
        }
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>, ApplicationError> {
        Ok(self.deps.room_repository.get_all().await?)
    }

    /// 房间号重复时返回仓储冲突错误
    pub async fn create_room(&self, room: NewRoom) -> Result<Room, ApplicationError> {
        room.validate()?;
        let room = self.deps.room_repository.create(room).await?;
        tracing::info!(room_id = room.id, room_number = %room.room_number, "房间已创建");
        Ok(room)
    }

    /// 按房型预设的价格和容量创建房间
    pub async fn create_room_from_preset(
        &self,
        room_type: RoomType,
        room_number: &str,
    ) -> Result<Room, ApplicationError> {
        let room = self.room_factory.create_room(room_type, room_number);
        self.create_room(room).await
    }

    /// 用新数据整体替换房间的可编辑字段
    pub async fn update_room(&self, id: i64, changes: NewRoom) -> Result<Room, ApplicationError> {
        changes.validate()?;
        let mut room = self
            .deps
            .room_repository
            .get_by_id(id)
            .await?
            .ok_or(DomainError::RoomNotFound)?;

        room.room_number = changes.room_number;
        room.room_type = changes.room_type;
        room.base_price = changes.base_price;
        room.capacity = changes.capacity;
        room.status = changes.status;
        room.description = changes.description;

        let room = self
            .deps
            .room_repository
            .update(room)
            .await
            .map_err(not_found_as(DomainError::RoomNotFound))?;
        tracing::info!(room_id = room.id, "房间已更新");
        Ok(room)
    }

    /// 仍有关联预订的房间不能删除
    pub async fn delete_room(&self, id: i64) -> Result<(), ApplicationError> {
        self.deps
            .room_repository
            .delete(id)
            .await
            .map_err(not_found_as(DomainError::RoomNotFound))?;
        tracing::info!(room_id = id, "房间已删除");
        Ok(())
    }

    pub async fn update_room_status(
        &self,
        id: i64,
        status: RoomStatus,
    ) -> Result<Room, ApplicationError> {
        self.deps
            .room_repository
            .update_status(id, status)
            .await
            .map_err(not_found_as(DomainError::RoomNotFound))?;
        tracing::info!(room_id = id, %status, "房间状态已更新");

        Ok(self
            .deps
            .room_repository
            .get_by_id(id)
            .await?
            .ok_or(DomainError::RoomNotFound)?)
    }

    pub async fn list_special_dates(&self) -> Result<Vec<SpecialDate>, ApplicationError> {
        Ok(self.deps.special_date_repository.get_all().await?)
    }

    pub async fn create_special_date(
        &self,
        special_date: NewSpecialDate,
    ) -> Result<SpecialDate, ApplicationError> {
        special_date.validate()?;
        let created = self.deps.special_date_repository.create(special_date).await?;
        tracing::info!(
            date = %created.date,
            name = %created.name,
            coefficient = created.coefficient,
            "特殊日期已创建"
        );
        Ok(created)
    }

    pub async fn delete_special_date(&self, id: i64) -> Result<(), ApplicationError> {
        self.deps
            .special_date_repository
            .delete(id)
            .await
            .map_err(not_found_as(DomainError::SpecialDateNotFound))?;
        Ok(())
    }

    /// 全部预订（含房间），可按状态过滤
    pub async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<BookingWithRoom>, ApplicationError> {
        let bookings = match status {
            Some(status) => {
                self.deps
                    .booking_repository
                    .get_by_status_with_room(status)
                    .await?
            }
            None => self.deps.booking_repository.get_all_with_room().await?,
        };
        Ok(bookings)
    }

    /// 强制修改预订状态，不检查状态迁移是否合法
    pub async fn update_booking_status(
        &self,
        id: i64,
        status: BookingStatus,
    ) -> Result<Booking, ApplicationError> {
        self.deps
            .booking_repository
            .update_status(id, status)
            .await
            .map_err(not_found_as(DomainError::BookingNotFound))?;
        tracing::info!(booking_id = id, %status, "管理员修改了预订状态");

        Ok(self
            .deps
            .booking_repository
            .get_by_id(id)
            .await?
            .ok_or(DomainError::BookingNotFound)?)
    }

    /// 非可用状态的房间与今天有已确认预订在住的房间都算已占用，每间房只计一次
    pub async fn statistics(&self) -> Result<HotelStatistics, ApplicationError> {
        let rooms = self.deps.room_repository.get_all().await?;
        let bookings = self.deps.booking_repository.get_all().await?;
        let today = self.deps.clock.now().date_naive();

        let mut stats = HotelStatistics {
            total_rooms: rooms.len(),
            total_bookings: bookings.len(),
            ..HotelStatistics::default()
        };

        let mut occupied: HashSet<i64> = HashSet::new();
        for room in &rooms {
            *stats.rooms_by_type.entry(room.room_type).or_default() += 1;
            if room.status != RoomStatus::Available {
                occupied.insert(room.id);
            }
        }

        for booking in &bookings {
            match booking.status {
                BookingStatus::Pending => stats.pending_bookings += 1,
                BookingStatus::Cancelled => stats.cancelled_bookings += 1,
                BookingStatus::Confirmed => {
                    stats.confirmed_bookings += 1;
                    stats.total_revenue += booking.price;
                    if booking.covers(today) && rooms.iter().any(|room| room.id == booking.room_id) {
                        occupied.insert(booking.room_id);
                    }
                }
            }
        }

        stats.occupied_rooms = occupied.len();
        stats.available_rooms = stats.total_rooms - stats.occupied_rooms;
        Ok(stats)
    }

    pub async fn hotel_status_report(&self) -> Result<String, ApplicationError> {
        let stats = self.statistics().await?;
        Ok(render_status_report(&stats))
    }
}

fn render_status_report(stats: &HotelStatistics) -> String {
    let mut report = String::from("=== HOTEL STATUS ===\n");
    // 写入 String 不会失败
    let _ = writeln!(report, "Total rooms: {}", stats.total_rooms);
    let _ = writeln!(report, "Available: {}", stats.available_rooms);
    let _ = writeln!(report, "Occupied: {}", stats.occupied_rooms);
    let _ = writeln!(report, "\nBookings:");
    let _ = writeln!(report, "  Pending: {}", stats.pending_bookings);
    let _ = writeln!(report, "  Confirmed: {}", stats.confirmed_bookings);
    let _ = writeln!(report, "  Cancelled: {}", stats.cancelled_bookings);
    let _ = writeln!(report, "\nRooms by type:");
    for (room_type, count) in &stats.rooms_by_type {
        let _ = writeln!(report, "  {room_type}: {count}");
    }
    let _ = writeln!(report, "\nTotal revenue: {:.2} RUB", stats.total_revenue);
    report
}

fn not_found_as(err: DomainError) -> impl FnOnce(RepositoryError) -> ApplicationError {
    move |repository_err| match repository_err {
        RepositoryError::NotFound => err.into(),
        other => other.into(),
    }
}
