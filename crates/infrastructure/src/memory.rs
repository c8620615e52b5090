//! 内存仓储
//!
//! 未配置数据库时使用，也用于服务层测试。所有仓储共享同一份表数据，
//! 唯一约束、外键约束和预订重叠约束与 Postgres 表结构保持一致，违反时返回 `Conflict`。

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use domain::{
    Booking, BookingRepository, BookingStatus, BookingWithRoom, DateRange, NewBooking,
    NewNotificationType, NewRoom, NewSpecialDate, NotificationType, NotificationTypeRepository,
    RepositoryError, RepositoryResult, Room, RoomFactory, RoomRepository, RoomStatus, RoomType,
    SpecialDate, SpecialDateRepository,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    rooms: BTreeMap<i64, Room>,
    bookings: BTreeMap<i64, Booking>,
    special_dates: BTreeMap<i64, SpecialDate>,
    notification_types: BTreeMap<i64, NotificationType>,
    last_room_id: i64,
    last_booking_id: i64,
    last_special_date_id: i64,
    last_notification_type_id: i64,
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

impl Tables {
    fn insert_room(&mut self, room: NewRoom) -> RepositoryResult<Room> {
        if self
            .rooms
            .values()
            .any(|existing| existing.room_number == room.room_number)
        {
            return Err(RepositoryError::Conflict);
        }

        let now = Utc::now();
        let room = Room {
            id: next_id(&mut self.last_room_id),
            room_number: room.room_number,
            room_type: room.room_type,
            base_price: room.base_price,
            capacity: room.capacity,
            status: room.status,
            description: room.description,
            created_at: now,
            updated_at: now,
        };
        self.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    fn insert_notification_type(
        &mut self,
        notification_type: NewNotificationType,
    ) -> RepositoryResult<NotificationType> {
        if self
            .notification_types
            .values()
            .any(|existing| existing.name == notification_type.name)
        {
            return Err(RepositoryError::Conflict);
        }

        let created = NotificationType {
            id: next_id(&mut self.last_notification_type_id),
            name: notification_type.name,
            message: notification_type.message,
        };
        self.notification_types.insert(created.id, created.clone());
        Ok(created)
    }

    /// 同一房间是否存在另一条与区间重叠的未取消预订
    fn has_active_overlap(
        &self,
        room_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        ignore_id: Option<i64>,
    ) -> bool {
        self.bookings.values().any(|booking| {
            Some(booking.id) != ignore_id
                && booking.room_id == room_id
                && booking.status.is_active()
                && booking.start_date < end
                && booking.end_date > start
        })
    }

    fn room_is_free(&self, room: &Room, range: DateRange) -> bool {
        room.status == RoomStatus::Available
            && !self.has_active_overlap(room.id, range.check_in(), range.check_out(), None)
    }

    fn available_rooms(&self, range: DateRange, filter: impl Fn(&Room) -> bool) -> Vec<Room> {
        let mut rooms: Vec<Room> = self
            .rooms
            .values()
            .filter(|room| filter(room) && self.room_is_free(room, range))
            .cloned()
            .collect();
        rooms.sort_by(|a, b| a.room_number.cmp(&b.room_number));
        rooms
    }

    fn with_room(&self, bookings: Vec<Booking>) -> Vec<BookingWithRoom> {
        bookings
            .into_iter()
            .filter_map(|booking| {
                let room = self.rooms.get(&booking.room_id)?.clone();
                Some(BookingWithRoom { booking, room })
            })
            .collect()
    }

    /// 按创建时间倒序，时间相同按 ID 倒序
    fn bookings_where(&self, predicate: impl Fn(&Booking) -> bool) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .values()
            .filter(|booking| predicate(booking))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        bookings
    }
}

/// 共享同一份内存表的仓储集合
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置演示房间和通知类型
    pub fn seeded() -> Self {
        let mut tables = Tables::default();
        let factory = RoomFactory::new();
        let demo_rooms = [
            (RoomType::Standard, "101"),
            (RoomType::Standard, "102"),
            (RoomType::Deluxe, "201"),
            (RoomType::Deluxe, "202"),
            (RoomType::Suite, "301"),
            (RoomType::Family, "401"),
        ];
        for (room_type, number) in demo_rooms {
            // 空表中房间号不会重复
            let _ = tables.insert_room(factory.create_room(room_type, number));
        }

        let demo_types = [
            ("booking_created", "Your booking has been created"),
            ("booking_confirmed", "Your booking has been confirmed"),
            ("booking_cancelled", "Your booking has been cancelled"),
        ];
        for (name, message) in demo_types {
            let _ = tables.insert_notification_type(NewNotificationType {
                name: name.to_string(),
                message: message.to_string(),
            });
        }

        tracing::debug!(rooms = tables.rooms.len(), "内存仓储已预置演示数据");
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    pub fn rooms(&self) -> InMemoryRoomRepository {
        InMemoryRoomRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn bookings(&self) -> InMemoryBookingRepository {
        InMemoryBookingRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn special_dates(&self) -> InMemorySpecialDateRepository {
        InMemorySpecialDateRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn notification_types(&self) -> InMemoryNotificationTypeRepository {
        InMemoryNotificationTypeRepository {
            tables: self.tables.clone(),
        }
    }
}

#[derive(Clone)]
pub struct InMemoryRoomRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<Room>> {
        let tables = self.tables.read().await;
        let mut rooms: Vec<Room> = tables.rooms.values().cloned().collect();
        rooms.sort_by(|a, b| a.room_number.cmp(&b.room_number));
        Ok(rooms)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Room>> {
        Ok(self.tables.read().await.rooms.get(&id).cloned())
    }

    async fn get_by_number(&self, room_number: &str) -> RepositoryResult<Option<Room>> {
        Ok(self
            .tables
            .read()
            .await
            .rooms
            .values()
            .find(|room| room.room_number == room_number)
            .cloned())
    }

    async fn get_available(&self, range: DateRange) -> RepositoryResult<Vec<Room>> {
        Ok(self.tables.read().await.available_rooms(range, |_| true))
    }

    async fn get_available_by_type(
        &self,
        room_type: RoomType,
        range: DateRange,
    ) -> RepositoryResult<Vec<Room>> {
        Ok(self
            .tables
            .read()
            .await
            .available_rooms(range, |room| room.room_type == room_type))
    }

    async fn get_available_by_capacity(
        &self,
        min_capacity: i32,
        range: DateRange,
    ) -> RepositoryResult<Vec<Room>> {
        Ok(self
            .tables
            .read()
            .await
            .available_rooms(range, |room| room.capacity >= min_capacity))
    }

    async fn create(&self, room: NewRoom) -> RepositoryResult<Room> {
        self.tables.write().await.insert_room(room)
    }

    async fn update(&self, room: Room) -> RepositoryResult<Room> {
        let mut tables = self.tables.write().await;
        if !tables.rooms.contains_key(&room.id) {
            return Err(RepositoryError::NotFound);
        }
        if tables
            .rooms
            .values()
            .any(|other| other.id != room.id && other.room_number == room.room_number)
        {
            return Err(RepositoryError::Conflict);
        }

        let updated = Room {
            updated_at: Utc::now(),
            ..room
        };
        tables.rooms.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.rooms.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if tables.bookings.values().any(|booking| booking.room_id == id) {
            return Err(RepositoryError::Conflict);
        }
        tables.rooms.remove(&id);
        Ok(())
    }

    async fn update_status(&self, id: i64, status: RoomStatus) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        let room = tables.rooms.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        room.status = status;
        room.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Clone)]
pub struct InMemoryBookingRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<Booking>> {
        Ok(self.tables.read().await.bookings_where(|_| true))
    }

    async fn get_all_with_room(&self) -> RepositoryResult<Vec<BookingWithRoom>> {
        let tables = self.tables.read().await;
        let bookings = tables.bookings_where(|_| true);
        Ok(tables.with_room(bookings))
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Booking>> {
        Ok(self.tables.read().await.bookings.get(&id).cloned())
    }

    async fn get_by_room_id(&self, room_id: i64) -> RepositoryResult<Vec<Booking>> {
        Ok(self
            .tables
            .read()
            .await
            .bookings_where(|booking| booking.room_id == room_id))
    }

    async fn get_by_status(&self, status: BookingStatus) -> RepositoryResult<Vec<Booking>> {
        Ok(self
            .tables
            .read()
            .await
            .bookings_where(|booking| booking.status == status))
    }

    async fn get_by_status_with_room(
        &self,
        status: BookingStatus,
    ) -> RepositoryResult<Vec<BookingWithRoom>> {
        let tables = self.tables.read().await;
        let bookings = tables.bookings_where(|booking| booking.status == status);
        Ok(tables.with_room(bookings))
    }

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Vec<Booking>> {
        Ok(self
            .tables
            .read()
            .await
            .bookings_where(|booking| booking.guest_info.email == email))
    }

    async fn get_active_for_room(
        &self,
        room_id: i64,
        range: DateRange,
    ) -> RepositoryResult<Vec<Booking>> {
        let mut bookings = self
            .tables
            .read()
            .await
            .bookings_where(|booking| booking.room_id == room_id && booking.conflicts_with(&range));
        bookings.sort_by_key(|booking| booking.start_date);
        Ok(bookings)
    }

    async fn create(&self, booking: NewBooking) -> RepositoryResult<Booking> {
        let mut tables = self.tables.write().await;
        if !tables.rooms.contains_key(&booking.room_id) {
            return Err(RepositoryError::Conflict);
        }

        let (start, end) = (booking.range.check_in(), booking.range.check_out());
        if booking.status.is_active() && tables.has_active_overlap(booking.room_id, start, end, None)
        {
            return Err(RepositoryError::Conflict);
        }

        let now = Utc::now();
        let created = Booking {
            id: next_id(&mut tables.last_booking_id),
            start_date: start,
            end_date: end,
            room_id: booking.room_id,
            guest_info: booking.guest_info,
            price: booking.price,
            status: booking.status,
            created_at: now,
            updated_at: now,
        };
        tables.bookings.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, booking: Booking) -> RepositoryResult<Booking> {
        let mut tables = self.tables.write().await;
        if !tables.bookings.contains_key(&booking.id) {
            return Err(RepositoryError::NotFound);
        }
        if booking.start_date >= booking.end_date || !tables.rooms.contains_key(&booking.room_id) {
            return Err(RepositoryError::Conflict);
        }
        if booking.status.is_active()
            && tables.has_active_overlap(
                booking.room_id,
                booking.start_date,
                booking.end_date,
                Some(booking.id),
            )
        {
            return Err(RepositoryError::Conflict);
        }

        let updated = Booking {
            updated_at: Utc::now(),
            ..booking
        };
        tables.bookings.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn update_status(&self, id: i64, status: BookingStatus) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        let current = tables
            .bookings
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;

        if status.is_active()
            && !current.status.is_active()
            && tables.has_active_overlap(current.room_id, current.start_date, current.end_date, Some(id))
        {
            return Err(RepositoryError::Conflict);
        }

        if let Some(booking) = tables.bookings.get_mut(&id) {
            booking.status = status;
            booking.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        self.tables
            .write()
            .await
            .bookings
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn is_room_available(&self, room_id: i64, range: DateRange) -> RepositoryResult<bool> {
        Ok(!self.tables.read().await.has_active_overlap(
            room_id,
            range.check_in(),
            range.check_out(),
            None,
        ))
    }
}

#[derive(Clone)]
pub struct InMemorySpecialDateRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl SpecialDateRepository for InMemorySpecialDateRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<SpecialDate>> {
        let tables = self.tables.read().await;
        let mut dates: Vec<SpecialDate> = tables.special_dates.values().cloned().collect();
        dates.sort_by_key(|special| special.date);
        Ok(dates)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<SpecialDate>> {
        Ok(self.tables.read().await.special_dates.get(&id).cloned())
    }

    async fn get_by_date(&self, date: NaiveDate) -> RepositoryResult<Option<SpecialDate>> {
        Ok(self
            .tables
            .read()
            .await
            .special_dates
            .values()
            .find(|special| special.date == date)
            .cloned())
    }

    async fn get_by_date_range(&self, range: DateRange) -> RepositoryResult<Vec<SpecialDate>> {
        let tables = self.tables.read().await;
        let mut dates: Vec<SpecialDate> = tables
            .special_dates
            .values()
            .filter(|special| range.contains(special.date))
            .cloned()
            .collect();
        dates.sort_by_key(|special| special.date);
        Ok(dates)
    }

    async fn create(&self, special_date: NewSpecialDate) -> RepositoryResult<SpecialDate> {
        let mut tables = self.tables.write().await;
        if tables
            .special_dates
            .values()
            .any(|existing| existing.date == special_date.date)
        {
            return Err(RepositoryError::Conflict);
        }

        let created = SpecialDate {
            id: next_id(&mut tables.last_special_date_id),
            date: special_date.date,
            name: special_date.name,
            coefficient: special_date.coefficient,
            created_at: Utc::now(),
        };
        tables.special_dates.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, special_date: SpecialDate) -> RepositoryResult<SpecialDate> {
        let mut tables = self.tables.write().await;
        if !tables.special_dates.contains_key(&special_date.id) {
            return Err(RepositoryError::NotFound);
        }
        if tables
            .special_dates
            .values()
            .any(|other| other.id != special_date.id && other.date == special_date.date)
        {
            return Err(RepositoryError::Conflict);
        }
        tables
            .special_dates
            .insert(special_date.id, special_date.clone());
        Ok(special_date)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        self.tables
            .write()
            .await
            .special_dates
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Clone)]
pub struct InMemoryNotificationTypeRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl NotificationTypeRepository for InMemoryNotificationTypeRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<NotificationType>> {
        Ok(self
            .tables
            .read()
            .await
            .notification_types
            .values()
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<NotificationType>> {
        Ok(self.tables.read().await.notification_types.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> RepositoryResult<Option<NotificationType>> {
        Ok(self
            .tables
            .read()
            .await
            .notification_types
            .values()
            .find(|notification_type| notification_type.name == name)
            .cloned())
    }

    async fn create(
        &self,
        notification_type: NewNotificationType,
    ) -> RepositoryResult<NotificationType> {
        self.tables
            .write()
            .await
            .insert_notification_type(notification_type)
    }

    async fn update(
        &self,
        notification_type: NotificationType,
    ) -> RepositoryResult<NotificationType> {
        let mut tables = self.tables.write().await;
        if !tables
            .notification_types
            .contains_key(&notification_type.id)
        {
            return Err(RepositoryError::NotFound);
        }
        if tables.notification_types.values().any(|other| {
            other.id != notification_type.id && other.name == notification_type.name
        }) {
            return Err(RepositoryError::Conflict);
        }
        tables
            .notification_types
            .insert(notification_type.id, notification_type.clone());
        Ok(notification_type)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        self.tables
            .write()
            .await
            .notification_types
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
