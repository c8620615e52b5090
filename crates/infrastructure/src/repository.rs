use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use domain::{
    Booking, BookingRepository, BookingStatus, BookingWithRoom, DateRange, GuestInfo, NewBooking,
    NewNotificationType, NewRoom, NewSpecialDate, NotificationType, NotificationTypeRepository,
    RepositoryError, RepositoryResult, Room, RoomRepository, RoomStatus, RoomType, SpecialDate,
    SpecialDateRepository,
};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

/// 唯一约束、排他约束、外键约束冲突统一映射为 `Conflict`
fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if matches!(db_err.code().as_deref(), Some("23505" | "23P01" | "23503")) {
            return RepositoryError::Conflict;
        }
    }
    RepositoryError::storage(err.to_string())
}

fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}

fn affected_one(rows_affected: u64) -> RepositoryResult<()> {
    if rows_affected == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

#[derive(Debug, FromRow)]
struct RoomRecord {
    id: i64,
    room_number: String,
    room_type: String,
    base_price: f64,
    capacity: i32,
    status: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RoomRecord> for Room {
    type Error = RepositoryError;

    fn try_from(value: RoomRecord) -> Result<Self, Self::Error> {
        let room_type: RoomType = value
            .room_type
            .parse()
            .map_err(|err: domain::DomainError| invalid_data(err.to_string()))?;
        let status: RoomStatus = value
            .status
            .parse()
            .map_err(|err: domain::DomainError| invalid_data(err.to_string()))?;

        Ok(Room {
            id: value.id,
            room_number: value.room_number,
            room_type,
            base_price: value.base_price,
            capacity: value.capacity,
            status,
            description: value.description,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct BookingRecord {
    id: i64,
    room_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    guest_name: String,
    guest_email: String,
    guest_phone: String,
    price: f64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRecord> for Booking {
    type Error = RepositoryError;

    fn try_from(value: BookingRecord) -> Result<Self, Self::Error> {
        let status: BookingStatus = value
            .status
            .parse()
            .map_err(|err: domain::DomainError| invalid_data(err.to_string()))?;

        Ok(Booking {
            id: value.id,
            start_date: value.start_date,
            end_date: value.end_date,
            room_id: value.room_id,
            guest_info: GuestInfo {
                name: value.guest_name,
                email: value.guest_email,
                phone: value.guest_phone,
            },
            price: value.price,
            status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

/// 预订与房间联表查询的一行，房间列带前缀避免与预订列重名
#[derive(Debug, FromRow)]
struct BookingWithRoomRecord {
    #[sqlx(flatten)]
    booking: BookingRecord,
    room_number: String,
    room_type: String,
    base_price: f64,
    capacity: i32,
    room_status: String,
    room_description: String,
    room_created_at: DateTime<Utc>,
    room_updated_at: DateTime<Utc>,
}

impl TryFrom<BookingWithRoomRecord> for BookingWithRoom {
    type Error = RepositoryError;

    fn try_from(value: BookingWithRoomRecord) -> Result<Self, Self::Error> {
        let room = Room::try_from(RoomRecord {
            id: value.booking.room_id,
            room_number: value.room_number,
            room_type: value.room_type,
            base_price: value.base_price,
            capacity: value.capacity,
            status: value.room_status,
            description: value.room_description,
            created_at: value.room_created_at,
            updated_at: value.room_updated_at,
        })?;
        let booking = Booking::try_from(value.booking)?;

        Ok(BookingWithRoom { booking, room })
    }
}

#[derive(Debug, FromRow)]
struct SpecialDateRecord {
    id: i64,
    date: NaiveDate,
    name: String,
    coefficient: f64,
    created_at: DateTime<Utc>,
}

impl From<SpecialDateRecord> for SpecialDate {
    fn from(value: SpecialDateRecord) -> Self {
        SpecialDate {
            id: value.id,
            date: value.date,
            name: value.name,
            coefficient: value.coefficient,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct NotificationTypeRecord {
    id: i64,
    name: String,
    message: String,
}

impl From<NotificationTypeRecord> for NotificationType {
    fn from(value: NotificationTypeRecord) -> Self {
        NotificationType {
            id: value.id,
            name: value.name,
            message: value.message,
        }
    }
}

fn into_rooms(records: Vec<RoomRecord>) -> RepositoryResult<Vec<Room>> {
    records.into_iter().map(Room::try_from).collect()
}

fn into_bookings(records: Vec<BookingRecord>) -> RepositoryResult<Vec<Booking>> {
    records.into_iter().map(Booking::try_from).collect()
}

fn into_bookings_with_room(
    records: Vec<BookingWithRoomRecord>,
) -> RepositoryResult<Vec<BookingWithRoom>> {
    records.into_iter().map(BookingWithRoom::try_from).collect()
}

#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<Room>> {
        let records = sqlx::query_as::<_, RoomRecord>(
            r#"
            SELECT id, room_number, room_type, base_price, capacity, status, description,
                   created_at, updated_at
            FROM rooms
            ORDER BY room_number
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        into_rooms(records)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Room>> {
        let record = sqlx::query_as::<_, RoomRecord>(
            r#"
            SELECT id, room_number, room_type, base_price, capacity, status, description,
                   created_at, updated_at
            FROM rooms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(Room::try_from).transpose()
    }

    async fn get_by_number(&self, room_number: &str) -> RepositoryResult<Option<Room>> {
        let record = sqlx::query_as::<_, RoomRecord>(
            r#"
            SELECT id, room_number, room_type, base_price, capacity, status, description,
                   created_at, updated_at
            FROM rooms
            WHERE room_number = $1
            "#,
        )
        .bind(room_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(Room::try_from).transpose()
    }

    async fn get_available(&self, range: DateRange) -> RepositoryResult<Vec<Room>> {
        let records = sqlx::query_as::<_, RoomRecord>(
            r#"
            SELECT r.id, r.room_number, r.room_type, r.base_price, r.capacity, r.status,
                   r.description, r.created_at, r.updated_at
            FROM rooms r
            WHERE r.status = 'available'
              AND NOT EXISTS (
                  SELECT 1 FROM bookings b
                  WHERE b.room_id = r.id
                    AND b.status <> 'cancelled'
                    AND b.start_date < $2
                    AND b.end_date > $1
              )
            ORDER BY r.room_number
            "#,
        )
        .bind(range.check_in())
        .bind(range.check_out())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        into_rooms(records)
    }

    async fn get_available_by_type(
        &self,
        room_type: RoomType,
        range: DateRange,
    ) -> RepositoryResult<Vec<Room>> {
        let records = sqlx::query_as::<_, RoomRecord>(
            r#"
            SELECT r.id, r.room_number, r.room_type, r.base_price, r.capacity, r.status,
                   r.description, r.created_at, r.updated_at
            FROM rooms r
            WHERE r.status = 'available'
              AND r.room_type = $3
              AND NOT EXISTS (
                  SELECT 1 FROM bookings b
                  WHERE b.room_id = r.id
                    AND b.status <> 'cancelled'
                    AND b.start_date < $2
                    AND b.end_date > $1
              )
            ORDER BY r.room_number
            "#,
        )
        .bind(range.check_in())
        .bind(range.check_out())
        .bind(room_type.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        into_rooms(records)
    }

    async fn get_available_by_capacity(
        &self,
        min_capacity: i32,
        range: DateRange,
    ) -> RepositoryResult<Vec<Room>> {
        let records = sqlx::query_as::<_, RoomRecord>(
            r#"
            SELECT r.id, r.room_number, r.room_type, r.base_price, r.capacity, r.status,
                   r.description, r.created_at, r.updated_at
            FROM rooms r
            WHERE r.status = 'available'
              AND r.capacity >= $3
              AND NOT EXISTS (
                  SELECT 1 FROM bookings b
                  WHERE b.room_id = r.id
                    AND b.status <> 'cancelled'
                    AND b.start_date < $2
                    AND b.end_date > $1
              )
            ORDER BY r.room_number
            "#,
        )
        .bind(range.check_in())
        .bind(range.check_out())
        .bind(min_capacity)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        into_rooms(records)
    }

    async fn create(&self, room: NewRoom) -> RepositoryResult<Room> {
        let record = sqlx::query_as::<_, RoomRecord>(
            r#"
            INSERT INTO rooms (room_number, room_type, base_price, capacity, status, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, room_number, room_type, base_price, capacity, status, description,
                      created_at, updated_at
            "#,
        )
        .bind(&room.room_number)
        .bind(room.room_type.as_str())
        .bind(room.base_price)
        .bind(room.capacity)
        .bind(room.status.as_str())
        .bind(&room.description)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Room::try_from(record)
    }

    async fn update(&self, room: Room) -> RepositoryResult<Room> {
        let record = sqlx::query_as::<_, RoomRecord>(
            r#"
            UPDATE rooms
            SET room_number = $2, room_type = $3, base_price = $4, capacity = $5,
                status = $6, description = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, room_number, room_type, base_price, capacity, status, description,
                      created_at, updated_at
            "#,
        )
        .bind(room.id)
        .bind(&room.room_number)
        .bind(room.room_type.as_str())
        .bind(room.base_price)
        .bind(room.capacity)
        .bind(room.status.as_str())
        .bind(&room.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?
        .ok_or(RepositoryError::NotFound)?;

        Room::try_from(record)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        affected_one(result.rows_affected())
    }

    async fn update_status(&self, id: i64, status: RoomStatus) -> RepositoryResult<()> {
        let result =
            sqlx::query("UPDATE rooms SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status.as_str())
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        affected_one(result.rows_affected())
    }
}

#[derive(Clone)]
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<Booking>> {
        let records = sqlx::query_as::<_, BookingRecord>(
            r#"
            SELECT id, room_id, start_date, end_date, guest_name, guest_email, guest_phone,
                   price, status, created_at, updated_at
            FROM bookings
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        into_bookings(records)
    }

    async fn get_all_with_room(&self) -> RepositoryResult<Vec<BookingWithRoom>> {
        let records = sqlx::query_as::<_, BookingWithRoomRecord>(
            r#"
            SELECT b.id, b.room_id, b.start_date, b.end_date, b.guest_name, b.guest_email,
                   b.guest_phone, b.price, b.status, b.created_at, b.updated_at,
                   r.room_number, r.room_type, r.base_price, r.capacity,
                   r.status AS room_status, r.description AS room_description,
                   r.created_at AS room_created_at, r.updated_at AS room_updated_at
            FROM bookings b
            JOIN rooms r ON r.id = b.room_id
            ORDER BY b.created_at DESC, b.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        into_bookings_with_room(records)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Booking>> {
        let record = sqlx::query_as::<_, BookingRecord>(
            r#"
            SELECT id, room_id, start_date, end_date, guest_name, guest_email, guest_phone,
                   price, status, created_at, updated_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(Booking::try_from).transpose()
    }

    async fn get_by_room_id(&self, room_id: i64) -> RepositoryResult<Vec<Booking>> {
        let records = sqlx::query_as::<_, BookingRecord>(
            r#"
            SELECT id, room_id, start_date, end_date, guest_name, guest_email, guest_phone,
                   price, status, created_at, updated_at
            FROM bookings
            WHERE room_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        into_bookings(records)
    }

    async fn get_by_status(&self, status: BookingStatus) -> RepositoryResult<Vec<Booking>> {
        let records = sqlx::query_as::<_, BookingRecord>(
            r#"
            SELECT id, room_id, start_date, end_date, guest_name, guest_email, guest_phone,
                   price, status, created_at, updated_at
            FROM bookings
            WHERE status = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        into_bookings(records)
    }

    async fn get_by_status_with_room(
        &self,
        status: BookingStatus,
    ) -> RepositoryResult<Vec<BookingWithRoom>> {
        let records = sqlx::query_as::<_, BookingWithRoomRecord>(
            r#"
            SELECT b.id, b.room_id, b.start_date, b.end_date, b.guest_name, b.guest_email,
                   b.guest_phone, b.price, b.status, b.created_at, b.updated_at,
                   r.room_number, r.room_type, r.base_price, r.capacity,
                   r.status AS room_status, r.description AS room_description,
                   r.created_at AS room_created_at, r.updated_at AS room_updated_at
            FROM bookings b
            JOIN rooms r ON r.id = b.room_id
            WHERE b.status = $1
            ORDER BY b.created_at DESC, b.id DESC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        into_bookings_with_room(records)
    }

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Vec<Booking>> {
        let records = sqlx::query_as::<_, BookingRecord>(
            r#"
            SELECT id, room_id, start_date, end_date, guest_name, guest_email, guest_phone,
                   price, status, created_at, updated_at
            FROM bookings
            WHERE guest_email = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        into_bookings(records)
    }

    async fn get_active_for_room(
        &self,
        room_id: i64,
        range: DateRange,
    ) -> RepositoryResult<Vec<Booking>> {
        let records = sqlx::query_as::<_, BookingRecord>(
            r#"
            SELECT id, room_id, start_date, end_date, guest_name, guest_email, guest_phone,
                   price, status, created_at, updated_at
            FROM bookings
            WHERE room_id = $1
              AND status <> 'cancelled'
              AND start_date < $3
              AND end_date > $2
            ORDER BY start_date
            "#,
        )
        .bind(room_id)
        .bind(range.check_in())
        .bind(range.check_out())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        into_bookings(records)
    }

    async fn create(&self, booking: NewBooking) -> RepositoryResult<Booking> {
        let record = sqlx::query_as::<_, BookingRecord>(
            r#"
            INSERT INTO bookings
                (room_id, start_date, end_date, guest_name, guest_email, guest_phone, price, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, room_id, start_date, end_date, guest_name, guest_email, guest_phone,
                      price, status, created_at, updated_at
            "#,
        )
        .bind(booking.room_id)
        .bind(booking.range.check_in())
        .bind(booking.range.check_out())
        .bind(&booking.guest_info.name)
        .bind(&booking.guest_info.email)
        .bind(&booking.guest_info.phone)
        .bind(booking.price)
        .bind(booking.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Booking::try_from(record)
    }

    async fn update(&self, booking: Booking) -> RepositoryResult<Booking> {
        let record = sqlx::query_as::<_, BookingRecord>(
            r#"
            UPDATE bookings
            SET room_id = $2, start_date = $3, end_date = $4, guest_name = $5,
                guest_email = $6, guest_phone = $7, price = $8, status = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, room_id, start_date, end_date, guest_name, guest_email, guest_phone,
                      price, status, created_at, updated_at
            "#,
        )
        .bind(booking.id)
        .bind(booking.room_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(&booking.guest_info.name)
        .bind(&booking.guest_info.email)
        .bind(&booking.guest_info.phone)
        .bind(booking.price)
        .bind(booking.status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?
        .ok_or(RepositoryError::NotFound)?;

        Booking::try_from(record)
    }

    async fn update_status(&self, id: i64, status: BookingStatus) -> RepositoryResult<()> {
        let result =
            sqlx::query("UPDATE bookings SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status.as_str())
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        affected_one(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        affected_one(result.rows_affected())
    }

    async fn is_room_available(&self, room_id: i64, range: DateRange) -> RepositoryResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT NOT EXISTS (
                SELECT 1 FROM bookings
                WHERE room_id = $1
                  AND status <> 'cancelled'
                  AND start_date < $3
                  AND end_date > $2
            )
            "#,
        )
        .bind(room_id)
        .bind(range.check_in())
        .bind(range.check_out())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)
    }
}

#[derive(Clone)]
pub struct PgSpecialDateRepository {
    pool: PgPool,
}

impl PgSpecialDateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpecialDateRepository for PgSpecialDateRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<SpecialDate>> {
        let records = sqlx::query_as::<_, SpecialDateRecord>(
            "SELECT id, date, name, coefficient, created_at FROM special_dates ORDER BY date",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(records.into_iter().map(SpecialDate::from).collect())
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<SpecialDate>> {
        let record = sqlx::query_as::<_, SpecialDateRecord>(
            "SELECT id, date, name, coefficient, created_at FROM special_dates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(record.map(SpecialDate::from))
    }

    async fn get_by_date(&self, date: NaiveDate) -> RepositoryResult<Option<SpecialDate>> {
        let record = sqlx::query_as::<_, SpecialDateRecord>(
            "SELECT id, date, name, coefficient, created_at FROM special_dates WHERE date = $1",
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(record.map(SpecialDate::from))
    }

    async fn get_by_date_range(&self, range: DateRange) -> RepositoryResult<Vec<SpecialDate>> {
        let records = sqlx::query_as::<_, SpecialDateRecord>(
            r#"
            SELECT id, date, name, coefficient, created_at
            FROM special_dates
            WHERE date >= $1 AND date < $2
            ORDER BY date
            "#,
        )
        .bind(range.check_in())
        .bind(range.check_out())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(records.into_iter().map(SpecialDate::from).collect())
    }

    async fn create(&self, special_date: NewSpecialDate) -> RepositoryResult<SpecialDate> {
        let record = sqlx::query_as::<_, SpecialDateRecord>(
            r#"
            INSERT INTO special_dates (date, name, coefficient)
            VALUES ($1, $2, $3)
            RETURNING id, date, name, coefficient, created_at
            "#,
        )
        .bind(special_date.date)
        .bind(&special_date.name)
        .bind(special_date.coefficient)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(record.into())
    }

    async fn update(&self, special_date: SpecialDate) -> RepositoryResult<SpecialDate> {
        let record = sqlx::query_as::<_, SpecialDateRecord>(
            r#"
            UPDATE special_dates
            SET date = $2, name = $3, coefficient = $4
            WHERE id = $1
            RETURNING id, date, name, coefficient, created_at
            "#,
        )
        .bind(special_date.id)
        .bind(special_date.date)
        .bind(&special_date.name)
        .bind(special_date.coefficient)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(record.into())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM special_dates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        affected_one(result.rows_affected())
    }
}

#[derive(Clone)]
pub struct PgNotificationTypeRepository {
    pool: PgPool,
}

impl PgNotificationTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationTypeRepository for PgNotificationTypeRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<NotificationType>> {
        let records = sqlx::query_as::<_, NotificationTypeRecord>(
            "SELECT id, name, message FROM notification_types ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(records.into_iter().map(NotificationType::from).collect())
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<NotificationType>> {
        let record = sqlx::query_as::<_, NotificationTypeRecord>(
            "SELECT id, name, message FROM notification_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(record.map(NotificationType::from))
    }

    async fn get_by_name(&self, name: &str) -> RepositoryResult<Option<NotificationType>> {
        let record = sqlx::query_as::<_, NotificationTypeRecord>(
            "SELECT id, name, message FROM notification_types WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(record.map(NotificationType::from))
    }

    async fn create(
        &self,
        notification_type: NewNotificationType,
    ) -> RepositoryResult<NotificationType> {
        let record = sqlx::query_as::<_, NotificationTypeRecord>(
            r#"
            INSERT INTO notification_types (name, message)
            VALUES ($1, $2)
            RETURNING id, name, message
            "#,
        )
        .bind(&notification_type.name)
        .bind(&notification_type.message)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(record.into())
    }

    async fn update(
        &self,
        notification_type: NotificationType,
    ) -> RepositoryResult<NotificationType> {
        let record = sqlx::query_as::<_, NotificationTypeRecord>(
            r#"
            UPDATE notification_types
            SET name = $2, message = $3
            WHERE id = $1
            RETURNING id, name, message
            "#,
        )
        .bind(notification_type.id)
        .bind(&notification_type.name)
        .bind(&notification_type.message)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(record.into())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM notification_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        affected_one(result.rows_affected())
    }
}

#[derive(Clone)]
pub struct PgStorage {
    pub pool: PgPool,
    pub room_repository: Arc<PgRoomRepository>,
    pub booking_repository: Arc<PgBookingRepository>,
    pub special_date_repository: Arc<PgSpecialDateRepository>,
    pub notification_type_repository: Arc<PgNotificationTypeRepository>,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self {
            room_repository: Arc::new(PgRoomRepository::new(pool.clone())),
            booking_repository: Arc::new(PgBookingRepository::new(pool.clone())),
            special_date_repository: Arc::new(PgSpecialDateRepository::new(pool.clone())),
            notification_type_repository: Arc::new(PgNotificationTypeRepository::new(
                pool.clone(),
            )),
            pool,
        }
    }
}

pub async fn create_pg_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
