use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use domain::{
    Booking, BookingRepository, BookingResponse, BookingStatus, BookingWithRoom, DateRange,
    DomainError, GuestInfo, NewBooking, PriceCalculation, PriceCalculator, RepositoryError, Room,
    RoomRepository, RoomType, SpecialDateRepository,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;

use crate::error::ApplicationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRoomsRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub room_type: Option<RoomType>,
    /// 最少入住人数，房型过滤存在时忽略
    #[serde(default)]
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub room_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guest_info: GuestInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceCalculationRequest {
    pub room_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// 搜索结果：房间及其在搜索区间内的总价
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomWithAvailability {
    pub room: Room,
    pub is_available: bool,
    pub total_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    /// 为 false 时确认、取消不检查状态机，只要求预订存在
    pub strict_transitions: bool,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            strict_transitions: true,
        }
    }
}

/// 按房间 ID 分配的异步锁，保证同一房间的“检查可用性 -> 写入”不会交错
#[derive(Default)]
struct RoomLocks {
    locks: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl RoomLocks {
    fn lock_for(&self, room_id: i64) -> Arc<AsyncMutex<()>> {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(room_id)
            .or_default()
            .clone()
    }
}

pub struct BookingServiceDependencies {
    pub room_repository: Arc<dyn RoomRepository>,
    pub booking_repository: Arc<dyn BookingRepository>,
    pub special_date_repository: Arc<dyn SpecialDateRepository>,
}

pub struct BookingService {
    deps: BookingServiceDependencies,
    policy: BookingPolicy,
    room_locks: RoomLocks,
}

impl BookingService {
    pub fn new(deps: BookingServiceDependencies) -> Self {
        Self::with_policy(deps, BookingPolicy::default())
    }

    pub fn with_policy(deps: BookingServiceDependencies, policy: BookingPolicy) -> Self {
        Self {
            deps,
            policy,
            room_locks: RoomLocks::default(),
        }
    }

    pub fn policy(&self) -> BookingPolicy {
        self.policy
    }

    pub async fn search_available_rooms(
        &self,
        request: SearchRoomsRequest,
    ) -> Result<Vec<RoomWithAvailability>, ApplicationError> {
        let range = DateRange::new(request.check_in, request.check_out)?;
        let rooms = &self.deps.room_repository;

        let available = match (request.room_type, request.capacity) {
            (Some(room_type), _) => rooms.get_available_by_type(room_type, range).await?,
            (None, Some(capacity)) if capacity > 0 => {
                rooms.get_available_by_capacity(capacity, range).await?
            }
            _ => rooms.get_available(range).await?,
        };

        let calculator = self.price_calculator(range).await;
        let results: Vec<_> = available
            .into_iter()
            .map(|room| {
                let total_price = calculator
                    .calculate_total_price(room.base_price, range.check_in(), range.check_out())
                    .total_price;
                RoomWithAvailability {
                    room,
                    is_available: true,
                    total_price,
                }
            })
            .collect();

        tracing::debug!(
            check_in = %range.check_in(),
            check_out = %range.check_out(),
            found = results.len(),
            "可用房间搜索完成"
        );
        Ok(results)
    }

    /// 创建待确认的预订。
    ///
    /// 同一房间的创建请求串行执行；存储层报告重叠冲突时同样视为房间不可用。
    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<BookingResponse, ApplicationError> {
        let range = DateRange::new(request.start_date, request.end_date)?;
        request.guest_info.validate()?;

        let room = self
            .deps
            .room_repository
            .get_by_id(request.room_id)
            .await?
            .ok_or(DomainError::RoomNotFound)?;

        let lock = self.room_locks.lock_for(room.id);
        let _guard = lock.lock().await;

        let available = self
            .deps
            .booking_repository
            .is_room_available(room.id, range)
            .await?;
        if !available {
            tracing::info!(room_id = room.id, "所选日期房间已被预订");
            return Err(DomainError::RoomNotAvailable.into());
        }

        let price = self
            .price_calculator(range)
            .await
            .calculate_total_price(room.base_price, range.check_in(), range.check_out());

        let booking = self
            .deps
            .booking_repository
            .create(NewBooking {
                room_id: room.id,
                range,
                guest_info: request.guest_info,
                price: price.total_price,
                status: BookingStatus::Pending,
            })
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict => ApplicationError::from(DomainError::RoomNotAvailable),
                other => other.into(),
            })?;

        tracing::info!(
            booking_id = booking.id,
            room_id = room.id,
            price = booking.price,
            "预订已创建"
        );

        Ok(BookingResponse {
            booking,
            room,
            nights: price.nights,
        })
    }

    pub async fn confirm_booking(&self, id: i64) -> Result<Booking, ApplicationError> {
        self.transition(id, BookingStatus::Confirmed).await
    }

    pub async fn cancel_booking(&self, id: i64) -> Result<Booking, ApplicationError> {
        self.transition(id, BookingStatus::Cancelled).await
    }

    pub async fn get_booking(&self, id: i64) -> Result<BookingWithRoom, ApplicationError> {
        let booking = self
            .deps
            .booking_repository
            .get_by_id(id)
            .await?
            .ok_or(DomainError::BookingNotFound)?;
        let room = self
            .deps
            .room_repository
            .get_by_id(booking.room_id)
            .await?
            .ok_or(DomainError::RoomNotFound)?;

        Ok(BookingWithRoom { booking, room })
    }

    pub async fn list_bookings(&self) -> Result<Vec<Booking>, ApplicationError> {
        Ok(self.deps.booking_repository.get_all().await?)
    }

    pub async fn list_bookings_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<Booking>, ApplicationError> {
        Ok(self.deps.booking_repository.get_by_email(email).await?)
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>, ApplicationError> {
        Ok(self.deps.room_repository.get_all().await?)
    }

    pub async fn get_room(&self, id: i64) -> Result<Room, ApplicationError> {
        Ok(self
            .deps
            .room_repository
            .get_by_id(id)
            .await?
            .ok_or(DomainError::RoomNotFound)?)
    }

    /// 只读的价格试算，不写入任何数据
    pub async fn calculate_price(
        &self,
        request: PriceCalculationRequest,
    ) -> Result<PriceCalculation, ApplicationError> {
        let range = DateRange::new(request.check_in, request.check_out)?;
        let room = self.get_room(request.room_id).await?;

        Ok(self
            .price_calculator(range)
            .await
            .calculate_total_price(room.base_price, range.check_in(), range.check_out()))
    }

    async fn transition(
        &self,
        id: i64,
        next: BookingStatus,
    ) -> Result<Booking, ApplicationError> {
        let booking = self
            .deps
            .booking_repository
            .get_by_id(id)
            .await?
            .ok_or(DomainError::BookingNotFound)?;

        if self.policy.strict_transitions && !booking.status.can_transition_to(next) {
            return Err(DomainError::InvalidStatusTransition {
                from: booking.status,
                to: next,
            }
            .into());
        }

        self.deps
            .booking_repository
            .update_status(id, next)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound => ApplicationError::from(DomainError::BookingNotFound),
                other => other.into(),
            })?;

        let updated = self
            .deps
            .booking_repository
            .get_by_id(id)
            .await?
            .ok_or(DomainError::BookingNotFound)?;

        tracing::info!(
            booking_id = id,
            from = %booking.status,
            to = %updated.status,
            "预订状态已更新"
        );
        Ok(updated)
    }

    /// 特殊日期加载失败时按没有特殊日期计价
    async fn price_calculator(&self, range: DateRange) -> PriceCalculator {
        match self.deps.special_date_repository.get_by_date_range(range).await {
            Ok(special_dates) => PriceCalculator::new(special_dates),
            Err(err) => {
                tracing::warn!(error = %err, "加载特殊日期失败，按常规规则计价");
                PriceCalculator::default()
            }
        }
    }
}
