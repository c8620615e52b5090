//! 预订实体定义
//!
//! 预订状态机：`pending -> confirmed`、`pending -> cancelled`、`confirmed -> cancelled`。

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::room::Room;
use crate::errors::{DomainError, DomainResult};
use crate::value_objects::DateRange;

/// 预订状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// 状态机中是否定义了 `self -> next` 的迁移
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }

    /// 未取消的预订会占用房间
    pub fn is_active(&self) -> bool {
        *self != BookingStatus::Cancelled
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(DomainError::validation(
                "status",
                format!("unknown booking status: {other}"),
            )),
        }
    }
}

/// 客人信息
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuestInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl GuestInfo {
    /// 姓名和邮箱为必填项
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(DomainError::InvalidGuestInfo);
        }
        Ok(())
    }
}

/// 预订实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    /// 入住日期（包含）
    pub start_date: NaiveDate,
    /// 退房日期（不包含）
    pub end_date: NaiveDate,
    pub room_id: i64,
    pub guest_info: GuestInfo,
    /// 创建时计算出的总价
    pub price: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// 与给定区间半开重叠：`start < range.end && end > range.start`
    pub fn overlaps(&self, range: &DateRange) -> bool {
        range.overlaps_dates(self.start_date, self.end_date)
    }

    /// 是否与给定区间冲突（仅未取消的预订参与冲突判断）
    pub fn conflicts_with(&self, range: &DateRange) -> bool {
        self.status.is_active() && self.overlaps(range)
    }

    /// 指定日期客人是否在住
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date < self.end_date
    }
}

/// 新建预订的数据
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub room_id: i64,
    pub range: DateRange,
    pub guest_info: GuestInfo,
    pub price: f64,
    pub status: BookingStatus,
}

/// 预订及其房间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingWithRoom {
    #[serde(flatten)]
    pub booking: Booking,
    pub room: Room,
}

/// 创建预订的返回结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub room: Room,
    pub nights: i64,
}
