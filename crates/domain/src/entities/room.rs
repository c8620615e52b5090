//! 房间实体定义

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// 房型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
    Family,
}

impl RoomType {
    pub const ALL: [RoomType; 4] = [
        RoomType::Standard,
        RoomType::Deluxe,
        RoomType::Suite,
        RoomType::Family,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Standard => "standard",
            RoomType::Deluxe => "deluxe",
            RoomType::Suite => "suite",
            RoomType::Family => "family",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(RoomType::Standard),
            "deluxe" => Ok(RoomType::Deluxe),
            "suite" => Ok(RoomType::Suite),
            "family" => Ok(RoomType::Family),
            other => Err(DomainError::validation(
                "room_type",
                format!("unknown room type: {other}"),
            )),
        }
    }
}

/// 房间状态，由管理员直接维护，不随预订状态自动变化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Available,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(RoomStatus::Available),
            "occupied" => Ok(RoomStatus::Occupied),
            "maintenance" => Ok(RoomStatus::Maintenance),
            other => Err(DomainError::validation(
                "status",
                format!("unknown room status: {other}"),
            )),
        }
    }
}

/// 房间实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    /// 房间号，全局唯一
    pub room_number: String,
    pub room_type: RoomType,
    /// 每晚基础价格
    pub base_price: f64,
    /// 最多入住人数
    pub capacity: i32,
    pub status: RoomStatus,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新建房间的数据，ID 与时间戳由仓储分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoom {
    pub room_number: String,
    pub room_type: RoomType,
    pub base_price: f64,
    pub capacity: i32,
    #[serde(default)]
    pub status: RoomStatus,
    #[serde(default)]
    pub description: String,
}

impl NewRoom {
    pub fn validate(&self) -> DomainResult<()> {
        validate_room_fields(&self.room_number, self.base_price, self.capacity)
    }
}

impl Room {
    pub fn validate(&self) -> DomainResult<()> {
        validate_room_fields(&self.room_number, self.base_price, self.capacity)
    }

    pub fn is_available(&self) -> bool {
        self.status == RoomStatus::Available
    }
}

fn validate_room_fields(room_number: &str, base_price: f64, capacity: i32) -> DomainResult<()> {
    if room_number.trim().is_empty() {
        return Err(DomainError::validation("room_number", "must not be empty"));
    }
    if !(base_price.is_finite() && base_price > 0.0) {
        return Err(DomainError::validation(
            "base_price",
            "must be a positive amount",
        ));
    }
    if capacity <= 0 {
        return Err(DomainError::validation("capacity", "must be at least 1"));
    }
    Ok(())
}
