//! 房间工厂：按房型生成带默认价格和容量的新房间

use crate::entities::room::{NewRoom, RoomStatus, RoomType};

/// 房型预设：每晚基础价格和最多入住人数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomPreset {
    pub base_price: f64,
    pub capacity: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoomFactory;

impl RoomFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn preset(&self, room_type: RoomType) -> RoomPreset {
        match room_type {
            RoomType::Standard => RoomPreset {
                base_price: 2500.0,
                capacity: 2,
            },
            RoomType::Deluxe => RoomPreset {
                base_price: 4500.0,
                capacity: 3,
            },
            RoomType::Suite => RoomPreset {
                base_price: 7500.0,
                capacity: 4,
            },
            RoomType::Family => RoomPreset {
                base_price: 5500.0,
                capacity: 6,
            },
        }
    }

    pub fn create_room(&self, room_type: RoomType, room_number: impl Into<String>) -> NewRoom {
        let room_number = room_number.into();
        let preset = self.preset(room_type);
        let description = match room_type {
            RoomType::Standard => format!("Standard room {room_number}"),
            RoomType::Deluxe => format!("Deluxe room {room_number} with sea view"),
            RoomType::Suite => format!("Suite {room_number} with living room and jacuzzi"),
            RoomType::Family => format!("Family room {room_number} with two bedrooms"),
        };

        NewRoom {
            room_number,
            room_type,
            base_price: preset.base_price,
            capacity: preset.capacity,
            status: RoomStatus::Available,
            description,
        }
    }
}
