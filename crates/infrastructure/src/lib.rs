//! 基础设施层实现。
//!
//! 提供 Postgres 仓储和内存仓储两套实现，实现领域层定义的仓储接口。

pub mod builder;
pub mod memory;
pub mod migrations;
pub mod repository;

pub use builder::{Infrastructure, InfrastructureConfig, InfrastructureError};
pub use memory::{
    InMemoryBookingRepository, InMemoryNotificationTypeRepository, InMemoryRoomRepository,
    InMemorySpecialDateRepository, InMemoryStorage,
};
pub use migrations::MIGRATOR;
pub use repository::{
    create_pg_pool, PgBookingRepository, PgNotificationTypeRepository, PgRoomRepository,
    PgSpecialDateRepository, PgStorage,
};
