use std::sync::Arc;

use domain::{
    BookingRepository, NotificationTypeRepository, RoomRepository, SpecialDateRepository,
};
use thiserror::Error;

use crate::{
    memory::InMemoryStorage,
    migrations::MIGRATOR,
    repository::{create_pg_pool, PgStorage},
};

#[derive(Debug, Clone)]
pub struct InfrastructureConfig {
    /// 为空时使用内存存储
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub seed_demo_data: bool,
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
            seed_demo_data: true,
        }
    }
}

impl From<&config::DatabaseConfig> for InfrastructureConfig {
    fn from(database: &config::DatabaseConfig) -> Self {
        Self {
            database_url: database.url.clone(),
            max_connections: database.max_connections,
            seed_demo_data: database.seed_demo_data,
        }
    }
}

#[derive(Debug, Error)]
pub enum InfrastructureError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// 服务层使用的仓储集合，屏蔽具体的存储实现
#[derive(Clone)]
pub struct Infrastructure {
    pub room_repository: Arc<dyn RoomRepository>,
    pub booking_repository: Arc<dyn BookingRepository>,
    pub special_date_repository: Arc<dyn SpecialDateRepository>,
    pub notification_type_repository: Arc<dyn NotificationTypeRepository>,
}

impl Infrastructure {
    /// 配置了数据库时连接 Postgres 并执行迁移，否则使用内存存储
    pub async fn connect(config: InfrastructureConfig) -> Result<Self, InfrastructureError> {
        match config.database_url.as_deref() {
            Some(database_url) => {
                let pool = create_pg_pool(database_url, config.max_connections).await?;
                MIGRATOR.run(&pool).await?;
                tracing::info!(max_connections = config.max_connections, "已连接 Postgres 并完成迁移");
                Ok(Self::from_pg(PgStorage::new(pool)))
            }
            None => {
                let storage = if config.seed_demo_data {
                    InMemoryStorage::seeded()
                } else {
                    InMemoryStorage::new()
                };
                tracing::info!(seeded = config.seed_demo_data, "未配置数据库，使用内存存储");
                Ok(Self::in_memory(&storage))
            }
        }
    }

    pub fn from_pg(storage: PgStorage) -> Self {
        Self {
            room_repository: storage.room_repository,
            booking_repository: storage.booking_repository,
            special_date_repository: storage.special_date_repository,
            notification_type_repository: storage.notification_type_repository,
        }
    }

    pub fn in_memory(storage: &InMemoryStorage) -> Self {
        Self {
            room_repository: Arc::new(storage.rooms()),
            booking_repository: Arc::new(storage.bookings()),
            special_date_repository: Arc::new(storage.special_dates()),
            notification_type_repository: Arc::new(storage.notification_types()),
        }
    }
}
