use sqlx::migrate::Migrator;

/// 内嵌的数据库迁移，目录位于工作区根目录的 `migrations/`
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");
