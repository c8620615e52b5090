//! 通知类型Repository接口定义

use async_trait::async_trait;

use crate::entities::notification::{NewNotificationType, NotificationType};
use crate::errors::RepositoryResult;

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait NotificationTypeRepository: Send + Sync {
    async fn get_all(&self) -> RepositoryResult<Vec<NotificationType>>;

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<NotificationType>>;

    async fn get_by_name(&self, name: &str) -> RepositoryResult<Option<NotificationType>>;

    async fn create(
        &self,
        notification_type: NewNotificationType,
    ) -> RepositoryResult<NotificationType>;

    async fn update(&self, notification_type: NotificationType)
        -> RepositoryResult<NotificationType>;

    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}
