use domain::{DomainError, RepositoryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("notification error: {0}")]
    Notification(#[from] NotificationError),
}

impl ApplicationError {
    /// 领域错误（如 `RoomNotAvailable`）
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            ApplicationError::Domain(err) => Some(err),
            ApplicationError::Repository(_) | ApplicationError::Notification(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("notification worker already started")]
    WorkerAlreadyStarted,
    #[error("notification broker is closed")]
    BrokerClosed,
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
}
