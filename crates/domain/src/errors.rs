//! 领域模型错误定义
//!
//! 预订、定价等业务校验失败时返回的错误类型，以及仓储层的错误类型。

use thiserror::Error;

use crate::entities::booking::BookingStatus;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 入住日期必须早于退房日期
    #[error("invalid booking dates")]
    InvalidDateRange,

    /// 客人姓名或邮箱缺失
    #[error("invalid guest information")]
    InvalidGuestInfo,

    #[error("room not found")]
    RoomNotFound,

    /// 所选日期内房间已有未取消的预订
    #[error("room is not available for selected dates")]
    RoomNotAvailable,

    #[error("booking not found")]
    BookingNotFound,

    #[error("special date not found")]
    SpecialDateNotFound,

    /// 预订状态机不允许的状态迁移
    #[error("cannot change booking status from {from} to {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// 字段校验错误
    #[error("validation failed: {field}: {message}")]
    Validation { field: String, message: String },
}

impl DomainError {
    /// 创建字段校验错误
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 仓储层错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    /// 唯一约束、排他约束或外键约束冲突
    #[error("record conflicts with existing data")]
    Conflict,

    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 仓储操作结果类型
pub type RepositoryResult<T> = Result<T, RepositoryError>;
