//! 酒店预订系统核心领域模型
//!
//! 包含房间、预订、特殊日期、通知等核心实体，动态定价规则，以及仓储接口。

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod value_objects;

// 重新导出常用类型
pub use entities::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
pub use value_objects::*;
