//! 领域服务定义
//!
//! 包含不依赖外部资源的纯业务逻辑：动态定价、按房型生成房间。

pub mod pricing;
pub mod room_factory;

// 重新导出服务
pub use pricing::*;
pub use room_factory::*;
