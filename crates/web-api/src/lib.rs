//! Web API 层。
//!
//! 提供 Axum 路由，将 HTTP 请求委托给应用层的预订、通知和管理服务。

mod admin_routes;
mod error;
mod routes;
mod state;

pub use error::{ApiError, ErrorBody};
pub use routes::router;
pub use state::AppState;
