//! 统一配置中心
//!
//! 提供应用的全局配置管理，包括：
//! - HTTP 服务
//! - 数据库连接（未配置时使用内存存储）
//! - 通知代理队列
//! - 预订状态机策略
//! - 日志级别
//!
//! 加载顺序：内置默认值 -> 可选配置文件（`HOTEL_CONFIG_FILE`）-> `HOTEL_` 前缀环境变量，
//! 嵌套字段用 `__` 分隔，例如 `HOTEL_SERVER__PORT=9090`。

use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const CONFIG_FILE_ENV: &str = "HOTEL_CONFIG_FILE";
pub const ENV_PREFIX: &str = "HOTEL_";

const REDACTED: &str = "[REDACTED]";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// 为空时使用内存存储
    #[serde(default)]
    #[validate(url)]
    pub url: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub max_connections: u32,
    /// 内存存储启动时是否预置演示房间
    #[serde(default)]
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BrokerConfig {
    /// 通配 worker 的队列容量
    #[validate(range(min = 1))]
    pub worker_queue_capacity: usize,
    /// 每个渠道查看 worker 的队列容量
    #[validate(range(min = 1))]
    pub channel_queue_capacity: usize,
    /// 是否额外启动按渠道的查看 worker
    #[serde(default)]
    pub channel_workers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// 关闭后确认、取消不再检查状态机
    pub strict_transitions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// 未设置 `RUST_LOG` 时使用的过滤级别
    #[validate(custom(function = "validate_level"))]
    pub level: String,
}

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub database: DatabaseConfig,
    #[validate(nested)]
    pub broker: BrokerConfig,
    pub booking: BookingConfig,
    #[validate(nested)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                seed_demo_data: true,
            },
            broker: BrokerConfig {
                worker_queue_capacity: 100,
                channel_queue_capacity: 100,
                channel_workers: false,
            },
            booking: BookingConfig {
                strict_transitions: true,
            },
            logging: LoggingConfig {
                level: "info".into(),
            },
        }
    }
}

impl AppConfig {
    /// 按默认值 -> 配置文件 -> 环境变量的顺序加载并校验
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// 组装配置来源，文件格式按扩展名判断，默认按 TOML 解析
    pub fn figment() -> Figment {
        let mut fig = Figment::new().merge(Serialized::defaults(AppConfig::default()));
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            if path.ends_with(".yml") || path.ends_with(".yaml") {
                fig = fig.merge(Yaml::file(path));
            } else if path.ends_with(".json") {
                fig = fig.merge(Json::file(path));
            } else {
                fig = fig.merge(Toml::file(path));
            }
        }
        fig.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: AppConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// 用于日志输出的配置摘要，隐藏数据库连接串中的凭据
    pub fn sanitize(&self) -> String {
        let mut text = format!("{:?}", self);
        let mut cursor = 0;
        while let Some(found) = text[cursor..].find("://") {
            let authority = cursor + found + "://".len();
            let end = text[authority..]
                .find(['"', '/'])
                .map_or(text.len(), |i| authority + i);
            cursor = match text[authority..end].rfind('@') {
                Some(at) => {
                    text.replace_range(authority..authority + at, REDACTED);
                    authority + REDACTED.len()
                }
                None => end,
            };
        }
        text
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn validate_level(level: &str) -> Result<(), ValidationError> {
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("unknown_log_level")),
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}
