//! 渠道投递适配器
//!
//! 每个渠道一个无状态的处理器，按渠道 ID 在注册表中查找，不做条件分支分派。
//! 当前的实现只输出结构化日志，不对接外部服务商。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{NotificationChannel, NotificationEvent};

#[async_trait]
pub trait NotificationHandler: Send + Sync {
    fn channel(&self) -> NotificationChannel;

    /// 投递事件，返回是否送达
    async fn send(&self, event: NotificationEvent) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EmailHandler;

#[async_trait]
impl NotificationHandler for EmailHandler {
    fn channel(&self) -> NotificationChannel {
        NotificationChannel::Email
    }

    async fn send(&self, event: NotificationEvent) -> bool {
        tracing::info!(
            channel = "email",
            event_id = ?event.id,
            recipient = %event.recipient,
            subject = %event.subject,
            message = %event.message,
            "邮件已发送"
        );
        true
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SmsHandler;

#[async_trait]
impl NotificationHandler for SmsHandler {
    fn channel(&self) -> NotificationChannel {
        NotificationChannel::Sms
    }

    async fn send(&self, event: NotificationEvent) -> bool {
        tracing::info!(
            channel = "sms",
            event_id = ?event.id,
            recipient = %event.recipient,
            message = %event.message,
            "短信已发送"
        );
        true
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ViberHandler;

#[async_trait]
impl NotificationHandler for ViberHandler {
    fn channel(&self) -> NotificationChannel {
        NotificationChannel::Viber
    }

    async fn send(&self, event: NotificationEvent) -> bool {
        tracing::info!(
            channel = "viber",
            event_id = ?event.id,
            recipient = %event.recipient,
            message = %event.message,
            "Viber 消息已发送"
        );
        true
    }
}

/// 渠道 -> 处理器 的映射
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<NotificationChannel, Arc<dyn NotificationHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册邮件、短信、Viber 三个默认处理器
    pub fn with_default_channels() -> Self {
        Self::new()
            .register(Arc::new(EmailHandler))
            .register(Arc::new(SmsHandler))
            .register(Arc::new(ViberHandler))
    }

    /// 同一渠道重复注册时后者覆盖前者
    pub fn register(mut self, handler: Arc<dyn NotificationHandler>) -> Self {
        self.handlers.insert(handler.channel(), handler);
        self
    }

    pub fn get(&self, channel: NotificationChannel) -> Option<Arc<dyn NotificationHandler>> {
        self.handlers.get(&channel).cloned()
    }

    pub fn channels(&self) -> impl Iterator<Item = NotificationChannel> + '_ {
        self.handlers.keys().copied()
    }
}
