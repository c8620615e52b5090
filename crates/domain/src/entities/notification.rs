//! 通知实体定义
//!
//! `NotificationEvent` 只在消息代理中流转，不做持久化；`NotificationType` 是仓储中的通知类型目录。

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::errors::DomainError;

/// 通知投递渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Sms,
    Viber,
}

impl NotificationChannel {
    pub const ALL: [NotificationChannel; 3] = [
        NotificationChannel::Email,
        NotificationChannel::Sms,
        NotificationChannel::Viber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationChannel::Email => "email",
            NotificationChannel::Sms => "sms",
            NotificationChannel::Viber => "viber",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationChannel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(NotificationChannel::Email),
            "sms" => Ok(NotificationChannel::Sms),
            "viber" => Ok(NotificationChannel::Viber),
            other => Err(DomainError::validation(
                "channel",
                format!("unknown channel: {other}"),
            )),
        }
    }
}

/// 通知事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    BookingCreated,
    BookingConfirmed,
    BookingCancelled,
    /// 管理员手动发送
    Manual,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::BookingCreated => "booking_created",
            EventType::BookingConfirmed => "booking_confirmed",
            EventType::BookingCancelled => "booking_cancelled",
            EventType::Manual => "manual",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 通知事件
///
/// `id` 和 `created_at` 为空时由消息代理在发布时补齐。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub channel: NotificationChannel,
    pub recipient: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl NotificationEvent {
    pub fn new(
        event_type: EventType,
        channel: NotificationChannel,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            event_type,
            channel,
            recipient: recipient.into(),
            subject: subject.into(),
            message: message.into(),
            data: HashMap::new(),
            created_at: None,
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// 发送通知后的回执：成功表示已入队，而不是已送达
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
}

impl NotificationResponse {
    pub fn queued(message: impl Into<String>, event_id: Uuid) -> Self {
        Self {
            success: true,
            message: message.into(),
            event_id: Some(event_id),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            event_id: None,
        }
    }
}

/// 通知类型目录记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationType {
    pub id: i64,
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotificationType {
    pub name: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_type_under_its_wire_name() {
        let event = NotificationEvent::new(
            EventType::BookingCreated,
            NotificationChannel::Email,
            "guest@example.com",
            "subject",
            "body",
        )
        .with_data("booking_id", 7);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "booking_created");
        assert_eq!(json["channel"], "email");
        assert_eq!(json["data"]["booking_id"], 7);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn unknown_channel_names_are_rejected() {
        assert_eq!("sms".parse::<NotificationChannel>(), Ok(NotificationChannel::Sms));
        assert!("telegram".parse::<NotificationChannel>().is_err());
    }
}
