//! 进程内通知消息代理
//!
//! 每个订阅者持有一条有界队列。发布时把事件复制到该渠道的全部订阅队列以及通配渠道
//! `all` 的全部订阅队列；投递使用 `try_send`，队列已满时只丢弃这一份并记录告警，
//! 发布方永远不会阻塞。

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError, RwLock};

use chrono::Utc;
use domain::{NotificationChannel, NotificationEvent};
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

/// 订阅队列默认容量
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// 订阅目标：具体渠道，或接收全部事件的通配渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    All,
    Channel(NotificationChannel),
}

impl From<NotificationChannel> for Topic {
    fn from(channel: NotificationChannel) -> Self {
        Topic::Channel(channel)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::All => f.write_str("all"),
            Topic::Channel(channel) => f.write_str(channel.as_str()),
        }
    }
}

/// 订阅者持有的只读队列，代理关闭后 `recv` 返回 `None`
pub type EventReceiver = mpsc::Receiver<NotificationEvent>;

#[derive(Default)]
struct BrokerState {
    subscribers: HashMap<Topic, Vec<mpsc::Sender<NotificationEvent>>>,
    closed: bool,
}

/// 订阅表由读写锁保护：发布走读锁，订阅和关闭走写锁。
/// 事件日志单独加锁，持有读锁的并发发布者也能追加。
#[derive(Default)]
pub struct NotificationBroker {
    state: RwLock<BrokerState>,
    // 只追加，不清理
    event_log: Mutex<Vec<NotificationEvent>>,
}

impl NotificationBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅指定目标，返回容量为 `capacity` 的有界队列（最小为 1）。
    ///
    /// 代理已关闭时返回的队列已经处于关闭状态。
    pub fn subscribe(&self, topic: impl Into<Topic>, capacity: usize) -> EventReceiver {
        let topic = topic.into();
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            tracing::debug!(topic = %topic, "代理已关闭，返回已关闭的订阅队列");
            return receiver;
        }
        state.subscribers.entry(topic).or_default().push(sender);
        tracing::debug!(topic = %topic, capacity, "新增订阅者");

        receiver
    }

    /// 发布事件，返回事件 ID；代理已关闭时不做任何事并返回 `None`。
    pub fn publish(&self, mut event: NotificationEvent) -> Option<Uuid> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            tracing::debug!(channel = %event.channel, "代理已关闭，丢弃事件");
            return None;
        }

        let event_id = *event.id.get_or_insert_with(Uuid::new_v4);
        event.created_at.get_or_insert_with(Utc::now);

        self.event_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());

        deliver(&state, Topic::Channel(event.channel), &event);
        deliver(&state, Topic::All, &event);

        Some(event_id)
    }

    /// 事件日志快照，按发布顺序排列
    pub fn event_log(&self) -> Vec<NotificationEvent> {
        self.event_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 关闭代理：之后的发布都会被忽略，所有订阅队列在取完剩余事件后结束。
    pub fn close(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return;
        }
        state.closed = true;
        let subscriber_count: usize = state.subscribers.values().map(Vec::len).sum();
        // 丢弃发送端即关闭队列
        state.subscribers.clear();
        tracing::info!(subscriber_count, "通知代理已关闭");
    }

    pub fn is_closed(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .closed
    }

    pub fn subscriber_count(&self, topic: impl Into<Topic>) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribers
            .get(&topic.into())
            .map_or(0, Vec::len)
    }
}

fn deliver(state: &BrokerState, topic: Topic, event: &NotificationEvent) {
    let Some(subscribers) = state.subscribers.get(&topic) else {
        return;
    };

    for sender in subscribers {
        match sender.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!(
                    topic = %topic,
                    event_id = ?dropped.id,
                    event_type = %dropped.event_type,
                    "订阅队列已满，丢弃本次投递"
                );
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(topic = %topic, "订阅者已退出，跳过投递");
            }
        }
    }
}
