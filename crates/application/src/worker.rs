//! 消费订阅队列的后台任务
//!
//! 代理关闭后任务先取完队列中已缓冲的事件再退出；取消令牌触发时立即退出，
//! 未取出的事件随之丢弃。

use std::sync::Arc;

use domain::{NotificationChannel, NotificationEvent};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::broker::{EventReceiver, NotificationBroker};
use crate::handlers::{HandlerRegistry, NotificationHandler};

/// 消费通配队列，按事件渠道查找处理器并投递；没有对应处理器的事件直接跳过。
pub async fn run_dispatch_worker(
    mut events: EventReceiver,
    handlers: HandlerRegistry,
    cancel: CancellationToken,
) {
    tracing::info!("通知 worker 已启动");
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("通知 worker 收到取消信号，退出");
                break;
            }
            received = events.recv() => match received {
                Some(event) => dispatch(&handlers, event).await,
                None => {
                    tracing::info!("通知队列已关闭，worker 退出");
                    break;
                }
            },
        }
    }
}

async fn dispatch(handlers: &HandlerRegistry, event: NotificationEvent) {
    let Some(handler) = handlers.get(event.channel) else {
        tracing::debug!(channel = %event.channel, "没有对应渠道的处理器，跳过");
        return;
    };

    let event_id = event.id;
    let event_type = event.event_type;
    let delivered = handler.send(event).await;
    tracing::debug!(?event_id, %event_type, delivered, "通知处理完成");
}

/// 为每个已注册渠道单独订阅一条队列，并各启动一个任务消费。
///
/// 与通配 worker 并行运行，用于按渠道查看事件流。
pub fn spawn_channel_workers(
    broker: &NotificationBroker,
    handlers: &HandlerRegistry,
    capacity: usize,
    cancel: CancellationToken,
) -> Vec<JoinHandle<()>> {
    handlers
        .channels()
        .filter_map(|channel| handlers.get(channel).map(|handler| (channel, handler)))
        .map(|(channel, handler)| {
            let events = broker.subscribe(channel, capacity);
            tokio::spawn(run_channel_worker(channel, events, handler, cancel.clone()))
        })
        .collect()
}

async fn run_channel_worker(
    channel: NotificationChannel,
    mut events: EventReceiver,
    handler: Arc<dyn NotificationHandler>,
    cancel: CancellationToken,
) {
    tracing::info!(%channel, "渠道 worker 已启动");
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            received = events.recv() => match received {
                Some(event) => {
                    tracing::info!(%channel, event_id = ?event.id, event_type = %event.event_type, "收到渠道事件");
                    handler.send(event).await;
                }
                None => break,
            },
        }
    }
    tracing::info!(%channel, "渠道 worker 已停止");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::Topic;
    use async_trait::async_trait;
    use domain::EventType;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// 把收到的事件转发到测试通道的处理器
    struct RecordingHandler {
        channel: NotificationChannel,
        seen: mpsc::UnboundedSender<NotificationEvent>,
    }

    #[async_trait]
    impl NotificationHandler for RecordingHandler {
        fn channel(&self) -> NotificationChannel {
            self.channel
        }

        async fn send(&self, event: NotificationEvent) -> bool {
            self.seen.send(event).is_ok()
        }
    }

    fn event(channel: NotificationChannel, message: &str) -> NotificationEvent {
        NotificationEvent::new(EventType::Manual, channel, "r", "s", message)
    }

    #[tokio::test]
    async fn dispatch_worker_routes_by_channel_and_skips_unknown() {
        let broker = NotificationBroker::new();
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
        let handlers = HandlerRegistry::new().register(Arc::new(RecordingHandler {
            channel: NotificationChannel::Sms,
            seen: seen_tx,
        }));

        let cancel = CancellationToken::new();
        let worker = tokio::spawn(run_dispatch_worker(
            broker.subscribe(Topic::All, 16),
            handlers,
            cancel.clone(),
        ));

        broker.publish(event(NotificationChannel::Email, "no handler"));
        broker.publish(event(NotificationChannel::Sms, "handled"));

        let delivered = tokio::time::timeout(Duration::from_secs(1), seen_rx.recv())
            .await
            .expect("delivered in time")
            .expect("event");
        assert_eq!(delivered.message, "handled");

        broker.close();
        tokio::time::timeout(Duration::from_secs(1), worker)
            .await
            .expect("worker stops after close")
            .unwrap();
        assert!(seen_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dispatch_worker_drains_buffered_events_after_close() {
        let broker = NotificationBroker::new();
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
        let handlers = HandlerRegistry::new().register(Arc::new(RecordingHandler {
            channel: NotificationChannel::Sms,
            seen: seen_tx,
        }));
        let events = broker.subscribe(Topic::All, 16);

        broker.publish(event(NotificationChannel::Sms, "first"));
        broker.publish(event(NotificationChannel::Sms, "second"));
        broker.close();

        tokio::time::timeout(
            Duration::from_secs(1),
            run_dispatch_worker(events, handlers, CancellationToken::new()),
        )
        .await
        .expect("worker stops once the queue is drained");

        assert_eq!(seen_rx.recv().await.unwrap().message, "first");
        assert_eq!(seen_rx.recv().await.unwrap().message, "second");
        assert!(seen_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn workers_stop_on_cancellation() {
        let broker = NotificationBroker::new();
        let cancel = CancellationToken::new();
        let handlers = HandlerRegistry::with_default_channels();

        let mut tasks = spawn_channel_workers(&broker, &handlers, 8, cancel.clone());
        assert_eq!(tasks.len(), 3);
        assert_eq!(broker.subscriber_count(NotificationChannel::Viber), 1);

        tasks.push(tokio::spawn(run_dispatch_worker(
            broker.subscribe(Topic::All, 8),
            handlers,
            cancel.clone(),
        )));

        cancel.cancel();
        for task in tasks {
            tokio::time::timeout(Duration::from_secs(1), task)
                .await
                .expect("worker stops after cancel")
                .unwrap();
        }
        assert!(!broker.is_closed());
    }
}
