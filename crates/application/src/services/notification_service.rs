use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use domain::{
    Booking, EventType, NotificationChannel, NotificationEvent, NotificationResponse,
    NotificationType, NotificationTypeRepository, Room,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    broker::{NotificationBroker, Topic, DEFAULT_QUEUE_CAPACITY},
    error::{ApplicationError, NotificationError},
    handlers::HandlerRegistry,
    worker::run_dispatch_worker,
};

const DATE_FORMAT: &str = "%d.%m.%Y";

pub struct NotificationServiceDependencies {
    pub broker: Arc<NotificationBroker>,
    pub notification_type_repository: Arc<dyn NotificationTypeRepository>,
    pub handlers: HandlerRegistry,
}

/// 通知用例：手动发送、群发、预订生命周期通知，以及后台 worker 的生命周期。
///
/// 发送成功只表示事件已进入代理，实际投递由 worker 异步完成。
pub struct NotificationService {
    deps: NotificationServiceDependencies,
    worker_capacity: usize,
    worker_started: AtomicBool,
}

impl NotificationService {
    pub fn new(deps: NotificationServiceDependencies) -> Self {
        Self {
            deps,
            worker_capacity: DEFAULT_QUEUE_CAPACITY,
            worker_started: AtomicBool::new(false),
        }
    }

    pub fn with_worker_capacity(mut self, capacity: usize) -> Self {
        self.worker_capacity = capacity;
        self
    }

    pub fn broker(&self) -> Arc<NotificationBroker> {
        self.deps.broker.clone()
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.deps.handlers
    }

    /// 启动唯一的通配 worker，重复启动返回 `WorkerAlreadyStarted`。
    pub fn start_worker(
        &self,
        cancel: CancellationToken,
    ) -> Result<JoinHandle<()>, NotificationError> {
        if self.worker_started.swap(true, Ordering::SeqCst) {
            tracing::warn!("通知 worker 已经启动，忽略重复启动");
            return Err(NotificationError::WorkerAlreadyStarted);
        }

        let events = self.deps.broker.subscribe(Topic::All, self.worker_capacity);
        let handlers = self.deps.handlers.clone();
        Ok(tokio::spawn(run_dispatch_worker(events, handlers, cancel)))
    }

    pub fn send_email(&self, recipient: &str, subject: &str, message: &str) -> NotificationResponse {
        self.send(NotificationChannel::Email, recipient, subject, message)
    }

    pub fn send_sms(&self, recipient: &str, message: &str) -> NotificationResponse {
        self.send(NotificationChannel::Sms, recipient, "", message)
    }

    pub fn send_viber(&self, recipient: &str, message: &str) -> NotificationResponse {
        self.send(NotificationChannel::Viber, recipient, "", message)
    }

    /// 单渠道手动发送；短信和 Viber 不带主题。
    pub fn send_to_channel(
        &self,
        channel: NotificationChannel,
        recipient: &str,
        subject: &str,
        message: &str,
    ) -> NotificationResponse {
        match channel {
            NotificationChannel::Email => self.send_email(recipient, subject, message),
            NotificationChannel::Sms => self.send_sms(recipient, message),
            NotificationChannel::Viber => self.send_viber(recipient, message),
        }
    }

    /// 依次向每个渠道发送，每个请求的渠道对应一条回执；未知渠道记为失败，不影响其余渠道。
    pub fn broadcast<S: AsRef<str>>(
        &self,
        channels: &[S],
        recipient: &str,
        subject: &str,
        message: &str,
    ) -> Vec<NotificationResponse> {
        channels
            .iter()
            .map(|name| match name.as_ref().parse::<NotificationChannel>() {
                Ok(channel) => self.send_to_channel(channel, recipient, subject, message),
                Err(_) => {
                    let err = NotificationError::UnknownChannel(name.as_ref().to_string());
                    tracing::warn!(error = %err, "群发时跳过未知渠道");
                    NotificationResponse::failed(format!("Unknown channel: {}", name.as_ref()))
                }
            })
            .collect()
    }

    /// 预订创建通知只发邮件
    pub fn notify_booking_created(&self, booking: &Booking, room: &Room) -> NotificationResponse {
        let message = format_booking_message("Booking Created Successfully!", booking, room);
        let event = NotificationEvent::new(
            EventType::BookingCreated,
            NotificationChannel::Email,
            &booking.guest_info.email,
            format!("Booking Created - Room {}", room.room_number),
            message,
        )
        .with_data("booking_id", booking.id)
        .with_data("room_id", room.id);

        self.publish(event, "Email notification queued")
    }

    pub fn notify_booking_confirmed(
        &self,
        booking: &Booking,
        room: &Room,
    ) -> Vec<NotificationResponse> {
        let message =
            format_booking_message("Booking Confirmed! We are waiting for you!", booking, room);
        self.broadcast_lifecycle(
            EventType::BookingConfirmed,
            booking,
            room,
            format!("Booking Confirmed - Room {}", room.room_number),
            message,
        )
    }

    pub fn notify_booking_cancelled(
        &self,
        booking: &Booking,
        room: &Room,
    ) -> Vec<NotificationResponse> {
        let message = format!(
            "Booking #{} cancelled.\nRoom: {}\nDates: {} - {}",
            booking.id,
            room.room_number,
            booking.start_date.format(DATE_FORMAT),
            booking.end_date.format(DATE_FORMAT),
        );
        self.broadcast_lifecycle(
            EventType::BookingCancelled,
            booking,
            room,
            format!("Booking Cancelled - Room {}", room.room_number),
            message,
        )
    }

    pub async fn notification_types(&self) -> Result<Vec<NotificationType>, ApplicationError> {
        Ok(self.deps.notification_type_repository.get_all().await?)
    }

    pub fn event_log(&self) -> Vec<NotificationEvent> {
        self.deps.broker.event_log()
    }

    fn send(
        &self,
        channel: NotificationChannel,
        recipient: &str,
        subject: &str,
        message: &str,
    ) -> NotificationResponse {
        let event = NotificationEvent::new(EventType::Manual, channel, recipient, subject, message);
        self.publish(event, queued_message(channel))
    }

    /// 确认、取消通知发往全部三个渠道，事件类型保留生命周期类型
    fn broadcast_lifecycle(
        &self,
        event_type: EventType,
        booking: &Booking,
        room: &Room,
        subject: String,
        message: String,
    ) -> Vec<NotificationResponse> {
        NotificationChannel::ALL
            .into_iter()
            .map(|channel| {
                let subject = match channel {
                    NotificationChannel::Email => subject.clone(),
                    NotificationChannel::Sms | NotificationChannel::Viber => String::new(),
                };
                let event = NotificationEvent::new(
                    event_type,
                    channel,
                    &booking.guest_info.email,
                    subject,
                    message.clone(),
                )
                .with_data("booking_id", booking.id)
                .with_data("room_id", room.id);
                self.publish(event, queued_message(channel))
            })
            .collect()
    }

    fn publish(&self, event: NotificationEvent, queued: &str) -> NotificationResponse {
        let channel = event.channel;
        let event_type = event.event_type;
        match self.deps.broker.publish(event) {
            Some(event_id) => {
                tracing::debug!(%event_id, %channel, %event_type, "通知已入队");
                NotificationResponse::queued(queued, event_id)
            }
            None => {
                tracing::warn!(%channel, %event_type, "通知代理已关闭，通知未入队");
                NotificationResponse::failed(NotificationError::BrokerClosed.to_string())
            }
        }
    }
}

fn queued_message(channel: NotificationChannel) -> &'static str {
    match channel {
        NotificationChannel::Email => "Email notification queued",
        NotificationChannel::Sms => "SMS notification queued",
        NotificationChannel::Viber => "Viber notification queued",
    }
}

fn format_booking_message(header: &str, booking: &Booking, room: &Room) -> String {
    let mut body = String::new();
    // 写入 String 不会失败
    let _ = writeln!(body, "{header}\n");
    let _ = writeln!(body, "Booking ID: #{}", booking.id);
    let _ = writeln!(body, "Room: {} ({})", room.room_number, room.room_type);
    let _ = writeln!(body, "Check-in: {}", booking.start_date.format(DATE_FORMAT));
    let _ = writeln!(body, "Check-out: {}", booking.end_date.format(DATE_FORMAT));
    let _ = writeln!(body, "Price: {:.2} RUB", booking.price);
    let _ = writeln!(body, "\nGuest: {}", booking.guest_info.name);
    body
}
