//! 主应用程序入口
//!
//! 加载配置，组装存储、通知代理和应用服务，启动 Axum Web API 服务。

use std::sync::Arc;
use std::time::Duration;

use application::{
    spawn_channel_workers, AdminService, AdminServiceDependencies, BookingPolicy, BookingService,
    BookingServiceDependencies, HandlerRegistry, NotificationBroker, NotificationService,
    NotificationServiceDependencies, SystemClock,
};
use config::AppConfig;
use infrastructure::{Infrastructure, InfrastructureConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

/// 停止后等待 worker 取完剩余事件的最长时间
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG 优先，未设置时使用配置中的级别
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(config = %config.sanitize(), "配置已加载");

    let infrastructure = Infrastructure::connect(InfrastructureConfig::from(&config.database)).await?;

    let broker = Arc::new(NotificationBroker::new());
    let handlers = HandlerRegistry::with_default_channels();
    let cancel = CancellationToken::new();

    let booking_service = Arc::new(BookingService::with_policy(
        BookingServiceDependencies {
            room_repository: infrastructure.room_repository.clone(),
            booking_repository: infrastructure.booking_repository.clone(),
            special_date_repository: infrastructure.special_date_repository.clone(),
        },
        BookingPolicy {
            strict_transitions: config.booking.strict_transitions,
        },
    ));

    let admin_service = Arc::new(AdminService::new(AdminServiceDependencies {
        room_repository: infrastructure.room_repository.clone(),
        booking_repository: infrastructure.booking_repository.clone(),
        special_date_repository: infrastructure.special_date_repository.clone(),
        clock: Arc::new(SystemClock),
    }));

    let notification_service = Arc::new(
        NotificationService::new(NotificationServiceDependencies {
            broker: broker.clone(),
            notification_type_repository: infrastructure.notification_type_repository.clone(),
            handlers: handlers.clone(),
        })
        .with_worker_capacity(config.broker.worker_queue_capacity),
    );

    let mut workers = vec![notification_service.start_worker(cancel.clone())?];
    if config.broker.channel_workers {
        workers.extend(spawn_channel_workers(
            &broker,
            &handlers,
            config.broker.channel_queue_capacity,
            cancel.clone(),
        ));
    }
    tracing::info!(worker_count = workers.len(), "通知 worker 已启动");

    let state = AppState::new(booking_service, admin_service, notification_service);
    let app = router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("酒店预订服务启动在 http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 关闭代理后 worker 取完剩余事件自行退出
    broker.close();
    let drain = async {
        for worker in workers {
            if let Err(err) = worker.await {
                tracing::warn!(error = %err, "通知 worker 异常退出");
            }
        }
    };
    if tokio::time::timeout(SHUTDOWN_GRACE, drain).await.is_err() {
        tracing::warn!("通知 worker 未能按时退出，强制取消");
        cancel.cancel();
    }
    tracing::info!("服务已停止");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "无法监听 Ctrl+C 信号");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "无法监听 SIGTERM 信号");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("收到停止信号，开始优雅关闭");
}
