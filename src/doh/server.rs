// src/doh/server.rs

use crate::config::Config;
use crate::doh::handlers::handle_relay;
use crate::doh::health::handle_health;
use crate::doh::state::AppState;
use crate::error::AppError;
use crate::r#const::paths;
use crate::upstream::Forwarder;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_graceful_shutdown::SubsystemHandle;
use tracing::{error, info};

/// 创建应用路由
///
/// `/health` 仅在启用时注册；其余所有请求交给中继处理器，
/// 由它负责分类、首页回退和 404。
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new();

    if state.config.endpoints.health {
        router = router.route(paths::HEALTH, get(handle_health));
    }

    router.fallback(handle_relay).with_state(state)
}

/// DoH 服务器结构体
pub struct DoHServer {
    /// 监听地址
    bind_addr: SocketAddr,
    /// 应用程序状态
    state: AppState,
    /// 关闭信号发送端
    shutdown_tx: oneshot::Sender<()>,
    /// 关闭信号接收端
    shutdown_rx: oneshot::Receiver<()>,
}

impl DoHServer {
    /// 创建新的 DoH 服务器
    pub fn new(config: Arc<Config>, forwarder: Arc<Forwarder>) -> Result<Self, AppError> {
        let bind_addr = config.server.listen.parse()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        Ok(Self {
            bind_addr,
            state: AppState { forwarder, config },
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// 启动 DoH 服务器
    pub async fn run(self, subsys: SubsystemHandle) -> Result<(), AppError> {
        // 创建路由
        let app = build_router(self.state.clone());

        // 创建 TCP 监听器
        let listener = match TcpListener::bind(self.bind_addr).await {
            Ok(listener) => {
                info!("DoH relay listening on {}", self.bind_addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind DoH relay: {}", e);
                return Err(AppError::Io(e));
            }
        };

        // 获取关闭信号接收端
        let shutdown_rx = self.shutdown_rx;

        // 启动 HTTP 服务器
        tokio::select! {
            result = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>()
            )
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("DoH relay received shutdown signal");
            }) => {
                if let Err(e) = result {
                    error!("DoH relay error: {}", e);
                    return Err(AppError::Server(e.to_string()));
                }
                info!("DoH relay completed normally");
                Ok(())
            }
            _ = subsys.on_shutdown_requested() => {
                info!("Shutdown requested, stopping DoH relay");
                let _ = self.shutdown_tx.send(());
                Ok(())
            }
        }
    }
}
