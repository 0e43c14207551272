// src/admin.rs

use crate::error::AppError;
use crate::metrics;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_graceful_shutdown::SubsystemHandle;
use tracing::{error, info};

// 管理服务器：存活检查与 Prometheus 指标
pub struct AdminServer {
    // 监听地址
    listen_addr: SocketAddr,
    // 停止信号接收端
    shutdown_rx: Option<oneshot::Receiver<()>>,
    // 停止信号发送端
    shutdown_tx: Option<oneshot::Sender<()>>,
}

// 管理路由
pub fn admin_routes() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(metrics::metrics_routes())
}

impl AdminServer {
    // 创建新的管理服务器
    pub fn new(listen_addr: SocketAddr) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        Self {
            listen_addr,
            shutdown_rx: Some(shutdown_rx),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    // 停止管理服务器
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("Admin server stop signal sent");
        }
    }

    // 启动管理服务器
    pub async fn start(&mut self) -> Result<(), AppError> {
        let listener = TcpListener::bind(self.listen_addr).await?;
        info!("Admin server listening on {}", self.listen_addr);

        let shutdown_rx = self
            .shutdown_rx
            .take()
            .ok_or_else(|| AppError::Server("Admin server already started".to_string()))?;

        axum::serve(listener, admin_routes())
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Admin server received shutdown signal");
            })
            .await?;

        Ok(())
    }

    // 作为子系统运行（用于优雅关闭集成）
    pub async fn run(mut self, subsys: SubsystemHandle) -> Result<(), AppError> {
        tokio::select! {
            res = self.start() => {
                if let Err(err) = res {
                    error!("Admin server error: {}", err);
                    Err(err)
                } else {
                    info!("Admin server stopped");
                    Ok(())
                }
            }
            _ = subsys.on_shutdown_requested() => {
                info!("Received subsystem shutdown request, admin server is stopping");
                self.shutdown();
                Ok(())
            }
        }
    }
}

// 存活检查处理程序
async fn health_handler() -> &'static str {
    "OK"
}
