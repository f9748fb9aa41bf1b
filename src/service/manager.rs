//! 服务管理器
//!
//! 实现了服务的启动、停止和管理逻辑

use crate::service::HttpRouterService;
use anyhow::Result;
use axum::Router;
use realmgate_common::config::RealmgateConfig;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use std::sync::Arc;
use tracing::{error, info};

/// 服务管理器，负责管理多个服务的生命周期
pub struct ServiceManager {
    services: Vec<Box<dyn HttpRouterService>>,
    shutdown_tx: tokio::sync::broadcast::Sender<()>,
    config: RealmgateConfig,
}

impl ServiceManager {
    /// 创建新的服务管理器
    pub fn new(config: RealmgateConfig, shutdown_tx: tokio::sync::broadcast::Sender<()>) -> Self {
        Self {
            services: Vec::new(),
            shutdown_tx,
            config,
        }
    }

    /// 添加服务到管理器
    pub fn add_service(&mut self, service: Box<dyn HttpRouterService>) {
        info!("Adding service '{}' to manager", service.info().name);
        self.services.push(service);
    }

    /// 启动所有服务
    ///
    /// 合并所有 HTTP 路由服务到同一个服务器；`notify` 在端口绑定
    /// 成功后触发一次，供调用方等待就绪。
    pub async fn start_all(&mut self, notify: Arc<Notify>) -> Result<JoinHandle<()>> {
        info!(
            "Starting HTTP server with {} route services ({})",
            self.services.len(),
            self.services
                .iter()
                .map(|s| s.info().name.clone())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut services = std::mem::take(&mut self.services);

        // 构建合并的路由器
        let mut app = Router::new();
        for service in &mut services {
            let route_prefix = service.route_prefix().to_string();
            let service_name = service.info().name.clone();

            match service.build_router().await {
                Ok(router) => {
                    info!(
                        "Adding route '{}' for service '{}'",
                        route_prefix, service_name
                    );
                    app = app.nest(&route_prefix, router);
                    service
                        .info_mut()
                        .mark_running(format!("mounted at {route_prefix}"));
                }
                Err(e) => {
                    error!(
                        "Failed to build router for service '{}': {:?}",
                        service_name, e
                    );
                    service.info_mut().mark_error(e.to_string());
                    return Err(anyhow::anyhow!(
                        "Router build failed for service '{service_name}': {e}"
                    ));
                }
            }
        }

        // 添加全局中间件层
        let app = app
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        // 启动服务器
        let bind_addr = self.config.bind.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind '{bind_addr}': {e}"))?;
        info!("HTTP server listening on {}", bind_addr);
        notify.notify_one();

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let handle = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.recv().await;
                info!("Shutdown signal received, stopping HTTP server");
            };

            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!("HTTP server terminated with error: {}", e);
            }
        });

        Ok(handle)
    }

    /// 停止所有服务
    pub async fn stop_all(&mut self) -> Result<()> {
        info!("Stopping all services");
        let _ = self.shutdown_tx.send(());
        Ok(())
    }
}
