//! # 网关服务器
//!
//! Axum HTTP服务器，挂载代理、服务发现、图表和缓存管理接口

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app::AppContext;
use crate::config::ServerConfig;
use crate::error::{ProxyError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{linfo, lwarn};

/// 服务器应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    /// 创建应用状态
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    /// 共享的应用上下文
    #[must_use]
    pub const fn context_arc(&self) -> &Arc<AppContext> {
        &self.context
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// 网关服务器
pub struct GatewayServer {
    config: ServerConfig,
    router: Router,
}

impl GatewayServer {
    /// 由应用上下文创建服务器
    #[must_use]
    pub fn new(context: Arc<AppContext>) -> Self {
        let config = context.config.server.clone();
        let router = Self::create_router(AppState::new(context), &config);
        Self { config, router }
    }

    /// 创建路由器
    #[must_use]
    pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
        let api_routes = super::routes::create_routes(state);
        // axum 不允许在根路径 nest
        let app = match config.api_prefix.trim_end_matches('/') {
            "" => api_routes,
            prefix => Router::new().nest(prefix, api_routes),
        };

        let service_builder = ServiceBuilder::new().layer(TraceLayer::new_for_http());
        if config.enable_cors {
            app.layer(service_builder.layer(Self::cors_layer(&config.cors_origins)))
        } else {
            app.layer(service_builder)
        }
    }

    fn cors_layer(origins: &[String]) -> CorsLayer {
        let cors_layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]);

        if origins.iter().any(|origin| origin == "*") {
            return cors_layer.allow_origin(Any);
        }

        let parsed = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<std::result::Result<Vec<_>, _>>();

        match parsed {
            Ok(origins) => cors_layer.allow_origin(origins),
            Err(e) => {
                lwarn!(
                    "system",
                    LogStage::Startup,
                    LogComponent::ServerSetup,
                    "cors_config_fail",
                    "Invalid CORS origin configuration, falling back to allow any",
                    error = %e
                );
                cors_layer.allow_origin(Any)
            }
        }
    }

    /// 监听地址
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let ip = self.config.host.parse::<std::net::IpAddr>().map_err(|e| {
            ProxyError::config_with_source(
                format!("Invalid bind address '{}'", self.config.host),
                e,
            )
        })?;
        Ok(SocketAddr::new(ip, self.config.port))
    }

    /// 路由器副本，便于在测试中直接驱动
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// 启动服务器，`shutdown` 被取消后优雅退出
    pub async fn serve(self, shutdown: CancellationToken) -> Result<()> {
        let addr = self.bind_address()?;
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            ProxyError::server_start_with_source(format!("Failed to bind {addr}"), e)
        })?;

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::ServerSetup,
            "server_start",
            "Gateway server listening",
            addr = %addr
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| ProxyError::network_with_source("Gateway server error", e))?;

        linfo!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "server_stopped",
            "Gateway server stopped"
        );
        Ok(())
    }
}
