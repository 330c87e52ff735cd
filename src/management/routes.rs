//! # 路由配置
//!
//! 定义所有API路由和路由组织

use axum::Router;
use axum::routing::get;

use crate::management::handlers::{cache, diagrams, metrics, services, system};
use crate::management::server::AppState;

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(system::health_check))
        // 代理与服务发现
        .route("/metrics", get(metrics::proxy_metrics))
        .route("/service-url/{name}", get(services::get_service_url))
        // 图表配置
        .route("/diagrams", get(diagrams::list_diagrams))
        .route("/diagrams/{filename}", get(diagrams::get_diagram))
        .route("/node-details", get(diagrams::node_details_usage))
        .route("/node-details/{node}", get(diagrams::get_node_details))
        // 缓存管理
        .route("/cache", axum::routing::delete(cache::clear_caches))
        .route("/cache/stats", get(cache::cache_stats))
        .with_state(state)
}
