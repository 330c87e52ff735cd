//! # 缓存管理处理器

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::cache::CacheStats;
use crate::logging::{LogComponent, LogStage};
use crate::management::response;
use crate::management::server::AppState;
use crate::linfo;

/// 各缓存清理的条目数
#[derive(Debug, Serialize)]
pub struct ClearedCaches {
    /// 服务发现缓存
    pub discovery: usize,
    /// 凭证缓存
    pub credentials: usize,
    /// 响应缓存
    pub responses: usize,
}

/// 缓存概览
#[derive(Debug, Serialize)]
pub struct CacheOverview {
    /// 服务发现缓存条目数
    pub discovery_entries: usize,
    /// 凭证缓存条目数
    pub credential_entries: usize,
    /// 响应缓存统计
    pub responses: CacheStats,
}

/// 清空发现、凭证和响应三类缓存
pub async fn clear_caches(State(state): State<AppState>) -> Response {
    let cleared = ClearedCaches {
        discovery: state.services.clear(),
        credentials: state.credentials.clear(),
        responses: state.response_cache.clear(),
    };

    linfo!(
        "system",
        LogStage::Cache,
        LogComponent::Handler,
        "caches_cleared",
        "All caches cleared",
        discovery = cleared.discovery,
        credentials = cleared.credentials,
        responses = cleared.responses
    );
    response::success_with_message(cleared, "Caches cleared")
}

/// 缓存统计
pub async fn cache_stats(State(state): State<AppState>) -> Response {
    response::success(CacheOverview {
        discovery_entries: state.services.len(),
        credential_entries: state.credentials.len(),
        responses: state.response_cache.stats(),
    })
}
