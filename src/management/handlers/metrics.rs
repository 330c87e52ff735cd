//! # 指标代理处理器
//!
//! 响应体保持前端约定的扁平结构：成功时直接返回上游 JSON，
//! 参数错误与服务未找到时返回 `{error: ...}`。

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use crate::error::ProxyError;
use crate::logging::{LogComponent, LogStage};
use crate::management::server::AppState;
use crate::{ldebug, lwarn};

/// 指标代理查询参数
#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    /// 完整 URL 或服务标识
    pub url: Option<String>,
    /// 节点提示，用于选择凭证
    pub node: Option<String>,
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// 代理指标请求
pub async fn proxy_metrics(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Response {
    let raw = query.url.as_deref().map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return error_body(
            StatusCode::BAD_REQUEST,
            "URL parameter is required".to_string(),
        );
    }
    let node = query.node.as_deref().filter(|n| !n.trim().is_empty());

    let target = match state.targets.resolve(raw).await {
        Ok(target) => target,
        Err(ProxyError::NotFound { .. }) => {
            lwarn!(
                "proxy",
                LogStage::Discovery,
                LogComponent::Handler,
                "service_not_found",
                "Service not found in registry",
                url = raw
            );
            return error_body(
                StatusCode::NOT_FOUND,
                format!("Service not found in registry: {raw}"),
            );
        }
        Err(ProxyError::Validation { message, .. }) => {
            return error_body(StatusCode::BAD_REQUEST, message);
        }
        Err(other) => return other.into_response(),
    };

    ldebug!(
        "proxy",
        LogStage::UpstreamRequest,
        LogComponent::Handler,
        "proxy_metrics",
        "Proxying metrics request",
        target = %target,
        node = ?node
    );
    state.proxy.proxy(&target, node).await.into_response()
}
