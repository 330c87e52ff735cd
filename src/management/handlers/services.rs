//! # 服务发现处理器

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use crate::management::server::AppState;

/// 服务地址查询结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUrlResponse {
    /// 查询的服务名
    pub service_name: String,
    /// 解析出的地址
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    /// 是否解析成功
    pub success: bool,
    /// 失败原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

/// 解析服务地址
pub async fn get_service_url(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> (StatusCode, Json<ServiceUrlResponse>) {
    match state.services.resolve(&name).await {
        Some(url) => (
            StatusCode::OK,
            Json(ServiceUrlResponse {
                service_name: name,
                service_url: Some(url),
                success: true,
                error: None,
            }),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(ServiceUrlResponse {
                service_name: name,
                service_url: None,
                success: false,
                error: Some("Service not found in registry"),
            }),
        ),
    }
}
