//! # 系统处理器

use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// 服务名称
pub const SERVICE_NAME: &str = "diagram-gateway";

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// 固定为 `healthy`
    pub status: &'static str,
    /// 毫秒时间戳
    pub timestamp: i64,
    /// 服务名称
    pub service: &'static str,
}

/// 健康检查
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        timestamp: Utc::now().timestamp_millis(),
        service: SERVICE_NAME,
    })
}
