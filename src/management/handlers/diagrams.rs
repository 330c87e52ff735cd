//! # 图表配置处理器

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::management::server::AppState;

/// 图表文件列表
#[derive(Debug, Serialize)]
pub struct DiagramList {
    /// 按名称排序的文件名
    pub diagrams: Vec<String>,
}

/// 列出图表文件
pub async fn list_diagrams(State(state): State<AppState>) -> Result<Json<DiagramList>> {
    let diagrams = state.diagrams.list().await?;
    Ok(Json(DiagramList { diagrams }))
}

/// 读取单个图表，返回替换后的 JSON 文档
pub async fn get_diagram(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response> {
    let document = state.diagrams.load(&filename).await?;
    Ok(json_document(document))
}

/// 读取节点详情，返回替换后的 JSON 文档
pub async fn get_node_details(
    State(state): State<AppState>,
    Path(node): Path<String>,
) -> Result<Response> {
    let document = state.diagrams.load_details(&node).await?;
    Ok(json_document(document))
}

/// 节点详情接口的用法说明
pub async fn node_details_usage() -> Json<Value> {
    Json(json!({
        "message": "Node details endpoint is active",
        "usage": "GET /api/node-details/{nodeName}",
        "location": "Place detail JSON files in one of the configured details directories",
        "example": {
            "title": "Service Details",
            "description": "Detailed information about this service",
            "sections": [
                {"title": "Configuration", "type": "info", "content": "<div>Service configuration details...</div>"},
                {"title": "Metrics", "type": "metrics", "content": "<div>Real-time metrics...</div>"}
            ],
            "links": [
                {"label": "Dashboard", "url": "https://dashboard.example.com", "type": "primary"}
            ]
        }
    }))
}

fn json_document(document: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], document).into_response()
}
