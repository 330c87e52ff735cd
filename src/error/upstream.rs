//! # 上游调用错误
//!
//! 代理路径上仅有的两类调用方可见失败：上游返回非 2xx，或根本无法完成调用。

use axum::http::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

/// 上游调用失败
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// 上游返回了非成功状态码
    #[error("Upstream responded with status {status}")]
    Http {
        /// 上游状态码
        status: StatusCode,
        /// 原始响应体
        body: String,
    },

    /// 超时、连接失败或响应解码失败
    #[error("Upstream unavailable: {message}")]
    Unavailable {
        /// 失败原因
        message: String,
    },
}

impl UpstreamError {
    /// 创建不可用错误，空消息回退为 "Network error"
    pub fn unavailable<T: Into<String>>(message: T) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Network error".to_string()
        } else {
            message
        };
        Self::Unavailable { message }
    }

    /// 规范化为返回给调用方的状态码与 JSON 体
    ///
    /// 上游错误体若能解析为 JSON 则原样透传，否则合成
    /// `{error: "Upstream service error", status}`。
    #[must_use]
    pub fn into_response_parts(self) -> (StatusCode, Value) {
        match self {
            Self::Http { status, body } => {
                let payload = serde_json::from_str::<Value>(&body).unwrap_or_else(|_| {
                    json!({
                        "error": "Upstream service error",
                        "status": status.as_u16(),
                    })
                });
                (status, payload)
            }
            Self::Unavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "error": "Service unavailable",
                    "message": message,
                }),
            ),
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        Self::unavailable(err.to_string())
    }
}
