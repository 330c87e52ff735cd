//! # 错误处理测试

use crate::error::{Context, ProxyError, UpstreamError};
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::error::Error;

#[test]
fn test_config_error_creation() {
    let err = ProxyError::config("测试配置错误");
    assert!(matches!(err, ProxyError::Config { .. }));
    assert_eq!(err.to_string(), "配置错误: 测试配置错误");
}

#[test]
fn test_config_error_with_source() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在");
    let err = ProxyError::config_with_source("配置文件加载失败", io_err);

    assert!(matches!(err, ProxyError::Config { .. }));
    assert!(err.to_string().contains("配置错误: 配置文件加载失败"));
    assert!(err.source().is_some());
}

#[test]
fn test_config_error_macro() {
    let err = crate::config_error!("端口 {} 无效", 0);
    assert_eq!(err.to_string(), "配置错误: 端口 0 无效");
}

#[test]
fn test_context_trait_wraps_source() {
    let result: Result<(), std::io::Error> = Err(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "权限不足",
    ));

    let err = result.context("读取图表文件失败").unwrap_err();
    assert!(matches!(err, ProxyError::Context { .. }));
    assert!(err.to_string().starts_with("读取图表文件失败"));
    assert_eq!(
        err.to_http_response_parts(),
        (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR")
    );
}

#[test]
fn test_auto_conversion_from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在");
    let proxy_err: ProxyError = io_err.into();
    assert!(matches!(proxy_err, ProxyError::Io { .. }));
}

#[test]
fn test_http_response_parts() {
    let err = ProxyError::validation("bad name", Some("file"));
    assert_eq!(
        err.to_http_response_parts(),
        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
    );

    let err = ProxyError::not_found("diagram", "missing.json");
    assert_eq!(
        err.to_http_response_parts(),
        (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND")
    );
}

#[test]
fn test_upstream_http_error_passes_json_body_through() {
    let err = UpstreamError::Http {
        status: StatusCode::SERVICE_UNAVAILABLE,
        body: r#"{"reason":"overloaded"}"#.to_string(),
    };
    let (status, body) = err.into_response_parts();
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"reason": "overloaded"}));
}

#[test]
fn test_upstream_http_error_synthesizes_body_for_non_json() {
    let err = UpstreamError::Http {
        status: StatusCode::BAD_GATEWAY,
        body: "<html>bad gateway</html>".to_string(),
    };
    let (status, body) = err.into_response_parts();
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body,
        json!({"error": "Upstream service error", "status": 502})
    );
}

#[test]
fn test_upstream_unavailable_defaults_message() {
    let (status, body) = UpstreamError::unavailable("").into_response_parts();
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({"error": "Service unavailable", "message": "Network error"})
    );
}

#[test]
fn test_anyhow_error_becomes_internal() {
    let err: ProxyError = anyhow::anyhow!("registry client panicked").into();
    assert!(matches!(err, ProxyError::Internal { .. }));
    assert!(err.source().is_some());
    assert_eq!(
        err.to_http_response_parts(),
        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
    );
}
