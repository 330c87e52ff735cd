//! # 代理执行器
//!
//! 对已解析的目标地址发起带认证的 GET 请求。成功响应按配置写入 TTL 缓存；
//! 所有失败都被规范化为状态码加 JSON 体，不向调用方抛出。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::CredentialResolver;
use crate::cache::ResponseCache;
use crate::config::ProxyConfig;
use crate::error::UpstreamError;
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, linfo, lwarn};

const DEFAULT_USER_AGENT: &str = "Diagram-Designer-Proxy/1.0";

/// 代理结果：状态码与 JSON 体
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    /// 响应状态码
    pub status: StatusCode,
    /// JSON 响应体
    pub body: Value,
}

impl ProxyResponse {
    /// 200 响应
    #[must_use]
    pub const fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }
}

impl From<UpstreamError> for ProxyResponse {
    fn from(err: UpstreamError) -> Self {
        let (status, body) = err.into_response_parts();
        Self { status, body }
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// 代理执行器
#[derive(Debug)]
pub struct ProxyExecutor {
    client: Client,
    credentials: Arc<CredentialResolver>,
    cache: Arc<ResponseCache>,
    timeout: Duration,
    cache_ttl: Duration,
    enable_caching: bool,
    user_agent: HeaderValue,
}

impl ProxyExecutor {
    /// 创建代理执行器
    #[must_use]
    pub fn new(
        client: Client,
        credentials: Arc<CredentialResolver>,
        cache: Arc<ResponseCache>,
        config: &ProxyConfig,
    ) -> Self {
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT));

        Self {
            client,
            credentials,
            cache,
            timeout: Duration::from_millis(config.timeout_ms),
            cache_ttl: Duration::from_millis(config.cache_ttl_ms),
            enable_caching: config.enable_caching,
            user_agent,
        }
    }

    /// 响应缓存
    #[must_use]
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// 代理一次请求
    pub async fn proxy(&self, target_url: &str, node_hint: Option<&str>) -> ProxyResponse {
        if self.enable_caching {
            if let Some(payload) = self.cache.get(target_url) {
                ldebug!(
                    "proxy",
                    LogStage::Cache,
                    LogComponent::ProxyExecutor,
                    "cache_hit",
                    "Serving cached upstream response",
                    url = target_url
                );
                return ProxyResponse::ok(payload);
            }
        }

        match self.fetch(target_url, node_hint).await {
            Ok(payload) => {
                if self.enable_caching {
                    self.cache.insert(target_url, payload.clone(), self.cache_ttl);
                }
                linfo!(
                    "proxy",
                    LogStage::Response,
                    LogComponent::ProxyExecutor,
                    "upstream_success",
                    "Upstream request succeeded",
                    url = target_url
                );
                ProxyResponse::ok(payload)
            }
            Err(err) => {
                lwarn!(
                    "proxy",
                    LogStage::ResponseFailure,
                    LogComponent::ProxyExecutor,
                    "upstream_failure",
                    "Upstream request failed",
                    url = target_url,
                    error = %err
                );
                err.into()
            }
        }
    }

    async fn fetch(&self, target_url: &str, node_hint: Option<&str>) -> Result<Value, UpstreamError> {
        let mut headers = HeaderMap::new();
        if let Some(profile) = self.credentials.resolve_for_url(target_url, node_hint) {
            CredentialResolver::apply(&profile, &mut headers);
        }
        headers.insert(USER_AGENT, self.user_agent.clone());

        let response = self
            .client
            .get(target_url)
            .headers(headers)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::Http { status, body });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| UpstreamError::unavailable(e.to_string()))
    }
}
