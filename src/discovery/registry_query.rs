//! # 注册中心 API 查询
//!
//! 注册中心地址来自服务绑定描述符。先尝试 Eureka XML 接口，再尝试若干 REST
//! 风格的 JSON 接口，最后拉取完整服务列表按名称匹配。任何非 2xx、超时或解析失败
//! 都只视为当前路径未命中。

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::sync::Arc;
use std::time::Duration;

use super::DiscoveryStrategy;
use super::descriptor::registry_base_url;
use super::extract::{extract_service_url, extract_xml_host, find_in_listing};
use crate::logging::{LogComponent, LogStage};
use crate::vars::VariableSource;
use crate::{ldebug, linfo};

/// 服务列表接口，按顺序尝试
pub const LISTING_PATHS: [&str; 5] = [
    "/eureka/apps",
    "/api/services",
    "/api/applications",
    "/apps",
    "/services",
];

/// 单服务 JSON 查询路径，按顺序尝试
#[must_use]
pub fn direct_query_paths(token: &str) -> [String; 4] {
    [
        format!("/api/services/{token}"),
        format!("/api/applications/{token}"),
        format!("/apps/{}", token.to_uppercase()),
        format!("/services/{token}"),
    ]
}

/// 注册中心 API 查询策略
pub struct RegistryQueryStrategy {
    vars: Arc<dyn VariableSource>,
    client: Client,
    timeout: Duration,
}

impl RegistryQueryStrategy {
    /// 创建注册中心查询策略
    pub fn new(vars: Arc<dyn VariableSource>, client: Client, timeout: Duration) -> Self {
        Self {
            vars,
            client,
            timeout,
        }
    }

    /// GET 请求，仅 2xx 返回响应体
    async fn fetch(&self, url: &str, accept: &str) -> Option<String> {
        let request = self.client.get(url).header(ACCEPT, accept).send();
        let response = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                ldebug!(
                    "system",
                    LogStage::Discovery,
                    LogComponent::ServiceResolver,
                    "registry_request_failed",
                    "Registry request failed",
                    url = url,
                    error = %e
                );
                return None;
            }
            Err(_) => {
                ldebug!(
                    "system",
                    LogStage::Discovery,
                    LogComponent::ServiceResolver,
                    "registry_request_timeout",
                    "Registry request timed out",
                    url = url
                );
                return None;
            }
        };

        if !response.status().is_success() {
            return None;
        }
        response.text().await.ok()
    }

    async fn query_xml(&self, registry: &str, token: &str) -> Option<String> {
        let url = format!("{registry}/eureka/apps/{}", token.to_uppercase());
        let body = self.fetch(&url, "application/xml").await?;
        extract_xml_host(&body)
    }

    async fn query_direct_paths(&self, registry: &str, token: &str) -> Option<String> {
        for path in direct_query_paths(token) {
            let url = format!("{registry}{path}");
            if let Some(found) = self
                .fetch(&url, "application/json")
                .await
                .and_then(|body| extract_service_url(&body))
            {
                return Some(found);
            }
        }
        None
    }

    async fn query_listings(&self, registry: &str, token: &str) -> Option<String> {
        for path in LISTING_PATHS {
            let url = format!("{registry}{path}");
            if let Some(found) = self
                .fetch(&url, "application/json")
                .await
                .and_then(|body| find_in_listing(&body, token))
            {
                return Some(found);
            }
        }
        None
    }
}

#[async_trait]
impl DiscoveryStrategy for RegistryQueryStrategy {
    fn name(&self) -> &'static str {
        "registry_query"
    }

    async fn attempt(&self, token: &str) -> Option<String> {
        let registry = registry_base_url(self.vars.as_ref())?;

        let found = match self.query_xml(&registry, token).await {
            Some(url) => Some(url),
            None => match self.query_direct_paths(&registry, token).await {
                Some(url) => Some(url),
                None => self.query_listings(&registry, token).await,
            },
        };

        if let Some(url) = &found {
            linfo!(
                "system",
                LogStage::Discovery,
                LogComponent::ServiceResolver,
                "registry_query_hit",
                "Service found through registry API",
                token = token,
                registry = %registry,
                url = %url
            );
        }
        found
    }
}
