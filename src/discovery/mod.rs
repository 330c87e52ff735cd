//! # 服务发现模块
//!
//! 将服务标识解析为可访问的基础地址。解析由一组有序策略组成，
//! 第一个命中的结果按原始标识无限期缓存；未命中不缓存。

pub mod descriptor;
pub mod direct;
pub mod domain_probe;
pub mod extract;
pub mod registry_client;
pub mod registry_query;
pub mod variants;

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub use direct::DirectLookupStrategy;
pub use domain_probe::{DomainProbeStrategy, EndpointProber, HttpEndpointProber};
pub use registry_client::{ServiceInstance, ServiceRegistryClient, StaticServiceRegistry};
pub use registry_query::RegistryQueryStrategy;

use crate::config::DiscoveryConfig;
use crate::logging::{LogComponent, LogStage};
use crate::vars::VariableSource;
use crate::{ldebug, linfo};

/// 单个发现策略
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    /// 策略名称，用于日志
    fn name(&self) -> &'static str;

    /// 尝试解析服务标识，失败一律返回 `None`
    async fn attempt(&self, token: &str) -> Option<String>;
}

/// 服务解析器
pub struct ServiceResolver {
    strategies: Vec<Arc<dyn DiscoveryStrategy>>,
    cache: DashMap<String, String>,
}

impl ServiceResolver {
    /// 使用给定的有序策略创建解析器
    #[must_use]
    pub fn new(strategies: Vec<Arc<dyn DiscoveryStrategy>>) -> Self {
        Self {
            strategies,
            cache: DashMap::new(),
        }
    }

    /// 按标准顺序组装：直接查询、域名探测、注册中心 API 查询
    #[must_use]
    pub fn standard(
        config: &DiscoveryConfig,
        registry: Arc<dyn ServiceRegistryClient>,
        vars: Arc<dyn VariableSource>,
        client: Client,
    ) -> Self {
        let prober = Arc::new(HttpEndpointProber::new(
            client.clone(),
            config.health_path.clone(),
            Duration::from_millis(config.probe_timeout_ms),
        ));

        let strategies: Vec<Arc<dyn DiscoveryStrategy>> = vec![
            Arc::new(DirectLookupStrategy::new(registry)),
            Arc::new(DomainProbeStrategy::new(Arc::clone(&vars), prober)),
            Arc::new(RegistryQueryStrategy::new(
                vars,
                client,
                Duration::from_millis(config.registry_timeout_ms),
            )),
        ];
        Self::new(strategies)
    }

    /// 解析服务标识
    pub async fn resolve(&self, token: &str) -> Option<String> {
        if let Some(cached) = self.cached(token) {
            return Some(cached);
        }

        for strategy in &self.strategies {
            if let Some(url) = strategy.attempt(token).await {
                linfo!(
                    "system",
                    LogStage::Discovery,
                    LogComponent::ServiceResolver,
                    "service_resolved",
                    "Resolved service URL",
                    token = token,
                    strategy = strategy.name(),
                    url = %url
                );
                self.cache.insert(token.to_string(), url.clone());
                return Some(url);
            }
        }

        ldebug!(
            "system",
            LogStage::Discovery,
            LogComponent::ServiceResolver,
            "service_not_found",
            "No discovery strategy found the service",
            token = token
        );
        None
    }

    /// 仅查缓存
    #[must_use]
    pub fn cached(&self, token: &str) -> Option<String> {
        self.cache.get(token).map(|entry| entry.value().clone())
    }

    /// 清空全部已解析结果，返回清除的条目数
    pub fn clear(&self) -> usize {
        let count = self.cache.len();
        self.cache.clear();
        linfo!(
            "system",
            LogStage::Cache,
            LogComponent::ServiceResolver,
            "discovery_cache_cleared",
            "Service URL cache cleared",
            cleared = count
        );
        count
    }

    /// 已缓存的服务数
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// 缓存是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
