//! # 直接实例查询

use async_trait::async_trait;
use std::sync::Arc;

use super::DiscoveryStrategy;
use super::registry_client::ServiceRegistryClient;
use super::variants::lookup_variants;
use crate::ldebug;
use crate::logging::{LogComponent, LogStage};

/// 依次用原名和大小写变体查询注册表，第一个有实例的名称胜出
pub struct DirectLookupStrategy {
    registry: Arc<dyn ServiceRegistryClient>,
}

impl DirectLookupStrategy {
    /// 创建直接查找策略
    pub fn new(registry: Arc<dyn ServiceRegistryClient>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl DiscoveryStrategy for DirectLookupStrategy {
    fn name(&self) -> &'static str {
        "direct_lookup"
    }

    async fn attempt(&self, token: &str) -> Option<String> {
        for variant in lookup_variants(token) {
            if let Some(instance) = self.registry.instances(&variant).await.into_iter().next() {
                ldebug!(
                    "system",
                    LogStage::Discovery,
                    LogComponent::ServiceResolver,
                    "direct_lookup_hit",
                    "Found service instance in registry",
                    token = token,
                    variant = %variant,
                    uri = %instance.uri
                );
                return Some(instance.uri);
            }
        }
        None
    }
}
