//! # 服务实例注册表客户端

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::StaticInstanceConfig;

/// 已注册的服务实例
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// 服务 ID
    pub service_id: String,
    /// 实例地址
    pub uri: String,
}

/// 按服务名查询实例的注册表
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRegistryClient: Send + Sync {
    /// 查询服务实例；查询失败与无实例都返回空列表
    async fn instances(&self, service_id: &str) -> Vec<ServiceInstance>;
}

/// 由配置文件提供的静态注册表，名称匹配忽略大小写
#[derive(Debug, Clone, Default)]
pub struct StaticServiceRegistry {
    instances: Vec<ServiceInstance>,
}

impl StaticServiceRegistry {
    /// 由实例列表创建
    #[must_use]
    pub fn new(instances: Vec<ServiceInstance>) -> Self {
        Self { instances }
    }

    /// 由配置项创建
    #[must_use]
    pub fn from_config(entries: &[StaticInstanceConfig]) -> Self {
        Self::new(
            entries
                .iter()
                .map(|entry| ServiceInstance {
                    service_id: entry.service_id.clone(),
                    uri: entry.uri.clone(),
                })
                .collect(),
        )
    }
}

#[async_trait]
impl ServiceRegistryClient for StaticServiceRegistry {
    async fn instances(&self, service_id: &str) -> Vec<ServiceInstance> {
        self.instances
            .iter()
            .filter(|instance| instance.service_id.eq_ignore_ascii_case(service_id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_registry_matches_ignoring_case() {
        let registry = StaticServiceRegistry::from_config(&[
            StaticInstanceConfig {
                service_id: "Billing-Service".to_string(),
                uri: "http://10.0.0.5:8080".to_string(),
            },
            StaticInstanceConfig {
                service_id: "other".to_string(),
                uri: "http://10.0.0.6:8080".to_string(),
            },
        ]);

        let found = registry.instances("billing-service").await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].uri, "http://10.0.0.5:8080");
        assert!(registry.instances("missing").await.is_empty());
    }
}
