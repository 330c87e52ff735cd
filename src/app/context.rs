//! 应用上下文（DI 容器）
//!
//! 统一持有跨模块共享的服务实例，便于在测试中注入替身实现。

use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::CredentialResolver;
use crate::cache::{CacheCleanupTask, Clock, ResponseCache, SystemClock};
use crate::config::AppConfig;
use crate::diagrams::DiagramStore;
use crate::discovery::{ServiceRegistryClient, ServiceResolver, StaticServiceRegistry};
use crate::error::{Context, Result};
use crate::proxy::{ProxyExecutor, TargetResolver};
use crate::template::TemplateEngine;
use crate::vars::{LayeredVariables, ProcessEnv, StaticVariables, VariableSource};

/// 应用上下文，持有所有共享组件
#[derive(Clone)]
pub struct AppContext {
    /// 应用配置
    pub config: Arc<AppConfig>,
    /// 变量来源
    pub vars: Arc<dyn VariableSource>,
    /// 服务解析器
    pub services: Arc<ServiceResolver>,
    /// 凭证解析器
    pub credentials: Arc<CredentialResolver>,
    /// 响应缓存
    pub response_cache: Arc<ResponseCache>,
    /// 代理执行器
    pub proxy: Arc<ProxyExecutor>,
    /// 代理目标解析器
    pub targets: Arc<TargetResolver>,
    /// 模板替换引擎
    pub templates: Arc<TemplateEngine>,
    /// 图表与节点详情存储
    pub diagrams: Arc<DiagramStore>,
}

impl AppContext {
    /// 生产装配：进程环境优先，`[variables]` 表兜底；静态实例注册表；系统时钟
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let variables = StaticVariables::from(config.variables.clone());
        let vars = LayeredVariables::new()
            .with_layer(Arc::new(ProcessEnv))
            .with_layer(Arc::new(variables));
        let registry = Arc::new(StaticServiceRegistry::from_config(&config.discovery.instances));

        Self::with_parts(config, Arc::new(vars), registry, Arc::new(SystemClock))
    }

    /// 使用外部提供的变量来源、实例注册表和时钟装配
    pub fn with_parts(
        config: AppConfig,
        vars: Arc<dyn VariableSource>,
        registry: Arc<dyn ServiceRegistryClient>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.proxy.timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;

        let services = Arc::new(ServiceResolver::standard(
            &config.discovery,
            registry,
            Arc::clone(&vars),
            client.clone(),
        ));
        let credentials = Arc::new(CredentialResolver::new(Arc::clone(&vars)));
        let response_cache = Arc::new(ResponseCache::new(clock));
        let proxy = Arc::new(ProxyExecutor::new(
            client,
            Arc::clone(&credentials),
            Arc::clone(&response_cache),
            &config.proxy,
        ));
        let targets = Arc::new(TargetResolver::new(Arc::clone(&services)));
        let templates = Arc::new(TemplateEngine::new(Arc::clone(&services), Arc::clone(&vars)));
        let diagrams = Arc::new(
            DiagramStore::new(
                config.diagrams.directories.iter().map(PathBuf::from).collect(),
                Arc::clone(&templates),
            )
            .with_details_directories(
                config
                    .diagrams
                    .details_directories
                    .iter()
                    .map(PathBuf::from)
                    .collect(),
            ),
        );

        Ok(Self {
            config: Arc::new(config),
            vars,
            services,
            credentials,
            response_cache,
            proxy,
            targets,
            templates,
            diagrams,
        })
    }

    /// 响应缓存的定期清理任务
    #[must_use]
    pub fn cleanup_task(&self) -> CacheCleanupTask {
        CacheCleanupTask::new(
            Arc::clone(&self.response_cache),
            Duration::from_secs(self.config.proxy.cleanup_interval_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    #[tokio::test]
    async fn wires_shared_caches() {
        let config = AppConfig::default();
        let context = AppContext::with_parts(
            config,
            Arc::new(StaticVariables::new()),
            Arc::new(StaticServiceRegistry::new(Vec::new())),
            Arc::new(ManualClock::new()),
        )
        .unwrap();

        assert!(Arc::ptr_eq(context.proxy.cache(), &context.response_cache));
        assert!(context.services.is_empty());
        assert!(context.credentials.is_empty());
    }

    #[tokio::test]
    async fn config_variables_are_visible() {
        let mut config = AppConfig::default();
        config
            .variables
            .insert("DIAGRAM_GATEWAY_TEST_ONLY".to_string(), "from-config".to_string());

        let context = AppContext::from_config(config).unwrap();
        assert_eq!(
            context.vars.get("DIAGRAM_GATEWAY_TEST_ONLY").as_deref(),
            Some("from-config")
        );
    }
}
