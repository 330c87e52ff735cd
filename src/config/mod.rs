//! # 配置管理模块
//!
//! 处理应用配置加载、验证和管理

mod app_config;
mod manager;

pub use app_config::{
    AppConfig, DiagramsConfig, DiscoveryConfig, ProxyConfig, ServerConfig, StaticInstanceConfig,
};
pub use manager::ConfigManager;

use crate::ensure_config;

/// 使用默认路径加载配置文件
pub fn load_config() -> crate::error::Result<AppConfig> {
    ConfigManager::new().load()
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> crate::error::Result<()> {
    ensure_config!(config.server.port != 0, "无效的服务器端口: {}", config.server.port);
    ensure_config!(
        config.server.api_prefix.starts_with('/'),
        "API 前缀必须以 / 开头: {}",
        config.server.api_prefix
    );
    ensure_config!(config.proxy.timeout_ms > 0, "代理超时时间必须大于 0");
    ensure_config!(config.proxy.cache_ttl_ms > 0, "缓存 TTL 必须大于 0");
    ensure_config!(config.proxy.cleanup_interval_secs > 0, "缓存清理间隔必须大于 0");
    ensure_config!(config.discovery.probe_timeout_ms > 0, "探测超时时间必须大于 0");
    ensure_config!(config.discovery.registry_timeout_ms > 0, "注册中心超时时间必须大于 0");

    for instance in &config.discovery.instances {
        ensure_config!(
            !instance.service_id.trim().is_empty() && !instance.uri.trim().is_empty(),
            "静态服务实例缺少 service_id 或 uri"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let mut config = AppConfig::default();
        config.proxy.cache_ttl_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn blank_static_instance_is_rejected() {
        let mut config = AppConfig::default();
        config.discovery.instances.push(StaticInstanceConfig {
            service_id: "svc".to_string(),
            uri: " ".to_string(),
        });
        assert!(validate_config(&config).is_err());
    }
}
