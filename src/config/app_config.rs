//! # 应用配置结构定义

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 代理执行配置
    pub proxy: ProxyConfig,
    /// 服务发现配置
    pub discovery: DiscoveryConfig,
    /// 图表定义文件配置
    pub diagrams: DiagramsConfig,
    /// 额外的键值变量，优先级低于进程环境变量
    pub variables: HashMap<String, String>,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// API 路由前缀
    pub api_prefix: String,
    /// 是否启用 CORS
    pub enable_cors: bool,
    /// 允许的跨域来源，`*` 表示任意
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            api_prefix: "/api".to_string(),
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// 代理执行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// 上游请求超时（毫秒）
    pub timeout_ms: u64,
    /// 是否缓存成功响应
    pub enable_caching: bool,
    /// 响应缓存 TTL（毫秒）
    pub cache_ttl_ms: u64,
    /// 过期条目清理间隔（秒）
    pub cleanup_interval_secs: u64,
    /// 上游请求携带的 User-Agent
    pub user_agent: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            enable_caching: true,
            cache_ttl_ms: 30_000,
            cleanup_interval_secs: 60,
            user_agent: "Diagram-Designer-Proxy/1.0".to_string(),
        }
    }
}

/// 服务发现配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// 域名探测的健康检查超时（毫秒）
    pub probe_timeout_ms: u64,
    /// 注册中心 API 查询超时（毫秒）
    pub registry_timeout_ms: u64,
    /// 域名探测使用的健康检查路径
    pub health_path: String,
    /// 静态服务实例表
    pub instances: Vec<StaticInstanceConfig>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 5_000,
            registry_timeout_ms: 5_000,
            health_path: "/actuator/health".to_string(),
            instances: Vec::new(),
        }
    }
}

/// 静态注册的服务实例
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticInstanceConfig {
    /// 服务 ID
    pub service_id: String,
    /// 实例地址
    pub uri: String,
}

/// 图表定义文件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// 候选目录，第一个存在的目录生效
    pub directories: Vec<String>,
    /// 节点详情目录，按顺序查找 `{node}.json`
    pub details_directories: Vec<String>,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            directories: vec![
                "configs".to_string(),
                "../configs".to_string(),
                "./configs".to_string(),
            ],
            details_directories: vec![
                "details".to_string(),
                "configs/details".to_string(),
                "../configs/details".to_string(),
            ],
        }
    }
}
