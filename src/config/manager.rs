//! # 配置管理器
//!
//! 加载 TOML 配置文件并应用 `GATEWAY_` 前缀的环境变量覆盖

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::AppConfig;
use crate::error::{ProxyError, Result};

/// 环境变量覆盖前缀
const ENV_PREFIX: &str = "GATEWAY_";

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// 根据环境变量确定配置文件路径
    ///
    /// `GATEWAY_CONFIG_PATH` 优先，否则使用 `config/config.{RUST_ENV}.toml`。
    #[must_use]
    pub fn new() -> Self {
        let config_path = env::var("GATEWAY_CONFIG_PATH").unwrap_or_else(|_| {
            let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
            format!("config/config.{env}.toml")
        });
        Self::with_path(config_path)
    }

    /// 使用指定路径
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    /// 当前配置文件路径
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 加载配置并应用进程环境变量覆盖
    pub fn load(&self) -> Result<AppConfig> {
        let overrides = Self::build_env_overrides(env::vars());
        self.load_with_overrides(&overrides)
    }

    /// 加载配置并应用给定的覆盖表
    pub fn load_with_overrides(&self, overrides: &HashMap<String, String>) -> Result<AppConfig> {
        let mut config = Self::load_config_file(&self.config_path)?;
        Self::apply_env_overrides(&mut config, overrides)?;
        super::validate_config(&config)?;

        info!(
            path = %self.config_path.display(),
            overrides = overrides.len(),
            "配置加载完成"
        );
        Ok(config)
    }

    /// 加载配置文件，文件不存在时使用默认配置
    fn load_config_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            info!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ProxyError::config_with_source(format!("读取配置文件失败: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| {
            ProxyError::config_with_source(
                format!("TOML解析失败 - 配置文件: {}, 详细错误: {e}", path.display()),
                e,
            )
        })
    }

    /// 构建环境变量覆盖映射
    ///
    /// `GATEWAY_SERVER_PORT` 映射为 `server.port`。
    pub fn build_env_overrides(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> HashMap<String, String> {
        let overrides: HashMap<String, String> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .filter(|rest| *rest != "CONFIG_PATH")
                    .map(|rest| (rest.to_lowercase().replace('_', "."), value))
            })
            .collect();

        debug!("发现 {} 个环境变量覆盖", overrides.len());
        overrides
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(
        config: &mut AppConfig,
        overrides: &HashMap<String, String>,
    ) -> Result<()> {
        for (path, value) in overrides {
            debug!("应用环境变量覆盖: {} = {}", path, value);
            Self::apply_override_to_config(config, path, value)?;
        }
        Ok(())
    }

    fn apply_override_to_config(config: &mut AppConfig, path: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => config.server.host = value.to_string(),
            ["server", "port"] => config.server.port = parse_value(path, value)?,
            ["proxy", "timeout", "ms"] => config.proxy.timeout_ms = parse_value(path, value)?,
            ["proxy", "enable", "caching"] => {
                config.proxy.enable_caching = parse_value(path, value)?;
            }
            ["proxy", "cache", "ttl", "ms"] => {
                config.proxy.cache_ttl_ms = parse_value(path, value)?;
            }
            ["proxy", "user", "agent"] => config.proxy.user_agent = value.to_string(),
            ["diagrams", "dir"] => config.diagrams.directories = vec![value.to_string()],
            _ => {
                warn!("未知的配置路径，忽略环境变量覆盖: {}", path);
            }
        }

        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_value<T>(path: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().map_err(|e| {
        ProxyError::config_with_source(format!("无效的配置值 {path}: {value}"), e)
    })
}
