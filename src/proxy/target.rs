//! 代理目标解析
//!
//! `/metrics` 的 `url` 参数既可以是完整的 `http(s)://` 地址，也可以是
//! `service-token[/sub/path]` 形式的裸服务标识。

use regex::Regex;
use std::sync::{Arc, LazyLock};
use url::Url;

use crate::discovery::ServiceResolver;
use crate::error::{ProxyError, Result};

static SERVICE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-]+(/.*)?$").expect("valid regex"));

/// 拆分后的服务标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentifier {
    /// 第一个 `/` 之前的部分，作为发现缓存键
    pub service_token: String,
    /// 剩余路径，包含开头的 `/`；没有时为空
    pub suffix_path: String,
}

impl ServiceIdentifier {
    /// 拆分服务标识与后缀路径
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('/') {
            Some((token, rest)) => Self {
                service_token: token.to_string(),
                suffix_path: format!("/{rest}"),
            },
            None => Self {
                service_token: raw.to_string(),
                suffix_path: String::new(),
            },
        }
    }

    /// 拼接到已解析的基础地址上，避免出现双斜杠
    #[must_use]
    pub fn join(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.suffix_path)
    }
}

/// 代理目标分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyTarget {
    /// 完整 URL，直接代理
    Url(String),
    /// 需要先经过服务发现的裸标识
    Service(ServiceIdentifier),
    /// 既不是 URL 也不像服务名
    Invalid,
}

impl ProxyTarget {
    /// 判断目标类型
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        if is_absolute_url(raw) {
            Self::Url(raw.to_string())
        } else if looks_like_service_name(raw) {
            Self::Service(ServiceIdentifier::parse(raw))
        } else {
            Self::Invalid
        }
    }
}

/// 将 `/metrics` 的 `url` 参数解析为可直接请求的地址
pub struct TargetResolver {
    services: Arc<ServiceResolver>,
}

impl TargetResolver {
    /// 创建目标解析器
    #[must_use]
    pub fn new(services: Arc<ServiceResolver>) -> Self {
        Self { services }
    }

    /// 完整 URL 原样返回；服务标识经发现后拼接子路径
    ///
    /// 既不是 URL 也不像服务名时返回 [`ProxyError::Validation`]，
    /// 服务发现未命中时返回 [`ProxyError::NotFound`]。
    pub async fn resolve(&self, raw: &str) -> Result<String> {
        match ProxyTarget::classify(raw) {
            ProxyTarget::Url(url) => Ok(url),
            ProxyTarget::Service(id) => self
                .services
                .resolve(&id.service_token)
                .await
                .map(|base| id.join(&base))
                .ok_or_else(|| ProxyError::not_found("service", raw)),
            ProxyTarget::Invalid => Err(ProxyError::validation(
                format!("Invalid URL format and not a recognized service name: {raw}"),
                Some("url"),
            )),
        }
    }
}

/// scheme 为 http 或 https 的绝对地址
#[must_use]
pub fn is_absolute_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// 字母、数字、连字符组成的服务名，可带路径
#[must_use]
pub fn looks_like_service_name(raw: &str) -> bool {
    !raw.starts_with("http://") && !raw.starts_with("https://") && SERVICE_NAME_PATTERN.is_match(raw)
}
