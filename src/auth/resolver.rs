//! # 凭证解析器
//!
//! 根据目标主机（可选节点提示）推导一组键前缀，按前缀依次在变量来源中
//! 探测四种凭证形状。第一个命中的结果按主机无限期缓存；未命中不缓存，
//! 请求继续以匿名方式发出。

use dashmap::DashMap;
use indexmap::IndexSet;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use url::Url;

use super::types::{AuthProfile, DEFAULT_API_KEY_HEADER, DEFAULT_CLIENT_ID_HEADER};
use crate::logging::{LogComponent, LogStage};
use crate::vars::VariableSource;
use crate::{ldebug, linfo, lwarn};

/// 凭证形状，按优先级排列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialShape {
    /// `{P}_USERNAME` + `{P}_PASSWORD`
    Basic,
    /// `{P}_API_KEY`，可选 `{P}_API_HEADER`
    ApiKey,
    /// `{P}_BEARER_TOKEN`
    Bearer,
    /// `{P}_CLIENT_ID`，可选 `{P}_CLIENT_HEADER`
    ClientId,
}

impl CredentialShape {
    /// 固定的探测顺序
    pub const PRIORITY: [Self; 4] = [Self::Basic, Self::ApiKey, Self::Bearer, Self::ClientId];

    /// 在给定前缀下探测此形状
    pub fn probe(self, vars: &dyn VariableSource, prefix: &str) -> Option<AuthProfile> {
        let lookup = |suffix: &str| vars.get_non_blank(&format!("{prefix}_{suffix}"));

        match self {
            Self::Basic => {
                let username = lookup("USERNAME")?;
                let password = lookup("PASSWORD")?;
                Some(AuthProfile::Basic { username, password })
            }
            Self::ApiKey => lookup("API_KEY").map(|key| AuthProfile::ApiKey {
                header_name: lookup("API_HEADER")
                    .unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string()),
                key,
            }),
            Self::Bearer => lookup("BEARER_TOKEN").map(|token| AuthProfile::Bearer { token }),
            Self::ClientId => lookup("CLIENT_ID").map(|value| AuthProfile::Custom {
                header_name: lookup("CLIENT_HEADER")
                    .unwrap_or_else(|| DEFAULT_CLIENT_ID_HEADER.to_string()),
                value,
            }),
        }
    }
}

/// 大写并将 `.`、`-` 替换为 `_`
fn normalize_prefix(raw: &str) -> String {
    raw.trim().to_uppercase().replace(['.', '-'], "_")
}

/// 按优先级推导候选前缀
///
/// 1. 节点提示（规范化）
/// 2. 完整主机名（规范化）
/// 3. 主机名第一段，大写并去掉连字符
/// 4. 按 `.`、`-` 切分后长度大于 2 的各段，大写，按出现顺序
///
/// 重复前缀只保留最先出现的位置。
#[must_use]
pub fn candidate_prefixes(host: &str, node_hint: Option<&str>) -> Vec<String> {
    let host = host.trim();
    let mut prefixes: IndexSet<String> = IndexSet::new();

    if let Some(hint) = node_hint.map(str::trim).filter(|hint| !hint.is_empty()) {
        prefixes.insert(normalize_prefix(hint));
    }

    if !host.is_empty() {
        prefixes.insert(normalize_prefix(host));

        if let Some(first_label) = host.split('.').next().filter(|label| !label.is_empty()) {
            prefixes.insert(first_label.to_uppercase().replace('-', ""));
        }

        for label in host.split(['.', '-']).filter(|label| label.len() > 2) {
            prefixes.insert(label.to_uppercase());
        }
    }

    prefixes.into_iter().collect()
}

/// 从 URL 中取主机名
#[must_use]
pub fn host_of(target_url: &str) -> Option<String> {
    Url::parse(target_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

/// 凭证解析器
#[derive(Debug)]
pub struct CredentialResolver {
    vars: Arc<dyn VariableSource>,
    cache: DashMap<String, AuthProfile>,
}

impl CredentialResolver {
    /// 创建凭证解析器
    #[must_use]
    pub fn new(vars: Arc<dyn VariableSource>) -> Self {
        Self {
            vars,
            cache: DashMap::new(),
        }
    }

    /// 解析主机的认证配置
    ///
    /// 缓存只按主机名区分，同一主机首次解析时的节点提示决定后续结果。
    pub fn resolve(&self, host: &str, node_hint: Option<&str>) -> Option<AuthProfile> {
        if let Some(cached) = self.cache.get(host) {
            return Some(cached.value().clone());
        }

        for prefix in candidate_prefixes(host, node_hint) {
            for shape in CredentialShape::PRIORITY {
                if let Some(profile) = shape.probe(self.vars.as_ref(), &prefix) {
                    linfo!(
                        "system",
                        LogStage::Authentication,
                        LogComponent::CredentialResolver,
                        "credentials_resolved",
                        "Resolved credentials for host",
                        host = host,
                        prefix = %prefix,
                        kind = profile.kind()
                    );
                    self.cache.insert(host.to_string(), profile.clone());
                    return Some(profile);
                }
            }
        }

        ldebug!(
            "system",
            LogStage::Authentication,
            LogComponent::CredentialResolver,
            "credentials_not_found",
            "No credentials configured for host",
            host = host
        );
        None
    }

    /// 从目标 URL 取主机名后解析
    pub fn resolve_for_url(&self, target_url: &str, node_hint: Option<&str>) -> Option<AuthProfile> {
        let host = host_of(target_url)?;
        self.resolve(&host, node_hint)
    }

    /// 将认证配置写入请求头；非法的头名或头值被跳过
    pub fn apply(profile: &AuthProfile, headers: &mut HeaderMap) {
        let (name, value) = profile.header_pair();

        let header_name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(header_name) => header_name,
            Err(e) => {
                lwarn!(
                    "system",
                    LogStage::Authentication,
                    LogComponent::CredentialResolver,
                    "invalid_header_name",
                    "Skipping credential with invalid header name",
                    header = name,
                    error = %e
                );
                return;
            }
        };

        match HeaderValue::from_str(&value) {
            Ok(mut header_value) => {
                header_value.set_sensitive(true);
                headers.insert(header_name, header_value);
            }
            Err(e) => {
                lwarn!(
                    "system",
                    LogStage::Authentication,
                    LogComponent::CredentialResolver,
                    "invalid_header_value",
                    "Skipping credential with invalid header value",
                    header = name,
                    error = %e
                );
            }
        }
    }

    /// 清空缓存，返回清除的条目数
    pub fn clear(&self) -> usize {
        let count = self.cache.len();
        self.cache.clear();
        count
    }

    /// 已缓存的主机数
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
