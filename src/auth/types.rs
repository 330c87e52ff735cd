//! # 认证配置类型

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 默认 API Key 头
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";
/// 默认客户端标识头
pub const DEFAULT_CLIENT_ID_HEADER: &str = "X-Client-ID";

/// 为某个主机解析出的认证配置
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthProfile {
    /// 用户名 + 密码
    Basic {
        /// 用户名
        username: String,
        /// 密码
        password: String,
    },
    /// Bearer 令牌
    Bearer {
        /// 令牌
        token: String,
    },
    /// 自定义头中的 API Key
    ApiKey {
        /// 请求头名称
        header_name: String,
        /// API Key
        key: String,
    },
    /// 自定义头中的客户端标识
    Custom {
        /// 请求头名称
        header_name: String,
        /// 客户端标识
        value: String,
    },
}

impl AuthProfile {
    /// 认证方式名称
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::Bearer { .. } => "bearer",
            Self::ApiKey { .. } => "api_key",
            Self::Custom { .. } => "custom",
        }
    }

    /// 生成要写入的请求头名与值
    #[must_use]
    pub fn header_pair(&self) -> (&str, String) {
        match self {
            Self::Basic { username, password } => (
                "Authorization",
                format!("Basic {}", STANDARD.encode(format!("{username}:{password}"))),
            ),
            Self::Bearer { token } => ("Authorization", format!("Bearer {token}")),
            Self::ApiKey { header_name, key } => (header_name.as_str(), key.clone()),
            Self::Custom { header_name, value } => (header_name.as_str(), value.clone()),
        }
    }
}

// 避免凭证出现在日志中
impl fmt::Debug for AuthProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
            Self::ApiKey { header_name, .. } => f
                .debug_struct("ApiKey")
                .field("header_name", header_name)
                .field("key", &"***")
                .finish(),
            Self::Custom { header_name, .. } => f
                .debug_struct("Custom")
                .field("header_name", header_name)
                .field("value", &"***")
                .finish(),
        }
    }
}
