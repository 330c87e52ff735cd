//! # 上游凭证模块
//!
//! 为出站请求选择并注入认证头

pub mod resolver;
pub mod types;

pub use resolver::{CredentialResolver, CredentialShape, candidate_prefixes, host_of};
pub use types::{AuthProfile, DEFAULT_API_KEY_HEADER, DEFAULT_CLIENT_ID_HEADER};
