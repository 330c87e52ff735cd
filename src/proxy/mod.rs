//! # 代理模块
//!
//! 代理目标解析与带缓存的上游调用

pub mod executor;
pub mod target;

pub use executor::{ProxyExecutor, ProxyResponse};
pub use target::{
    ProxyTarget, ServiceIdentifier, TargetResolver, is_absolute_url, looks_like_service_name,
};
