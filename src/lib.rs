//! # Diagram Gateway Library
//!
//! 图表前端的指标网关：服务发现、上游凭证注入、带 TTL 缓存的代理调用，
//! 以及图表配置文档的占位符替换。

pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod diagrams;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod management;
pub mod proxy;
pub mod template;
pub mod vars;

// Re-export commonly used types
pub use app::AppContext;
pub use config::AppConfig;
pub use error::{ProxyError, Result};
