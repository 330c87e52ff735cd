//! # 管理接口模块
//!
//! 对外暴露的 HTTP 接口：健康检查、指标代理、服务地址解析、图表配置和缓存管理

pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;

pub use server::{AppState, GatewayServer};
