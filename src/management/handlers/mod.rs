//! # HTTP 处理器

pub mod cache;
pub mod diagrams;
pub mod metrics;
pub mod services;
pub mod system;
