//! # 模板模块
//!
//! 图表配置文档中的 `${...}` 占位符替换

pub mod engine;
pub mod placeholder;

pub use engine::TemplateEngine;
pub use placeholder::{PLACEHOLDER_PATTERN, Placeholder};
