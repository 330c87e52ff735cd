//! # 缓存模块
//!
//! 可注入时钟、TTL 响应缓存及其后台清理任务

pub mod cleanup_task;
pub mod clock;
pub mod response_cache;

pub use cleanup_task::CacheCleanupTask;
pub use clock::{Clock, ManualClock, SystemClock};
pub use response_cache::{CacheStats, CachedResponse, ResponseCache};
