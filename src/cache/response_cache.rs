//! # 响应缓存
//!
//! 以完整目标 URL 为键缓存上游成功响应。写入时读取一次时钟并换算为绝对过期时刻；
//! 读取时自行判断过期，后台清理只是回收内存。

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::clock::{Clock, SystemClock};

/// 缓存条目，插入后不可变
#[derive(Debug, Clone)]
pub struct CachedResponse {
    /// 缓存的响应体
    pub payload: Value,
    /// 过期时刻
    pub expires_at: Instant,
}

impl CachedResponse {
    /// `now >= expires_at` 即视为过期
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// 缓存统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// 条目总数
    pub total_keys: usize,
    /// 已过期但尚未清理的条目数
    pub expired_keys: usize,
    /// 命中次数
    pub hit_count: u64,
    /// 未命中次数
    pub miss_count: u64,
}

impl CacheStats {
    /// 命中率，没有访问时为 0
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

/// TTL 响应缓存
#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, CachedResponse>,
    clock: Arc<dyn Clock>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl ResponseCache {
    /// 创建缓存
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        }
    }

    /// 读取未过期的缓存内容
    pub fn get(&self, url: &str) -> Option<Value> {
        let now = self.clock.now();
        let hit = self
            .entries
            .get(url)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.payload.clone());

        if hit.is_some() {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.miss_count.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    /// 写入或替换缓存条目
    pub fn insert(&self, url: impl Into<String>, payload: Value, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.entries.insert(url.into(), CachedResponse { payload, expires_at });
    }

    /// 移除所有已过期条目，返回移除数量
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before.saturating_sub(self.entries.len())
    }

    /// 清空缓存，返回清除的条目数
    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// 条目数，包含已过期的条目
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 缓存是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 缓存统计
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        CacheStats {
            total_keys: self.entries.len(),
            expired_keys: self
                .entries
                .iter()
                .filter(|entry| entry.is_expired_at(now))
                .count(),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
