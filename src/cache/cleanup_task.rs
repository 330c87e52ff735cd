//! # 响应缓存清理任务
//!
//! 固定间隔移除过期条目。读取路径自行判断过期，清理只影响内存占用。

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use super::ResponseCache;
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, linfo};

/// 响应缓存清理任务
#[derive(Debug)]
pub struct CacheCleanupTask {
    cache: Arc<ResponseCache>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl CacheCleanupTask {
    /// 创建清理任务
    #[must_use]
    pub fn new(cache: Arc<ResponseCache>, interval: Duration) -> Self {
        Self {
            cache,
            interval,
            shutdown: CancellationToken::new(),
        }
    }

    /// 用于停止任务的令牌
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// 执行一次清理
    pub fn run_once(&self) -> usize {
        let removed = self.cache.sweep();
        if removed > 0 {
            ldebug!(
                "system",
                LogStage::BackgroundTask,
                LogComponent::ResponseCache,
                "cache_sweep",
                "Removed expired response cache entries",
                removed = removed,
                remaining = self.cache.len()
            );
        }
        removed
    }

    /// 在后台启动清理循环
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.start().await })
    }

    /// 启动清理循环，直到收到停止信号
    pub async fn start(&self) {
        linfo!(
            "system",
            LogStage::BackgroundTask,
            LogComponent::ResponseCache,
            "cache_sweep_start",
            "Starting response cache cleanup task",
            interval_secs = self.interval.as_secs()
        );

        let mut interval = time::interval(self.interval);
        // 首次 tick 立即返回，跳过
        interval.tick().await;

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    linfo!(
                        "system",
                        LogStage::Shutdown,
                        LogComponent::ResponseCache,
                        "cache_sweep_stop",
                        "Response cache cleanup task stopped"
                    );
                    break;
                }
                _ = interval.tick() => {
                    self.run_once();
                }
            }
        }
    }
}
