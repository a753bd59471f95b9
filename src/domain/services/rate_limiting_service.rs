// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use governor::{Quota, RateLimiter};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// 请求限流器
///
/// 全局（而非每个工作器）限流：任意两次相邻的放行之间至少间隔 `min_interval`。
/// 基于 GCRA 算法，突发容量为 1，状态通过原子比较交换更新，无需加锁。
pub struct RequestRateLimiter {
    limiter: Option<DirectRateLimiter>,
}

impl RequestRateLimiter {
    /// 创建新的限流器
    ///
    /// # 参数
    ///
    /// * `min_interval` - 相邻放行之间的最小间隔，为零时不限流
    pub fn new(min_interval: Duration) -> Self {
        // with_period defaults to a burst of one
        Self {
            limiter: Quota::with_period(min_interval).map(RateLimiter::direct),
        }
    }

    /// 等待放行
    ///
    /// 该操作不会失败，只会延迟。
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// 等待放行，取消时提前返回
    ///
    /// # 返回值
    ///
    /// 获得放行返回 true，被取消返回 false
    pub async fn acquire_or_cancel(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = self.acquire() => true,
        }
    }
}
