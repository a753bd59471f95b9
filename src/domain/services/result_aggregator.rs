// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use parking_lot::Mutex;
use tracing::info;

use crate::domain::models::{
    ImageMap, MissingRecord, ResolutionOutcome, RunSnapshot, RunStats, RunSummary,
};

/// 默认进度输出间隔
pub const DEFAULT_PROGRESS_INTERVAL: usize = 50;

#[derive(Debug, Default)]
struct AggregatorState {
    stats: RunStats,
    image_map: ImageMap,
    missing_records: Vec<MissingRecord>,
}

/// 结果聚合器
///
/// 所有工作器并发调用 `record`。计数器、图片映射和缺失记录放在同一把锁下，
/// 因此任何时刻读取到的计数都满足 `processed == found + missing`。
pub struct ResultAggregator {
    state: Mutex<AggregatorState>,
    progress_interval: usize,
}

impl ResultAggregator {
    /// 创建新的聚合器
    ///
    /// # 参数
    ///
    /// * `total` - 本次运行的实体总数
    /// * `progress_interval` - 每处理多少个实体输出一次进度，0 表示不输出
    pub fn new(total: usize, progress_interval: usize) -> Self {
        Self {
            state: Mutex::new(AggregatorState {
                stats: RunStats::new(total),
                ..AggregatorState::default()
            }),
            progress_interval,
        }
    }

    /// 记录一个实体的解析结果
    ///
    /// # 返回值
    ///
    /// 记录后的计数器副本
    pub fn record(&self, outcome: ResolutionOutcome) -> RunStats {
        let result = outcome_label(&outcome);

        let stats = {
            let mut state = self.state.lock();
            state.stats.processed += 1;
            match outcome {
                ResolutionOutcome::Resolved {
                    entity,
                    resource_url,
                } => {
                    state.stats.found += 1;
                    state.image_map.insert(entity, resource_url);
                }
                ResolutionOutcome::NotFound { .. } | ResolutionOutcome::Failed { .. } => {
                    state.stats.missing += 1;
                    state.missing_records.extend(outcome.to_missing_record());
                }
            }
            state.stats
        };

        counter!("image_crawl_entities_processed_total", "result" => result).increment(1);
        if result == "resolved" {
            counter!("image_crawl_entities_found_total").increment(1);
        } else {
            counter!("image_crawl_entities_missing_total", "result" => result).increment(1);
        }

        if self.progress_interval > 0 && stats.processed % self.progress_interval == 0 {
            info!(
                "[{}/{}] found={} missing={}",
                stats.processed, stats.total, stats.found, stats.missing
            );
        }

        stats
    }

    /// 当前计数器
    pub fn stats(&self) -> RunStats {
        self.state.lock().stats
    }

    /// 当前摘要
    pub fn summary(&self) -> RunSummary {
        self.stats().into()
    }

    /// 当前快照
    ///
    /// 运行期间读取的快照只保证尽力一致，运行结束后为最终结果。
    pub fn snapshot(&self) -> RunSnapshot {
        let state = self.state.lock();
        RunSnapshot {
            image_map: state.image_map.clone(),
            missing_records: state.missing_records.clone(),
            stats: state.stats,
        }
    }
}

fn outcome_label(outcome: &ResolutionOutcome) -> &'static str {
    match outcome {
        ResolutionOutcome::Resolved { .. } => "resolved",
        ResolutionOutcome::NotFound { .. } => "no_url_found",
        ResolutionOutcome::Failed { .. } => "error",
    }
}
