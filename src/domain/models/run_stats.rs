// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::outcome::MissingRecord;

/// 实体名称到图片地址的映射
///
/// 使用有序映射，序列化结果稳定。
pub type ImageMap = BTreeMap<String, String>;

/// 运行计数器
///
/// 在任何观察点都满足 `processed == found + missing` 且 `processed <= total`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// 已处理实体数
    pub processed: usize,
    /// 成功解析数
    pub found: usize,
    /// 缺失数（未找到 + 失败）
    pub missing: usize,
    /// 目录中的实体总数
    pub total: usize,
}

impl RunStats {
    /// 创建新的计数器
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// 是否已处理完全部实体
    pub fn is_complete(&self) -> bool {
        self.processed == self.total
    }
}

/// 运行摘要，用于面向操作者的输出
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// 实体总数
    pub total: usize,
    /// 成功解析数
    pub found: usize,
    /// 缺失数
    pub missing: usize,
}

impl From<RunStats> for RunSummary {
    fn from(stats: RunStats) -> Self {
        Self {
            total: stats.total,
            found: stats.found,
            missing: stats.missing,
        }
    }
}

/// 运行结束时交给持久化步骤的只读快照
#[derive(Debug, Clone, Default)]
pub struct RunSnapshot {
    /// 图片映射
    pub image_map: ImageMap,
    /// 缺失记录（顺序无关）
    pub missing_records: Vec<MissingRecord>,
    /// 计数器
    pub stats: RunStats,
}
