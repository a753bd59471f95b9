// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 单个实体的解析结果
///
/// 每次运行中每个实体恰好产生一个结果。`NotFound` 表示页面可达但没有可提取的
/// 图片地址，它是正常结果而不是错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// 成功解析到图片地址
    Resolved {
        /// 实体名称
        entity: String,
        /// 绝对图片地址
        resource_url: String,
    },
    /// 页面可达，但没有匹配的标记
    NotFound {
        /// 实体名称
        entity: String,
        /// 尝试请求的文档地址
        attempted_url: String,
    },
    /// 传输层失败
    Failed {
        /// 实体名称
        entity: String,
        /// 尝试请求的文档地址
        attempted_url: String,
        /// 错误详情
        error: String,
    },
}

impl ResolutionOutcome {
    /// 结果对应的实体名称
    pub fn entity(&self) -> &str {
        match self {
            ResolutionOutcome::Resolved { entity, .. }
            | ResolutionOutcome::NotFound { entity, .. }
            | ResolutionOutcome::Failed { entity, .. } => entity,
        }
    }

    /// 是否解析成功
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionOutcome::Resolved { .. })
    }

    /// 将未解析的结果转换为缺失记录，成功结果返回 `None`
    pub fn to_missing_record(&self) -> Option<MissingRecord> {
        match self {
            ResolutionOutcome::Resolved { .. } => None,
            ResolutionOutcome::NotFound {
                entity,
                attempted_url,
            } => Some(MissingRecord {
                item: entity.clone(),
                url_tried: attempted_url.clone(),
                result: MissingReason::NoUrlFound,
                error: None,
            }),
            ResolutionOutcome::Failed {
                entity,
                attempted_url,
                error,
            } => Some(MissingRecord {
                item: entity.clone(),
                url_tried: attempted_url.clone(),
                result: MissingReason::Error,
                error: Some(error.clone()),
            }),
        }
    }
}

/// 缺失原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReason {
    /// 页面中没有图片地址
    NoUrlFound,
    /// 请求失败
    Error,
}

impl MissingReason {
    /// 序列化时使用的原因代码
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingReason::NoUrlFound => "no_url_found",
            MissingReason::Error => "error",
        }
    }
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 缺失记录
///
/// 字段名与历史输出文件保持一致，旧文件仍可直接读取。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingRecord {
    /// 实体名称
    pub item: String,
    /// 尝试请求的文档地址
    pub url_tried: String,
    /// 原因代码
    pub result: MissingReason,
    /// 错误详情（仅在请求失败时存在）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
