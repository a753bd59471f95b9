// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeSet;

/// 缺失报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReport {
    /// 按字典序排列的缺失实体
    pub missing: Vec<String>,
}

impl MissingReport {
    /// 缺失数量
    pub fn count(&self) -> usize {
        self.missing.len()
    }

    /// 是否没有缺失
    pub fn is_up_to_date(&self) -> bool {
        self.missing.is_empty()
    }
}

/// 计算目录中尚未解析的实体
///
/// 结果为 `catalog − resolved`，按字典序排列。
pub fn missing_entities<C, R>(catalog: C, resolved: R) -> MissingReport
where
    C: IntoIterator,
    C::Item: Into<String>,
    R: IntoIterator,
    R::Item: Into<String>,
{
    let catalog: BTreeSet<String> = catalog.into_iter().map(Into::into).collect();
    let resolved: BTreeSet<String> = resolved.into_iter().map(Into::into).collect();

    MissingReport {
        missing: catalog.difference(&resolved).cloned().collect(),
    }
}
