// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

/// 目录获取错误类型
///
/// 目录获取失败是整个运行中唯一的致命错误。
#[derive(Error, Debug)]
pub enum CatalogError {
    /// 请求失败
    #[error("Catalog request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 响应无法解析
    #[error("Catalog payload could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    /// 响应结构不符合预期
    #[error("Unexpected catalog format: {0}")]
    Format(String),
    /// 目录为空
    #[error("Catalog contained no entities")]
    Empty,
}

/// 目录来源特质
///
/// 返回去重后的实体名称列表
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// 获取全部实体名称
    async fn fetch_entities(&self) -> Result<Vec<String>, CatalogError>;
}

/// 固定实体列表，供测试和离线运行使用
pub struct StaticCatalog {
    entities: Vec<String>,
}

impl StaticCatalog {
    pub fn new<I, S>(entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entities: entities.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_entities(&self) -> Result<Vec<String>, CatalogError> {
        normalize_entities(self.entities.clone())
    }
}

/// 整理实体名称：保留目录给出的原始名称，丢弃空名称，排序并去重
///
/// # 返回值
///
/// * `Ok(Vec<String>)` - 至少包含一个实体
/// * `Err(CatalogError::Empty)` - 没有任何有效实体
pub fn normalize_entities<I>(names: I) -> Result<Vec<String>, CatalogError>
where
    I: IntoIterator<Item = String>,
{
    let mut entities: Vec<String> = names
        .into_iter()
        .filter(|name| !name.is_empty())
        .collect();
    entities.sort();
    entities.dedup();
    if entities.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(entities)
}
