// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::settings::{CatalogSettings, CatalogVariant};
use crate::domain::repositories::catalog_repository::{
    normalize_entities, CatalogError, CatalogSource,
};

/// 基于 HTTP 的物品目录
///
/// 按变体解析不同结构的目录响应：
/// - `runescape`：以物品 ID 为键的对象，`%` 开头的键是元数据
/// - `oldschool`：对象数组
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
    variant: CatalogVariant,
    user_agent: String,
}

impl HttpCatalogSource {
    /// 创建新的目录来源
    ///
    /// # 参数
    ///
    /// * `url` - 目录地址
    /// * `variant` - 目录变体，决定响应的解析方式
    /// * `user_agent` - 请求使用的用户代理
    /// * `timeout` - 请求超时时间
    pub fn new(
        url: impl Into<String>,
        variant: CatalogVariant,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            variant,
            user_agent: user_agent.into(),
        })
    }

    /// 根据配置创建目录来源
    pub fn from_settings(settings: &CatalogSettings, user_agent: &str) -> Result<Self, CatalogError> {
        Self::new(
            settings.url.clone(),
            settings.variant,
            user_agent,
            settings.timeout(),
        )
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_entities(&self) -> Result<Vec<String>, CatalogError> {
        info!("Fetching {} catalog from {}", self.variant, self.url);

        let body = self
            .client
            .get(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let entities = parse_catalog(self.variant, &body)?;
        info!("Total items in catalog: {}", entities.len());
        Ok(entities)
    }
}

/// 按变体解析目录响应体
pub fn parse_catalog(variant: CatalogVariant, body: &str) -> Result<Vec<String>, CatalogError> {
    let payload: Value = serde_json::from_str(body)?;
    let names = match variant {
        CatalogVariant::Runescape => parse_item_dump(&payload)?,
        CatalogVariant::Oldschool => parse_item_mapping(&payload)?,
    };
    normalize_entities(names)
}

/// 解析以物品 ID 为键的目录对象
fn parse_item_dump(payload: &Value) -> Result<Vec<String>, CatalogError> {
    let object = payload
        .as_object()
        .ok_or_else(|| CatalogError::Format("expected a JSON object keyed by item id".into()))?;

    Ok(object
        .iter()
        .filter(|(key, _)| !key.starts_with('%'))
        .filter_map(|(key, entry)| {
            let name = entry_name(entry);
            if name.is_none() {
                debug!("Skipping catalog entry {} without a name", key);
            }
            name
        })
        .collect())
}

/// 解析物品映射数组
fn parse_item_mapping(payload: &Value) -> Result<Vec<String>, CatalogError> {
    let entries = payload
        .as_array()
        .ok_or_else(|| CatalogError::Format("expected a JSON array of items".into()))?;

    Ok(entries.iter().filter_map(entry_name).collect())
}

fn entry_name(entry: &Value) -> Option<String> {
    entry.get("name")?.as_str().map(str::to_string)
}
