// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;
use validator::Validate;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "IMAGE_CRAWLER";

/// 配置错误类型
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unknown catalog variant: {0}")]
    UnknownVariant(String),
}

/// 物品目录变体
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogVariant {
    #[default]
    Runescape,
    Oldschool,
}

/// 变体预设值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantPreset {
    pub catalog_url: &'static str,
    pub base_document_url: &'static str,
    pub base_origin: &'static str,
    pub user_agent: &'static str,
    pub image_map_path: &'static str,
    pub missing_path: &'static str,
}

impl CatalogVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogVariant::Runescape => "runescape",
            CatalogVariant::Oldschool => "oldschool",
        }
    }

    /// 该变体的默认地址、用户代理和输出文件名
    pub fn preset(&self) -> VariantPreset {
        match self {
            CatalogVariant::Runescape => VariantPreset {
                catalog_url: "https://chisel.weirdgloop.org/gazproj/gazbot/rs_dump.json",
                base_document_url: "https://runescape.wiki/w/File:",
                base_origin: "https://runescape.wiki",
                user_agent: "grand-money-exchange-inventory-crawler/3.0",
                image_map_path: "item_images.json",
                missing_path: "missing_images.json",
            },
            CatalogVariant::Oldschool => VariantPreset {
                catalog_url: "https://prices.runescape.wiki/api/v1/osrs/mapping",
                base_document_url: "https://oldschool.runescape.wiki/w/File:",
                base_origin: "https://oldschool.runescape.wiki",
                user_agent: "grand-money-exchange-osrs-crawler/1.0",
                image_map_path: "osrs_item_images.json",
                missing_path: "osrs_missing_images.json",
            },
        }
    }
}

impl fmt::Display for CatalogVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogVariant {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "runescape" | "rs" | "rs3" => Ok(CatalogVariant::Runescape),
            "oldschool" | "osrs" => Ok(CatalogVariant::Oldschool),
            other => Err(SettingsError::UnknownVariant(other.to_string())),
        }
    }
}

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    /// 爬虫配置
    #[validate(nested)]
    pub crawler: CrawlerSettings,
    /// 目录配置
    #[validate(nested)]
    pub catalog: CatalogSettings,
    /// 输出配置
    pub output: OutputSettings,
}

/// 爬虫配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CrawlerSettings {
    /// 工作器数量
    #[validate(range(min = 1))]
    pub concurrency: usize,
    /// 任意两次请求之间的最小间隔（毫秒），0 表示不限流
    pub min_request_interval_ms: u64,
    /// 单次请求超时时间（秒）
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
    /// 请求使用的用户代理
    #[validate(length(min = 1))]
    pub user_agent: String,
    /// 文档地址前缀
    #[validate(url)]
    pub base_document_url: String,
    /// 用于补全相对路径的站点源
    #[validate(url)]
    pub base_origin: String,
    /// 进度输出间隔，0 表示不输出
    pub progress_interval: usize,
}

/// 目录配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CatalogSettings {
    /// 目录变体
    pub variant: CatalogVariant,
    /// 目录地址
    #[validate(url)]
    pub url: String,
    /// 目录请求超时时间（秒）
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

/// 输出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// 图片映射文件路径
    pub image_map_path: String,
    /// 缺失记录文件路径
    pub missing_path: String,
}

impl CrawlerSettings {
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn base_origin_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_origin)
    }
}

impl CatalogSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default.toml`、`config/{APP_ENVIRONMENT}.toml`
    /// 和 `IMAGE_CRAWLER__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载并通过校验的配置
    /// * `Err(SettingsError)` - 配置加载或校验失败
    pub fn new() -> Result<Self, SettingsError> {
        Self::load(None)
    }

    /// 加载配置，可强制指定目录变体
    ///
    /// 指定变体时，其预设值取代配置文件中变体对应的默认值，但显式设置的字段仍然生效。
    pub fn load(variant: Option<CatalogVariant>) -> Result<Self, SettingsError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::build_with(variant, |builder| {
            builder
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name(&format!("config/{}", env)).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        })
    }

    /// 从 TOML 文本加载配置，不读取文件和环境变量
    pub fn from_toml(contents: &str, variant: Option<CatalogVariant>) -> Result<Self, SettingsError> {
        let contents = contents.to_string();
        Self::build_with(variant, move |builder| {
            builder.add_source(File::from_str(&contents, FileFormat::Toml))
        })
    }

    fn build_with<F>(variant: Option<CatalogVariant>, sources: F) -> Result<Self, SettingsError>
    where
        F: Fn(ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState>,
    {
        // The variant decides the preset defaults, so it is resolved first
        let variant = match variant {
            Some(variant) => variant,
            None => match sources(Config::builder()).build()?.get::<CatalogVariant>("catalog.variant") {
                Ok(variant) => variant,
                Err(ConfigError::NotFound(_)) => CatalogVariant::default(),
                Err(e) => return Err(e.into()),
            },
        };
        let preset = variant.preset();

        let builder = Config::builder()
            .set_default("crawler.concurrency", 5)?
            .set_default("crawler.min_request_interval_ms", 200)?
            .set_default("crawler.request_timeout_secs", 20)?
            .set_default("crawler.user_agent", preset.user_agent)?
            .set_default("crawler.base_document_url", preset.base_document_url)?
            .set_default("crawler.base_origin", preset.base_origin)?
            .set_default("crawler.progress_interval", 50)?
            .set_default("catalog.variant", variant.as_str())?
            .set_default("catalog.url", preset.catalog_url)?
            .set_default("catalog.timeout_secs", 30)?
            .set_default("output.image_map_path", preset.image_map_path)?
            .set_default("output.missing_path", preset.missing_path)?;

        let settings: Settings = sources(builder)
            .set_override("catalog.variant", variant.as_str())?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
