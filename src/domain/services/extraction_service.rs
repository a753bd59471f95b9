// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::utils::url_utils;

// `<div ... class="... fullImageLink ..." ...> ... <a ... href="...">`, spanning lines
static FULL_IMAGE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<div[^>]+class="[^"]*\bfullImageLink\b[^"]*"[^>]*>.*?<a[^>]+href="([^"]+)""#,
    )
    .unwrap()
});

// Download button, with `class` either before or after `href` in the same tag
static FILE_DOWNLOAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"class="[^"]*\bfileDownload\b[^"]*"[^>]*href="([^"]+)"|href="([^"]+)"[^>]*class="[^"]*\bfileDownload\b"#,
    )
    .unwrap()
});

/// 提取策略
///
/// 每个策略独立匹配一种页面标记，返回捕获到的地址片段
pub struct ExtractionStrategy {
    /// 策略名称
    pub name: &'static str,
    pattern: &'static Lazy<Regex>,
}

impl ExtractionStrategy {
    /// 在文档中查找第一个非空的地址片段
    pub fn find<'a>(&self, document: &'a str) -> Option<&'a str> {
        self.pattern.captures_iter(document).find_map(|caps| {
            caps.iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str().trim())
                .find(|s| !s.is_empty())
        })
    }
}

/// 默认策略顺序：更具体、更可靠的标记在前
pub static DEFAULT_STRATEGIES: [ExtractionStrategy; 2] = [
    ExtractionStrategy {
        name: "full_image_link",
        pattern: &FULL_IMAGE_LINK,
    },
    ExtractionStrategy {
        name: "file_download",
        pattern: &FILE_DOWNLOAD,
    },
];

/// 提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// 绝对图片地址
    pub url: String,
    /// 命中的策略名称
    pub strategy: &'static str,
}

/// 提取服务
///
/// 负责从文件页面的 HTML 中提取图片地址。按顺序尝试各策略，返回第一个成功的结果；
/// 没有匹配时返回 `None`，这是正常结果而不是错误。该服务是纯函数，
/// 相同输入总是得到相同输出。
pub struct ExtractionService {
    base_origin: Url,
    strategies: &'static [ExtractionStrategy],
}

impl ExtractionService {
    /// 使用默认策略创建提取服务
    ///
    /// # 参数
    ///
    /// * `base_origin` - 用于补全根相对路径的站点源
    pub fn new(base_origin: Url) -> Self {
        Self {
            base_origin,
            strategies: &DEFAULT_STRATEGIES,
        }
    }

    /// 提取图片地址
    pub fn extract(&self, document: &str) -> Option<String> {
        self.extract_with_strategy(document).map(|e| e.url)
    }

    /// 提取图片地址，并返回命中的策略
    pub fn extract_with_strategy(&self, document: &str) -> Option<Extraction> {
        for strategy in self.strategies {
            let Some(fragment) = strategy.find(document) else {
                continue;
            };

            let decoded = html_escape::decode_html_entities(fragment);
            match url_utils::resolve_resource_url(&self.base_origin, &decoded) {
                Ok(url) => {
                    return Some(Extraction {
                        url,
                        strategy: strategy.name,
                    })
                }
                Err(e) => {
                    debug!(
                        strategy = strategy.name,
                        fragment, "Discarding unresolvable fragment: {}", e
                    );
                }
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
