// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use item_image_crawler::config::settings::CrawlerSettings;
use item_image_crawler::engines::traits::{DocumentFetcher, EngineError, FetchedDocument};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 带有 fullImageLink 标记的文件页面
pub fn full_image_page(href: &str) -> String {
    format!(
        r#"<html><body>
<div class="fullMedia"><div class="fullImageLink" id="file"><a href="{href}"><img src="/thumb.png"></a></div></div>
</body></html>"#
    )
}

/// 只有下载按钮的文件页面
pub fn file_download_page(href: &str) -> String {
    format!(
        r#"<html><body>
<a class="internal fileDownload" href="{href}" title="Download">Download</a>
</body></html>"#
    )
}

/// 没有任何图片标记的页面
pub fn blank_page() -> String {
    "<html><body><p>This file does not exist.</p></body></html>".to_string()
}

/// 指向测试服务器的爬虫配置，不限流，不输出进度
pub fn crawler_settings(server_uri: &str, concurrency: usize) -> CrawlerSettings {
    CrawlerSettings {
        concurrency,
        min_request_interval_ms: 0,
        request_timeout_secs: 5,
        user_agent: "item-image-crawler-tests/1.0".to_string(),
        base_document_url: format!("{}/w/File:", server_uri),
        base_origin: server_uri.to_string(),
        progress_interval: 0,
    }
}

/// 内存中的文档抓取器
///
/// 已注册的地址返回对应页面，其余地址返回 404。
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url) {
            Some(body) => Ok(FetchedDocument {
                url: url.to_string(),
                status_code: 200,
                content: body.clone(),
                response_time_ms: 0,
            }),
            None => Err(EngineError::HttpStatus {
                status: 404,
                url: url.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
