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

use async_trait::async_trait;
use thiserror::Error;

/// 引擎错误类型
///
/// 覆盖 DNS、连接、超时、非 2xx 状态码和解码失败。对单个实体而言全部是终止性错误，
/// 不会自动重试。
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("HTTP status {status} for {url}")]
    HttpStatus {
        /// 状态码
        status: u16,
        /// 请求地址
        url: String,
    },
    /// 超时
    #[error("Timeout")]
    Timeout,
}

impl EngineError {
    /// 判断错误是否可重试
    ///
    /// 仅用于日志分类，爬取流程不会据此重试。
    ///
    /// # 返回值
    ///
    /// 如果错误是可重试的则返回true，否则返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            EngineError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            EngineError::Timeout => true,
        }
    }
}

/// 抓取到的文档
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// 请求地址
    pub url: String,
    /// HTTP状态码
    pub status_code: u16,
    /// 文档文本
    pub content: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 文档抓取特质
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// 抓取单个文档，只尝试一次
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
