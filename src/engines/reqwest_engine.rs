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

use crate::engines::traits::{DocumentFetcher, EngineError, FetchedDocument};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::debug;

/// 抓取引擎
///
/// 基于reqwest实现的HTTP文档抓取引擎。所有工作器共享同一个客户端（连接池），
/// 每个请求都带有固定的 User-Agent。
#[derive(Clone)]
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建新的抓取引擎
    ///
    /// # 参数
    ///
    /// * `user_agent` - 目标服务要求的客户端标识
    /// * `timeout` - 单个请求的超时时间
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestEngine)` - 创建成功
    /// * `Err(EngineError)` - HTTP客户端构建失败
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `url` - 完整的文档地址
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedDocument)` - 2xx 响应及其文本
    /// * `Err(EngineError)` - 传输错误或非成功状态码
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, EngineError> {
        let start = Instant::now();
        let response = self.client.get(url).send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Invalid byte sequences are replaced rather than rejected
        let content = response.text().await.map_err(transport_error)?;
        let response_time_ms = start.elapsed().as_millis() as u64;
        debug!(url, status = status.as_u16(), response_time_ms, "Document fetched");

        Ok(FetchedDocument {
            url: url.to_string(),
            status_code: status.as_u16(),
            content,
            response_time_ms,
        })
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "reqwest"
    }
}

/// 超时单独归类，其余保留原始错误
fn transport_error(e: reqwest::Error) -> EngineError {
    if e.is_timeout() {
        EngineError::Timeout
    } else {
        EngineError::RequestFailed(e)
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
