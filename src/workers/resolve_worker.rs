// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::models::ResolutionOutcome;
use crate::domain::services::extraction_service::ExtractionService;
use crate::domain::services::rate_limiting_service::RequestRateLimiter;
use crate::domain::services::result_aggregator::ResultAggregator;
use crate::engines::traits::DocumentFetcher;
use crate::queue::task_queue::EntityQueue;
use crate::utils::errors::WorkerError;
use crate::utils::url_utils;
use crate::workers::worker::Worker;

/// 工作器共享的组件
///
/// 所有工作器共用同一个队列、限流器、抓取器和聚合器。
#[derive(Clone)]
pub struct ResolveContext {
    pub queue: Arc<EntityQueue<String>>,
    pub fetcher: Arc<dyn DocumentFetcher>,
    pub extractor: Arc<ExtractionService>,
    pub limiter: Arc<RequestRateLimiter>,
    pub aggregator: Arc<ResultAggregator>,
    /// 文档地址前缀，实体名编码后追加在其后
    pub base_document_url: String,
    pub cancel: CancellationToken,
}

/// 图片解析工作器
///
/// 循环执行：出队 → 限流等待 → 抓取 → 提取 → 记录 → 确认完成。
/// 单个实体的失败（包括处理过程中的 panic）只会变成一条缺失记录，不会中断工作器，
/// 队列的完成计数也总会被确认。
pub struct ResolveWorker {
    id: usize,
    name: String,
    context: ResolveContext,
}

impl ResolveWorker {
    /// 创建新的解析工作器
    ///
    /// # 参数
    ///
    /// * `id` - 工作器序号
    /// * `context` - 共享组件
    pub fn new(id: usize, context: ResolveContext) -> Self {
        Self {
            id,
            name: format!("resolve-worker-{}", id),
            context,
        }
    }

    /// 工作器序号
    pub fn id(&self) -> usize {
        self.id
    }

    /// 解析单个实体
    ///
    /// 该函数是全函数：传输失败和缺少标记都会转换成对应的结果，而不是错误。
    pub async fn process_entity(&self, entity: &str) -> ResolutionOutcome {
        self.context.limiter.acquire().await;
        self.fetch_and_extract(entity).await
    }

    /// 可取消的解析，取消时返回 `None`
    async fn resolve_or_cancel(&self, entity: &str) -> Option<ResolutionOutcome> {
        let cancel = &self.context.cancel;
        if !self.context.limiter.acquire_or_cancel(cancel).await {
            return None;
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            outcome = self.fetch_and_extract(entity) => Some(outcome),
        }
    }

    #[instrument(skip(self), fields(worker = self.id))]
    async fn fetch_and_extract(&self, entity: &str) -> ResolutionOutcome {
        let attempted_url = url_utils::document_url(&self.context.base_document_url, entity);

        let document = match self.context.fetcher.fetch(&attempted_url).await {
            Ok(document) => document,
            Err(e) => {
                warn!("Failed to fetch {}: {}", attempted_url, e);
                return ResolutionOutcome::Failed {
                    entity: entity.to_string(),
                    attempted_url,
                    error: e.to_string(),
                };
            }
        };

        match self.context.extractor.extract_with_strategy(&document.content) {
            Some(extraction) => {
                debug!(
                    strategy = extraction.strategy,
                    "Resolved {} -> {}", entity, extraction.url
                );
                ResolutionOutcome::Resolved {
                    entity: entity.to_string(),
                    resource_url: extraction.url,
                }
            }
            None => {
                debug!("No image markup found at {}", attempted_url);
                ResolutionOutcome::NotFound {
                    entity: entity.to_string(),
                    attempted_url,
                }
            }
        }
    }
}

#[async_trait]
impl Worker for ResolveWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        debug!("{} started", self.name);
        let queue = &self.context.queue;
        let cancel = &self.context.cancel;

        loop {
            let entity = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("{} cancelled", self.name);
                    break;
                }
                item = queue.dequeue() => match item {
                    Some(entity) => entity,
                    None => break,
                },
            };

            let resolved = AssertUnwindSafe(self.resolve_or_cancel(&entity))
                .catch_unwind()
                .await;

            let outcome = match resolved {
                Ok(Some(outcome)) => outcome,
                Ok(None) => {
                    debug!("{} dropped in-flight entity {}", self.name, entity);
                    break;
                }
                Err(panic) => {
                    let error = panic_message(panic.as_ref());
                    error!("{} panicked while resolving {}: {}", self.name, entity, error);
                    ResolutionOutcome::Failed {
                        attempted_url: url_utils::document_url(
                            &self.context.base_document_url,
                            &entity,
                        ),
                        entity,
                        error: format!("resolution panicked: {}", error),
                    }
                }
            };

            self.context.aggregator.record(outcome);
            queue.task_done()?;
        }

        debug!("{} exited", self.name);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
