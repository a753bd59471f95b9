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

use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::settings::CrawlerSettings;
use crate::domain::models::{RunSnapshot, RunSummary};
use crate::domain::repositories::catalog_repository::{CatalogError, CatalogSource};
use crate::domain::repositories::storage_repository::{ResultStore, StorageError};
use crate::domain::services::extraction_service::ExtractionService;
use crate::domain::services::rate_limiting_service::RequestRateLimiter;
use crate::domain::services::result_aggregator::ResultAggregator;
use crate::engines::traits::DocumentFetcher;
use crate::queue::task_queue::{EntityQueue, QueueError};
use crate::utils::errors::WorkerError;
use crate::workers::manager::WorkerManager;
use crate::workers::resolve_worker::ResolveContext;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),
    #[error("Invalid base origin: {0}")]
    Configuration(#[from] url::ParseError),
}

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub summary: RunSummary,
    pub snapshot: RunSnapshot,
    /// 运行是否在目录处理完之前被取消
    pub cancelled: bool,
}

/// 图片抓取用例
///
/// 获取目录 → 全部入队 → 启动工作器 → 等待排空 → 持久化结果。
/// 只有目录获取失败是致命的；单个实体的失败记录为缺失。
pub struct ImageCrawlUseCase<C, RS> {
    catalog: Arc<C>,
    store: Arc<RS>,
    fetcher: Arc<dyn DocumentFetcher>,
    extractor: Arc<ExtractionService>,
    limiter: Arc<RequestRateLimiter>,
    concurrency: usize,
    base_document_url: String,
    progress_interval: usize,
}

impl<C, RS> ImageCrawlUseCase<C, RS>
where
    C: CatalogSource + 'static,
    RS: ResultStore + 'static,
{
    pub fn new(
        catalog: Arc<C>,
        store: Arc<RS>,
        fetcher: Arc<dyn DocumentFetcher>,
        settings: &CrawlerSettings,
    ) -> Result<Self, CrawlError> {
        let extractor = ExtractionService::new(settings.base_origin_url()?);
        Ok(Self {
            catalog,
            store,
            fetcher,
            extractor: Arc::new(extractor),
            limiter: Arc::new(RequestRateLimiter::new(settings.min_request_interval())),
            concurrency: settings.concurrency.max(1),
            base_document_url: settings.base_document_url.clone(),
            progress_interval: settings.progress_interval,
        })
    }

    /// 执行完整运行并持久化结果
    ///
    /// 完整运行会覆盖输出文件。被取消的运行只把已解析的图片合并进已保存的映射，
    /// 不会覆盖缺失记录，也不会删除之前的结果。
    pub async fn execute(&self, cancel: CancellationToken) -> Result<CrawlReport, CrawlError> {
        let entities = self.catalog.fetch_entities().await?;
        info!("Total items to process: {}", entities.len());

        let report = self.run(entities, cancel).await?;
        if report.cancelled {
            self.merge_partial(&report.snapshot).await?;
        } else {
            self.persist(&report.snapshot).await?;
        }
        Ok(report)
    }

    /// 解析给定实体列表，不做持久化
    pub async fn run(
        &self,
        entities: Vec<String>,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        let total = entities.len();
        let queue = Arc::new(EntityQueue::new());
        queue.enqueue_all(entities)?;

        let aggregator = Arc::new(ResultAggregator::new(total, self.progress_interval));
        let context = ResolveContext {
            queue,
            fetcher: self.fetcher.clone(),
            extractor: self.extractor.clone(),
            limiter: self.limiter.clone(),
            aggregator: aggregator.clone(),
            base_document_url: self.base_document_url.clone(),
            cancel: cancel.clone(),
        };

        let mut manager = WorkerManager::new(context);
        manager.start_workers(self.concurrency);
        manager.drain().await?;

        let snapshot = aggregator.snapshot();
        let cancelled = !snapshot.stats.is_complete();
        let summary = RunSummary::from(snapshot.stats);

        if cancelled {
            warn!(
                "Run cancelled after {}/{} items",
                snapshot.stats.processed, total
            );
        }
        info!(
            "Done. Found {} images, Missing {} of {}",
            summary.found, summary.missing, summary.total
        );

        Ok(CrawlReport {
            summary,
            snapshot,
            cancelled,
        })
    }

    async fn merge_partial(&self, snapshot: &RunSnapshot) -> Result<(), CrawlError> {
        if snapshot.image_map.is_empty() {
            warn!("No new images resolved, leaving saved results untouched");
            return Ok(());
        }

        let mut image_map = self.store.load_image_map().await?;
        let before = image_map.len();
        image_map.extend(
            snapshot
                .image_map
                .iter()
                .map(|(entity, url)| (entity.clone(), url.clone())),
        );
        self.store.save_image_map(&image_map).await?;
        warn!(
            "Merged {} resolved images into the saved map ({} -> {} entries), missing records not written",
            snapshot.image_map.len(),
            before,
            image_map.len()
        );
        Ok(())
    }

    async fn persist(&self, snapshot: &RunSnapshot) -> Result<(), CrawlError> {
        self.store.save_image_map(&snapshot.image_map).await?;
        self.store
            .save_missing_records(&snapshot.missing_records)
            .await?;
        Ok(())
    }
}
