// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::info;

use crate::application::use_cases::image_crawl_use_case::CrawlError;
use crate::domain::repositories::catalog_repository::CatalogSource;
use crate::domain::repositories::storage_repository::ResultStore;
use crate::domain::services::diff_service::{missing_entities, MissingReport};

/// 缺失报告用例
///
/// 比较最新目录与已保存的图片映射，列出尚未解析的实体
pub struct MissingReportUseCase<C, RS> {
    catalog: Arc<C>,
    store: Arc<RS>,
}

impl<C: CatalogSource, RS: ResultStore> MissingReportUseCase<C, RS> {
    pub fn new(catalog: Arc<C>, store: Arc<RS>) -> Self {
        Self { catalog, store }
    }

    pub async fn execute(&self) -> Result<MissingReport, CrawlError> {
        let catalog = self.catalog.fetch_entities().await?;
        let image_map = self.store.load_image_map().await?;
        info!(
            "Items in catalog: {}, items with images: {}",
            catalog.len(),
            image_map.len()
        );

        Ok(missing_entities(catalog, image_map.into_keys()))
    }
}
