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

use anyhow::Context;
use item_image_crawler::application::use_cases::image_crawl_use_case::ImageCrawlUseCase;
use item_image_crawler::config::settings::{CatalogVariant, Settings};
use item_image_crawler::engines::reqwest_engine::ReqwestEngine;
use item_image_crawler::infrastructure::catalog::HttpCatalogSource;
use item_image_crawler::infrastructure::storage::JsonResultStore;
use item_image_crawler::utils::telemetry;
use item_image_crawler::workers::manager::spawn_shutdown_listener;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// 主函数
///
/// 用法：`item-image-crawler [runescape|oldschool]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();

    // 2. Load configuration
    let variant = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<CatalogVariant>())
        .transpose()?;
    let settings = Settings::load(variant).context("failed to load configuration")?;
    info!(
        "Starting {} image crawl with {} workers",
        settings.catalog.variant, settings.crawler.concurrency
    );

    // 3. Build components
    let catalog = HttpCatalogSource::from_settings(&settings.catalog, &settings.crawler.user_agent)
        .context("failed to build catalog client")?;
    let engine = ReqwestEngine::new(&settings.crawler.user_agent, settings.crawler.request_timeout())
        .context("failed to build HTTP client")?;
    let store = JsonResultStore::local(&settings.output);

    let use_case = ImageCrawlUseCase::new(
        Arc::new(catalog),
        Arc::new(store),
        Arc::new(engine),
        &settings.crawler,
    )?;

    // 4. Run until drained or interrupted
    let cancel = CancellationToken::new();
    let listener = spawn_shutdown_listener(cancel.clone());

    let report = use_case
        .execute(cancel.clone())
        .await
        .context("image crawl failed")?;

    cancel.cancel();
    listener.await?;

    if report.cancelled {
        warn!("Run was interrupted; partial results were saved");
    }
    info!(
        "Saved {} and {}",
        settings.output.image_map_path, settings.output.missing_path
    );
    Ok(())
}
