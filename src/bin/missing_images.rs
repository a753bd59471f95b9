// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use item_image_crawler::application::use_cases::missing_report_use_case::MissingReportUseCase;
use item_image_crawler::config::settings::{CatalogVariant, Settings};
use item_image_crawler::infrastructure::catalog::HttpCatalogSource;
use item_image_crawler::infrastructure::storage::JsonResultStore;
use item_image_crawler::utils::telemetry;
use std::sync::Arc;

/// 列出目录中尚未解析到图片的物品
///
/// 用法：`missing-images [runescape|oldschool]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();

    let variant = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<CatalogVariant>())
        .transpose()?;
    let settings = Settings::load(variant).context("failed to load configuration")?;

    let catalog = HttpCatalogSource::from_settings(&settings.catalog, &settings.crawler.user_agent)
        .context("failed to build catalog client")?;
    let store = JsonResultStore::local(&settings.output);

    let report = MissingReportUseCase::new(Arc::new(catalog), Arc::new(store))
        .execute()
        .await
        .context("failed to compute missing items")?;

    println!("\n=== Missing Items ===");
    if report.is_up_to_date() {
        println!("None, your dataset is up to date");
        return Ok(());
    }

    for item in &report.missing {
        println!("{}", item);
    }
    println!("\nTotal missing items: {}", report.count());
    println!("You should rerun the image crawler.");
    Ok(())
}
