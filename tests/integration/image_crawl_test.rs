// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{blank_page, crawler_settings, file_download_page, full_image_page};
use item_image_crawler::application::use_cases::image_crawl_use_case::{
    CrawlError, ImageCrawlUseCase,
};
use item_image_crawler::domain::models::{ImageMap, MissingReason};
use item_image_crawler::domain::repositories::catalog_repository::{CatalogError, StaticCatalog};
use item_image_crawler::domain::repositories::storage_repository::{ResultStore, StorageRepository};
use item_image_crawler::engines::reqwest_engine::ReqwestEngine;
use item_image_crawler::infrastructure::storage::{InMemoryStorage, JsonResultStore};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine() -> Arc<ReqwestEngine> {
    Arc::new(ReqwestEngine::new("item-image-crawler-tests/1.0", Duration::from_secs(5)).unwrap())
}

fn memory_store() -> Arc<JsonResultStore<InMemoryStorage>> {
    Arc::new(JsonResultStore::new(
        InMemoryStorage::new(),
        "item_images.json",
        "missing_images.json",
    ))
}

async fn mount_page(server: &MockServer, file: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/w/File:{}", file)))
        .and(header("user-agent", "item-image-crawler-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_run_accounts_for_every_entity() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "Sword.png",
        full_image_page("/images/Sword.png?1a2b3"),
    )
    .await;
    mount_page(
        &server,
        "Shield.png",
        file_download_page("https://cdn.example/images/Shield.png"),
    )
    .await;
    mount_page(&server, "Potion.png", blank_page()).await;
    Mock::given(method("GET"))
        .and(path("/w/File:Super%20potion.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    // "Logs" has no mock, so the server answers 404

    let store = memory_store();
    let catalog = Arc::new(StaticCatalog::new([
        "Sword",
        "Shield",
        "Potion",
        "Super potion",
        "Logs",
    ]));
    let use_case = ImageCrawlUseCase::new(
        catalog,
        store.clone(),
        engine(),
        &crawler_settings(&server.uri(), 3),
    )
    .unwrap();

    let report = use_case.execute(CancellationToken::new()).await.unwrap();

    assert!(!report.cancelled);
    assert_eq!(report.summary.total, 5);
    assert_eq!(report.summary.found, 2);
    assert_eq!(report.summary.missing, 3);
    assert_eq!(report.snapshot.stats.processed, 5);
    assert_eq!(report.snapshot.image_map.len(), report.summary.found);

    let image_map = &report.snapshot.image_map;
    assert_eq!(
        image_map["Sword"],
        format!("{}/images/Sword.png?1a2b3", server.uri())
    );
    assert_eq!(image_map["Shield"], "https://cdn.example/images/Shield.png");

    let mut records = report.snapshot.missing_records.clone();
    records.sort_by(|a, b| a.item.cmp(&b.item));
    let items: Vec<_> = records.iter().map(|r| r.item.as_str()).collect();
    assert_eq!(items, vec!["Logs", "Potion", "Super potion"]);
    assert_eq!(records[0].result, MissingReason::Error);
    assert_eq!(records[1].result, MissingReason::NoUrlFound);
    assert_eq!(records[1].error, None);
    assert_eq!(records[2].result, MissingReason::Error);
    assert_eq!(
        records[2].url_tried,
        format!("{}/w/File:Super%20potion.png", server.uri())
    );
    assert!(records[2].error.as_deref().unwrap_or_default().contains("500"));

    // Results were persisted
    assert_eq!(&store.load_image_map().await.unwrap(), image_map);
    let raw = store
        .storage()
        .get("missing_images.json")
        .await
        .unwrap()
        .unwrap();
    let persisted: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(persisted.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_requests_are_spaced_by_min_interval() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/w/File:.*\.png$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(blank_page()))
        .mount(&server)
        .await;

    let mut settings = crawler_settings(&server.uri(), 4);
    settings.min_request_interval_ms = 50;

    let use_case = ImageCrawlUseCase::new(
        Arc::new(StaticCatalog::new(["A", "B", "C", "D", "E"])),
        memory_store(),
        engine(),
        &settings,
    )
    .unwrap();

    let started = Instant::now();
    let report = use_case
        .run(
            ["A", "B", "C", "D", "E"].map(String::from).to_vec(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(report.summary.missing, 5);
    assert_eq!(server.received_requests().await.unwrap().len(), 5);
}

async fn seeded_store(entries: &[&str]) -> (Arc<JsonResultStore<InMemoryStorage>>, ImageMap) {
    let store = memory_store();
    let mut image_map = ImageMap::new();
    for entity in entries {
        image_map.insert(
            entity.to_string(),
            format!("https://wiki.example/images/{}.png", entity),
        );
    }
    store.save_image_map(&image_map).await.unwrap();
    (store, image_map)
}

#[tokio::test]
async fn test_cancellation_stops_before_catalog_is_drained() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/w/File:.*\.png$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(full_image_page("/images/resolved.png"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let entities: Vec<String> = (0..30).map(|i| format!("Item{}", i)).collect();
    let (store, saved) = seeded_store(&["Abyssal whip", "Bronze sword", "Cannonball"]).await;
    let use_case = ImageCrawlUseCase::new(
        Arc::new(StaticCatalog::new(entities.clone())),
        store.clone(),
        engine(),
        &crawler_settings(&server.uri(), 2),
    )
    .unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(450)).await;
        trigger.cancel();
    });

    let report = tokio::time::timeout(Duration::from_secs(10), use_case.execute(cancel))
        .await
        .expect("cancelled run should return promptly")
        .unwrap();

    assert!(report.cancelled);
    let stats = report.snapshot.stats;
    assert!(stats.processed < entities.len());
    assert_eq!(stats.processed, stats.found + stats.missing);
    assert_eq!(report.snapshot.missing_records.len(), stats.missing);

    // Previously saved images survive and newly resolved ones are merged in
    let merged = store.load_image_map().await.unwrap();
    for (entity, url) in &saved {
        assert_eq!(merged.get(entity), Some(url));
    }
    for entity in report.snapshot.image_map.keys() {
        assert!(merged.contains_key(entity));
    }
    assert_eq!(merged.len(), saved.len() + report.snapshot.image_map.len());
    assert!(store
        .storage()
        .get("missing_images.json")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_run_cancelled_before_start_keeps_saved_results() {
    let (store, saved) = seeded_store(&["Sword", "Shield", "Potion"]).await;
    let use_case = ImageCrawlUseCase::new(
        Arc::new(StaticCatalog::new(["Sword", "Shield", "Potion", "Logs"])),
        store.clone(),
        engine(),
        &crawler_settings("http://127.0.0.1:9", 2),
    )
    .unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let report = use_case.execute(cancel).await.unwrap();

    assert!(report.cancelled);
    assert_eq!(report.snapshot.stats.processed, 0);
    assert_eq!(store.load_image_map().await.unwrap(), saved);
    assert!(store
        .storage()
        .get("missing_images.json")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_catalog_failure_is_fatal_and_persists_nothing() {
    let store = memory_store();
    let use_case = ImageCrawlUseCase::new(
        Arc::new(StaticCatalog::new(Vec::<String>::new())),
        store.clone(),
        engine(),
        &crawler_settings("http://127.0.0.1:9", 2),
    )
    .unwrap();

    let result = use_case.execute(CancellationToken::new()).await;

    assert!(matches!(
        result,
        Err(CrawlError::Catalog(CatalogError::Empty))
    ));
    assert!(store
        .storage()
        .get("item_images.json")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_invalid_base_origin_is_rejected() {
    let mut settings = crawler_settings("http://127.0.0.1:9", 1);
    settings.base_origin = "not a url".to_string();

    let result = ImageCrawlUseCase::new(
        Arc::new(StaticCatalog::new(["Sword"])),
        memory_store(),
        engine(),
        &settings,
    );

    assert!(matches!(result, Err(CrawlError::Configuration(_))));
}
