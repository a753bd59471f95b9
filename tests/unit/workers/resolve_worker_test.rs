// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{blank_page, full_image_page, StubFetcher};
use item_image_crawler::domain::models::ResolutionOutcome;
use item_image_crawler::domain::services::extraction_service::ExtractionService;
use item_image_crawler::domain::services::rate_limiting_service::RequestRateLimiter;
use item_image_crawler::domain::services::result_aggregator::ResultAggregator;
use item_image_crawler::queue::task_queue::EntityQueue;
use item_image_crawler::workers::resolve_worker::{ResolveContext, ResolveWorker};
use item_image_crawler::workers::Worker;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

const BASE: &str = "https://wiki.example/w/File:";

fn context(fetcher: StubFetcher, total: usize) -> ResolveContext {
    ResolveContext {
        queue: Arc::new(EntityQueue::new()),
        fetcher: Arc::new(fetcher),
        extractor: Arc::new(ExtractionService::new(
            Url::parse("https://wiki.example").unwrap(),
        )),
        limiter: Arc::new(RequestRateLimiter::new(Duration::ZERO)),
        aggregator: Arc::new(ResultAggregator::new(total, 0)),
        base_document_url: BASE.to_string(),
        cancel: CancellationToken::new(),
    }
}

#[tokio::test]
async fn test_process_entity_resolves_relative_link() {
    let fetcher = StubFetcher::new().with_page(
        format!("{}Rune%20scimitar.png", BASE),
        full_image_page("/images/Rune_scimitar.png?7263b"),
    );
    let worker = ResolveWorker::new(0, context(fetcher, 1));

    let outcome = worker.process_entity("Rune scimitar").await;

    assert_eq!(
        outcome,
        ResolutionOutcome::Resolved {
            entity: "Rune scimitar".to_string(),
            resource_url: "https://wiki.example/images/Rune_scimitar.png?7263b".to_string(),
        }
    );
}

#[tokio::test]
async fn test_process_entity_without_markup_is_not_found() {
    let fetcher = StubFetcher::new().with_page(format!("{}Potion.png", BASE), blank_page());
    let worker = ResolveWorker::new(0, context(fetcher, 1));

    let outcome = worker.process_entity("Potion").await;

    assert_eq!(
        outcome,
        ResolutionOutcome::NotFound {
            entity: "Potion".to_string(),
            attempted_url: format!("{}Potion.png", BASE),
        }
    );
}

#[tokio::test]
async fn test_process_entity_transport_failure_is_failed() {
    let worker = ResolveWorker::new(0, context(StubFetcher::new(), 1));

    let outcome = worker.process_entity("Shield").await;

    match outcome {
        ResolutionOutcome::Failed {
            entity,
            attempted_url,
            error,
        } => {
            assert_eq!(entity, "Shield");
            assert_eq!(attempted_url, format!("{}Shield.png", BASE));
            assert!(error.contains("404"), "unexpected error: {}", error);
        }
        other => panic!("expected a failed outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_exits_on_sentinel_and_records_every_entity() {
    let fetcher = StubFetcher::new()
        .with_page(format!("{}Sword.png", BASE), full_image_page("/images/Sword.png"));
    let ctx = context(fetcher, 3);
    ctx.queue.enqueue_all(["Sword", "Shield", "Potion"].map(String::from)).unwrap();
    ctx.queue.push_sentinels(1).unwrap();

    let worker = ResolveWorker::new(7, ctx.clone());
    assert_eq!(worker.name(), "resolve-worker-7");
    assert_eq!(worker.id(), 7);

    tokio::time::timeout(Duration::from_secs(5), worker.run())
        .await
        .expect("worker should exit after the sentinel")
        .unwrap();

    let stats = ctx.aggregator.stats();
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.found, 1);
    assert_eq!(stats.missing, 2);
    assert_eq!(ctx.queue.unfinished(), 0);
}

#[tokio::test]
async fn test_run_stops_when_cancelled() {
    let ctx = context(StubFetcher::new(), 1);
    ctx.queue.enqueue("Sword".to_string()).unwrap();
    ctx.cancel.cancel();

    let worker = ResolveWorker::new(0, ctx.clone());
    tokio::time::timeout(Duration::from_secs(5), worker.run())
        .await
        .expect("cancelled worker should exit")
        .unwrap();

    assert_eq!(ctx.aggregator.stats().processed, 0);
}
