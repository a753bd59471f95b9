// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use item_image_crawler::config::settings::CatalogVariant;
use item_image_crawler::domain::repositories::catalog_repository::{CatalogError, CatalogSource};
use item_image_crawler::infrastructure::catalog::HttpCatalogSource;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AGENT: &str = "item-image-crawler-tests/1.0";

fn source(server: &MockServer, route: &str, variant: CatalogVariant) -> HttpCatalogSource {
    HttpCatalogSource::new(
        format!("{}{}", server.uri(), route),
        variant,
        AGENT,
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_runescape_dump_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gazbot/rs_dump.json"))
        .and(header("user-agent", AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "%JAGEX_TIMESTAMP%": 1700000000,
            "4151": {"name": "Abyssal whip", "id": 4151},
            "1277": {"name": "Bronze sword", "id": 1277},
            "1278": {"name": "Bronze sword", "id": 1278}
        })))
        .mount(&server)
        .await;

    let entities = source(&server, "/gazbot/rs_dump.json", CatalogVariant::Runescape)
        .fetch_entities()
        .await
        .unwrap();

    assert_eq!(entities, vec!["Abyssal whip", "Bronze sword"]);
}

#[tokio::test]
async fn test_oldschool_mapping_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/osrs/mapping"))
        .and(header("user-agent", AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 2, "name": "Cannonball", "members": true},
            {"id": 4151, "name": "Abyssal whip", "members": true}
        ])))
        .mount(&server)
        .await;

    let entities = source(&server, "/api/v1/osrs/mapping", CatalogVariant::Oldschool)
        .fetch_entities()
        .await
        .unwrap();

    assert_eq!(entities, vec!["Abyssal whip", "Cannonball"]);
}

#[tokio::test]
async fn test_catalog_http_error_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = source(&server, "/gazbot/rs_dump.json", CatalogVariant::Runescape)
        .fetch_entities()
        .await;

    assert!(matches!(result, Err(CatalogError::Request(_))));
}
