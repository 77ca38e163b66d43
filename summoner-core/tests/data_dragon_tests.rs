//! Data Dragon client and catalog against a mock CDN

mod common;

use std::sync::Arc;
use std::time::Duration;

use summoner_core::catalog::{ChampionCatalog, DataDragonSource, ReferenceSource};
use summoner_core::error::SummonerError;
use summoner_core::retry::RetryConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{DATA_VERSION, champion_document};

fn champion_path(id: &str) -> String {
    format!("/cdn/{}/data/fr_FR/champion/{}.json", DATA_VERSION, id)
}

fn source(server: &MockServer) -> DataDragonSource {
    DataDragonSource::new(server.uri(), DATA_VERSION, "fr_FR", Duration::from_secs(5))
        .expect("client builds")
}

fn fast_retry() -> RetryConfig {
    RetryConfig::default()
        .with_max_attempts(3)
        .with_initial_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(5))
        .with_jitter(false)
}

#[tokio::test]
async fn test_fetch_parses_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(champion_path("Ahri")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(champion_document("Ahri", "Ahri", &["Mage", "Assassin"])),
        )
        .mount(&server)
        .await;

    let record = source(&server).fetch_champion("Ahri").await.unwrap();
    assert_eq!(record.name, "Ahri");
    assert_eq!(record.tags, vec!["Mage", "Assassin"]);
    assert_eq!(record.lore, "Ahri vient de Runeterra.");
    assert_eq!(record.abilities[0].cost_type, "Mana");
}

#[tokio::test]
async fn test_repeat_fetch_issues_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(champion_path("LeeSin")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(champion_document("LeeSin", "Lee Sin", &["Fighter"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let catalog = ChampionCatalog::new(Arc::new(source(&server)), 32, fast_retry());
    let first = catalog.fetch("Lee Sin").await.unwrap();
    let second = catalog.fetch("  lee sin ").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.name, "Lee Sin");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_not_found_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(champion_path("Xyzzy123")))
        .respond_with(ResponseTemplate::new(403).set_body_string("AccessDenied"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(champion_path("Nobody")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let catalog = ChampionCatalog::new(Arc::new(source(&server)), 32, fast_retry());
    assert!(matches!(catalog.fetch("xyzzy123").await, Err(SummonerError::NotFound(_))));
    assert!(matches!(catalog.fetch("nobody").await, Err(SummonerError::NotFound(_))));

    // remembered, not retried
    assert!(catalog.lookup("Xyzzy123").await.is_none());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(champion_path("Caitlyn")))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(champion_path("Caitlyn")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(champion_document("Caitlyn", "Caitlyn", &["Marksman"])),
        )
        .mount(&server)
        .await;

    let catalog = ChampionCatalog::new(Arc::new(source(&server)), 32, fast_retry());
    let record = catalog.fetch("Caitlyn").await.unwrap();
    assert_eq!(record.id, "Caitlyn");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_permanent_failure_fails_fast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(champion_path("Ahri")))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;

    let catalog = ChampionCatalog::new(Arc::new(source(&server)), 32, fast_retry());
    let err = catalog.fetch("Ahri").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(!err.is_retryable());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    // failures other than NotFound are not remembered
    assert!(catalog.lookup("Ahri").await.is_none());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_malformed_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(champion_path("Ahri")))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\": 42}"))
        .mount(&server)
        .await;

    let err = source(&server).fetch_champion("Ahri").await.unwrap_err();
    assert!(matches!(err, SummonerError::MalformedPayload(_)));
}
