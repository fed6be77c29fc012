//! FlavorDB client tests against a wiremock server.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use saucier::{CacheStore, FlavorClient, FlavorProfile, IngredientSelection};

const ENTITIES: &str = "/flavordb/entities_json";

fn flavor_client(server: &MockServer, cache: Arc<CacheStore>) -> FlavorClient {
    FlavorClient::with_base_url(cache, format!("{}/flavordb/", server.uri())).unwrap()
}

async fn mount_tomato(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path(ENTITIES))
        .and(query_param("id", "413"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entity_id": 413,
            "category_readable": "Vegetable",
            "molecules": [
                {"common_name": "furaneol", "flavor_profile": "sweet@fruity"},
                {"common_name": "hexanal", "flavor_profile": "green@ sweet "},
                {"common_name": "unknown", "flavor_profile": null},
                {"common_name": "bare"},
            ]
        })))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn compounds_are_parsed_and_cached() {
    let server = MockServer::start().await;
    mount_tomato(&server, 1).await;
    let cache = Arc::new(CacheStore::in_memory());
    let client = flavor_client(&server, cache.clone());

    let compounds = client.fetch_compounds(" Tomato ").await.unwrap();
    assert_eq!(compounds.entity_id, 413);
    assert_eq!(compounds.category.as_deref(), Some("Vegetable"));
    assert_eq!(compounds.compound_count, 4);
    assert_eq!(compounds.flavor_tags, vec!["sweet", "fruity", "green"]);

    assert!(cache.get("flavordb_tomato").is_some());
    assert_eq!(client.fetch_compounds("tomato").await, Some(compounds));
}

#[tokio::test]
async fn unmapped_ingredient_does_no_io() {
    let server = MockServer::start().await;
    let client = flavor_client(&server, Arc::new(CacheStore::in_memory()));

    assert_eq!(client.fetch_compounds("dragonfruit").await, None);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_lookup_is_none_and_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENTITIES))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;
    let client = flavor_client(&server, Arc::new(CacheStore::in_memory()));

    assert_eq!(client.fetch_compounds("garlic").await, None);
    assert_eq!(client.fetch_compounds("garlic").await, None);
}

#[tokio::test]
async fn enhanced_profile_mixes_live_and_static_profiles() {
    let server = MockServer::start().await;
    mount_tomato(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(ENTITIES))
        .and(query_param("id", "178"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let client = flavor_client(&server, Arc::new(CacheStore::in_memory()));

    let vessel = vec![
        // FlavorDB: sweet + fruity hits.
        IngredientSelection::new("tomato"),
        // Unmapped: static profile.
        IngredientSelection::new("dragonfruit").with_flavor(FlavorProfile {
            sweet: 80,
            sour: 30,
            ..FlavorProfile::default()
        }),
        // Lookup fails, no static profile.
        IngredientSelection::new("garlic"),
    ];

    let profile = client.enhanced_profile(&vessel).await;
    assert_eq!(
        profile,
        FlavorProfile {
            sweet: 33,
            sour: 10,
            spicy: 0,
            bitter: 0,
            savory: 0,
        }
    );
}

#[tokio::test]
async fn empty_vessel_is_neutral() {
    let server = MockServer::start().await;
    let client = flavor_client(&server, Arc::new(CacheStore::in_memory()));
    assert_eq!(client.enhanced_profile(&[]).await, FlavorProfile::default());
}
