//! Integration tests for the City Explorer HTTP surface
//!
//! The router runs in-process against an in-memory store; upstream providers
//! are played by a wiremock server.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use city_explorer::config::{ProviderConfig, ProvidersConfig};
use city_explorer::{AppState, GeocodeCache, Location, MemoryStore, ProviderClient, web};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Everything a test needs to poke at after a request
struct Harness {
    server: MockServer,
    store: Arc<MemoryStore>,
    app: axum::Router,
}

impl Harness {
    async fn with_rows(rows: Vec<Location>) -> Self {
        let server = MockServer::start().await;
        let upstream = ProviderConfig {
            base_url: server.uri(),
            api_key: Some("test-key".to_string()),
        };
        let providers = ProviderClient::new(ProvidersConfig {
            geocode: upstream.clone(),
            weather: upstream.clone(),
            yelp: upstream.clone(),
            trails: upstream,
        })
        .unwrap();

        let store = Arc::new(MemoryStore::with_rows(rows));
        let locations = GeocodeCache::with_single_flight(store.clone(), Arc::new(providers.clone()));
        let app = web::app(AppState::new(locations, providers));

        Self { server, store, app }
    }

    async fn empty() -> Self {
        Self::with_rows(Vec::new()).await
    }

    async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri).await
    }

    async fn request(&self, method: Method, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn seattle_row() -> Location {
    Location::new("seattle", "Seattle, WA, USA", 47.6, -122.33)
}

#[tokio::test]
async fn test_root_banner() {
    let harness = Harness::empty().await;

    let response = harness.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"City Explorer App");
}

#[tokio::test]
async fn test_location_served_from_cache_case_insensitively() {
    let harness = Harness::with_rows(vec![seattle_row()]).await;
    Mock::given(method("GET"))
        .and(path("/v1/search.php"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&harness.server)
        .await;

    let response = harness.get("/location?city=Seattle").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "search_query": "seattle",
            "formatted_query": "Seattle, WA, USA",
            "latitude": 47.6,
            "longitude": -122.33
        })
    );
}

#[tokio::test]
async fn test_location_miss_geocodes_and_caches() {
    let harness = Harness::empty().await;
    Mock::given(method("GET"))
        .and(path("/v1/search.php"))
        .and(query_param("q", "portland"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"display_name": "Portland, Multnomah County, Oregon, USA", "lat": "45.5202471", "lon": "-122.6741949"}
        ])))
        .expect(1)
        .mount(&harness.server)
        .await;

    let first = harness.get("/location?city=%20Portland%20").await;
    assert_eq!(first.status(), StatusCode::OK);
    let body = json_body(first).await;
    assert_eq!(body["search_query"], "portland");
    assert_eq!(body["latitude"], 45.520_247_1);
    assert_eq!(body["longitude"], -122.674_194_9);

    let second = harness.get("/location?city=PORTLAND").await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(json_body(second).await, body);
    assert_eq!(harness.store.len(), 1);
}

#[tokio::test]
async fn test_location_without_matches_is_error() {
    let harness = Harness::empty().await;
    Mock::given(method("GET"))
        .and(path("/v1/search.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&harness.server)
        .await;

    let response = harness.get("/location?city=atlantis").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "No results found for 'atlantis'");
    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_location_missing_city_is_error() {
    let harness = Harness::empty().await;

    let response = harness.get("/location").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({"error": true, "message": "Invalid input: city is required"})
    );
}

#[tokio::test]
async fn test_weather() {
    let harness = Harness::empty().await;
    Mock::given(method("GET"))
        .and(path("/v2.0/forecast/daily"))
        .and(query_param("lat", "47.6"))
        .and(query_param("lon", "-122.33"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"valid_date": "2020-01-01", "weather": {"description": "Light snow"}},
                {"valid_date": "2020-01-02", "weather": {"description": "Overcast clouds"}}
            ]
        })))
        .mount(&harness.server)
        .await;

    let response = harness.get("/weather?latitude=47.6&longitude=-122.33").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!([
            {"forecast": "Light snow", "time": "Wed Jan 01 2020"},
            {"forecast": "Overcast clouds", "time": "Thu Jan 02 2020"}
        ])
    );
}

#[tokio::test]
async fn test_weather_provider_failure_is_500_without_side_effects() {
    let harness = Harness::empty().await;
    Mock::given(method("GET"))
        .and(path("/v2.0/forecast/daily"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&harness.server)
        .await;

    let response = harness.get("/weather?latitude=47.6&longitude=-122.33").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["error"], true);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("weatherbit"), "{message}");
    assert!(message.contains("upstream exploded"), "{message}");
    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_weather_invalid_coordinates_never_reach_provider() {
    let harness = Harness::empty().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&harness.server)
        .await;

    let response = harness.get("/weather?latitude=abc&longitude=-122.33").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("latitude must be a number")
    );
}

#[tokio::test]
async fn test_yelp_pages() {
    let harness = Harness::empty().await;
    Mock::given(method("GET"))
        .and(path("/v3/businesses/search"))
        .and(query_param("offset", "5"))
        .and(query_param("limit", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "businesses": [{
                "name": "Canlis",
                "url": "https://www.yelp.com/biz/canlis-seattle",
                "rating": 4.5,
                "price": "$$$$",
                "image_url": "https://s3-media3.fl.yelpcdn.com/bphoto/canlis.jpg"
            }]
        })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let response = harness
        .get("/yelp?latitude=47.6&longitude=-122.33&page=2")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!([{
            "name": "Canlis",
            "url": "https://www.yelp.com/biz/canlis-seattle",
            "rating": 4.5,
            "price": "$$$$",
            "image_url": "https://s3-media3.fl.yelpcdn.com/bphoto/canlis.jpg"
        }])
    );
}

#[tokio::test]
async fn test_yelp_first_page_by_default() {
    let harness = Harness::empty().await;
    Mock::given(method("GET"))
        .and(path("/v3/businesses/search"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"businesses": []})))
        .expect(1)
        .mount(&harness.server)
        .await;

    let response = harness.get("/yelp?latitude=47.6&longitude=-122.33").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn test_trails() {
    let harness = Harness::empty().await;
    Mock::given(method("GET"))
        .and(path("/data/get-trails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "trails": [{
                "name": "Rattlesnake Ledge",
                "location": "North Bend, Washington",
                "length": 4.3,
                "stars": 4.4,
                "starVotes": 83,
                "summary": "An extremely popular out-and-back hike to the viewpoint.",
                "url": "https://www.hikingproject.com/trail/7021679/rattlesnake-ledge",
                "conditionStatus": "All Clear",
                "conditionDate": "2018-07-21 19:34:13"
            }]
        })))
        .mount(&harness.server)
        .await;

    let response = harness.get("/trails?latitude=47.43&longitude=-121.77").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!([{
            "name": "Rattlesnake Ledge",
            "location": "North Bend, Washington",
            "length": 4.3,
            "stars": 4.4,
            "star_votes": 83,
            "summary": "An extremely popular out-and-back hike to the viewpoint.",
            "trail_url": "https://www.hikingproject.com/trail/7021679/rattlesnake-ledge",
            "conditions": "All Clear",
            "condition_date": "2018-07-21",
            "condition_time": "19:34:13"
        }])
    );
}

#[tokio::test]
async fn test_unmatched_route_is_404() {
    let harness = Harness::empty().await;

    let response = harness.get("/bogus").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({"notFound": true, "message": "That page does not exist."})
    );
}

#[tokio::test]
async fn test_wrong_method_is_not_found() {
    let harness = Harness::with_rows(vec![seattle_row()]).await;

    let response = harness.request(Method::POST, "/location?city=seattle").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({"notFound": true, "message": "That page does not exist."})
    );
}

#[tokio::test]
async fn test_yelp_page_overflow_is_rejected() {
    let harness = Harness::empty().await;
    Mock::given(method("GET"))
        .and(path("/v3/businesses/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"businesses": []})))
        .expect(0)
        .mount(&harness.server)
        .await;

    let response = harness
        .get("/yelp?latitude=47.6&longitude=-122.33&page=4294967295")
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().unwrap().contains("out of range"));
}
