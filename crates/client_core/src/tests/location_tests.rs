use super::*;
use std::{collections::HashMap, sync::Arc};

use axum::{extract::Query, extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct StubState {
    body: Value,
    seen_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn stub_handler(
    State(state): State<StubState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.seen_queries.lock().await.push(query);
    Json(state.body.clone())
}

async fn spawn_stub(body: Value) -> (String, Arc<Mutex<Vec<HashMap<String, String>>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let seen_queries = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/lookup", get(stub_handler))
        .with_state(StubState {
            body,
            seen_queries: Arc::clone(&seen_queries),
        });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/lookup"), seen_queries)
}

fn resolver(url: &str, key: Option<&str>) -> LocationResolver {
    let settings = ClientSettings {
        ipinfo_url: url.to_string(),
        ipinfo_token: "ip-token".to_string(),
        geocoding_url: url.to_string(),
        geocoding_api_key: key.map(str::to_string),
        ..ClientSettings::default()
    };
    LocationResolver::new(Client::new(), &settings)
}

#[test]
fn geocode_status_mapping() {
    let ok = GeocodeResponse {
        status: "OK".to_string(),
        results: vec![serde_json::from_value(json!({
            "geometry": { "location": { "lat": 34.05, "lng": -118.24 } }
        }))
        .expect("result")],
    };
    assert_eq!(
        coordinate_from_geocode(ok),
        Ok(Coordinate::new(34.05, -118.24))
    );

    let denied = GeocodeResponse {
        status: "REQUEST_DENIED".to_string(),
        results: Vec::new(),
    };
    assert_eq!(
        coordinate_from_geocode(denied),
        Err(LocationError::InvalidCredentials)
    );

    let zero = GeocodeResponse {
        status: "ZERO_RESULTS".to_string(),
        results: Vec::new(),
    };
    assert_eq!(coordinate_from_geocode(zero), Err(LocationError::ZeroResults));

    let limited = GeocodeResponse {
        status: "OVER_QUERY_LIMIT".to_string(),
        results: Vec::new(),
    };
    assert_eq!(
        coordinate_from_geocode(limited),
        Err(LocationError::ServiceError("OVER_QUERY_LIMIT".to_string()))
    );
}

#[test]
fn geocode_ok_without_results_is_a_service_error() {
    let body = GeocodeResponse {
        status: "OK".to_string(),
        results: Vec::new(),
    };
    assert!(matches!(
        coordinate_from_geocode(body),
        Err(LocationError::ServiceError(_))
    ));
}

#[test]
fn geocode_result_without_position_is_a_service_error() {
    let body: GeocodeResponse = serde_json::from_value(json!({
        "status": "OK",
        "results": [{ "geometry": {} }, { "geometry": { "location": { "lat": 1.0, "lng": 2.0 } } }]
    }))
    .expect("decode");
    assert!(matches!(
        coordinate_from_geocode(body),
        Err(LocationError::ServiceError(_))
    ));

    let body: GeocodeResponse = serde_json::from_value(json!({
        "status": "OK",
        "results": [{ "geometry": null }]
    }))
    .expect("decode");
    assert!(matches!(
        coordinate_from_geocode(body),
        Err(LocationError::ServiceError(_))
    ));

    let body: GeocodeResponse = serde_json::from_value(json!({
        "status": "OK",
        "results": [{ "geometry": { "location": { "lat": 120.0, "lng": 2.0 } } }]
    }))
    .expect("decode");
    assert!(matches!(
        coordinate_from_geocode(body),
        Err(LocationError::ServiceError(_))
    ));
}

#[test]
fn ip_info_out_of_range_loc_fails_detection() {
    for loc in ["91.0,10.0", "40.0,-181.5", "NaN,10.0"] {
        assert!(
            matches!(
                coordinate_from_ip_info(IpInfoResponse {
                    loc: Some(loc.to_string())
                }),
                Err(LocationError::DetectionFailed(_))
            ),
            "{loc} should be rejected"
        );
    }
}

#[test]
fn ip_info_without_loc_fails_detection() {
    assert!(matches!(
        coordinate_from_ip_info(IpInfoResponse { loc: None }),
        Err(LocationError::DetectionFailed(_))
    ));
    assert!(matches!(
        coordinate_from_ip_info(IpInfoResponse {
            loc: Some("somewhere".to_string())
        }),
        Err(LocationError::DetectionFailed(_))
    ));
}

#[tokio::test]
async fn detect_reads_loc_and_sends_token() {
    let (url, seen) = spawn_stub(json!({ "ip": "203.0.113.9", "loc": "40.7128,-74.0060" })).await;
    let coordinate = resolver(&url, None).detect().await.expect("detect");
    assert_eq!(coordinate, Coordinate::new(40.7128, -74.006));

    let seen = seen.lock().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].get("token").map(String::as_str), Some("ip-token"));
}

#[tokio::test]
async fn detect_without_loc_field_fails() {
    let (url, _) = spawn_stub(json!({ "ip": "203.0.113.9", "bogon": true })).await;
    let err = resolver(&url, None).detect().await.expect_err("must fail");
    assert!(matches!(err, LocationError::DetectionFailed(_)));
}

#[tokio::test]
async fn detect_transport_failure_fails_detection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let err = resolver(&format!("http://{addr}/lookup"), None)
        .detect()
        .await
        .expect_err("must fail");
    assert!(matches!(err, LocationError::DetectionFailed(_)));
}

#[tokio::test]
async fn geocode_without_key_issues_no_request() {
    let (url, seen) = spawn_stub(json!({ "status": "OK", "results": [] })).await;
    let err = resolver(&url, None)
        .geocode("1 Main St")
        .await
        .expect_err("must fail");
    assert_eq!(err, LocationError::NotConfigured);
    assert!(seen.lock().await.is_empty());
}

#[tokio::test]
async fn geocode_sends_address_and_key() {
    let (url, seen) = spawn_stub(json!({
        "status": "OK",
        "results": [
            { "geometry": { "location": { "lat": 1.5, "lng": 2.5 } } },
            { "geometry": { "location": { "lat": 9.0, "lng": 9.0 } } }
        ]
    }))
    .await;
    let coordinate = resolver(&url, Some("geo-key"))
        .geocode("University Park, Los Angeles")
        .await
        .expect("geocode");
    assert_eq!(coordinate, Coordinate::new(1.5, 2.5));

    let seen = seen.lock().await;
    assert_eq!(
        seen[0].get("address").map(String::as_str),
        Some("University Park, Los Angeles")
    );
    assert_eq!(seen[0].get("key").map(String::as_str), Some("geo-key"));
}

#[tokio::test]
async fn geocode_denied_and_zero_results_are_distinct() {
    let (denied_url, _) = spawn_stub(json!({ "status": "REQUEST_DENIED", "results": [] })).await;
    let (zero_url, _) = spawn_stub(json!({ "status": "ZERO_RESULTS", "results": [] })).await;

    let denied = resolver(&denied_url, Some("k"))
        .geocode("x")
        .await
        .expect_err("denied");
    let zero = resolver(&zero_url, Some("k"))
        .geocode("x")
        .await
        .expect_err("zero");
    assert_eq!(denied, LocationError::InvalidCredentials);
    assert_eq!(zero, LocationError::ZeroResults);
}
