use fleetpick::core::action::Action;
use fleetpick::core::coordinator::CoordinatorConfig;
use fleetpick::driver::Selector;
use fleetpick::source::{PageSource, RestPageSource, SourceError};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param, query_param_is_missing},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// JSON rows shaped like the `cars` table, ids starting at `first`
fn car_rows(first: usize, count: usize) -> Value {
    let rows: Vec<Value> = (first..first + count)
        .map(|n| {
            json!({
                "id_unico": format!("CAR-{n:03}"),
                "name": format!("Inspection Vehicle {n}"),
                "model": "Ford Ranger",
                "license_plate": format!("XYZ-{n:04}"),
            })
        })
        .collect();
    Value::Array(rows)
}

fn source_for(server: &MockServer, api_key: Option<&str>) -> RestPageSource {
    RestPageSource::new(
        server.uri(),
        api_key.map(str::to_string),
        "cars".to_string(),
    )
}

// ============================================================================
// Request Shape
// ============================================================================

#[tokio::test]
async fn test_first_page_without_term_sends_window_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/cars"))
        .and(query_param("select", "id_unico,name,model,license_plate"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "5"))
        .and(query_param_is_missing("or"))
        .respond_with(ResponseTemplate::new(200).set_body_json(car_rows(1, 5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, None);
    let rows = assert_ok!(source.fetch_page("", 0, 5).await);

    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].id_unico, "CAR-001");
    assert_eq!(rows[0].label(), "Inspection Vehicle 1 Ford Ranger");
}

#[tokio::test]
async fn test_search_term_becomes_ilike_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/cars"))
        .and(query_param("offset", "5"))
        .and(query_param("limit", "5"))
        .and(query_param(
            "or",
            "(id_unico.ilike.\"*ranger*\",name.ilike.\"*ranger*\",model.ilike.\"*ranger*\",license_plate.ilike.\"*ranger*\")",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(car_rows(6, 2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, None);
    let rows = assert_ok!(source.fetch_page("  ranger ", 5, 5).await);
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_api_key_sent_as_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/cars"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, Some("anon-key"));
    let rows = assert_ok!(source.fetch_page("", 0, 5).await);
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/cars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(car_rows(1, 1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = RestPageSource::new(
        format!("{}/", mock_server.uri()),
        None,
        "cars".to_string(),
    );
    assert_ok!(source.fetch_page("", 0, 5).await);
}

// ============================================================================
// Error Mapping
// ============================================================================

#[tokio::test]
async fn test_http_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/cars"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, None);
    let err = assert_err!(source.fetch_page("", 0, 5).await);

    match err {
        SourceError::Api { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("Internal Server Error"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_postgrest_error_body_message_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/cars"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "PGRST301",
            "details": null,
            "hint": null,
            "message": "JWT expired"
        })))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, Some("stale-key"));
    let err = assert_err!(source.fetch_page("", 0, 5).await);
    assert_eq!(
        err,
        SourceError::Api {
            status: 401,
            message: "JWT expired".to_string(),
        }
    );
}

#[tokio::test]
async fn test_malformed_json_maps_to_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/cars"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"rows\": ["))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, None);
    let err = assert_err!(source.fetch_page("", 0, 5).await);
    assert!(matches!(err, SourceError::Parse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_oversized_page_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/cars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(car_rows(1, 6)))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, None);
    let err = assert_err!(source.fetch_page("", 0, 5).await);
    assert!(matches!(err, SourceError::Parse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_connection_refused_maps_to_network_error() {
    // Port 9 (discard) is almost never listening
    let source = RestPageSource::new(
        "http://127.0.0.1:9".to_string(),
        None,
        "cars".to_string(),
    );
    let err = assert_err!(source.fetch_page("", 0, 5).await);
    assert!(matches!(err, SourceError::Network(_)), "got {:?}", err);
}

// ============================================================================
// Selector Against a REST Backend
// ============================================================================

#[tokio::test]
async fn test_selector_pages_through_rest_backend() {
    let mock_server = MockServer::start().await;

    for (offset, first, count) in [("0", 1, 5), ("5", 6, 5), ("10", 11, 3)] {
        Mock::given(method("GET"))
            .and(path("/rest/v1/cars"))
            .and(query_param("offset", offset))
            .respond_with(ResponseTemplate::new(200).set_body_json(car_rows(first, count)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let source: Arc<dyn PageSource> = Arc::new(source_for(&mock_server, None));
    let mut selector = Selector::new(source, CoordinatorConfig::default(), Duration::from_secs(5));

    selector.dispatch(Action::Open);
    selector.process_next().await;
    for _ in 0..2 {
        selector.dispatch(Action::LoadNextPage);
        selector.process_next().await;
    }

    let state = selector.coordinator().state();
    assert_eq!(state.loaded_items.len(), 13);
    assert_eq!(state.page_index, 3);
    assert!(!state.has_more);
    assert_eq!(state.loaded_items[12].id_unico, "CAR-013");

    // Exhausted: further requests are no-ops
    selector.dispatch(Action::LoadNextPage);
    assert!(!selector.coordinator().state().is_loading);
}

#[tokio::test]
async fn test_selector_times_out_slow_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/cars"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(car_rows(1, 5))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let source: Arc<dyn PageSource> = Arc::new(source_for(&mock_server, None));
    let mut selector = Selector::new(
        source,
        CoordinatorConfig::default(),
        Duration::from_millis(100),
    );

    selector.dispatch(Action::Open);
    selector.process_next().await;

    let state = selector.coordinator().state();
    assert!(!state.is_loading);
    assert!(state.loaded_items.is_empty());
    assert!(state.last_error.is_some());
}
