//! End-to-end tests of the adapter over the reqwest transport

use conduit_http::{
    ClientConfig, HttpClientAdapter, HttpConfig, HttpError, RequestConfig, ResponseType,
};
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> HttpClientAdapter {
    let config = ClientConfig {
        base_url: server.uri(),
        transport: HttpConfig::fast(),
    };
    HttpClientAdapter::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_get_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "Test"})))
        .expect(1)
        .mount(&server)
        .await;

    let result: Value = client_for(&server).get("/test", None, None).await.unwrap();

    assert_eq!(result, json!({"id": 1, "name": "Test"}));
}

#[tokio::test]
async fn test_post_sends_json_body_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(header("x-test", "test-value"))
        .and(body_json(json!({"name": "test"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let config = RequestConfig::new().with_header("X-Test", "test-value");
    let envelope = client_for(&server)
        .post_request("/items", Some(&json!({"name": "test"})), Some(config))
        .await
        .unwrap();

    assert_eq!(envelope.status, 201);
    assert_eq!(envelope.status_text, "Created");
    assert_eq!(envelope.data, json!({"id": 7}));
}

#[tokio::test]
async fn test_not_found_as_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"message": "Not Found"}))
                .insert_header("x-request-id", "abc"),
        )
        .mount(&server)
        .await;

    let envelope = client_for(&server)
        .get_request("/missing", None, None)
        .await
        .unwrap();

    assert_eq!(envelope.status, 404);
    assert_eq!(envelope.data, json!({"message": "Not Found"}));
    assert_eq!(envelope.headers.get("x-request-id").unwrap(), "abc");
}

#[tokio::test]
async fn test_not_found_fails_body_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let result: Result<Value, _> = client_for(&server).get("/missing", None, None).await;

    match result {
        Err(HttpError::Transport(failure)) => {
            assert_eq!(failure.status, 404);
            assert_eq!(failure.error, json!("gone"));
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_no_content_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result: Value = client_for(&server)
        .delete("/items/1", None, None)
        .await
        .unwrap();

    assert_eq!(result, Value::Null);
}

#[tokio::test]
async fn test_text_response_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let config = RequestConfig::new().with_response_type(ResponseType::Text);
    let result: String = client_for(&server)
        .get("/health", Some(config), None)
        .await
        .unwrap();

    assert_eq!(result, "ok");
}

#[tokio::test]
async fn test_filter_query_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("filter[status][eq]", "open"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let filter = conduit_http::FilterQuery::new()
        .filter("status", conduit_http::FilterOperator::Eq, "open")
        .paginate(conduit_http::Pagination {
            limit: Some(5),
            ..Default::default()
        });

    let result: Vec<Value> = client_for(&server)
        .get("/items", None, Some(&filter))
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_status_zero_envelope() {
    // Reserve a free port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        HttpClientAdapter::from_config(&ClientConfig::new(format!("http://{addr}"))).unwrap();
    let envelope = client.get_request("/test", None, None).await.unwrap();

    assert_eq!(envelope.status, 0);
    assert_eq!(envelope.status_text, "Unknown Error");
    assert!(!envelope.is_success());
}
