use api_gateway::{handler, AppState, INFO_MESSAGE};
use async_trait::async_trait;
use lambda_http::http::Request as HttpRequest;
use lambda_http::{Body, Request, Response};
use serde_json::{json, Value};
use shared::{DatabaseSource, Error, NotionCredentials, QueryPage, RelayConfig};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Upstream stand-in returning a canned response.
struct FakeNotion {
    outcome: Result<Value, (u16, String)>,
    calls: AtomicUsize,
}

impl FakeNotion {
    fn rows(rows: Value) -> Self {
        Self {
            outcome: Ok(json!({"object": "list", "results": rows, "has_more": false})),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(status: u16, body: &str) -> Self {
        Self {
            outcome: Err((status, body.to_string())),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DatabaseSource for FakeNotion {
    async fn query_database(&self, credentials: &NotionCredentials) -> shared::Result<QueryPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(credentials.database_id, "db-1");
        match &self.outcome {
            Ok(value) => Ok(serde_json::from_value(value.clone())?),
            Err((status, body)) => Err(Error::Upstream {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

fn config(with_credentials: bool) -> RelayConfig {
    let mut vars = HashMap::from([("WIDGET_SECRET_KEY", "s3cret")]);
    if with_credentials {
        vars.insert("NOTION_TOKEN", "secret_token");
        vars.insert("DATABASE_ID", "db-1");
    }
    RelayConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap()
}

fn state(source: FakeNotion, with_credentials: bool) -> Arc<AppState<FakeNotion>> {
    Arc::new(AppState::new(config(with_credentials), source))
}

fn request(method: &str, key: Option<&str>) -> Request {
    let mut builder = HttpRequest::builder().method(method).uri("/api/notion");
    if let Some(key) = key {
        builder = builder.header("x-widget-key", key);
    }
    builder.body(Body::Empty).unwrap()
}

fn body_json(response: &Response<Body>) -> Value {
    serde_json::from_slice(response.body().as_ref()).unwrap()
}

fn assert_cors(response: &Response<Body>) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization, x-widget-key"
    );
}

fn sample_rows() -> Value {
    json!([
        {
            "id": "row-1",
            "properties": {
                "Name": {"type": "title", "title": [{"plain_text": "Kickoff"}]},
                "Status": {"type": "select", "select": {"name": "Planned"}}
            }
        },
        {
            "id": "row-2",
            "properties": {
                "Name": {"type": "title", "title": [{"plain_text": "Sprint"}]},
                "Date": {"type": "date", "date": {"start": "2024-03-01", "end": "2024-03-05"}}
            }
        },
        {
            "id": "row-3",
            "properties": {}
        }
    ])
}

#[tokio::test]
async fn test_post_returns_one_record_per_row_in_order() {
    let state = state(FakeNotion::rows(sample_rows()), true);

    let response = handler(state.clone(), request("POST", Some("s3cret")))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_cors(&response);
    assert_eq!(
        body_json(&response),
        json!({"results": [
            {"id": "row-1", "title": "Kickoff", "status": "Planned"},
            {"id": "row-2", "title": "Sprint", "status": "2024-03-01 ~ 2024-03-05"},
            {"id": "row-3", "title": "No Title", "status": "No Status"}
        ]})
    );
    assert_eq!(state.source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_wrong_or_missing_key_is_401_regardless_of_config() {
    for with_credentials in [true, false] {
        for key in [None, Some("wrong"), Some("")] {
            let state = state(FakeNotion::rows(sample_rows()), with_credentials);
            let response = handler(state.clone(), request("POST", key)).await.unwrap();

            assert_eq!(response.status(), 401);
            assert_cors(&response);
            assert_eq!(body_json(&response), json!({"error": "Unauthorized"}));
            assert_eq!(state.source.calls.load(Ordering::SeqCst), 0);
        }
    }
}

#[tokio::test]
async fn test_missing_credentials_is_500() {
    let state = state(FakeNotion::rows(sample_rows()), false);

    let response = handler(state.clone(), request("POST", Some("s3cret")))
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    assert_cors(&response);
    let error = body_json(&response)["error"].as_str().unwrap().to_string();
    assert!(error.contains("Missing Notion integration credentials"));
    assert_eq!(state.source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upstream_failure_embeds_status_and_body() {
    let state = state(
        FakeNotion::failing(404, r#"{"code":"object_not_found"}"#),
        true,
    );

    let response = handler(state, request("POST", Some("s3cret"))).await.unwrap();

    assert_eq!(response.status(), 500);
    assert_cors(&response);
    let error = body_json(&response)["error"].as_str().unwrap().to_string();
    assert!(error.contains("404"));
    assert!(error.contains("object_not_found"));
}

#[tokio::test]
async fn test_get_returns_info_message() {
    let state = state(FakeNotion::rows(json!([])), false);

    let response = handler(state, request("GET", None)).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(body_json(&response), json!({"message": INFO_MESSAGE}));
}

#[tokio::test]
async fn test_options_preflight() {
    let state = state(FakeNotion::rows(json!([])), false);

    let response = handler(state.clone(), request("OPTIONS", None)).await.unwrap();

    assert_eq!(response.status(), 204);
    assert_cors(&response);
    assert!(response.body().as_ref().is_empty());
    assert_eq!(state.source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_other_methods_and_paths() {
    let state = state(FakeNotion::rows(json!([])), true);

    let response = handler(state.clone(), request("DELETE", Some("s3cret")))
        .await
        .unwrap();
    assert_eq!(response.status(), 405);
    assert_cors(&response);

    let unknown = HttpRequest::builder()
        .method("POST")
        .uri("/api/tags")
        .body(Body::Empty)
        .unwrap();
    let response = handler(state, unknown).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_empty_database() {
    let state = state(FakeNotion::rows(json!([])), true);

    let response = handler(state, request("POST", Some("s3cret"))).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(body_json(&response), json!({"results": []}));
}
