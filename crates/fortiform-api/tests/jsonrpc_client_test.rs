#![allow(clippy::unwrap_used)]
// Integration tests for `JsonRpcClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fortiform_api::{ConfigApi, Error, JsonRpcClient, Method, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, JsonRpcClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = JsonRpcClient::with_client(reqwest::Client::new(), &base_url).unwrap();
    (server, client)
}

fn ok(url: &str, data: serde_json::Value) -> serde_json::Value {
    json!({
        "id": 1,
        "result": [{
            "status": { "code": 0, "message": "OK" },
            "url": url,
            "data": data
        }]
    })
}

fn status(url: &str, code: i64, message: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "result": [{
            "status": { "code": code, "message": message },
            "url": url
        }]
    })
}

const DNS_URL: &str = "/pm/config/device/FGT1/global/system/dns";

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_session_for_later_calls() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "method": "exec",
            "params": [{ "url": "/sys/login/user", "data": { "user": "admin" } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "result": [{ "status": { "code": 0, "message": "OK" }, "url": "/sys/login/user" }],
            "session": "s3ss10n"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({ "method": "get", "session": "s3ss10n" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok(DNS_URL, json!({ "primary": "1.1.1.1" }))),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "test-password".to_string().into();
    client.login("admin", &secret).await.unwrap();
    assert!(client.has_session());

    let obj = client.get(DNS_URL).await.unwrap().unwrap();
    assert_eq!(obj["primary"], "1.1.1.1");
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(status(
                "/sys/login/user",
                -22,
                "Login fail",
            )),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong-password".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.has_session());
}

#[tokio::test]
async fn test_token_client_sends_bearer_header() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let token: secrecy::SecretString = "tok-123".to_string().into();
    let client =
        JsonRpcClient::with_token(&base_url, &token, &TransportConfig::default()).unwrap();

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(DNS_URL, json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    // Login is a no-op for token auth.
    let secret: secrecy::SecretString = "unused".to_string().into();
    client.login("admin", &secret).await.unwrap();
    assert!(!client.has_session());

    client.get(DNS_URL).await.unwrap();
}

// ── Object calls ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_missing_object_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(status(DNS_URL, -3, "Object does not exist")),
        )
        .mount(&server)
        .await;

    assert!(client.get(DNS_URL).await.unwrap().is_none());
}

#[tokio::test]
async fn test_add_returns_key_data() {
    let (server, client) = setup().await;
    let url = "/pm/config/device/FGT1/vdom/root/log/syslogd/filter/free-style";

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "method": "add",
            "params": [{ "url": url, "data": { "filter": "level>=warning" } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(url, json!({ "id": 4 }))))
        .mount(&server)
        .await;

    let mut data = serde_json::Map::new();
    data.insert("filter".into(), json!("level>=warning"));
    let echoed = client.add(url, &data).await.unwrap().unwrap();
    assert_eq!(echoed["id"], 4);
}

#[tokio::test]
async fn test_duplicate_add_is_already_exists() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(status(DNS_URL, -2, "Object already exists")),
        )
        .mount(&server)
        .await;

    let result = client.add(DNS_URL, &serde_json::Map::new()).await;
    assert!(
        matches!(result, Err(Error::AlreadyExists { .. })),
        "got {result:?}"
    );
}

#[tokio::test]
async fn test_permission_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status(
            DNS_URL,
            -11,
            "No permission for the resource",
        )))
        .mount(&server)
        .await;

    let err = client.delete(DNS_URL).await.unwrap_err();
    assert_eq!(err.api_code(), Some(-11));
}

#[tokio::test]
async fn test_http_401_is_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.call(Method::Get, DNS_URL, None).await.unwrap_err();
    assert!(err.is_auth_expired(), "got {err:?}");
}

#[tokio::test]
async fn test_http_error_is_not_a_status_code() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client.call(Method::Get, DNS_URL, None).await.unwrap_err();
    assert!(
        matches!(err, Error::Http { status: 503, ref message, .. } if message == "maintenance"),
        "got {err:?}"
    );
    assert_eq!(err.api_code(), None);
}

#[tokio::test]
async fn test_garbage_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    match client.call(Method::Get, DNS_URL, None).await {
        Err(Error::Deserialization { body, .. }) => assert!(body.contains("nope")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Workspace ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_workspace_lock_commit_unlock() {
    let (server, client) = setup().await;

    for action in ["lock", "commit", "unlock"] {
        let url = format!("/dvmdb/adom/root/workspace/{action}");
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "exec",
                "params": [{ "url": url }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok(&url, json!(null))))
            .expect(1)
            .mount(&server)
            .await;
    }

    client.lock_workspace("root").await.unwrap();
    client.commit_workspace("root").await.unwrap();
    client.unlock_workspace("root").await.unwrap();
}

// ── Retries ─────────────────────────────────────────────────────────

async fn timeout_client(server: &MockServer, retries: u32) -> JsonRpcClient {
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(200))
        .build()
        .unwrap();
    JsonRpcClient::with_client(http, &Url::parse(&server.uri()).unwrap())
        .unwrap()
        .with_retries(retries)
}

#[tokio::test]
async fn test_timeout_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(DNS_URL, json!({ "primary": "8.8.8.8" })))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok(DNS_URL, json!({ "primary": "8.8.8.8" }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = timeout_client(&server, 1).await;
    let data = client.get(DNS_URL).await.unwrap().unwrap();
    assert_eq!(data["primary"], "8.8.8.8");
}

#[tokio::test]
async fn test_status_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(status(DNS_URL, -11, "No permission")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = timeout_client(&server, 3).await;
    let err = client.call(Method::Get, DNS_URL, None).await.unwrap_err();
    assert!(matches!(err, Error::Permission { .. }));
}

#[tokio::test]
async fn test_retried_add_that_already_landed_succeeds() {
    let server = MockServer::start().await;
    let url = "/pm/config/device/FGT1/vdom/root/wireless-controller/vap";

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "add" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(url, json!({ "name": "guest" })))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "add" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(status(url, -2, "Object already exists")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = timeout_client(&server, 1).await;
    let mut data = serde_json::Map::new();
    data.insert("name".into(), json!("guest"));
    let echoed = client.add(url, &data).await.unwrap();
    assert!(echoed.is_none());
}

#[tokio::test]
async fn test_first_add_already_exists_is_still_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(status(DNS_URL, -2, "Object already exists")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = timeout_client(&server, 2).await;
    let err = client.add(DNS_URL, &serde_json::Map::new()).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyExists { .. }), "got {err:?}");
}
