#![allow(clippy::unwrap_used)]
// Engine integration tests against a mock FortiManager.

use std::collections::BTreeMap;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fortiform_core::{
    AuthCredentials, CoreError, Provider, ProviderConfig, ResourceState, Value, catalog,
};

// ── Helpers ─────────────────────────────────────────────────────────

const VAP_URL: &str = "/pm/config/device/FGT1/vdom/root/wireless-controller/vap";

fn ok(url: &str, data: serde_json::Value) -> serde_json::Value {
    json!({
        "id": 1,
        "result": [{ "status": { "code": 0, "message": "OK" }, "url": url, "data": data }]
    })
}

fn status(url: &str, code: i64, message: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "result": [{ "status": { "code": code, "message": message }, "url": url }]
    })
}

fn params() -> BTreeMap<String, String> {
    [
        ("device_name".to_owned(), "FGT1".to_owned()),
        ("device_vdom".to_owned(), "root".to_owned()),
    ]
    .into()
}

fn token_config(server: &MockServer) -> ProviderConfig {
    ProviderConfig::new(
        Url::parse(&server.uri()).unwrap(),
        AuthCredentials::Token("tok".to_string().into()),
    )
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({ "params": [{ "url": "/sys/login/user" }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "result": [{ "status": { "code": 0, "message": "OK" }, "url": "/sys/login/user" }],
            "session": "abc"
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_session_create_then_read_back() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "add",
            "session": "abc",
            "params": [{ "url": VAP_URL, "data": { "name": "guest", "max-clients": 10 } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(VAP_URL, json!({ "name": "guest" }))))
        .expect(1)
        .mount(&server)
        .await;

    let object_url = format!("{VAP_URL}/guest");
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "get",
            "params": [{ "url": object_url }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(
            &object_url,
            json!({
                "name": "guest",
                "ssid": "Guest WiFi",
                "max-clients": 10,
                "schedule": "always weekdays",
                "mac-filter-list": [{ "id": 1, "mac": "00:11:22:33:44:55" }]
            }),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = ProviderConfig::new(
        Url::parse(&server.uri()).unwrap(),
        AuthCredentials::Session {
            username: "admin".into(),
            password: "pw".to_string().into(),
        },
    );
    let provider = Provider::connect(config).await.unwrap();
    let schema = catalog::lookup("fmgdevice_wirelesscontroller_vap").unwrap();

    let mut attributes = BTreeMap::new();
    attributes.insert("name".to_owned(), Value::String("guest".into()));
    attributes.insert("max_clients".to_owned(), Value::Int(10));

    let state = provider
        .engine()
        .create(schema, &params(), &attributes)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(state.id, "guest");
    assert_eq!(state.attributes["ssid"], Value::String("Guest WiFi".into()));
    assert_eq!(
        state.attributes["schedule"],
        Value::List(vec!["always".into(), "weekdays".into()])
    );
    let Value::Blocks(blocks) = &state.attributes["mac_filter_list"] else {
        panic!("expected blocks");
    };
    assert_eq!(blocks[0]["fosid"], Value::Int(1));
}

#[tokio::test]
async fn test_read_of_deleted_object_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(status(VAP_URL, -3, "Object does not exist")),
        )
        .mount(&server)
        .await;

    let provider = Provider::connect(token_config(&server)).await.unwrap();
    let schema = catalog::lookup("fmgdevice_wirelesscontroller_vap").unwrap();
    let state = ResourceState {
        resource_type: schema.type_name.into(),
        id: "guest".into(),
        params: params(),
        attributes: BTreeMap::new(),
    };

    assert!(provider.engine().read(schema, &state).await.unwrap().is_none());
}

#[tokio::test]
async fn test_api_errors_are_wrapped_with_verb_and_title() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(status(VAP_URL, -2, "Object already exists")),
        )
        .mount(&server)
        .await;

    let provider = Provider::connect(token_config(&server)).await.unwrap();
    let schema = catalog::lookup("fmgdevice_wirelesscontroller_vap").unwrap();
    let mut attributes = BTreeMap::new();
    attributes.insert("name".to_owned(), Value::String("guest".into()));

    let err = provider
        .engine()
        .create(schema, &params(), &attributes)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Operation { .. }));
    assert_eq!(
        err.to_string(),
        format!("Error creating WirelessControllerVap resource: Object already exists: {VAP_URL}")
    );
}

#[tokio::test]
async fn test_workspace_mode_locks_commits_and_unlocks() {
    let server = MockServer::start().await;
    let dns_url = "/pm/config/device/FGT1/global/system/dns";

    for action in ["lock", "commit", "unlock"] {
        let url = format!("/dvmdb/adom/root/workspace/{action}");
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "exec", "params": [{ "url": url }] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok(&url, json!(null))))
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "set",
            "params": [{ "url": dns_url, "data": { "primary": "9.9.9.9" } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(dns_url, json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "get" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(dns_url, json!({ "primary": "9.9.9.9", "timeout": "5" }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = token_config(&server);
    config.workspace_mode = true;
    let provider = Provider::connect(config).await.unwrap();
    let schema = catalog::lookup("fmgdevice_system_dns").unwrap();

    let mut attributes = BTreeMap::new();
    attributes.insert("primary".to_owned(), Value::String("9.9.9.9".into()));
    let dns_params = [("device_name".to_owned(), "FGT1".to_owned())].into();

    let state = provider
        .engine()
        .create(schema, &dns_params, &attributes)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(state.id, "SystemDns");
    assert_eq!(state.attributes["timeout"], Value::Int(5));
    provider.disconnect().await;
}
