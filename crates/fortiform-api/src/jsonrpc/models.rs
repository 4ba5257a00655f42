// JSON-RPC envelope types
//
// Every FortiManager call is a POST to `/jsonrpc` carrying one of these
// request bodies. The response mirrors the `params` array as `result`,
// each entry holding its own status block.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// A generic JSON object as exchanged with FortiManager.
pub type Object = Map<String, Value>;

// ── Method ───────────────────────────────────────────────────────────

/// JSON-RPC method names understood by FortiManager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Method {
    Get,
    Add,
    Set,
    Update,
    Delete,
    Exec,
}

// ── Request ──────────────────────────────────────────────────────────

/// One entry of the `params` array.
#[derive(Debug, Clone, Serialize)]
pub struct Param<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a Value>,
}

/// Request envelope:
/// ```json
/// { "id": 1, "method": "get", "params": [{ "url": "..." }], "session": "...", "verbose": 1 }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request<'a> {
    pub id: u64,
    pub method: Method,
    pub params: [Param<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<&'a str>,
    /// `1` asks FortiManager to return option values as names, not indexes.
    pub verbose: u8,
}

// ── Response ─────────────────────────────────────────────────────────

/// Response envelope. `result` has one entry per request param.
#[derive(Debug, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Vec<ResultEntry>,
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResultEntry {
    pub status: Status,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// `code == 0` means success.
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
}

impl Status {
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_omits_absent_session_and_data() {
        let req = Request {
            id: 7,
            method: Method::Get,
            params: [Param {
                url: "/pm/config/device/FGT1/global/system/dns",
                data: None,
            }],
            session: None,
            verbose: 1,
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            json!({
                "id": 7,
                "method": "get",
                "params": [{ "url": "/pm/config/device/FGT1/global/system/dns" }],
                "verbose": 1
            })
        );
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let resp: Response = serde_json::from_value(json!({
            "result": [{ "status": { "code": -3 } }]
        }))
        .unwrap();
        assert_eq!(resp.result.len(), 1);
        assert_eq!(resp.result[0].status.code, -3);
        assert!(resp.result[0].status.message.is_none());
        assert!(resp.session.is_none());
    }

    #[test]
    fn method_names_are_lowercase() {
        assert_eq!(Method::Update.to_string(), "update");
        assert_eq!("exec".parse::<Method>().unwrap(), Method::Exec);
    }
}
