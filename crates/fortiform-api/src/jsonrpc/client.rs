// JSON-RPC HTTP client
//
// Wraps `reqwest::Client` with FortiManager envelope construction, status
// code mapping, session bookkeeping, and transient-failure retries.
// Session login and workspace locking live in sibling modules as inherent
// methods to keep this file focused on transport mechanics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::AuthStrategy;
use crate::error::Error;
use crate::jsonrpc::models::{Method, Param, Request, Response, Status};
use crate::transport::TransportConfig;

/// Delay between retry attempts of a transient failure.
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Default number of extra attempts for transient failures.
pub const DEFAULT_RETRIES: u32 = 1;

/// Raw client for FortiManager's `/jsonrpc` endpoint.
///
/// One request carries exactly one `params` entry; the matching `result`
/// entry's status is checked before `data` is handed back to the caller.
pub struct JsonRpcClient {
    http: reqwest::Client,
    endpoint: Url,
    strategy: AuthStrategy,
    /// Session string returned by `/sys/login/user`. Sent in the body of
    /// every request while present.
    session: RwLock<Option<SecretString>>,
    next_id: AtomicU64,
    retries: u32,
    timeout: Duration,
}

impl JsonRpcClient {
    /// Create a session-auth client. Call [`login`](Self::login) before use.
    ///
    /// `base_url` is the FortiManager root (e.g. `https://fmg.example.net`);
    /// `/jsonrpc` is appended unless already present.
    pub fn new(base_url: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut client = Self::with_client(http, base_url)?;
        client.timeout = transport.timeout;
        Ok(client)
    }

    /// Create a client authenticated by a REST API admin token.
    pub fn with_token(
        base_url: &Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid API token header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        let mut client = Self::with_client(http, base_url)?;
        client.strategy = AuthStrategy::Token;
        client.timeout = transport.timeout;
        Ok(client)
    }

    /// Wrap an existing `reqwest::Client` (caller manages TLS and headers).
    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Result<Self, Error> {
        Ok(Self {
            http,
            endpoint: Self::normalize_endpoint(base_url)?,
            strategy: AuthStrategy::Session,
            session: RwLock::new(None),
            next_id: AtomicU64::new(1),
            retries: DEFAULT_RETRIES,
            timeout: Duration::from_secs(30),
        })
    }

    /// Set how many extra attempts a transient failure gets.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// `https://host/` → `https://host/jsonrpc`
    fn normalize_endpoint(base: &Url) -> Result<Url, Error> {
        let mut url = base.clone();
        let path = url.path().trim_end_matches('/').to_owned();
        if !path.ends_with("/jsonrpc") {
            url.set_path(&format!("{path}/jsonrpc"));
        }
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(url)
    }

    /// The JSON-RPC endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn strategy(&self) -> AuthStrategy {
        self.strategy
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Whether a login session is currently held.
    pub fn has_session(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    // ── Session bookkeeping ──────────────────────────────────────────

    pub(crate) fn set_session(&self, session: String) {
        debug!("storing session");
        *self.session.write().unwrap_or_else(PoisonError::into_inner) =
            Some(SecretString::from(session));
    }

    pub(crate) fn clear_session(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn session_string(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.expose_secret().to_owned())
    }

    // ── Calls ────────────────────────────────────────────────────────

    /// Perform one JSON-RPC call and return the `data` of the result entry.
    ///
    /// Transient transport failures are retried up to `retries` times.
    /// Non-zero status codes are mapped to [`Error`] variants and never retried.
    ///
    /// A retried `add` that answers "already exists" means an earlier
    /// attempt was applied even though its response was lost, so it counts
    /// as success with no echoed key.
    pub async fn call(
        &self,
        method: Method,
        url: &str,
        data: Option<&Value>,
    ) -> Result<Option<Value>, Error> {
        let mut attempt = 0;
        loop {
            match self.call_once(method, url, data).await {
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    warn!(%method, url, attempt, error = %e, "retrying after transient failure");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(Error::AlreadyExists { .. }) if method == Method::Add && attempt > 0 => {
                    warn!(url, attempt, "add was applied by an earlier attempt");
                    return Ok(None);
                }
                other => return other,
            }
        }
    }

    async fn call_once(
        &self,
        method: Method,
        url: &str,
        data: Option<&Value>,
    ) -> Result<Option<Value>, Error> {
        let resp = self.send(method, url, data).await?;
        let entry = resp
            .result
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmptyResult { url: url.into() })?;
        check_status(&entry.status, url)?;
        Ok(entry.data)
    }

    /// Send one request and parse the envelope without checking statuses.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: &str,
        data: Option<&Value>,
    ) -> Result<Response, Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = self.session_string();
        let request = Request {
            id,
            method,
            params: [Param { url, data }],
            session: session.as_deref(),
            verbose: 1,
        };

        debug!(%method, url, id, "jsonrpc call");

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                message: preview(&body),
                url: url.into(),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;
        trace!(id, body = %preview(&body), "jsonrpc response");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// Map a FortiManager status block to a result.
pub(crate) fn check_status(status: &Status, url: &str) -> Result<(), Error> {
    if status.is_ok() {
        return Ok(());
    }
    Err(match status.code {
        -2 => Error::AlreadyExists { url: url.into() },
        -3 => Error::NotFound { url: url.into() },
        -11 => Error::Permission { url: url.into() },
        code => Error::Api {
            code,
            message: status
                .message
                .clone()
                .unwrap_or_else(|| format!("status code {code}")),
            url: url.into(),
        },
    })
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn endpoint_for(raw: &str) -> String {
        let base = Url::parse(raw).unwrap();
        JsonRpcClient::normalize_endpoint(&base).unwrap().to_string()
    }

    #[test]
    fn endpoint_is_appended_once() {
        assert_eq!(endpoint_for("https://fmg.local"), "https://fmg.local/jsonrpc");
        assert_eq!(endpoint_for("https://fmg.local/"), "https://fmg.local/jsonrpc");
        assert_eq!(
            endpoint_for("https://fmg.local:8443/jsonrpc"),
            "https://fmg.local:8443/jsonrpc"
        );
        assert_eq!(
            endpoint_for("https://proxy.local/fmg/"),
            "https://proxy.local/fmg/jsonrpc"
        );
    }

    #[test]
    fn status_codes_map_to_variants() {
        let status = |code| Status {
            code,
            message: Some("boom".into()),
        };
        assert!(check_status(&status(0), "/x").is_ok());
        assert!(matches!(
            check_status(&status(-2), "/x"),
            Err(Error::AlreadyExists { .. })
        ));
        assert!(matches!(
            check_status(&status(-3), "/x"),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            check_status(&status(-11), "/x"),
            Err(Error::Permission { .. })
        ));
        match check_status(&status(-10), "/x") {
            Err(Error::Api { code, message, .. }) => {
                assert_eq!(code, -10);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
