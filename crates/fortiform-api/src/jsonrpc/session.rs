// Session authentication
//
// Username/password login against `/sys/login/user`. FortiManager returns
// a session string at the top level of the response envelope; the client
// keeps it and sends it with every later request until logout.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::auth::AuthStrategy;
use crate::error::Error;
use crate::jsonrpc::client::{JsonRpcClient, check_status};
use crate::jsonrpc::models::Method;

const LOGIN_URL: &str = "/sys/login/user";
const LOGOUT_URL: &str = "/sys/logout";

impl JsonRpcClient {
    /// Authenticate with username/password and store the returned session.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        if self.strategy() == AuthStrategy::Token {
            debug!("token auth in use -- skipping session login");
            return Ok(());
        }

        debug!(username, "logging in");

        let data = json!({
            "user": username,
            "passwd": password.expose_secret(),
        });

        let resp = self.send(Method::Exec, LOGIN_URL, Some(&data)).await?;
        let entry = resp
            .result
            .first()
            .ok_or_else(|| Error::EmptyResult {
                url: LOGIN_URL.into(),
            })?;

        if let Err(e) = check_status(&entry.status, LOGIN_URL) {
            return Err(Error::Authentication {
                message: format!("login rejected: {e}"),
            });
        }

        let session = resp.session.ok_or_else(|| Error::Authentication {
            message: "login succeeded but no session was returned".into(),
        })?;
        self.set_session(session);

        debug!("login successful");
        Ok(())
    }

    /// End the current session. A no-op without one.
    pub async fn logout(&self) -> Result<(), Error> {
        if !self.has_session() {
            return Ok(());
        }

        debug!("logging out");
        let result = self.call(Method::Exec, LOGOUT_URL, None).await;
        self.clear_session();
        result.map(|_| ())
    }
}
