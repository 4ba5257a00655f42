// Object-level API surface
//
// The CRUD engine in `fortiform-core` talks to FortiManager only through
// `ConfigApi`, which keeps it testable against an in-memory double.

use std::future::Future;

use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::jsonrpc::{JsonRpcClient, Method, Object};

/// Object-addressed configuration calls.
///
/// Every method takes a fully resolved object URL such as
/// `/pm/config/device/FGT1/vdom/root/router/ospf/ospf-interface/wan1/md5-keys/1`.
pub trait ConfigApi: Send + Sync {
    /// Fetch one object. `Ok(None)` when FortiManager reports it does not exist.
    fn get(&self, url: &str) -> impl Future<Output = Result<Option<Object>, Error>> + Send;

    /// Add an object to a table. Returns whatever key data FortiManager echoes back.
    fn add(
        &self,
        url: &str,
        data: &Object,
    ) -> impl Future<Output = Result<Option<Object>, Error>> + Send;

    /// Replace an object (or a singleton) wholesale.
    fn set(&self, url: &str, data: &Object) -> impl Future<Output = Result<(), Error>> + Send;

    /// Merge the given fields into an existing object.
    fn update(&self, url: &str, data: &Object) -> impl Future<Output = Result<(), Error>> + Send;

    /// Remove an object.
    fn delete(&self, url: &str) -> impl Future<Output = Result<(), Error>> + Send;

    /// Acquire the ADOM workspace lock.
    fn lock_workspace(&self, adom: &str) -> impl Future<Output = Result<(), Error>> + Send;

    /// Commit and keep the lock.
    fn commit_workspace(&self, adom: &str) -> impl Future<Output = Result<(), Error>> + Send;

    /// Release the ADOM workspace lock.
    fn unlock_workspace(&self, adom: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Pick the object out of a `data` payload.
///
/// Single-object URLs answer with an object; some firmware wraps it in a
/// one-element array.
fn into_object(data: Option<Value>) -> Option<Object> {
    match data? {
        Value::Object(map) => Some(map),
        Value::Array(items) => items.into_iter().find_map(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        }),
        _ => None,
    }
}

impl ConfigApi for JsonRpcClient {
    async fn get(&self, url: &str) -> Result<Option<Object>, Error> {
        match self.call(Method::Get, url, None).await {
            Ok(data) => Ok(into_object(data)),
            Err(e) if e.is_not_found() => {
                debug!(url, "object does not exist");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn add(&self, url: &str, data: &Object) -> Result<Option<Object>, Error> {
        let body = Value::Object(data.clone());
        let resp = self.call(Method::Add, url, Some(&body)).await?;
        Ok(into_object(resp))
    }

    async fn set(&self, url: &str, data: &Object) -> Result<(), Error> {
        let body = Value::Object(data.clone());
        self.call(Method::Set, url, Some(&body)).await.map(|_| ())
    }

    async fn update(&self, url: &str, data: &Object) -> Result<(), Error> {
        let body = Value::Object(data.clone());
        self.call(Method::Update, url, Some(&body)).await.map(|_| ())
    }

    async fn delete(&self, url: &str) -> Result<(), Error> {
        self.call(Method::Delete, url, None).await.map(|_| ())
    }

    async fn lock_workspace(&self, adom: &str) -> Result<(), Error> {
        self.lock_adom(adom).await
    }

    async fn commit_workspace(&self, adom: &str) -> Result<(), Error> {
        self.commit_adom(adom).await
    }

    async fn unlock_workspace(&self, adom: &str) -> Result<(), Error> {
        self.unlock_adom(adom).await
    }
}
