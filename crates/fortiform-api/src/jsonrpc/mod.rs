// FortiManager JSON-RPC client modules
//
// One endpoint (`/jsonrpc`), one envelope shape, and a handful of methods
// (get/add/set/update/delete/exec) addressed by object URL.

pub mod client;
pub mod models;
pub mod session;
pub mod workspace;

pub use client::{DEFAULT_RETRIES, JsonRpcClient};
pub use models::{Method, Object};
