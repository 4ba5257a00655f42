// fortiform-api: Async Rust client for the FortiManager JSON-RPC API

pub mod api;
pub mod auth;
pub mod error;
pub mod jsonrpc;
pub mod transport;

pub use api::ConfigApi;
pub use auth::AuthStrategy;
pub use error::Error;
pub use jsonrpc::{DEFAULT_RETRIES, JsonRpcClient, Method, Object};
pub use transport::{TlsMode, TransportConfig};
