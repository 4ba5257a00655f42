// fortiform-core: Schema-driven resource engine for FortiManager device configuration

pub mod catalog;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod paradict;
pub mod provider;
pub mod schema;
pub mod state;
pub mod value;

pub use config::{AuthCredentials, ProviderConfig, TlsVerification};
pub use engine::Engine;
pub use error::{CoreError, Verb};
pub use paradict::Paradict;
pub use provider::Provider;
pub use schema::{Area, Field, FieldKind, Param, ResourceKind, ResourceSchema};
pub use state::{Address, DEFAULT_STATE_FILE, ResourceState, StateFile};
pub use value::{Attributes, Value};
