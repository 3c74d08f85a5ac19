#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use wiremock as _;

mod account;
mod chat;
mod config;
pub mod endpoints;
mod error;
mod history;
mod http;
mod speech;
pub mod stream;

use std::sync::Arc;

use mrwhite_core::{ApiError, Backend};

pub use config::ApiClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;

/// Mr. White API adapter implementing every backend port.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct MrWhiteApi {
    client: Arc<ApiClient>,
}

impl MrWhiteApi {
    /// Create an adapter for the API described by `config`.
    pub fn new(config: &ApiClientConfig) -> Result<Self, ApiError> {
        let client = ApiClient::new(config)?;
        tracing::debug!(base_url = %client.base_url(), "API client ready");
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Bundle this adapter as every port of a [`Backend`].
    #[must_use]
    pub fn into_backend(self) -> Backend {
        let api = Arc::new(self);
        Backend {
            chat: api.clone(),
            history: api.clone(),
            speech: api.clone(),
            credits: api.clone(),
            dogs: api.clone(),
            documents: api,
        }
    }
}
