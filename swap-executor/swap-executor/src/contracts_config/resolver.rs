//! A lazily initialized, memoized resolver of the contracts configuration

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use swap_executor_api::config::{ContractsConfigPayload, CONFIG_ROUTE};
use tokio::sync::OnceCell;
use tracing::{info, instrument};

use crate::error::SwapError;

use super::ContractsConfig;

/// The timeout applied to configuration requests
const CONFIG_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ----------
// | Source |
// ----------

/// A source from which the raw contracts configuration is fetched
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Fetch the raw configuration payload
    async fn fetch(&self) -> Result<ContractsConfigPayload, SwapError>;
}

/// A configuration source backed by the aggregator backend
#[derive(Debug, Clone)]
pub struct HttpConfigSource {
    /// The base URL of the backend
    base_url: String,
    /// The HTTP client used to issue requests
    http_client: Client,
}

impl HttpConfigSource {
    /// Constructor
    pub fn new(base_url: String) -> Result<Self, SwapError> {
        let http_client = Client::builder()
            .timeout(CONFIG_REQUEST_TIMEOUT)
            .build()
            .map_err(SwapError::config_unavailable)?;

        Ok(Self { base_url, http_client })
    }
}

#[async_trait]
impl ConfigSource for HttpConfigSource {
    async fn fetch(&self) -> Result<ContractsConfigPayload, SwapError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), CONFIG_ROUTE);
        let response =
            self.http_client.get(&url).send().await.map_err(SwapError::config_unavailable)?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.map_err(SwapError::config_unavailable)?;
            return Err(SwapError::config_unavailable(format!("Status {}: {}", status, message)));
        }

        response.json().await.map_err(SwapError::config_unavailable)
    }
}

// ------------
// | Resolver |
// ------------

/// Resolves the contracts configuration at most once per session
///
/// Concurrent callers during the first fetch wait on the same in-flight
/// request. A failed fetch leaves the resolver empty, so the next call
/// retries
pub struct ContractsConfigResolver {
    /// The source of the raw configuration
    source: Box<dyn ConfigSource>,
    /// The resolved configuration, once available
    cell: OnceCell<Arc<ContractsConfig>>,
}

impl ContractsConfigResolver {
    /// Constructor
    pub fn new(source: Box<dyn ConfigSource>) -> Self {
        Self { source, cell: OnceCell::new() }
    }

    /// Resolve the configuration, fetching it if this is the first call
    #[instrument(skip_all)]
    pub async fn resolve(&self) -> Result<Arc<ContractsConfig>, SwapError> {
        let config = self
            .cell
            .get_or_try_init(|| async {
                let payload = self.source.fetch().await?;
                let config = ContractsConfig::from_payload(payload)?;
                info!(
                    n_tokens = config.tokens.len(),
                    n_routers = config.routers.len(),
                    "resolved contracts config"
                );

                Ok::<_, SwapError>(Arc::new(config))
            })
            .await?;

        Ok(config.clone())
    }

    /// The configuration if it has already been resolved
    pub fn get(&self) -> Option<Arc<ContractsConfig>> {
        self.cell.get().cloned()
    }
}
