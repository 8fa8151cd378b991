//! A client for the aggregator backend's quote route

use std::time::Duration;

use reqwest::{Client, Response};
use swap_executor_api::exchange::{
    ExchangeRequest, ExchangeResponse, QuoteOption, EXCHANGE_ROUTE,
};
use tracing::{debug, instrument};

use crate::error::SwapError;

/// The timeout applied to quote requests
const QUOTE_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches ranked quote options from the backend
#[derive(Debug, Clone)]
pub struct QuoteClient {
    /// The base URL of the backend
    base_url: String,
    /// The HTTP client used to issue requests
    http_client: Client,
}

impl QuoteClient {
    /// Constructor
    pub fn new(base_url: String) -> Result<Self, SwapError> {
        let http_client = Client::builder()
            .timeout(QUOTE_REQUEST_TIMEOUT)
            .build()
            .map_err(SwapError::quote_unavailable)?;

        Ok(Self { base_url, http_client })
    }

    /// Fetch the quote options for a swap, best first
    #[instrument(skip(self))]
    pub async fn get_quotes(
        &self,
        token_from: &str,
        token_to: &str,
        amount: f64,
    ) -> Result<Vec<QuoteOption>, SwapError> {
        let req = ExchangeRequest {
            token_from: token_from.to_string(),
            token_to: token_to.to_string(),
            amount,
        };

        let resp: ExchangeResponse = self
            .send_post_request(EXCHANGE_ROUTE, &req)
            .await?
            .json()
            .await
            .map_err(SwapError::quote_unavailable)?;

        debug!("received {} quote options", resp.options.len());
        Ok(resp.options)
    }

    /// Send a POST request to the given route, checking the response status
    async fn send_post_request(
        &self,
        route: &str,
        body: &ExchangeRequest,
    ) -> Result<Response, SwapError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), route);
        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(SwapError::quote_unavailable)?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.map_err(SwapError::quote_unavailable)?;
            return Err(SwapError::quote_unavailable(format!("Status {}: {}", status, message)));
        }

        Ok(response)
    }
}
