use async_trait::async_trait;
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::{candle::RawCandle, pair::CurrencyPair, request_params::CandleRequest},
    providers::{
        ClientBuildSnafu, DecodeSnafu, InvalidApiKeySnafu, ProviderInitError, QuoteSource,
        SourceError, StatusSnafu,
        oanda_rest::{
            config::OandaConfig,
            params::construct_params,
            response::{CandlesResponse, error_message},
        },
    },
};

pub struct OandaProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl OandaProvider {
    /// Creates a provider with its own HTTP client honouring `config.timeout`.
    pub fn new(config: &OandaConfig) -> Result<Self, ProviderInitError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context(ClientBuildSnafu)?;
        Self::with_client(client, config)
    }

    /// Creates a provider on top of an existing client.
    pub fn with_client(client: Client, config: &OandaConfig) -> Result<Self, ProviderInitError> {
        // Reject keys that cannot travel in a header now rather than on the first request.
        header::HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
            .context(InvalidApiKeySnafu)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: SecretString::new(config.api_key.expose_secret().into()),
        })
    }

    pub fn candles_url(&self, pair: &CurrencyPair) -> String {
        format!("{}/instruments/{}/candles", self.base_url, pair.instrument())
    }
}

#[async_trait]
impl QuoteSource for OandaProvider {
    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<RawCandle>, SourceError> {
        let url = self.candles_url(&request.pair);
        let query = construct_params(request);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.api_key.expose_secret())
            .header("Accept-Datetime-Format", "RFC3339")
            .query(&query)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return StatusSnafu {
                url,
                status: status.as_u16(),
                message: error_message(&body),
            }
            .fail();
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::from_reqwest(&url, e))?;
        let envelope: CandlesResponse = serde_json::from_str(&body).context(DecodeSnafu)?;

        debug!(
            instrument = %request.pair.instrument(),
            candles = envelope.candles.len(),
            "received candles"
        );
        Ok(envelope.candles)
    }
}
