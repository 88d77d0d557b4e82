//! Part Lookup Client implementations.

use crate::api::LookupResponse;
use crate::error::{LookupError, Result};
use crate::source::TabularSource;
use async_trait::async_trait;
use partscan_core::{LookupConfig, PartRecord, PartToken};
use reqwest::Client;
use std::time::Duration;

/// Resolves a part token into a record.
///
/// Implementations are stateless across calls, so concurrent resolutions
/// of different tokens never interfere.
#[async_trait]
pub trait PartLookup: Send + Sync {
    /// Resolve `token`.
    ///
    /// # Errors
    /// Returns a not-found, configuration or transport failure; see
    /// [`LookupError::kind`].
    async fn resolve(&self, token: &PartToken) -> Result<PartRecord>;

    /// Short identifier used in logs.
    fn lookup_id(&self) -> &str;
}

/// Lookup that fetches the table itself and resolves locally.
pub struct SheetLookup<S> {
    source: S,
}

impl<S: TabularSource> SheetLookup<S> {
    /// Resolve against `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The wrapped source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }
}

#[async_trait]
impl<S: TabularSource> PartLookup for SheetLookup<S> {
    async fn resolve(&self, token: &PartToken) -> Result<PartRecord> {
        tracing::debug!(token = %token, source = self.source.source_id(), "Fetching data for part number");

        let table = self.source.fetch_table().await?;
        let result = table.resolve(token);

        match &result {
            Ok(record) => tracing::info!(token = %token, name = %record.name, "Part data found"),
            Err(err) => tracing::info!(token = %token, error = %err, "Part lookup failed"),
        }
        result
    }

    fn lookup_id(&self) -> &str {
        self.source.source_id()
    }
}

/// Client for a remote `GET /parts/{token}` route.
pub struct HttpPartClient {
    client: Client,
    base_url: String,
}

impl HttpPartClient {
    /// Create a client with a 30 second timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_client_options(base_url, Duration::from_secs(30), None)
    }

    /// Create a client from lookup settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        Self::with_client_options(
            config.api_base_url.clone(),
            Duration::from_secs(config.timeout_secs),
            Some(config.user_agent.as_str()),
        )
    }

    fn with_client_options(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<Self> {
        let mut builder = Client::builder().timeout(timeout);
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent);
        }
        let client = builder
            .build()
            .map_err(|e| LookupError::NotConfigured(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Route URL for `token`, percent-encoded.
    #[must_use]
    pub fn part_url(&self, token: &PartToken) -> String {
        format!(
            "{}/parts/{}",
            self.base_url,
            urlencoding::encode(token.as_str())
        )
    }
}

#[async_trait]
impl PartLookup for HttpPartClient {
    async fn resolve(&self, token: &PartToken) -> Result<PartRecord> {
        let url = self.part_url(token);
        tracing::debug!(token = %token, "Requesting part lookup");

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        match serde_json::from_str::<LookupResponse>(&body) {
            Ok(envelope) => envelope.into_result(status, token),
            Err(e) if (200..300).contains(&status) => Err(LookupError::ParseError(format!(
                "invalid lookup envelope: {e}"
            ))),
            Err(_) => Err(LookupError::Transport {
                status,
                message: if body.is_empty() {
                    format!("lookup failed with status {status}")
                } else {
                    body
                },
            }),
        }
    }

    fn lookup_id(&self) -> &'static str {
        "http"
    }
}
