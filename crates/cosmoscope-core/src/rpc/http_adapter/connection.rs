use reqwest::Url;

use crate::error::CoreError;

/// Default number of transactions requested per `tx_search` page. CometBFT
/// caps `per_page` at 100.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
const MAX_PAGE_SIZE: u32 = 100;

/// Endpoint and transport settings for [`HttpLedgerClient`](super::HttpLedgerClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// CometBFT RPC endpoint, e.g. `https://rpc.cosmos.network`.
    pub rpc_url: String,
    /// Cosmos REST (LCD) endpoint used for bank balance queries.
    pub rest_url: Option<String>,
    /// Outbound request budget; `None` disables rate limiting.
    pub requests_per_second: Option<u32>,
    /// `tx_search` page size.
    pub page_size: u32,
}

impl ClientConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            rest_url: None,
            requests_per_second: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_rest_url(mut self, rest_url: impl Into<String>) -> Self {
        self.rest_url = Some(rest_url.into());
        self
    }

    pub(super) fn validated_page_size(&self) -> Result<u32, CoreError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(CoreError::InvalidConfig(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(self.page_size)
    }
}

/// Validate an HTTP(S) endpoint and strip any trailing slash.
pub(super) fn parse_connection(connection: &str) -> Result<String, CoreError> {
    let parsed = Url::parse(connection).map_err(|e| {
        CoreError::InvalidConfig(format!(
            "invalid connection `{connection}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(connection.trim_end_matches('/').to_owned()),
        other => Err(CoreError::InvalidConfig(format!(
            "unsupported connection scheme `{other}`; expected http or https"
        ))),
    }
}
