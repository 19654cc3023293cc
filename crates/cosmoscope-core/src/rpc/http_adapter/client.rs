use std::num::{NonZeroU32, NonZeroUsize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use lru::LruCache;
use reqwest::header;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::error::{CoreError, RpcError};
use crate::types::{BlockHeight, Coin, RawTransaction};

use super::super::types::{BlockInfo, NodeStatus};
use super::super::LedgerClient;
use super::connection::{parse_connection, ClientConfig};
use super::parsing::{
    encode_tx_hash, parse_block, parse_coin, parse_coins, parse_raw_tx, parse_status,
    parse_tx_search_page,
};
use super::protocol::{is_tx_not_found, parse_jsonrpc_error, JsonRpcRequest, JsonRpcResponse};

/// Maximum number of committed blocks cached in memory.
const BLOCK_CACHE_CAP: NonZeroUsize = match NonZeroUsize::new(1_000) {
    Some(cap) => cap,
    None => panic!("block cache capacity must be non-zero"),
};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// CometBFT JSON-RPC client over HTTP(S).
///
/// Transaction search walks every result page. Blocks requested by explicit
/// height are cached, since committed blocks never change; the latest block
/// is always fetched fresh.
pub struct HttpLedgerClient {
    client: reqwest::Client,
    rpc_url: String,
    rest_url: Option<String>,
    limiter: Option<DirectRateLimiter>,
    page_size: u32,
    next_id: AtomicU64,
    block_cache: RwLock<LruCache<BlockHeight, BlockInfo>>,
}

impl HttpLedgerClient {
    /// Create a client for `config`. No request is sent until the first call.
    ///
    /// If `requests_per_second` is set, every outbound HTTP request (RPC or
    /// REST) waits for the limiter first.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let rpc_url = parse_connection(&config.rpc_url)?;
        let rest_url = config
            .rest_url
            .as_deref()
            .map(parse_connection)
            .transpose()?;
        let page_size = config.validated_page_size()?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .map_err(RpcError::Transport)?;

        let limiter = match config.requests_per_second {
            None => None,
            Some(limit) => {
                let limit = NonZeroU32::new(limit).ok_or_else(|| {
                    CoreError::InvalidConfig("requests_per_second must be at least 1".to_owned())
                })?;
                Some(RateLimiter::direct(Quota::per_second(limit)))
            }
        };

        Ok(Self {
            client,
            rpc_url,
            rest_url,
            limiter,
            page_size,
            next_id: AtomicU64::new(initial_request_id()),
            block_cache: RwLock::new(LruCache::new(BLOCK_CACHE_CAP)),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, CoreError> {
        self.wait_for_rate_limit().await;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(rpc.id = id, rpc.method = method, "rpc call");
        let req = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = self
            .client
            .post(&self.rpc_url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&req)
            .send()
            .await
            .map_err(RpcError::Transport)?;
        let status = response.status();

        let body = response.text().await.map_err(RpcError::Transport)?;
        debug!(rpc.id = id, rpc.method = method, %status, body_len = body.len(), "rpc response");
        trace!(rpc.id = id, rpc.method = method, body = %body, "rpc response body");

        // CometBFT answers errors with a JSON-RPC body even on non-2xx status,
        // so only fall back to the HTTP status when the body does not decode.
        let decoded: JsonRpcResponse = match serde_json::from_str(&body) {
            Ok(decoded) => decoded,
            Err(_) if !status.is_success() => {
                return Err(RpcError::Http {
                    status: status.as_u16(),
                    body,
                }
                .into())
            }
            Err(e) => {
                return Err(RpcError::InvalidResponse(format!(
                    "decode JSON-RPC response: {e}; body={body}"
                ))
                .into())
            }
        };

        if let Some(err) = decoded.error {
            return Err(parse_jsonrpc_error(err));
        }

        decoded.result.ok_or_else(|| {
            RpcError::InvalidResponse(format!("{method} response has no result")).into()
        })
    }

    async fn rest_get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, CoreError> {
        let base = self.rest_url.as_deref().ok_or_else(|| {
            CoreError::Unsupported("balance queries require a REST endpoint".to_owned())
        })?;
        self.wait_for_rate_limit().await;

        let url = format!("{base}{path}");
        debug!(rest.url = %url, "rest call");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(RpcError::Transport)?;
        let status = response.status();
        let body = response.text().await.map_err(RpcError::Transport)?;
        debug!(rest.url = %url, %status, body_len = body.len(), "rest response");

        if !status.is_success() {
            return Err(RpcError::Http {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        serde_json::from_str(&body).map_err(|e| {
            RpcError::InvalidResponse(format!("decode REST response: {e}; body={body}")).into()
        })
    }

    async fn fetch_block(&self, height: Option<BlockHeight>) -> Result<BlockInfo, CoreError> {
        let params = match height {
            Some(height) => serde_json::json!({ "height": height.to_string() }),
            None => serde_json::json!({}),
        };
        let raw = self.rpc_call("block", params).await?;
        parse_block(&raw)
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn get_tx(&self, hash: &str) -> Result<Option<RawTransaction>, CoreError> {
        let encoded = encode_tx_hash(hash)?;
        let raw = match self
            .rpc_call("tx", serde_json::json!({ "hash": encoded, "prove": false }))
            .await
        {
            Ok(raw) => raw,
            Err(err) if is_tx_not_found(&err) => {
                debug!(tx.hash = hash, "transaction not found");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        parse_raw_tx(&raw).map(Some)
    }

    async fn search_tx(&self, expression: &str) -> Result<Vec<RawTransaction>, CoreError> {
        let mut results = Vec::new();
        let mut page: u32 = 1;

        loop {
            let raw = self
                .rpc_call(
                    "tx_search",
                    serde_json::json!({
                        "query": expression,
                        "prove": false,
                        "page": page.to_string(),
                        "per_page": self.page_size.to_string(),
                        "order_by": "asc",
                    }),
                )
                .await?;
            let (txs, total) = parse_tx_search_page(&raw)?;
            let fetched = txs.len();
            results.extend(txs);
            debug!(
                search.page = page,
                search.fetched = fetched,
                search.collected = results.len(),
                search.total = total,
                "tx_search page"
            );

            if fetched == 0 || results.len() as u64 >= total {
                break;
            }
            page += 1;
        }

        Ok(results)
    }

    async fn get_chain_id(&self) -> Result<String, CoreError> {
        let raw = self.rpc_call("status", serde_json::json!({})).await?;
        Ok(parse_status(&raw)?.network)
    }

    async fn get_height(&self) -> Result<BlockHeight, CoreError> {
        let raw = self.rpc_call("status", serde_json::json!({})).await?;
        Ok(parse_status(&raw)?.latest_block_height)
    }

    async fn get_block(&self, height: Option<BlockHeight>) -> Result<BlockInfo, CoreError> {
        let Some(height) = height else {
            return self.fetch_block(None).await;
        };

        // LRU `get` updates recency, so it needs the write lock.
        if let Some(block) = self.block_cache.write().await.get(&height).cloned() {
            return Ok(block);
        }

        let block = self.fetch_block(Some(height)).await?;
        self.block_cache.write().await.put(height, block.clone());
        Ok(block)
    }

    async fn get_balance(&self, address: &str, denom: &str) -> Result<Coin, CoreError> {
        validate_address(address)?;
        let raw = self
            .rest_get(
                &format!("/cosmos/bank/v1beta1/balances/{address}/by_denom"),
                &[("denom", denom)],
            )
            .await?;
        match raw.get("balance") {
            Some(balance) if !balance.is_null() => parse_coin(balance),
            _ => Ok(Coin {
                denom: denom.to_owned(),
                amount: "0".to_owned(),
            }),
        }
    }

    async fn get_all_balances(&self, address: &str) -> Result<Vec<Coin>, CoreError> {
        validate_address(address)?;
        let raw = self
            .rest_get(&format!("/cosmos/bank/v1beta1/balances/{address}"), &[])
            .await?;
        parse_coins(raw.get("balances"))
    }

    async fn get_node_status(&self) -> Result<Option<NodeStatus>, CoreError> {
        let raw = self.rpc_call("status", serde_json::json!({})).await?;
        parse_status(&raw).map(Some)
    }
}

fn validate_address(address: &str) -> Result<(), CoreError> {
    if address.is_empty() || !address.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::InvalidQuery(format!(
            "invalid account address `{address}`"
        )));
    }
    Ok(())
}

fn initial_request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
