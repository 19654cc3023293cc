//! Ledger node abstraction layer.
//!
//! Defines the [`LedgerClient`] trait and provides a CometBFT JSON-RPC
//! implementation ([`HttpLedgerClient`]) plus a test mock (`mock::MockLedger`).

mod http_adapter;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use http_adapter::{ClientConfig, HttpLedgerClient};
pub use types::{BlockInfo, ChainInfo, NodeStatus};

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::{BlockHeight, Coin, RawTransaction};

/// Read-only operations Cosmoscope needs from a ledger full node.
///
/// Implementations own connection management, transport retries (if any),
/// and response decoding.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch an indexed transaction by hex hash. `Ok(None)` when the node
    /// does not know the hash.
    async fn get_tx(&self, hash: &str) -> Result<Option<RawTransaction>, CoreError>;

    /// Run a transaction index search and return every match.
    async fn search_tx(&self, expression: &str) -> Result<Vec<RawTransaction>, CoreError>;

    async fn get_chain_id(&self) -> Result<String, CoreError>;

    async fn get_height(&self) -> Result<BlockHeight, CoreError>;

    /// Fetch a block by height, or the latest block when `height` is `None`.
    async fn get_block(&self, height: Option<BlockHeight>) -> Result<BlockInfo, CoreError>;

    async fn get_balance(&self, address: &str, denom: &str) -> Result<Coin, CoreError>;

    async fn get_all_balances(&self, address: &str) -> Result<Vec<Coin>, CoreError>;

    /// Node identity and sync state, when the transport exposes it.
    async fn get_node_status(&self) -> Result<Option<NodeStatus>, CoreError> {
        Ok(None)
    }
}
