//! Chain-level types returned by ledger clients.
//!
//! Transaction types live in `crate::types`; this module only covers blocks
//! and node state.

use serde::{Deserialize, Serialize};

use crate::types::BlockHeight;

// ==============================================================================
// Blocks
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Upper-case hex block hash.
    pub hash: String,
    pub height: BlockHeight,
    /// RFC 3339 block time as reported by the node.
    pub time: String,
    pub chain_id: String,
    pub proposer_address: String,
    pub tx_count: usize,
}

// ==============================================================================
// Node and Chain Info
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub moniker: String,
    pub network: String,
    pub version: String,
    pub latest_block_height: BlockHeight,
    pub catching_up: bool,
}

/// Snapshot of the chain tip, optionally enriched with node status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub chain_id: String,
    pub latest_block_height: BlockHeight,
    pub latest_block_time: String,
    pub latest_block_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_info: Option<NodeStatus>,
}
