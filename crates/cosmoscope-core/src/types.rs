//! Domain types for Cosmoscope's transaction model.
//!
//! Contains the raw indexed transaction shape returned by the ledger client
//! (`RawTransaction`, `Event`, `Attribute`), the records derived from it by
//! analysis (`TransactionMessage`, `Transfer`, `TransactionAnalysis`), and the
//! reduced `DisplaySummary`.

use serde::{Deserialize, Serialize};

// ==============================================================================
// Block Height
// ==============================================================================

/// A ledger block height, wrapped for type safety.
///
/// `#[serde(transparent)]` keeps the JSON representation a bare integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockHeight(pub u64);

impl From<u64> for BlockHeight {
    fn from(h: u64) -> Self {
        Self(h)
    }
}

impl From<BlockHeight> for u64 {
    fn from(h: BlockHeight) -> Self {
        h.0
    }
}

impl std::ops::Deref for BlockHeight {
    type Target = u64;
    fn deref(&self) -> &u64 {
        &self.0
    }
}

impl std::fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ==============================================================================
// Indexed Transaction
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A typed key/value log entry attached to a transaction by the execution layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<Attribute>,
}

/// A transaction as returned by the node's transaction index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Upper-case hex transaction hash.
    pub hash: String,
    pub height: BlockHeight,
    /// Execution result code; `0` is success.
    pub code: u32,
    pub gas_used: u64,
    pub gas_wanted: u64,
    pub events: Vec<Event>,
}

impl RawTransaction {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

// ==============================================================================
// Analysis
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMessage {
    /// Value of the `action` attribute; empty when the event carries none.
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub sender: String,
    pub recipient: String,
    pub amount: String,
}

/// An amount of a single denomination, as reported by the bank module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAnalysis {
    pub hash: String,
    pub height: BlockHeight,
    pub gas_used: u64,
    pub gas_wanted: u64,
    pub events: Vec<Event>,
    pub messages: Vec<TransactionMessage>,
    pub transfers: Vec<Transfer>,
    /// Indexed transactions never carry fee data, so this is always `None`.
    pub fees: Option<Vec<Coin>>,
}

// ==============================================================================
// Display Summary
// ==============================================================================

/// Marker rendered for fields an indexed transaction cannot provide.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Success,
    Failed,
}

impl TxStatus {
    pub fn from_code(code: u32) -> Self {
        if code == 0 {
            Self::Success
        } else {
            Self::Failed
        }
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySummary {
    pub hash: String,
    pub height: BlockHeight,
    pub status: TxStatus,
    /// `"<used>/<wanted>"`.
    pub gas_used: String,
    pub message_count: usize,
    pub transfer_count: usize,
    /// Always [`NOT_AVAILABLE`].
    pub timestamp: String,
    /// Always `None`.
    pub fee: Option<Vec<Coin>>,
}
