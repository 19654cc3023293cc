use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::CoreError;
use crate::types::{Attribute, BlockHeight, Coin, Event, RawTransaction};

use super::super::types::{BlockInfo, NodeStatus};

// ==============================================================================
// Hash Encoding
// ==============================================================================

/// CometBFT's JSON-RPC `tx` method takes the hash as base64-encoded bytes,
/// while explorers and the index report it as hex.
pub(super) fn encode_tx_hash(hash: &str) -> Result<String, CoreError> {
    if hash.is_empty() {
        return Err(CoreError::InvalidQuery(
            "transaction hash must not be empty".to_owned(),
        ));
    }
    let bytes = hex::decode(hash).map_err(|e| {
        CoreError::InvalidQuery(format!("transaction hash `{hash}` is not hex: {e}"))
    })?;
    Ok(BASE64.encode(bytes))
}

// ==============================================================================
// Transactions
// ==============================================================================

/// Decode one `tx_search` page into its transactions and the total match count.
pub(super) fn parse_tx_search_page(
    result: &serde_json::Value,
) -> Result<(Vec<RawTransaction>, u64), CoreError> {
    let total = parse_integer_required::<u64>(result.get("total_count"), "total_count")?;
    let txs = match result.get("txs") {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(parse_raw_tx)
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(CoreError::InvalidData(format!(
                "expected txs array, got: {other}"
            )))
        }
    };
    Ok((txs, total))
}

/// Decode a `tx` result (or one `tx_search` item).
///
/// CometBFT omits zero-valued `code`, `gas_used` and `gas_wanted`, so a
/// missing or null field defaults to 0. A present value that does not decode
/// is an error. Numbers may arrive as JSON numbers or decimal strings.
pub(super) fn parse_raw_tx(raw: &serde_json::Value) -> Result<RawTransaction, CoreError> {
    let hash = parse_string_required(raw.get("hash"), "hash")?.to_ascii_uppercase();
    let height = parse_integer_required::<u64>(raw.get("height"), "height").map(BlockHeight)?;

    let tx_result = raw.get("tx_result");
    let field = |name: &str| tx_result.and_then(|r| r.get(name));

    Ok(RawTransaction {
        hash,
        height,
        code: parse_integer_optional::<u32>(field("code"), "tx_result.code")?.unwrap_or(0),
        gas_used: parse_integer_optional::<u64>(field("gas_used"), "tx_result.gas_used")?
            .unwrap_or(0),
        gas_wanted: parse_integer_optional::<u64>(field("gas_wanted"), "tx_result.gas_wanted")?
            .unwrap_or(0),
        events: parse_events(field("events")),
    })
}

/// Decode an event list. Missing or null pieces degrade to empty values.
pub(super) fn parse_events(value: Option<&serde_json::Value>) -> Vec<Event> {
    let Some(items) = value.and_then(serde_json::Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|event| Event {
            kind: parse_string_lossy(event.get("type")),
            attributes: event
                .get("attributes")
                .and_then(serde_json::Value::as_array)
                .map(|attrs| {
                    attrs
                        .iter()
                        .map(|attr| Attribute {
                            key: parse_string_lossy(attr.get("key")),
                            value: parse_string_lossy(attr.get("value")),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

// ==============================================================================
// Blocks and Status
// ==============================================================================

pub(super) fn parse_block(result: &serde_json::Value) -> Result<BlockInfo, CoreError> {
    let header = result
        .get("block")
        .and_then(|b| b.get("header"))
        .ok_or_else(|| CoreError::InvalidData("missing block header".into()))?;
    let hash = result
        .get("block_id")
        .and_then(|id| id.get("hash"))
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| CoreError::InvalidData("missing block_id.hash".into()))?;
    let tx_count = result
        .get("block")
        .and_then(|b| b.get("data"))
        .and_then(|d| d.get("txs"))
        .and_then(serde_json::Value::as_array)
        .map_or(0, Vec::len);

    Ok(BlockInfo {
        hash: hash.to_ascii_uppercase(),
        height: parse_integer_required::<u64>(header.get("height"), "block.header.height")
            .map(BlockHeight)?,
        time: parse_string_required(header.get("time"), "block.header.time")?,
        chain_id: parse_string_required(header.get("chain_id"), "block.header.chain_id")?,
        proposer_address: parse_string_lossy(header.get("proposer_address")),
        tx_count,
    })
}

pub(super) fn parse_status(result: &serde_json::Value) -> Result<NodeStatus, CoreError> {
    let node_info = result
        .get("node_info")
        .ok_or_else(|| CoreError::InvalidData("missing node_info".into()))?;
    let sync_info = result
        .get("sync_info")
        .ok_or_else(|| CoreError::InvalidData("missing sync_info".into()))?;

    Ok(NodeStatus {
        moniker: parse_string_lossy(node_info.get("moniker")),
        network: parse_string_required(node_info.get("network"), "node_info.network")?,
        version: parse_string_lossy(node_info.get("version")),
        latest_block_height: parse_integer_required::<u64>(
            sync_info.get("latest_block_height"),
            "sync_info.latest_block_height",
        )
        .map(BlockHeight)?,
        catching_up: sync_info
            .get("catching_up")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false),
    })
}

// ==============================================================================
// Bank Balances (REST gateway)
// ==============================================================================

pub(super) fn parse_coin(value: &serde_json::Value) -> Result<Coin, CoreError> {
    serde_json::from_value(value.clone())
        .map_err(|e| CoreError::InvalidData(format!("invalid coin `{value}`: {e}")))
}

pub(super) fn parse_coins(value: Option<&serde_json::Value>) -> Result<Vec<Coin>, CoreError> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(serde_json::Value::Array(items)) => items.iter().map(parse_coin).collect(),
        Some(other) => Err(CoreError::InvalidData(format!(
            "expected coin array, got: {other}"
        ))),
    }
}

// ==============================================================================
// Scalars
// ==============================================================================

fn parse_string_required(
    value: Option<&serde_json::Value>,
    field: &str,
) -> Result<String, CoreError> {
    value
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| CoreError::InvalidData(format!("missing {field}")))
}

fn parse_string_lossy(value: Option<&serde_json::Value>) -> String {
    value
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

pub(super) fn parse_integer_required<T>(
    value: Option<&serde_json::Value>,
    field: &str,
) -> Result<T, CoreError>
where
    T: TryFrom<u64>,
{
    parse_integer::<T, true>(value, field)?
        .ok_or_else(|| CoreError::InvalidData(format!("missing {field}")))
}

pub(super) fn parse_integer_optional<T>(
    value: Option<&serde_json::Value>,
    field: &str,
) -> Result<Option<T>, CoreError>
where
    T: TryFrom<u64>,
{
    parse_integer::<T, false>(value, field)
}

// Generic unsigned parser used by the concrete helpers above. CometBFT encodes
// 64-bit integers as strings, so both representations are accepted.
// `REQUIRED=false` treats missing/null as `Ok(None)`; a present value that is
// not an unsigned integer is `InvalidData` either way.
fn parse_integer<T, const REQUIRED: bool>(
    value: Option<&serde_json::Value>,
    field: &str,
) -> Result<Option<T>, CoreError>
where
    T: TryFrom<u64>,
{
    let raw = match value {
        None | Some(serde_json::Value::Null) if REQUIRED => {
            return Err(CoreError::InvalidData(format!("missing {field}")))
        }
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(raw) => raw,
    };

    let n = match raw {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    };
    let Some(n) = n else {
        return Err(CoreError::InvalidData(format!(
            "{field} is not an unsigned integer: {raw}"
        )));
    };

    T::try_from(n)
        .map(Some)
        .map_err(|_| CoreError::InvalidData(format!("{field} out of range: {n}")))
}
