use crate::error::{CoreError, RpcError};

#[derive(serde::Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    pub(super) jsonrpc: &'static str,
    pub(super) id: u64,
    pub(super) method: &'a str,
    pub(super) params: serde_json::Value,
}

#[derive(serde::Deserialize)]
pub(super) struct JsonRpcResponse {
    pub(super) result: Option<serde_json::Value>,
    pub(super) error: Option<serde_json::Value>,
}

/// Parse a JSON-RPC error value into a structured `CoreError`.
///
/// CometBFT errors look like `{"code": <int>, "message": <string>,
/// "data": <string>}`, with the useful detail usually in `data`. Anything
/// else falls back to `InvalidResponse` with the raw JSON.
pub(super) fn parse_jsonrpc_error(err: serde_json::Value) -> CoreError {
    #[derive(serde::Deserialize)]
    struct JsonRpcError {
        code: i64,
        message: String,
        #[serde(default)]
        data: Option<serde_json::Value>,
    }

    if let Ok(parsed) = serde_json::from_value::<JsonRpcError>(err.clone()) {
        let data = parsed.data.map(|data| match data {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });
        CoreError::Rpc(RpcError::ServerError {
            code: parsed.code,
            message: parsed.message,
            data,
        })
    } else {
        CoreError::Rpc(RpcError::InvalidResponse(format!(
            "non-standard JSON-RPC error: {err}"
        )))
    }
}

/// CometBFT reports an unknown hash as an internal error whose data reads
/// `tx (<HASH>) not found`.
pub(super) fn is_tx_not_found(err: &CoreError) -> bool {
    match err {
        CoreError::Rpc(RpcError::ServerError { message, data, .. }) => {
            let detail = data.as_deref().unwrap_or(message).to_ascii_lowercase();
            detail.contains("not found")
        }
        _ => false,
    }
}
